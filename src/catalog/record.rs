//! Treatment records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Guidance returned with every diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatments: Vec<String>,
    pub veterinary_visit: String,
}

impl Default for TreatmentRecord {
    /// Generic advice used whenever no specific entry matches
    fn default() -> Self {
        Self {
            description: "Treatment information not available for this specific condition."
                .to_string(),
            symptoms: vec!["Consult a veterinarian for accurate symptoms.".to_string()],
            treatments: vec![
                "Please consult with a veterinarian for diagnosis and treatment options."
                    .to_string(),
            ],
            veterinary_visit: "Recommended".to_string(),
        }
    }
}

impl TreatmentRecord {
    /// Default record with the fields of `partial` laid over it
    pub fn overlay(partial: &PartialTreatment) -> Self {
        let mut record = Self::default();
        if let Some(description) = &partial.description {
            record.description = description.clone();
        }
        if let Some(symptoms) = &partial.symptoms {
            record.symptoms = symptoms.clone();
        }
        if let Some(treatments) = &partial.treatments {
            record.treatments = treatments.clone();
        }
        if let Some(visit) = &partial.veterinary_visit {
            record.veterinary_visit = visit.clone();
        }
        record
    }
}

/// Catalog entry; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialTreatment {
    pub description: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub treatments: Option<Vec<String>>,
    pub veterinary_visit: Option<String>,
}

impl PartialTreatment {
    /// Read an entry from catalog JSON. Returns `None` if the entry is not an
    /// object. Fields of the wrong type are skipped so they keep the default.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let text = |key: &str| match object.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                debug!("Ignoring non-string '{}' in treatment entry: {}", key, other);
                None
            }
            None => None,
        };

        let list = |key: &str| match object.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            Some(Value::String(s)) => Some(vec![s.clone()]),
            Some(other) => {
                debug!("Ignoring non-list '{}' in treatment entry: {}", key, other);
                None
            }
            None => None,
        };

        Some(Self {
            description: text("description"),
            symptoms: list("symptoms"),
            treatments: list("treatments"),
            veterinary_visit: text("veterinary_visit"),
        })
    }
}
