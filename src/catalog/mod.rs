//! Treatment Catalog
//!
//! Static `species -> disease -> treatment` table read from `Treatment.json`.
//! [`TreatmentCatalog::lookup`] is total: anything it cannot resolve yields
//! the default record, and a resolved entry is laid over the default so all
//! four fields are always populated.

pub mod record;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::error::{PawShieldError, Result};

pub use record::{PartialTreatment, TreatmentRecord};

/// Lowercase species key
pub fn normalize_species_key(species: &str) -> String {
    species.trim().to_lowercase()
}

/// Lowercase disease key with spaces and hyphens replaced by `_`
pub fn normalize_disease_key(disease: &str) -> String {
    disease
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Read-only treatment lookup table
#[derive(Debug, Clone, Default)]
pub struct TreatmentCatalog {
    entries: HashMap<String, HashMap<String, PartialTreatment>>,
}

impl TreatmentCatalog {
    /// Empty catalog; every lookup returns the default record
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read and parse the treatment file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PawShieldError::PathNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        Ok(Self::from_value(&value))
    }

    /// Build from parsed JSON. Entries that are not objects are dropped.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            warn!("Treatment data is not an object; using default guidance only");
            return Self::empty();
        };

        let mut entries = HashMap::new();
        for (species, diseases) in root {
            let Some(diseases) = diseases.as_object() else {
                warn!("Treatment entry for '{}' is not an object; skipped", species);
                continue;
            };

            let table: &mut HashMap<String, PartialTreatment> =
                entries.entry(normalize_species_key(species)).or_default();
            for (disease, entry) in diseases {
                match PartialTreatment::from_value(entry) {
                    Some(partial) => {
                        table.insert(normalize_disease_key(disease), partial);
                    }
                    None => warn!("Treatment for {}/{} is not an object; skipped", species, disease),
                }
            }
        }

        Self { entries }
    }

    /// Treatment guidance for a diagnosis. Never fails.
    pub fn lookup(&self, species: &str, disease: &str) -> TreatmentRecord {
        let species_key = normalize_species_key(species);
        let disease_key = normalize_disease_key(disease);

        match self
            .entries
            .get(&species_key)
            .and_then(|diseases| diseases.get(&disease_key))
        {
            Some(partial) => TreatmentRecord::overlay(partial),
            None => {
                debug!("No treatment entry for {}/{}; using default", species_key, disease_key);
                TreatmentRecord::default()
            }
        }
    }

    /// True when no species has any usable entry
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    /// Number of disease entries across all species
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> TreatmentCatalog {
        TreatmentCatalog::from_value(&json!({
            "dog": {
                "hot_spot": {
                    "description": "Acute moist dermatitis.",
                    "symptoms": ["Red, moist lesion"],
                    "treatments": ["Clip and clean the area"],
                    "veterinary_visit": "Recommended"
                },
                "ringworm": {"description": "Fungal infection of the skin."}
            },
            "Cat": {
                "Flea Allergy": {"veterinary_visit": "Optional"}
            },
            "bird": "not a mapping"
        }))
    }

    #[test]
    fn test_normalize_disease_key() {
        assert_eq!(normalize_disease_key("Hot Spot"), "hot_spot");
        assert_eq!(normalize_disease_key("hot-spot"), "hot_spot");
        assert_eq!(normalize_disease_key("HOT_SPOT"), "hot_spot");
        let once = normalize_disease_key("Flea-Allergy Dermatitis");
        assert_eq!(normalize_disease_key(&once), once);
    }

    #[test]
    fn test_lookup_is_case_and_separator_insensitive() {
        let catalog = catalog();
        let a = catalog.lookup("Dog", "Hot Spot");
        let b = catalog.lookup("dog", "hot-spot");
        let c = catalog.lookup("DOG", "hot_spot");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.description, "Acute moist dermatitis.");
    }

    #[test]
    fn test_partial_entry_fills_from_default() {
        let record = catalog().lookup("dog", "ringworm");
        let default = TreatmentRecord::default();
        assert_eq!(record.description, "Fungal infection of the skin.");
        assert_eq!(record.symptoms, default.symptoms);
        assert_eq!(record.treatments, default.treatments);
        assert_eq!(record.veterinary_visit, default.veterinary_visit);
    }

    #[test]
    fn test_catalog_keys_are_normalized_on_load() {
        let record = catalog().lookup("cat", "flea_allergy");
        assert_eq!(record.veterinary_visit, "Optional");
    }

    #[test]
    fn test_species_keys_differing_in_case_are_merged() {
        let catalog = TreatmentCatalog::from_value(&json!({
            "dog": {"mange": {"description": "Mites."}},
            "Dog": {"hot_spot": {"description": "Moist dermatitis."}}
        }));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("dog", "mange").description, "Mites.");
        assert_eq!(catalog.lookup("dog", "hot_spot").description, "Moist dermatitis.");
    }

    #[test]
    fn test_missing_entries_fall_back_to_default() {
        let catalog = catalog();
        let default = TreatmentRecord::default();
        assert_eq!(catalog.lookup("dog", "mange"), default);
        assert_eq!(catalog.lookup("fish", "ich"), default);
        assert_eq!(catalog.lookup("bird", "mites"), default);
        assert_eq!(catalog.lookup("Dog", "Mange"), catalog.lookup("dog", "mange"));
    }

    #[test]
    fn test_non_object_catalog_is_empty() {
        let catalog = TreatmentCatalog::from_value(&json!(["dog", "cat"]));
        assert!(catalog.is_empty());
        assert_eq!(catalog.lookup("dog", "hot_spot"), TreatmentRecord::default());
    }

    #[test]
    fn test_len_counts_entries() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert!(TreatmentCatalog::empty().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Treatment.json");
        fs::write(&path, r#"{"cat": {"scabies": {"description": "Mites."}}}"#).unwrap();

        let catalog = TreatmentCatalog::load(&path).unwrap();
        assert_eq!(catalog.lookup("Cat", "Scabies").description, "Mites.");
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Treatment.json");
        fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            TreatmentCatalog::load(&path),
            Err(PawShieldError::Serialization(_))
        ));
    }
}
