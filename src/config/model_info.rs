//! Model info descriptor
//!
//! Reads `pawshield_model_info.json`:
//!
//! ```json
//! {
//!   "dog_classes": ["healthy", "mange", ...],
//!   "cat_classes": ["healthy", "scabies", ...],
//!   "img_size": [224, 224],
//!   "mean_norm": [0.485, 0.456, 0.406],
//!   "std_norm": [0.229, 0.224, 0.225],
//!   "model_configs": {
//!     "Dog": {"backbone": "ResNet50V2", "strategy": "transfer"},
//!     "Cat": {"backbone": "MobileNetV2", "strategy": "transfer"}
//!   }
//! }
//! ```
//!
//! A missing or unparseable file is fatal. Incomplete image constants are
//! not: the profile is left unset and the service reports itself not ready.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::normalization::{ImageSize, NormalizationProfile};
use crate::model::Species;
use crate::utils::capitalize;
use crate::utils::error::{PawShieldError, Result};

/// Placeholder for missing backbone/strategy metadata
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Default, Deserialize)]
struct RawModelInfo {
    #[serde(default)]
    dog_classes: Option<Vec<String>>,
    #[serde(default)]
    cat_classes: Option<Vec<String>>,
    #[serde(default)]
    img_size: Option<Vec<u32>>,
    #[serde(default)]
    mean_norm: Option<Vec<f32>>,
    #[serde(default)]
    std_norm: Option<Vec<f32>>,
    #[serde(default)]
    model_configs: HashMap<String, RawModelConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelConfig {
    #[serde(default)]
    backbone: Option<String>,
    #[serde(default)]
    strategy: Option<String>,
}

/// Static description of one species' classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDescriptor {
    pub species: Species,
    /// Index `i` of the model output is `class_labels[i]`
    pub class_labels: Vec<String>,
    pub backbone: String,
    pub strategy: String,
}

impl ModelDescriptor {
    pub fn num_classes(&self) -> usize {
        self.class_labels.len()
    }
}

/// Parsed and validated model info
#[derive(Debug, Clone, Default)]
pub struct ModelInfo {
    descriptors: HashMap<Species, ModelDescriptor>,
    normalization: Option<NormalizationProfile>,
}

impl ModelInfo {
    /// Read and parse the descriptor file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PawShieldError::PathNotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse descriptor JSON
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let raw: RawModelInfo = serde_json::from_str(contents)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawModelInfo) -> Self {
        let size = raw.img_size.as_deref().and_then(ImageSize::from_slice);
        if size.is_none() {
            warn!("img_size missing or not a [width, height] pair: {:?}", raw.img_size);
        }

        let normalization = match (size, raw.mean_norm.as_deref(), raw.std_norm.as_deref()) {
            (Some(size), Some(mean), Some(std)) => {
                let profile = NormalizationProfile::from_parts(size, mean, std);
                if profile.is_none() {
                    warn!("mean_norm/std_norm must be 3 values each with nonzero std");
                }
                profile
            }
            (_, mean, std) => {
                if mean.is_some() != std.is_some() {
                    warn!("mean_norm and std_norm must be provided together");
                }
                None
            }
        };

        let mut descriptors = HashMap::new();
        let class_lists = [(Species::Dog, raw.dog_classes), (Species::Cat, raw.cat_classes)];
        for (species, classes) in class_lists {
            let Some(class_labels) = classes else {
                warn!("{}_classes missing from model info", species);
                continue;
            };
            let config = raw.model_configs.get(species.display_name());
            let backbone = config
                .and_then(|c| c.backbone.clone())
                .unwrap_or_else(|| UNKNOWN.to_string());
            let strategy = capitalize(
                config
                    .and_then(|c| c.strategy.as_deref())
                    .unwrap_or(UNKNOWN),
            );
            descriptors.insert(
                species,
                ModelDescriptor {
                    species,
                    class_labels,
                    backbone,
                    strategy,
                },
            );
        }

        Self {
            descriptors,
            normalization,
        }
    }

    /// Descriptor for a species, present when its class list was configured
    pub fn descriptor(&self, species: Species) -> Option<&ModelDescriptor> {
        self.descriptors.get(&species)
    }

    /// Ordered class labels for a species
    pub fn class_labels(&self, species: Species) -> Option<&[String]> {
        self.descriptor(species).map(|d| d.class_labels.as_slice())
    }

    /// Image constants; `None` if any part was missing or invalid
    pub fn normalization(&self) -> Option<&NormalizationProfile> {
        self.normalization.as_ref()
    }

    /// True when both class lists are present
    pub fn has_all_class_lists(&self) -> bool {
        Species::ALL.iter().all(|s| self.descriptors.contains_key(s))
    }
}
