//! Locations of the startup resources

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Species;

pub const MODEL_INFO_FILENAME: &str = "pawshield_model_info.json";
pub const TREATMENT_FILENAME: &str = "Treatment.json";
pub const DOG_MODEL_FILENAME: &str = "Dog_ResNet50V2_Transfer.onnx";
pub const CAT_MODEL_FILENAME: &str = "Cat_MobileNetV2_Transfer.onnx";

/// Paths to the model info descriptor, the treatment catalog and the two
/// model artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPaths {
    pub model_info: PathBuf,
    pub treatments: PathBuf,
    pub dog_model: PathBuf,
    pub cat_model: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl AssetPaths {
    /// All resources under one directory with their standard file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model_info: dir.join(MODEL_INFO_FILENAME),
            treatments: dir.join(TREATMENT_FILENAME),
            dog_model: dir.join(DOG_MODEL_FILENAME),
            cat_model: dir.join(CAT_MODEL_FILENAME),
        }
    }

    /// Model artifact for a species
    pub fn model_path(&self, species: Species) -> &Path {
        match species {
            Species::Dog => &self.dog_model,
            Species::Cat => &self.cat_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_uses_standard_names() {
        let paths = AssetPaths::in_dir("/srv/pawshield");
        assert_eq!(paths.model_info, PathBuf::from("/srv/pawshield/pawshield_model_info.json"));
        assert_eq!(paths.treatments, PathBuf::from("/srv/pawshield/Treatment.json"));
        assert!(paths.model_path(Species::Cat).ends_with(CAT_MODEL_FILENAME));
        assert!(paths.model_path(Species::Dog).ends_with(DOG_MODEL_FILENAME));
    }
}
