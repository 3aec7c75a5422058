//! Model Registry
//!
//! Holds the loaded classifier and the class labels for each species. A
//! species without a model is a valid state: the registry reports it as
//! absent and the other species keeps working.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AssetPaths, ModelInfo};
use crate::model::classifier::{Classifier, OnnxClassifier};
use crate::model::Species;
use crate::utils::error::Result;

/// Shared handle to a loaded classifier
pub type SharedClassifier = Arc<dyn Classifier>;

/// Read-only collection of per-species classifiers and label sets
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<Species, SharedClassifier>,
    labels: HashMap<Species, Vec<String>>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded: Vec<&str> = Species::ALL
            .iter()
            .filter(|s| self.models.contains_key(s))
            .map(|s| s.as_str())
            .collect();
        f.debug_struct("ModelRegistry")
            .field("loaded", &loaded)
            .field("labels", &self.labels)
            .finish()
    }
}

impl ModelRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load ONNX models from the configured asset paths
    pub fn load(paths: &AssetPaths, model_info: &ModelInfo) -> Self {
        Self::load_with(paths, model_info, |_, path| {
            let classifier = OnnxClassifier::load(path)?;
            Ok(Arc::new(classifier) as SharedClassifier)
        })
    }

    /// Load models through a custom loader.
    ///
    /// Every species is attempted independently. A missing artifact, a loader
    /// error, or a model whose declared output width disagrees with the class
    /// list leaves that species without a model.
    pub fn load_with<F>(paths: &AssetPaths, model_info: &ModelInfo, mut loader: F) -> Self
    where
        F: FnMut(Species, &Path) -> Result<SharedClassifier>,
    {
        let mut registry = Self::new().with_labels_from(model_info);

        for species in Species::ALL {
            let path = paths.model_path(species);
            if !path.exists() {
                warn!(
                    "{} model not found at {:?}; {} predictions are unavailable",
                    species.display_name(),
                    path,
                    species
                );
                continue;
            }

            let classifier = match loader(species, path) {
                Ok(classifier) => classifier,
                Err(e) => {
                    warn!("Failed to load {} model from {:?}: {}", species.display_name(), path, e);
                    continue;
                }
            };

            let expected = registry.labels.get(&species).map(Vec::len);
            if let (Some(declared), Some(expected)) = (classifier.output_width(), expected) {
                if declared != expected {
                    warn!(
                        "{} model '{}' produces {} scores but {} class labels are configured; model disabled",
                        species.display_name(),
                        classifier.name(),
                        declared,
                        expected
                    );
                    continue;
                }
            }

            info!("Loaded {} model '{}'", species.display_name(), classifier.name());
            registry.models.insert(species, classifier);
        }

        registry
    }

    /// Register a classifier directly
    pub fn with_model(mut self, species: Species, classifier: SharedClassifier) -> Self {
        self.models.insert(species, classifier);
        self
    }

    /// Register the class labels for a species
    pub fn with_labels(mut self, species: Species, labels: Vec<String>) -> Self {
        self.labels.insert(species, labels);
        self
    }

    /// Take class labels from model info for every species that has none yet
    pub fn with_labels_from(mut self, model_info: &ModelInfo) -> Self {
        for species in Species::ALL {
            if let Some(labels) = model_info.class_labels(species) {
                self.labels.entry(species).or_insert_with(|| labels.to_vec());
            }
        }
        self
    }

    /// Classifier for a species, if loaded
    pub fn get_model(&self, species: Species) -> Option<&SharedClassifier> {
        self.models.get(&species)
    }

    /// Ordered class labels for a species, if configured
    pub fn get_class_labels(&self, species: Species) -> Option<&[String]> {
        self.labels.get(&species).map(Vec::as_slice)
    }

    /// Whether a classifier is loaded for the species
    pub fn has_model(&self, species: Species) -> bool {
        self.models.contains_key(&species)
    }
}
