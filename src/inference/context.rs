//! Service context
//!
//! Everything a prediction reads, built once at startup and never mutated:
//! model info, the normalization profile, the model registry and the
//! treatment catalog. Wrap it in an `Arc` to share across workers.

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::TreatmentCatalog;
use crate::config::{AssetPaths, ModelInfo, NormalizationProfile};
use crate::model::{ModelRegistry, Species};
use crate::utils::error::Result;

/// Immutable state shared by all requests
#[derive(Debug, Clone)]
pub struct ServiceContext {
    model_info: ModelInfo,
    registry: ModelRegistry,
    catalog: TreatmentCatalog,
}

impl ServiceContext {
    /// Assemble a context from already-loaded parts.
    ///
    /// Species the registry has no label set for get the one from model info;
    /// predictions read labels from the registry only.
    pub fn new(model_info: ModelInfo, registry: ModelRegistry, catalog: TreatmentCatalog) -> Self {
        let registry = registry.with_labels_from(&model_info);
        Self {
            model_info,
            registry,
            catalog,
        }
    }

    /// Load every startup resource.
    ///
    /// Model info and the treatment file are required; an error here should
    /// stop the process. Model artifacts are optional per species.
    pub fn load(paths: &AssetPaths) -> Result<Self> {
        info!("Loading model info from {:?}", paths.model_info);
        let model_info = ModelInfo::load(&paths.model_info)?;

        for species in Species::ALL {
            if let Some(descriptor) = model_info.descriptor(species) {
                info!(
                    "  {}: {} classes, backbone {}, strategy {}",
                    species.display_name(),
                    descriptor.num_classes(),
                    descriptor.backbone,
                    descriptor.strategy
                );
            }
        }

        info!("Loading treatment data from {:?}", paths.treatments);
        let catalog = TreatmentCatalog::load(&paths.treatments)?;
        if catalog.is_empty() {
            warn!("Treatment data is empty; all diagnoses will carry default guidance");
        } else {
            info!("  {} treatment entries", catalog.len());
        }

        let registry = ModelRegistry::load(paths, &model_info);

        let context = Self::new(model_info, registry, catalog);
        let status = context.status();
        if status.is_ok() {
            info!("Service ready");
        } else {
            warn!("Service started with issues: {}", status.issues.join(", "));
        }
        Ok(context)
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &TreatmentCatalog {
        &self.catalog
    }

    pub fn normalization(&self) -> Option<&NormalizationProfile> {
        self.model_info.normalization()
    }

    /// Image constants and both class lists are loaded.
    ///
    /// Individual models may still be missing; that is reported per request.
    pub fn is_ready(&self) -> bool {
        self.normalization().is_some() && self.model_info.has_all_class_lists()
    }

    /// Health summary of everything that failed to load
    pub fn status(&self) -> ServiceStatus {
        let mut issues = Vec::new();
        if !self.model_info.has_all_class_lists() {
            issues.push("Model Info JSON incomplete".to_string());
        }
        for species in Species::ALL {
            if !self.registry.has_model(species) {
                issues.push(format!("{} Model not loaded", species.display_name()));
            }
        }
        if self.catalog.is_empty() {
            issues.push("Treatment Data not loaded or empty".to_string());
        }
        if self.normalization().is_none() {
            issues.push("Image constants not loaded".to_string());
        }
        ServiceStatus { issues }
    }
}

/// Result of the readiness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub issues: Vec<String>,
}

impl ServiceStatus {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// `OK` or `WARNING: Issues detected - a, b`
    pub fn summary(&self) -> String {
        if self.is_ok() {
            "OK".to_string()
        } else {
            format!("WARNING: Issues detected - {}", self.issues.join(", "))
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PawShield API is running! Status: {}. Use /predict endpoint.",
            self.summary()
        )
    }
}
