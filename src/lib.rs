//! # PawShield
//!
//! Skin-condition diagnosis for dogs and cats. An uploaded photo plus a
//! species tag is run through that species' image classifier, the predicted
//! class is matched to treatment guidance, and a JSON-ready diagnosis is
//! returned.
//!
//! ## Modules
//!
//! - `config`: model info descriptor (class labels, image constants, metadata)
//! - `catalog`: treatment catalog with default fallback
//! - `model`: species, the classifier capability, and the model registry
//! - `inference`: preprocessing, post-processing and the prediction pipeline
//! - `utils`: error types and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pawshield::config::AssetPaths;
//! use pawshield::inference::{Predictor, ServiceContext};
//!
//! let context = ServiceContext::load(&AssetPaths::in_dir("assets"))?;
//! let predictor = Predictor::new(Arc::new(context));
//! let result = predictor.predict(Some(&image_bytes), Some("dog"))?;
//! println!("{} -> {}", result.diagnosis, result.treatment_info.description);
//! ```

pub mod catalog;
pub mod config;
pub mod inference;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use catalog::{TreatmentCatalog, TreatmentRecord};
pub use config::{AssetPaths, ModelInfo, NormalizationProfile};
pub use inference::{PredictionResult, Predictor, ServiceContext, ServiceStatus};
pub use model::{Classifier, ModelRegistry, OnnxClassifier, Species};
pub use utils::error::{PawShieldError, PredictError, Result};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
