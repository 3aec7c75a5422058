//! Error Handling Module
//!
//! Two error families live here:
//! - [`PawShieldError`] covers startup and resource loading. These are the only
//!   failures allowed to stop the service.
//! - [`PredictError`] is the per-request taxonomy. Every variant maps to an
//!   HTTP status class and a client-facing message.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Species;

/// Error type for loading configuration, catalogs and models
#[derive(Error, Debug)]
pub enum PawShieldError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error with model loading or execution
    #[error("Model error: {0}")]
    Model(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl From<serde_json::Error> for PawShieldError {
    fn from(err: serde_json::Error) -> Self {
        PawShieldError::Serialization(err.to_string())
    }
}

impl From<ort::Error> for PawShieldError {
    fn from(err: ort::Error) -> Self {
        PawShieldError::Model(err.to_string())
    }
}

/// Convenience Result type for loading operations
pub type Result<T> = std::result::Result<T, PawShieldError>;

/// Request-level failures of the prediction pipeline.
///
/// The `Display` text is what the client sees in `{"error": ...}`.
/// Internal detail (decoder messages, backend errors) is carried in the
/// variant for logging only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// Model info, image constants or a class list is missing
    #[error("Server configuration error: Essential info missing")]
    ServiceNotReady,

    /// No `image` part in the request
    #[error("Missing \"image\" part in form-data")]
    MissingImage,

    /// An `image` part was sent but carried no file
    #[error("No image selected")]
    EmptyImage,

    /// `animal_type` absent or not one of dog/cat
    #[error("Missing or invalid \"animal_type\" (must be \"dog\" or \"cat\")")]
    InvalidSpecies,

    /// The species is valid but its model did not load
    #[error("Server error: Disease model for {} is currently unavailable", .0.display_name())]
    ModelUnavailable(Species),

    /// The bytes could not be decoded as an image
    #[error("Could not decode image")]
    ImageDecode(String),

    /// Model output disagrees with the configured class list
    #[error("Internal server error: Model prediction mismatch")]
    PredictionIndexMismatch { index: usize, classes: usize },

    /// The classifier backend failed while running
    #[error("Internal server error: Inference failed")]
    Inference(String),
}

impl PredictError {
    /// HTTP status class for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            PredictError::MissingImage
            | PredictError::EmptyImage
            | PredictError::InvalidSpecies
            | PredictError::ImageDecode(_) => 400,
            PredictError::ModelUnavailable(_) => 503,
            PredictError::ServiceNotReady
            | PredictError::PredictionIndexMismatch { .. }
            | PredictError::Inference(_) => 500,
        }
    }

    /// Internal detail worth logging, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            PredictError::ImageDecode(detail) | PredictError::Inference(detail) => {
                Some(detail.clone())
            }
            PredictError::PredictionIndexMismatch { index, classes } => Some(format!(
                "predicted index {} with {} configured classes",
                index, classes
            )),
            _ => None,
        }
    }
}
