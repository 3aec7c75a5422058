//! Inference module: the request pipeline
//!
//! - `preprocess`: image bytes to a normalized `(1, H, W, 3)` tensor
//! - `postprocess`: softmax, arg-max and rounding of raw scores
//! - `context`: the immutable state loaded at startup
//! - `predictor`: request validation, model dispatch and response assembly

pub mod context;
pub mod postprocess;
pub mod predictor;
pub mod preprocess;

// Re-export main types for convenience
pub use context::{ServiceContext, ServiceStatus};
pub use predictor::{PredictionResult, Predictor};
pub use preprocess::preprocess;
