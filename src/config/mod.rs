//! Configuration loading
//!
//! - `model_info`: class labels, image constants, per-species metadata
//! - `normalization`: the image size and mean/std contract of the models
//! - `paths`: where the descriptor resources and model artifacts live

pub mod model_info;
pub mod normalization;
pub mod paths;

pub use model_info::{ModelDescriptor, ModelInfo};
pub use normalization::{ImageSize, NormalizationProfile};
pub use paths::AssetPaths;
