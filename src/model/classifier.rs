//! Classifier capability
//!
//! A classifier takes one preprocessed `(1, H, W, 3)` tensor and returns the
//! raw per-class scores for that single batch element. The service treats the
//! model artifact as opaque; [`OnnxClassifier`] runs exported models through
//! ONNX Runtime.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use tracing::debug;

use crate::utils::error::{PawShieldError, Result};

/// A loaded image classifier.
///
/// Implementations must tolerate calls from several request workers at once.
/// Backends that are not reentrant serialise internally.
pub trait Classifier: Send + Sync {
    /// Human-readable model name for logs
    fn name(&self) -> &str;

    /// Number of scores the model is declared to produce, if fixed
    fn output_width(&self) -> Option<usize>;

    /// Raw scores for the single image in `input`
    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// Classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    output_width: Option<usize>,
    model_path: PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("output_width", &self.output_width)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load an ONNX model from disk
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(PawShieldError::PathNotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| {
                PawShieldError::Model(format!(
                    "failed to create ONNX session for '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| PawShieldError::Model("model declares no inputs".to_string()))?;

        let output = session
            .outputs
            .first()
            .ok_or_else(|| PawShieldError::Model("model declares no outputs".to_string()))?;
        let output_name = output.name.clone();

        // Output is (batch, classes); a symbolic class dimension shows up as -1.
        let output_width = match &output.output_type {
            ValueType::Tensor { shape, .. } => shape
                .iter()
                .last()
                .copied()
                .filter(|&dim| dim > 0)
                .map(|dim| dim as usize),
            _ => None,
        };

        let model_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());

        debug!(
            "Loaded {} (input '{}', output '{}', width {:?})",
            model_name, input_name, output_name, output_width
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            output_width,
            model_path: path.to_path_buf(),
            model_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn output_width(&self) -> Option<usize> {
        self.output_width
    }

    fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = TensorRef::from_array_view(input.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self
            .session
            .lock()
            .map_err(|_| PawShieldError::Model("session lock poisoned".to_string()))?;

        let outputs = session.run(inputs)?;
        let (shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()?;

        // Only the first batch element is of interest.
        let width = shape.iter().last().copied().unwrap_or(0).max(0) as usize;
        if width == 0 || data.len() < width {
            return Err(PawShieldError::Model(format!(
                "unexpected output shape {:?} from {}",
                shape.iter().collect::<Vec<_>>(),
                self.model_name
            )));
        }

        Ok(data[..width].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model_reports_path() {
        let result = OnnxClassifier::load("/nonexistent/Dog_ResNet50V2_Transfer.onnx");
        match result {
            Err(PawShieldError::PathNotFound(path)) => {
                assert!(path.ends_with("Dog_ResNet50V2_Transfer.onnx"))
            }
            other => panic!("expected PathNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
