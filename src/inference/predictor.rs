//! Inference Orchestrator
//!
//! Validates a request, dispatches to the species' classifier and builds the
//! diagnosis payload. Requests share nothing mutable; the predictor only
//! reads from its [`ServiceContext`].

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::TreatmentRecord;
use crate::inference::context::ServiceContext;
use crate::inference::postprocess::{argmax, round_probabilities, softmax};
use crate::inference::preprocess::preprocess;
use crate::model::Species;
use crate::utils::error::PredictError;
use crate::utils::round_to;

/// Diagnosis payload returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Requested species, lowercase
    pub animal_type: Species,

    /// Predicted class label
    pub diagnosis: String,

    /// Top-class probability as a percentage, two decimals
    pub confidence_percent: f32,

    /// Softmax distribution in class-index order, four decimals
    pub probabilities: Vec<f32>,

    /// Guidance for the diagnosis, default advice if the catalog has none
    pub treatment_info: TreatmentRecord,
}

/// Runs predictions against a shared service context
#[derive(Debug, Clone)]
pub struct Predictor {
    context: Arc<ServiceContext>,
}

impl Predictor {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Diagnose one image.
    ///
    /// `image` is `None` when the request had no image part and empty when
    /// the part carried no file. `animal_type` is the raw form field.
    pub fn predict(
        &self,
        image: Option<&[u8]>,
        animal_type: Option<&str>,
    ) -> Result<PredictionResult, PredictError> {
        let context = &self.context;

        let profile = match context.normalization() {
            Some(profile) if context.is_ready() => profile,
            _ => return Err(PredictError::ServiceNotReady),
        };

        let image = image.ok_or(PredictError::MissingImage)?;
        if image.is_empty() {
            return Err(PredictError::EmptyImage);
        }

        let species = animal_type
            .and_then(Species::parse)
            .ok_or(PredictError::InvalidSpecies)?;

        let classifier = context
            .registry()
            .get_model(species)
            .ok_or(PredictError::ModelUnavailable(species))?;
        let labels = context
            .registry()
            .get_class_labels(species)
            .ok_or(PredictError::ServiceNotReady)?;

        let start = Instant::now();
        let input = preprocess(image, profile)?;
        debug!("Preprocessed {} bytes into {:?}", image.len(), input.shape());

        let scores = classifier
            .classify(&input)
            .map_err(|e| PredictError::Inference(e.to_string()))?;
        let probabilities = softmax(&scores);

        let index = argmax(&probabilities).ok_or(PredictError::PredictionIndexMismatch {
            index: 0,
            classes: labels.len(),
        })?;
        if index >= labels.len() || probabilities.len() != labels.len() {
            return Err(PredictError::PredictionIndexMismatch {
                index,
                classes: labels.len(),
            });
        }

        let diagnosis = labels[index].clone();
        let confidence = probabilities[index];
        let treatment_info = context.catalog().lookup(species.as_str(), &diagnosis);

        info!(
            "Diagnosed {} as '{}' ({:.2}%) in {:.1} ms",
            species,
            diagnosis,
            confidence * 100.0,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(PredictionResult {
            animal_type: species,
            diagnosis,
            confidence_percent: round_to(confidence * 100.0, 2),
            probabilities: round_probabilities(&probabilities),
            treatment_info,
        })
    }
}
