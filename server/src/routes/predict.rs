//! Prediction endpoint

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use pawshield::{PredictError, PredictionResult};
use serde::Serialize;
use tracing::{error, info_span, warn};
use uuid::Uuid;

use crate::state::SharedState;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(err: &PredictError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Fields of interest from the multipart form
#[derive(Debug, Default)]
struct PredictForm {
    /// `None` if no `image` part; empty if the part had no file
    image: Option<Vec<u8>>,
    animal_type: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<PredictForm, MultipartError> {
    let mut form = PredictForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let no_file = field.file_name().is_some_and(str::is_empty);
                let bytes = field.bytes().await?;
                form.image = Some(if no_file { Vec::new() } else { bytes.to_vec() });
            }
            "animal_type" => form.animal_type = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Error response for a form that broke off while being read
fn form_error(err: &MultipartError, max_upload_bytes: usize) -> ApiError {
    let status = err.status();
    let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
        format!("Upload exceeds the {} byte limit", max_upload_bytes)
    } else {
        err.body_text()
    };
    (status, Json(ErrorBody { error: message }))
}

/// POST /predict - Diagnose an uploaded image
///
/// A body that is not a multipart form is treated as a form with no fields,
/// so the usual validation order decides the error. A multipart body that
/// breaks off mid-read (too large, malformed) is answered with its own
/// status instead.
pub async fn predict(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let form = match multipart {
        Ok(multipart) => match read_form(multipart).await {
            Ok(form) => form,
            Err(err) => {
                warn!("Failed to read multipart form: {}", err);
                return Err(form_error(&err, state.config.max_upload_bytes));
            }
        },
        Err(rejection) => {
            warn!("Request is not a multipart form: {}", rejection);
            PredictForm::default()
        }
    };

    let request_id = Uuid::new_v4();
    let span = info_span!("predict", %request_id);
    let predictor = state.predictor.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        predictor.predict(form.image.as_deref(), form.animal_type.as_deref())
    })
    .await;

    match outcome {
        Ok(Ok(result)) => Ok(Json(result)),
        Ok(Err(err)) => {
            match err.detail() {
                Some(detail) => warn!(%request_id, "Prediction rejected: {} ({})", err, detail),
                None => warn!(%request_id, "Prediction rejected: {}", err),
            }
            Err(api_error(&err))
        }
        Err(join_error) => {
            error!(%request_id, "Prediction worker failed: {}", join_error);
            Err(api_error(&PredictError::Inference(join_error.to_string())))
        }
    }
}
