//! HTTP routes

pub mod health;
pub mod predict;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Build the application router
pub fn router(state: SharedState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        // Status
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        // Diagnosis
        .route("/predict", post(predict::predict))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, ServerConfig};

    use std::io::Cursor;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use ndarray::Array4;
    use pawshield::{
        Classifier, ModelInfo, ModelRegistry, ServiceContext, Species, TreatmentCatalog,
        TreatmentRecord,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "pawshield-test-boundary";

    struct FixedScores(Vec<f32>);

    impl Classifier for FixedScores {
        fn name(&self) -> &str {
            "fixed"
        }

        fn output_width(&self) -> Option<usize> {
            Some(self.0.len())
        }

        fn classify(&self, _input: &Array4<f32>) -> pawshield::Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    fn model_info(with_constants: bool) -> ModelInfo {
        let mut info = json!({
            "dog_classes": ["healthy", "mange", "ringworm", "flea_allergy", "hot_spot"],
            "cat_classes": ["healthy", "scabies"]
        });
        if with_constants {
            info["img_size"] = json!([8, 8]);
            info["mean_norm"] = json!([0.485, 0.456, 0.406]);
            info["std_norm"] = json!([0.229, 0.224, 0.225]);
        }
        ModelInfo::from_json_str(&info.to_string()).unwrap()
    }

    fn app_with_config(config: ServerConfig, info: ModelInfo, registry: ModelRegistry) -> Router {
        let catalog = TreatmentCatalog::from_value(&json!({
            "dog": {"hot_spot": {"description": "Acute moist dermatitis."}}
        }));
        let context = ServiceContext::new(info, registry, catalog);
        router(Arc::new(AppState::new(config, context)))
    }

    fn app_with(info: ModelInfo, registry: ModelRegistry) -> Router {
        app_with_config(ServerConfig::default(), info, registry)
    }

    fn dog_only_app() -> Router {
        let registry = ModelRegistry::new().with_model(
            Species::Dog,
            Arc::new(FixedScores(vec![0.0, 0.0, 0.0, 0.0, 0.0])),
        );
        app_with(model_info(true), registry)
    }

    fn png() -> Vec<u8> {
        let image = RgbImage::from_fn(16, 12, |x, y| Rgb([x as u8 * 8, y as u8 * 8, 90]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn multipart_body(animal_type: Option<&str>, image: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(animal_type) = animal_type {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"animal_type\"\r\n\r\n{animal_type}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn predict_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_predict_success() {
        let registry = ModelRegistry::new().with_model(
            Species::Dog,
            Arc::new(FixedScores(vec![0.1, 0.2, 0.0, -0.5, 2.5])),
        );
        let app = app_with(model_info(true), registry);
        let image = png();

        let (status, body) = send(
            app,
            predict_request(multipart_body(Some("Dog"), Some(("pet.png", &image)))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["animal_type"], "dog");
        assert_eq!(body["diagnosis"], "hot_spot");
        assert_eq!(body["probabilities"].as_array().unwrap().len(), 5);
        assert_eq!(body["treatment_info"]["description"], "Acute moist dermatitis.");
        assert_eq!(
            body["treatment_info"]["veterinary_visit"],
            TreatmentRecord::default().veterinary_visit
        );
    }

    #[tokio::test]
    async fn test_predict_default_treatment_when_catalog_has_no_entry() {
        let registry = ModelRegistry::new().with_model(
            Species::Dog,
            Arc::new(FixedScores(vec![0.0, 0.0, 4.0, 0.0, 0.0])),
        );
        let app = app_with(model_info(true), registry);
        let image = png();

        let (status, body) = send(
            app,
            predict_request(multipart_body(Some("dog"), Some(("pet.png", &image)))),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["diagnosis"], "ringworm");
        assert_eq!(
            body["treatment_info"],
            serde_json::to_value(TreatmentRecord::default()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_cat_model_unavailable() {
        let image = png();
        let (status, body) = send(
            dog_only_app(),
            predict_request(multipart_body(Some("cat"), Some(("pet.png", &image)))),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({"error": "Server error: Disease model for Cat is currently unavailable"})
        );
    }

    #[tokio::test]
    async fn test_invalid_species() {
        let image = png();
        let (status, body) = send(
            dog_only_app(),
            predict_request(multipart_body(Some("fish"), Some(("pet.png", &image)))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("animal_type"));
    }

    #[tokio::test]
    async fn test_missing_image() {
        let (status, body) =
            send(dog_only_app(), predict_request(multipart_body(Some("dog"), None))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing \"image\" part in form-data");
    }

    #[tokio::test]
    async fn test_image_part_without_file() {
        let (status, body) = send(
            dog_only_app(),
            predict_request(multipart_body(Some("dog"), Some(("", b"")))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No image selected");
    }

    #[tokio::test]
    async fn test_undecodable_image() {
        let (status, body) = send(
            dog_only_app(),
            predict_request(multipart_body(Some("dog"), Some(("pet.png", b"not an image")))),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not decode image");
    }

    #[tokio::test]
    async fn test_oversized_upload_is_payload_too_large() {
        let config = ServerConfig {
            max_upload_bytes: 1024,
            ..ServerConfig::default()
        };
        let registry = ModelRegistry::new().with_model(
            Species::Dog,
            Arc::new(FixedScores(vec![0.0, 0.0, 0.0, 0.0, 0.0])),
        );
        let app = app_with_config(config, model_info(true), registry);
        let image = vec![0x5a; 4096];

        let (status, body) = send(
            app,
            predict_request(multipart_body(Some("dog"), Some(("pet.png", &image)))),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Upload exceeds the 1024 byte limit");
    }

    #[tokio::test]
    async fn test_not_ready_wins_over_request_errors() {
        let app = app_with(model_info(false), ModelRegistry::new());
        let (status, body) = send(app, predict_request(multipart_body(None, None))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server configuration error: Essential info missing");
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_missing_image() {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"animal_type": "dog"}"#))
            .unwrap();

        let (status, body) = send(dog_only_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing \"image\" part in form-data");
    }

    #[tokio::test]
    async fn test_home_reports_missing_cat_model() {
        let response = dog_only_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("WARNING: Issues detected - Cat Model not loaded"));
        assert!(!text.contains("Dog Model"));
    }

    #[tokio::test]
    async fn test_health_json() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(dog_only_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["issues"], json!(["Cat Model not loaded"]));
    }
}
