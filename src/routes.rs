//! API route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::model::{PlayerFeatures, SharedModel, FEATURE_NAMES};
use crate::types::{ErrorResponse, HealthResponse, ModelInfoResponse, PredictForm};

/// Application state shared across handlers.
pub struct AppState {
    pub model: SharedModel,
    pub config: AppConfig,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/model/info", get(model_info))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Model info endpoint.
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model_path: state.config.model.path.clone(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        model: state.model.describe(),
    })
}

/// Prediction endpoint.
///
/// Answers with the model's response wrapped in braces, e.g. `{0.5731}`.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PredictForm>,
) -> Result<String, ApiError> {
    form.validate().map_err(ApiError::bad_request)?;

    let features = PlayerFeatures::from(&form);
    let prediction = state
        .model
        .predict(&features)
        .map_err(|e| ApiError::internal(format!("Model inference failed: {}", e)))?;

    tracing::debug!("Predicted {:.4} for {:?}", prediction, features);
    Ok(format!("{{{}}}", prediction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coefficients, LogisticModel};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> Router {
        let model = LogisticModel {
            intercept: -2.0,
            coefficients: Coefficients {
                kill_death_ratio: 1.5,
                hs: 0.01,
                adr: 0.0,
                rounds: 0.0,
            },
        };
        router(Arc::new(AppState {
            model: Arc::new(model),
            config: AppConfig::default(),
        }))
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_predict_returns_braced_value() {
        let response = app()
            .oneshot(form_request("kdr=1.0&hs=50&adr=80&rounds=1200"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "{0.5}");
    }

    #[tokio::test]
    async fn test_predict_rejects_non_finite() {
        let response = app()
            .oneshot(form_request("kdr=inf&hs=50&adr=80&rounds=1200"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("kdr must be a finite number"));
    }

    #[tokio::test]
    async fn test_predict_missing_field() {
        let response = app()
            .oneshot(form_request("kdr=1.0&hs=50&adr=80"))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn test_model_info() {
        let response = app()
            .oneshot(Request::builder().uri("/model/info").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_string(response).await;
        assert!(body.contains("kill_death_ratio"));
        assert!(body.contains("\"intercept\":-2.0"));
    }
}
