// HTTP controller service (axum)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{
    ControllerInput, ControllerOutput, HealthBody, InternalErrorBody, ValidationErrorBody,
    ValidationIssue, PREDICT_PATH,
};
use crate::ai::{predict_target, ControllerError, Difficulty, DifficultyProfile};

/// Shared by all requests
#[derive(Clone)]
pub struct ServiceState {
    profile: DifficultyProfile,
    rng: Arc<Mutex<StdRng>>,
}

impl ServiceState {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            profile: difficulty.profile(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Run the control law on an already validated observation
    pub fn predict(&self, input: &ControllerInput) -> Result<f32, ControllerError> {
        let offset = {
            // The rng stays valid if another request panicked while holding it
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            self.profile.sample_offset(&mut *rng)
        };

        let target = predict_target(input, &self.profile.params(offset));
        if target.is_finite() {
            Ok(target)
        } else {
            Err(ControllerError::Malformed(format!("computed non-finite target {target}")))
        }
    }
}

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(PREDICT_PATH, post(predict))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the listener fails or the task is dropped
pub async fn serve(listener: TcpListener, state: ServiceState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Serve until `shutdown` resolves
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: ServiceState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// GET /health
async fn health() -> Json<HealthBody> {
    Json(HealthBody::default())
}

/// POST /api/pong-ai
async fn predict(
    State(state): State<ServiceState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return validation_failed(vec![ValidationIssue::new("body", rejection.body_text())]);
        }
    };

    let input: ControllerInput = match serde_json::from_value(body) {
        Ok(input) => input,
        Err(e) => return validation_failed(vec![ValidationIssue::new("body", e.to_string())]),
    };

    if let Err(issues) = input.validate() {
        return validation_failed(issues);
    }

    match state.predict(&input) {
        Ok(target_y) => {
            tracing::debug!(
                paddle_y = input.paddle_y,
                ball_y = input.ball_y,
                target_y,
                "prediction"
            );
            Json(ControllerOutput { target_y }).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to compute prediction: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InternalErrorBody::new(e.to_string())),
            )
                .into_response()
        }
    }
}

fn validation_failed(details: Vec<ValidationIssue>) -> Response {
    tracing::warn!("Rejected controller request: {} issue(s)", details.len());
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorBody::new(details)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn app() -> Router {
        router(ServiceState::seeded(Difficulty::Classic, 5))
    }

    fn post_json(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(PREDICT_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn read_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn payload(ball_y: f32) -> serde_json::Value {
        serde_json::json!({
            "ballX": 400.0, "ballY": ball_y, "ballDX": 5.0, "ballDY": 0.0,
            "paddleY": 300.0, "opponentPaddleY": 300.0,
            "boardHeight": 600.0, "paddleHeight": 100.0,
            "isBallMovingTowardsAi": true, "paddleSpeed": 10.0
        })
    }

    #[test]
    fn test_predict_survives_poisoned_noise_source() {
        let state = ServiceState::seeded(Difficulty::Hard, 9);
        let shared = state.clone();
        let crashed = std::thread::spawn(move || {
            let _guard = shared.rng.lock().unwrap();
            panic!("request handler crashed mid-sample");
        })
        .join();
        assert!(crashed.is_err());
        assert!(state.rng.is_poisoned());

        let input: ControllerInput = serde_json::from_value(payload(500.0)).unwrap();
        let target = state.predict(&input).unwrap();
        assert!(target.is_finite());
        assert!(state.predict(&input).is_ok());
    }

    #[tokio::test]
    async fn test_predict_returns_target() {
        let response = app()
            .oneshot(post_json(payload(500.0).to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        let target = json["targetY"].as_f64().unwrap();
        assert!((target - 308.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_failure() {
        let mut body = payload(500.0);
        body.as_object_mut().unwrap().remove("paddleSpeed");

        let response = app().oneshot(post_json(body.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Input validation failed");
        assert!(json["details"][0]["message"]
            .as_str()
            .unwrap()
            .contains("paddleSpeed"));
    }

    #[tokio::test]
    async fn test_wrong_type_and_bad_json_are_rejected() {
        let mut body = payload(500.0);
        body["ballY"] = serde_json::json!("high");
        let response = app().oneshot(post_json(body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app().oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert_eq!(json["error"], "Input validation failed");
    }

    #[tokio::test]
    async fn test_out_of_range_values_fail_validation() {
        let mut body = payload(500.0);
        body["paddleHeight"] = serde_json::json!(900.0);
        body["ballX"] = serde_json::json!(1e300);

        let response = app().oneshot(post_json(body.to_string())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        let paths: Vec<&str> = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["path"].as_str().unwrap())
            .collect();
        assert!(paths.contains(&"ballX"));
        assert!(paths.contains(&"paddleHeight"));

        let ball_x = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .find(|d| d["path"] == "ballX")
            .unwrap();
        assert!(ball_x["message"].as_str().unwrap().contains("f32 range"));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["status"], "healthy");
    }
}
