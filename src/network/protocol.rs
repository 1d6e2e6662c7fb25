// Controller service protocol
// JSON bodies exchanged between the game and controller-server

use serde::{Deserialize, Serialize};

pub use crate::ai::{ControllerInput, ControllerOutput, ValidationIssue};

/// Route of the prediction endpoint
pub const PREDICT_PATH: &str = "/api/pong-ai";

pub const VALIDATION_FAILED: &str = "Input validation failed";
pub const PREDICTION_FAILED: &str = "Failed to get AI prediction";

/// Error body for a rejected request (HTTP 400)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub error: String,
    pub details: Vec<ValidationIssue>,
}

impl ValidationErrorBody {
    pub fn new(details: Vec<ValidationIssue>) -> Self {
        Self {
            error: VALIDATION_FAILED.to_string(),
            details,
        }
    }
}

/// Error body for any other failure (HTTP 500)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalErrorBody {
    pub error: String,
    pub details: String,
}

impl InternalErrorBody {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            error: PREDICTION_FAILED.to_string(),
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub service: String,
}

impl Default for HealthBody {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "retropong-controller".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_shape() {
        let body = ValidationErrorBody::new(vec![ValidationIssue::new("ballX", "expected a finite number")]);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "Input validation failed");
        assert_eq!(json["details"][0]["path"], "ballX");
    }

    #[test]
    fn test_request_parses_browser_payload() {
        let payload = r#"{
            "ballX": 400, "ballY": 500, "ballDX": 5, "ballDY": 0,
            "paddleY": 300, "opponentPaddleY": 300,
            "boardHeight": 600, "paddleHeight": 100,
            "isBallMovingTowardsAi": true, "paddleSpeed": 10
        }"#;

        let input: ControllerInput = serde_json::from_str(payload).unwrap();
        assert_eq!(input.ball_y, 500.0);
        assert!(input.is_ball_moving_towards_ai);
    }

    #[test]
    fn test_request_missing_field_is_rejected() {
        let payload = r#"{ "ballX": 400, "ballY": 500 }"#;
        assert!(serde_json::from_str::<ControllerInput>(payload).is_err());
    }
}
