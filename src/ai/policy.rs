// Opponent paddle control law

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reaction factor of the classic opponent; difficulty profiles scale it.
pub const BASE_REACTION_FACTOR: f32 = 0.75;

/// Observation sent to the controller, in-process or over HTTP.
///
/// Numbers are single precision on the wire as well. A JSON number beyond
/// the `f32` range becomes infinite when decoded and fails `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInput {
    pub ball_x: f32,
    pub ball_y: f32,
    #[serde(rename = "ballDX")]
    pub ball_dx: f32,
    #[serde(rename = "ballDY")]
    pub ball_dy: f32,
    /// Center of the controlled paddle
    pub paddle_y: f32,
    pub opponent_paddle_y: f32,
    pub board_height: f32,
    pub paddle_height: f32,
    pub is_ball_moving_towards_ai: bool,
    /// Max paddle travel per update
    pub paddle_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerOutput {
    pub target_y: f32,
}

/// One rejected field of a controller request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ControllerInput {
    /// Reject inputs the control law cannot produce an on-board target for.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        let numbers = [
            ("ballX", self.ball_x),
            ("ballY", self.ball_y),
            ("ballDX", self.ball_dx),
            ("ballDY", self.ball_dy),
            ("paddleY", self.paddle_y),
            ("opponentPaddleY", self.opponent_paddle_y),
            ("boardHeight", self.board_height),
            ("paddleHeight", self.paddle_height),
            ("paddleSpeed", self.paddle_speed),
        ];
        for (path, value) in numbers {
            if !value.is_finite() {
                issues.push(ValidationIssue::new(
                    path,
                    "expected a finite number within the f32 range",
                ));
            }
        }

        if self.board_height.is_finite() && self.board_height <= 0.0 {
            issues.push(ValidationIssue::new("boardHeight", "must be positive"));
        }
        if self.paddle_height.is_finite() && self.paddle_height <= 0.0 {
            issues.push(ValidationIssue::new("paddleHeight", "must be positive"));
        }
        if self.paddle_height > self.board_height && self.board_height.is_finite() {
            issues.push(ValidationIssue::new(
                "paddleHeight",
                "must not exceed boardHeight",
            ));
        }
        if self.paddle_speed.is_finite() && self.paddle_speed < 0.0 {
            issues.push(ValidationIssue::new("paddleSpeed", "must not be negative"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Tunables of the control law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerParams {
    /// Fraction of the gap to the ball closed per call
    pub reaction_factor: f32,
    /// Per-call travel cap while tracking, as a fraction of paddle speed
    pub tracking_gain: f32,
    /// Per-call travel cap while drifting back to center
    pub return_gain: f32,
    /// Gaps smaller than this are ignored
    pub dead_zone: f32,
    /// Aiming error added to the ball position
    pub aim_offset: f32,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            reaction_factor: BASE_REACTION_FACTOR,
            tracking_gain: 0.8,
            return_gain: 0.1,
            dead_zone: 1.0,
            aim_offset: 0.0,
        }
    }
}

fn clamp_magnitude(value: f32, limit: f32) -> f32 {
    let limit = limit.abs();
    value.max(-limit).min(limit)
}

/// Where the controlled paddle should head next.
///
/// Tracks the ball with a lagged, capped step while it approaches; drifts
/// slowly back to the board's vertical center otherwise. The result always
/// keeps the paddle fully on the board.
pub fn predict_target(input: &ControllerInput, params: &ControllerParams) -> f32 {
    let mut target = input.paddle_y;

    if input.is_ball_moving_towards_ai {
        let aim = input.ball_y + params.aim_offset;
        let difference = (aim - target) * params.reaction_factor;
        let max_move = input.paddle_speed * params.tracking_gain;
        if difference.abs() > params.dead_zone {
            target += clamp_magnitude(difference, max_move);
        }
    } else {
        let difference = input.board_height / 2.0 - target;
        let return_speed = input.paddle_speed * params.return_gain;
        if difference.abs() > params.dead_zone {
            target += clamp_magnitude(difference, return_speed);
        }
    }

    let half = input.paddle_height / 2.0;
    target.max(half).min(input.board_height - half)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// The original tuning: no aiming noise
    Classic,
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown difficulty {0:?} (expected classic, easy, medium or hard)")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Difficulty::Classic),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// The knobs a difficulty level turns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Lower reacts faster; 1.0 is the classic opponent
    pub reaction_time_multiplier: f32,
    pub tracking_gain: f32,
    /// Standard deviation of the aiming error
    pub noise_stddev: f32,
}

impl Difficulty {
    pub fn display_name(&self) -> &str {
        match self {
            Difficulty::Classic => "Classic",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Difficulty::Classic => "The original opponent - steady, no aiming errors",
            Difficulty::Easy => "Slow to react and often misjudges the ball",
            Difficulty::Medium => "Classic reactions with some aiming errors",
            Difficulty::Hard => "Quick reactions, rarely misjudges",
        }
    }

    pub fn all() -> Vec<Difficulty> {
        vec![
            Difficulty::Classic,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
        ]
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Classic => DifficultyProfile {
                reaction_time_multiplier: 1.0,
                tracking_gain: 0.8,
                noise_stddev: 0.0,
            },
            Difficulty::Easy => DifficultyProfile {
                reaction_time_multiplier: 1.5,
                tracking_gain: 0.6,
                noise_stddev: 30.0,
            },
            Difficulty::Medium => DifficultyProfile {
                reaction_time_multiplier: 1.0,
                tracking_gain: 0.8,
                noise_stddev: 12.0,
            },
            Difficulty::Hard => DifficultyProfile {
                reaction_time_multiplier: 0.8,
                tracking_gain: 1.0,
                noise_stddev: 4.0,
            },
        }
    }
}

impl DifficultyProfile {
    pub fn reaction_factor(&self) -> f32 {
        if self.reaction_time_multiplier <= 0.0 {
            return 1.0;
        }
        (BASE_REACTION_FACTOR / self.reaction_time_multiplier).min(1.0)
    }

    /// Draw one aiming error
    pub fn sample_offset<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.noise_stddev <= 0.0 {
            return 0.0;
        }
        Normal::new(0.0, self.noise_stddev)
            .map(|normal| normal.sample(rng))
            .unwrap_or(0.0)
    }

    pub fn params(&self, aim_offset: f32) -> ControllerParams {
        ControllerParams {
            reaction_factor: self.reaction_factor(),
            tracking_gain: self.tracking_gain,
            aim_offset,
            ..ControllerParams::default()
        }
    }
}
