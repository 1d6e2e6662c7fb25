// RetroPong configuration types
// All settings with defaults matching the classic board

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub ai: AIConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    // Left paddle (player 1)
    pub left_paddle_up: String,
    pub left_paddle_down: String,

    // Right paddle (player 2 in local mode)
    pub right_paddle_up: String,
    pub right_paddle_down: String,

    // Game controls
    pub abort: String,
    pub rematch: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_paddle_up: "W".to_string(),
            left_paddle_down: "S".to_string(),
            right_paddle_up: "Up".to_string(),
            right_paddle_down: "Down".to_string(),
            abort: "Esc".to_string(),
            rematch: "R".to_string(),
        }
    }
}

/// Board geometry and ball speed policy. Speeds are in board units per tick.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub board_width: f32,
    pub board_height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    // Paddle travel per tick while a key is held
    pub paddle_speed: f32,

    pub ball_radius: f32,

    // Serve speed, and the speed the ramp starts from
    pub min_ball_speed: f32,
    // Speed reached exactly at the `ramp_up_hits`-th paddle hit
    pub cruise_ball_speed: f32,
    pub ramp_up_hits: u32,
    // Upper bound once multiplicative growth kicks in
    pub max_ball_speed: f32,
    // Per-hit multiplier after the ramp (must be > 1)
    pub speed_growth_factor: f32,

    // Vertical velocity per unit of contact offset from the paddle center
    pub deflection_factor: f32,

    pub winning_score: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            board_width: 800.0,
            board_height: 600.0,
            paddle_width: 15.0,
            paddle_height: 100.0,
            paddle_speed: 10.0,
            ball_radius: 10.0,
            min_ball_speed: 1.0,
            cruise_ball_speed: 5.0,
            ramp_up_hits: 50,
            max_ball_speed: 15.0,
            speed_growth_factor: 1.05,
            deflection_factor: 0.25,
            winning_score: 5,
        }
    }
}

impl PhysicsConfig {
    pub fn half_paddle_height(&self) -> f32 {
        self.paddle_height / 2.0
    }

    /// Clamp a paddle center so the whole paddle stays on the board.
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        let half = self.half_paddle_height();
        y.max(half).min(self.board_height - half)
    }

    /// Check the geometry and speed policy, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        let mut positive = |name: &str, value: f32| {
            if !(value.is_finite() && value > 0.0) {
                problems.push(format!("{} must be a positive number (got {})", name, value));
            }
        };

        positive("board_width", self.board_width);
        positive("board_height", self.board_height);
        positive("paddle_width", self.paddle_width);
        positive("paddle_height", self.paddle_height);
        positive("paddle_speed", self.paddle_speed);
        positive("ball_radius", self.ball_radius);
        positive("min_ball_speed", self.min_ball_speed);
        positive("cruise_ball_speed", self.cruise_ball_speed);
        positive("max_ball_speed", self.max_ball_speed);

        if self.paddle_height > self.board_height {
            problems.push(format!(
                "paddle_height {} does not fit on a board {} high",
                self.paddle_height, self.board_height
            ));
        }
        if self.ball_radius * 2.0 >= self.board_height
            || self.paddle_width * 2.0 + self.ball_radius * 2.0 >= self.board_width
        {
            problems.push("ball and paddles leave no room on the board".to_string());
        }
        if !(self.min_ball_speed <= self.cruise_ball_speed
            && self.cruise_ball_speed <= self.max_ball_speed)
        {
            problems.push(format!(
                "ball speeds must satisfy min <= cruise <= max (got {} / {} / {})",
                self.min_ball_speed, self.cruise_ball_speed, self.max_ball_speed
            ));
        }
        if !(self.speed_growth_factor.is_finite() && self.speed_growth_factor > 1.0) {
            problems.push(format!(
                "speed_growth_factor must be greater than 1 (got {})",
                self.speed_growth_factor
            ));
        }
        if !(self.deflection_factor.is_finite() && self.deflection_factor >= 0.0) {
            problems.push(format!(
                "deflection_factor must be zero or positive (got {})",
                self.deflection_factor
            ));
        }
        if self.winning_score == 0 {
            problems.push("winning_score must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}

/// Where the opponent controller runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AIBackend {
    /// In-process call
    Local,
    /// HTTP call to a controller-server
    Remote,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AIConfig {
    pub backend: AIBackend,

    // AI difficulty: "classic", "easy", "medium", "hard"
    pub difficulty: String,

    // How often the controller is asked for a new target (simulated time)
    pub poll_interval_ms: u64,

    // Controller service endpoint, used by the remote backend
    pub endpoint: String,

    // Requests slower than this are dropped for the cycle
    pub request_timeout_ms: u64,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            backend: AIBackend::Local,
            difficulty: "classic".to_string(),
            poll_interval_ms: 150,
            endpoint: "http://127.0.0.1:9002/api/pong-ai".to_string(),
            request_timeout_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Target frames per second (one simulation tick per frame)
    pub target_fps: u64,

    // A pressed key counts as held for this long without a repeat event
    pub key_hold_ms: u64,

    // Score display color (RGB values 0-255)
    pub score_color: [u8; 3],

    pub paddle_color: [u8; 3],

    pub ball_color: [u8; 3],

    pub center_line_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            key_hold_ms: 120,
            score_color: [255, 255, 255],
            paddle_color: [255, 255, 255],
            ball_color: [255, 255, 255],
            center_line_color: [100, 100, 100],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    // Listen address of controller-server
    pub bind_address: String,

    // Difficulty the service answers with (requests carry no difficulty)
    pub difficulty: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9002".to_string(),
            difficulty: "classic".to_string(),
        }
    }
}
