// AI module for the opponent paddle

mod bot;
mod local_bot;
pub mod policy;

pub use bot::{Bot, ControllerError};
pub use local_bot::LocalBot;
pub use policy::{
    predict_target, ControllerInput, ControllerOutput, ControllerParams, Difficulty,
    DifficultyProfile, ValidationIssue,
};

use std::time::Duration;

use crate::config::{AIBackend, AIConfig};
use crate::network::RemoteBot;

/// Create a bot for the configured backend
pub fn create_bot(config: &AIConfig, difficulty: Difficulty) -> anyhow::Result<Box<dyn Bot>> {
    match config.backend {
        AIBackend::Local => Ok(Box::new(LocalBot::new(difficulty))),
        AIBackend::Remote => {
            let bot = RemoteBot::new(
                &config.endpoint,
                Duration::from_millis(config.request_timeout_ms),
            )?;
            Ok(Box::new(bot))
        }
    }
}
