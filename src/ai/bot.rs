// Bot trait: the seam between the orchestrator and a paddle controller

use thiserror::Error;

use super::policy::{ControllerInput, ValidationIssue};

/// Trait for opponent controllers, in-process or remote.
///
/// The orchestrator calls `request` on its polling cadence and drains
/// `poll_target` every tick. Neither call may block the tick.
pub trait Bot {
    /// Ask for a new target computed from this observation
    fn request(&mut self, observation: ControllerInput);

    /// Newest target that arrived since the last call, if any
    fn poll_target(&mut self) -> Option<f32>;

    /// Drop pending work; nothing requested before this call is delivered
    fn cancel(&mut self);

    /// Bot name for logging/display
    fn name(&self) -> &str;
}

/// Why a controller produced no target this cycle
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("input validation failed ({} issue(s))", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("controller service answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed controller response: {0}")]
    Malformed(String),
}
