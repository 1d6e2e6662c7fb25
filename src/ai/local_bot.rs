// In-process controller

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bot::{Bot, ControllerError};
use super::policy::{predict_target, ControllerInput, Difficulty, DifficultyProfile};

/// Runs the control law in-process. A request is answered on the next poll,
/// so it behaves exactly like a remote controller with zero latency.
pub struct LocalBot {
    name: String,
    profile: DifficultyProfile,
    rng: StdRng,
    pending: Option<f32>,
}

impl LocalBot {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    /// Fixed aiming noise, for replays and tests
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            name: format!("Local ({})", difficulty.display_name()),
            profile: difficulty.profile(),
            rng,
            pending: None,
        }
    }

    fn compute(&mut self, observation: &ControllerInput) -> Result<f32, ControllerError> {
        observation.validate().map_err(ControllerError::Validation)?;
        let params = self.profile.params(self.profile.sample_offset(&mut self.rng));
        Ok(predict_target(observation, &params))
    }
}

impl Bot for LocalBot {
    fn request(&mut self, observation: ControllerInput) {
        match self.compute(&observation) {
            Ok(target) => self.pending = Some(target),
            Err(e) => tracing::warn!("{}: no target this cycle: {}", self.name, e),
        }
    }

    fn poll_target(&mut self) -> Option<f32> {
        self.pending.take()
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn name(&self) -> &str {
        &self.name
    }
}
