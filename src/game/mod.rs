pub mod input;
pub mod physics;
pub mod state;

pub use input::{poll_input, InputAction, InputSet, KeyMap, KeyTracker, PaddleInput};
pub use physics::{step, steer_toward, PhysicsEvents, StepOutcome};
pub use state::{Ball, MatchState, MatchStatus, Paddle, Score, Side, TransitionError};
