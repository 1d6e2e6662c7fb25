mod ai;
pub mod common;
mod local;
pub mod session;

pub use ai::run_game_vs_ai;
pub use common::FixedTimestep;
pub use local::run_game_local;
pub use session::{GameMode, MatchSession};
