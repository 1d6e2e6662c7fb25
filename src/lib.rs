//! RetroPong: classic two-paddle pong in the terminal.
//!
//! The simulation core lives in [`game`] (state, input, fixed-step physics)
//! and [`ai`] (the opponent control law behind the [`ai::Bot`] seam).
//! [`network`] exposes the controller over HTTP and consumes it remotely;
//! [`game_modes`] orchestrates matches; [`menu`] and [`ui`] draw them.

pub mod ai;
pub mod config;
pub mod game;
pub mod game_modes;
pub mod logging;
pub mod menu;
pub mod network;
pub mod ui;
