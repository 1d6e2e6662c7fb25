// Menu module for RetroPong
// Handles the instructions screen, main menu and difficulty selection

pub mod input;
pub mod render;
pub mod state;

pub use input::{handle_instructions_key, handle_menu_input, read_key, MenuAction};
pub use render::{render_instructions, render_menu};
pub use state::{AppState, MenuItem, MenuState};
