// Menu state management

use crate::ai::Difficulty;
use crate::game_modes::GameMode;

/// Application state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    /// How-to-play screen shown at startup
    Instructions,
    /// Main menu
    Menu,
    /// Playing a match
    Game {
        mode: GameMode,
        difficulty: Difficulty,
    },
    /// Graceful shutdown
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    PlayerVsAi,
    PlayerVsPlayer,
    Instructions,
    Quit,
}

impl MenuItem {
    pub fn display_text(&self) -> &str {
        match self {
            MenuItem::PlayerVsAi => "Player vs AI",
            MenuItem::PlayerVsPlayer => "Player vs Player",
            MenuItem::Instructions => "How to Play",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn all() -> Vec<MenuItem> {
        vec![
            MenuItem::PlayerVsAi,
            MenuItem::PlayerVsPlayer,
            MenuItem::Instructions,
            MenuItem::Quit,
        ]
    }
}

/// Wrapping cursor over a fixed list
fn wrap_previous(index: usize, len: usize) -> usize {
    if index > 0 {
        index - 1
    } else {
        len.saturating_sub(1)
    }
}

fn wrap_next(index: usize, len: usize) -> usize {
    if index + 1 < len {
        index + 1
    } else {
        0
    }
}

pub struct MenuState {
    pub selected_index: usize,
    pub items: Vec<MenuItem>,
    /// Whether the difficulty picker is open
    pub in_difficulty_selection: bool,
    pub selected_difficulty_index: usize,
    pub difficulties: Vec<Difficulty>,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            items: MenuItem::all(),
            in_difficulty_selection: false,
            selected_difficulty_index: 0,
            difficulties: Difficulty::all(),
        }
    }

    /// Menu preselecting the configured difficulty
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        let mut state = Self::new();
        if let Some(index) = state.difficulties.iter().position(|d| *d == difficulty) {
            state.selected_difficulty_index = index;
        }
        state
    }

    pub fn selected_item(&self) -> MenuItem {
        self.items[self.selected_index.min(self.items.len() - 1)]
    }

    pub fn select_previous(&mut self) {
        self.selected_index = wrap_previous(self.selected_index, self.items.len());
    }

    pub fn select_next(&mut self) {
        self.selected_index = wrap_next(self.selected_index, self.items.len());
    }

    pub fn start_difficulty_selection(&mut self) {
        self.in_difficulty_selection = true;
    }

    pub fn cancel_difficulty_selection(&mut self) {
        self.in_difficulty_selection = false;
    }

    pub fn selected_difficulty(&self) -> Difficulty {
        self.difficulties
            .get(self.selected_difficulty_index)
            .copied()
            .unwrap_or(Difficulty::Classic)
    }

    pub fn select_previous_difficulty(&mut self) {
        self.selected_difficulty_index =
            wrap_previous(self.selected_difficulty_index, self.difficulties.len());
    }

    pub fn select_next_difficulty(&mut self) {
        self.selected_difficulty_index =
            wrap_next(self.selected_difficulty_index, self.difficulties.len());
    }

    /// Close the picker and return the chosen level
    pub fn submit_difficulty(&mut self) -> Difficulty {
        self.in_difficulty_selection = false;
        self.selected_difficulty()
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}
