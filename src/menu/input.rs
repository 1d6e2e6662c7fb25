// Menu input handling

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

use super::state::{MenuItem, MenuState};
use crate::ai::Difficulty;
use crate::game_modes::GameMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    /// Stay on the current screen
    None,
    StartGame { mode: GameMode, difficulty: Difficulty },
    ShowInstructions,
    /// Leave the instructions screen
    Back,
    Quit,
}

/// Wait briefly for a key press
pub fn read_key(timeout: Duration) -> Result<Option<KeyCode>, io::Error> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key.code));
            }
        }
    }
    Ok(None)
}

/// Handle menu input and return the next action
pub fn handle_menu_input(menu_state: &mut MenuState) -> Result<MenuAction, io::Error> {
    Ok(match read_key(Duration::from_millis(100))? {
        Some(code) => handle_key_press(menu_state, code),
        None => MenuAction::None,
    })
}

/// Any of Enter, Space or Esc leaves the instructions; Q quits
pub fn handle_instructions_key(key_code: KeyCode) -> MenuAction {
    match key_code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => MenuAction::Back,
        KeyCode::Char('q') | KeyCode::Char('Q') => MenuAction::Quit,
        _ => MenuAction::None,
    }
}

pub fn handle_key_press(menu_state: &mut MenuState, key_code: KeyCode) -> MenuAction {
    if menu_state.in_difficulty_selection {
        return handle_difficulty_input(menu_state, key_code);
    }

    match key_code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            menu_state.select_previous();
            MenuAction::None
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            menu_state.select_next();
            MenuAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => handle_menu_selection(menu_state),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => MenuAction::Quit,
        _ => MenuAction::None,
    }
}

fn handle_menu_selection(menu_state: &mut MenuState) -> MenuAction {
    match menu_state.selected_item() {
        MenuItem::PlayerVsAi => {
            menu_state.start_difficulty_selection();
            MenuAction::None
        }
        MenuItem::PlayerVsPlayer => MenuAction::StartGame {
            mode: GameMode::HumanVsHuman,
            difficulty: menu_state.selected_difficulty(),
        },
        MenuItem::Instructions => MenuAction::ShowInstructions,
        MenuItem::Quit => MenuAction::Quit,
    }
}

fn handle_difficulty_input(menu_state: &mut MenuState, key_code: KeyCode) -> MenuAction {
    match key_code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            menu_state.select_previous_difficulty();
            MenuAction::None
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            menu_state.select_next_difficulty();
            MenuAction::None
        }
        KeyCode::Enter | KeyCode::Char(' ') => MenuAction::StartGame {
            mode: GameMode::HumanVsAi,
            difficulty: menu_state.submit_difficulty(),
        },
        KeyCode::Esc => {
            menu_state.cancel_difficulty_selection();
            MenuAction::None
        }
        _ => MenuAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_vs_ai_goes_through_difficulty_picker() {
        let mut menu = MenuState::new();

        assert_eq!(handle_key_press(&mut menu, KeyCode::Enter), MenuAction::None);
        assert!(menu.in_difficulty_selection);

        handle_key_press(&mut menu, KeyCode::Down);
        let action = handle_key_press(&mut menu, KeyCode::Enter);
        assert_eq!(
            action,
            MenuAction::StartGame {
                mode: GameMode::HumanVsAi,
                difficulty: Difficulty::Easy
            }
        );
    }

    #[test]
    fn test_esc_closes_picker_before_quitting() {
        let mut menu = MenuState::new();
        handle_key_press(&mut menu, KeyCode::Enter);

        assert_eq!(handle_key_press(&mut menu, KeyCode::Esc), MenuAction::None);
        assert!(!menu.in_difficulty_selection);
        assert_eq!(handle_key_press(&mut menu, KeyCode::Esc), MenuAction::Quit);
    }

    #[test]
    fn test_player_vs_player_starts_directly() {
        let mut menu = MenuState::new();
        handle_key_press(&mut menu, KeyCode::Char('j'));

        match handle_key_press(&mut menu, KeyCode::Enter) {
            MenuAction::StartGame { mode, .. } => assert_eq!(mode, GameMode::HumanVsHuman),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_instructions_keys() {
        assert_eq!(handle_instructions_key(KeyCode::Enter), MenuAction::Back);
        assert_eq!(handle_instructions_key(KeyCode::Char('Q')), MenuAction::Quit);
        assert_eq!(handle_instructions_key(KeyCode::Char('x')), MenuAction::None);
    }
}
