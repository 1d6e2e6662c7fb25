use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::ai::{self, Difficulty};
use crate::config::Config;
use crate::ui::{self, Hud, OverlayMessage};

use super::common::{run_session, FixedTimestep};
use super::session::MatchSession;

/// Run single-player game against the AI controller
pub fn run_game_vs_ai<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    difficulty: Difficulty,
) -> anyhow::Result<()> {
    tracing::info!(
        "Single player vs AI mode: {} ({:?} backend)",
        difficulty.display_name(),
        config.ai.backend
    );

    let bot = match ai::create_bot(&config.ai, difficulty) {
        Ok(bot) => bot,
        Err(e) => {
            tracing::error!("Could not start AI controller: {:#}", e);
            show_error(terminal, &format!("{:#}", e))?;
            return Ok(());
        }
    };

    let tick = FixedTimestep::for_fps(config.display.target_fps).tick();
    let mut session = MatchSession::vs_ai(config.physics.clone(), bot, &config.ai, tick);

    let keys = &config.keybindings;
    let hud = Hud {
        title: format!(
            "Player 1 vs AI ({}, {})",
            difficulty.display_name(),
            session.bot_name().unwrap_or("AI")
        ),
        controls: format!(
            "{}/{}: Move  {}: Menu",
            keys.left_paddle_up, keys.left_paddle_down, keys.abort
        ),
    };

    run_session(terminal, config, &mut session, &hud)
}

/// Show `error` until any key is pressed
fn show_error<B: Backend>(terminal: &mut Terminal<B>, error: &str) -> anyhow::Result<()> {
    let message = OverlayMessage::error(vec![
        error.to_string(),
        String::new(),
        "Press any key to return to the menu".to_string(),
    ])
    .with_title("AI controller unavailable");

    loop {
        terminal.draw(|f| {
            let area = f.area();
            ui::render_overlay(f, &message, area)
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}
