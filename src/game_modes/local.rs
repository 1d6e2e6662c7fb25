use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::config::Config;
use crate::ui::Hud;

use super::common::{run_session, FixedTimestep};
use super::session::MatchSession;

/// Run local 2-player game on one keyboard
pub fn run_game_local<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> anyhow::Result<()> {
    tracing::info!("Local 2-player mode");

    let tick = FixedTimestep::for_fps(config.display.target_fps).tick();
    let mut session = MatchSession::local(config.physics.clone(), tick);

    let keys = &config.keybindings;
    let hud = Hud {
        title: "Player 1 vs Player 2".to_string(),
        controls: format!(
            "{}/{}: Left  {}/{}: Right  {}: Menu",
            keys.left_paddle_up, keys.left_paddle_down, keys.right_paddle_up, keys.right_paddle_down, keys.abort
        ),
    };

    run_session(terminal, config, &mut session, &hud)
}
