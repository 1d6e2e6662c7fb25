use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use retropong::ai::Difficulty;
use retropong::config::{self, AIBackend, Config};
use retropong::game_modes::{run_game_local, run_game_vs_ai, GameMode};
use retropong::logging;
use retropong::menu::{self, AppState, MenuAction, MenuState};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    debug: bool,
    remote: Option<String>,
    config_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().collect())?;

    logging::init_file(args.debug, Path::new(logging::LOG_FILE_PATH))?;

    let mut config = match &args.config_path {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    if let Some(endpoint) = args.remote {
        config.ai.backend = AIBackend::Remote;
        config.ai.endpoint = endpoint;
    }
    tracing::info!("AI backend: {:?}", config.ai.backend);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("Exiting with error: {:#}", e);
    }
    result
}

/// Main application loop: instructions, menu, matches
fn run_app<B: Backend>(terminal: &mut Terminal<B>, config: &Config) -> anyhow::Result<()> {
    let difficulty = config.ai.difficulty.parse().unwrap_or_else(|e| {
        tracing::warn!("{}; using classic", e);
        Difficulty::Classic
    });
    let mut menu_state = MenuState::with_difficulty(difficulty);
    let mut app_state = AppState::Instructions;

    loop {
        app_state = match app_state {
            AppState::Instructions => {
                terminal.draw(|f| menu::render_instructions(f, config))?;
                match menu::read_key(Duration::from_millis(100))? {
                    Some(code) => match menu::handle_instructions_key(code) {
                        MenuAction::Back => AppState::Menu,
                        MenuAction::Quit => AppState::Exiting,
                        _ => AppState::Instructions,
                    },
                    None => AppState::Instructions,
                }
            }
            AppState::Menu => {
                terminal.draw(|f| menu::render_menu(f, &menu_state))?;
                match menu::handle_menu_input(&mut menu_state)? {
                    MenuAction::StartGame { mode, difficulty } => AppState::Game { mode, difficulty },
                    MenuAction::ShowInstructions => AppState::Instructions,
                    MenuAction::Quit => AppState::Exiting,
                    MenuAction::None | MenuAction::Back => AppState::Menu,
                }
            }
            AppState::Game { mode, difficulty } => {
                match mode {
                    GameMode::HumanVsHuman => run_game_local(terminal, config)?,
                    GameMode::HumanVsAi => run_game_vs_ai(terminal, config, difficulty)?,
                }
                AppState::Menu
            }
            AppState::Exiting => break,
        };
    }

    Ok(())
}

fn parse_args(argv: Vec<String>) -> anyhow::Result<Args> {
    let program = argv.first().cloned().unwrap_or_else(|| "retropong".to_string());
    let mut args = Args::default();
    let mut iter = argv.into_iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" | "-d" => args.debug = true,
            "--remote" | "-r" => {
                let url = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--remote requires a controller URL"))?;
                args.remote = Some(url);
            }
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                args.config_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                print_usage(&program);
                std::process::exit(0);
            }
            other => {
                print_usage(&program);
                anyhow::bail!("unknown argument: {}", other);
            }
        }
    }

    Ok(args)
}

fn print_usage(program: &str) {
    println!("RetroPong - Terminal Pong");
    println!();
    println!("Usage:");
    println!("  {} [options]", program);
    println!();
    println!("Options:");
    println!("  -d, --debug           Write a debug log to {}", logging::LOG_FILE_PATH);
    println!("  -r, --remote <url>    Use a controller-server for the AI paddle");
    println!("                        (e.g. http://127.0.0.1:9002/api/pong-ai)");
    println!("  -c, --config <path>   Load settings from <path> instead of the default");
    println!("  -h, --help            Show this help");
    println!();
    println!("Config file: {}", config::get_config_path().display());
}
