// RetroPong controller server
// Serves the opponent paddle control law over HTTP for remote clients
//
// Usage: cargo run --bin controller-server -- [--bind <addr>] [--difficulty <name>]

use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use retropong::ai::Difficulty;
use retropong::config;
use retropong::logging;
use retropong::network::{serve_with_shutdown, ServiceState, PREDICT_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_stdout();

    let server_config = {
        let mut argv = std::env::args().skip(1);
        let mut config_path = None;
        let mut bind = None;
        let mut difficulty = None;

        while let Some(arg) = argv.next() {
            let mut value = |flag: &str| {
                argv.next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
            };
            match arg.as_str() {
                "--bind" | "-b" => bind = Some(value("--bind")?),
                "--difficulty" => difficulty = Some(value("--difficulty")?),
                "--config" | "-c" => config_path = Some(PathBuf::from(value("--config")?)),
                "--help" | "-h" => {
                    println!("Usage: controller-server [--bind <addr>] [--difficulty classic|easy|medium|hard] [--config <path>]");
                    return Ok(());
                }
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }

        let mut loaded = match config_path {
            Some(path) => config::load_config_from(&path)?,
            None => config::load_config()?,
        }
        .server;
        if let Some(bind) = bind {
            loaded.bind_address = bind;
        }
        if let Some(difficulty) = difficulty {
            loaded.difficulty = difficulty;
        }
        loaded
    };

    let difficulty: Difficulty = server_config.difficulty.parse()?;

    let listener = TcpListener::bind(&server_config.bind_address).await?;
    info!(
        "🚀 Controller server listening on http://{}{} ({} difficulty)",
        listener.local_addr()?,
        PREDICT_PATH,
        difficulty.display_name()
    );

    serve_with_shutdown(listener, ServiceState::new(difficulty), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
        info!("Shutting down");
    })
    .await?;

    Ok(())
}
