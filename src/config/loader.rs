// Configuration file loading and creation

use super::types::{Config, PhysicsConfig};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the path to the configuration file
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("retropong");
    path.push("config.toml");
    path
}

/// Load configuration from the default location, creating it on first run
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from `path`, or write the defaults there if it doesn't exist.
/// A file that fails to parse falls back to defaults; the game still starts.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let contents = fs::read_to_string(path)?;
        Ok(parse_config(&contents))
    } else {
        create_default_config(path)?;
        Ok(Config::default())
    }
}

/// Parse a config file. Unparseable files fall back to defaults, and so does
/// a `[physics]` section the simulation cannot run with.
pub fn parse_config(contents: &str) -> Config {
    let mut config: Config = match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to parse config file, using defaults: {}", e);
            return Config::default();
        }
    };

    if let Err(problems) = config.physics.validate() {
        tracing::warn!(
            "Invalid [physics] settings, using default physics: {}",
            problems.join("; ")
        );
        config.physics = PhysicsConfig::default();
    }
    config
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let config = Config::default();
    let toml_string = toml::to_string_pretty(&config)?;

    let commented_toml = format!(
        "# RetroPong Configuration File\n\
         # Edit this file to customize game behavior\n\
         # After editing, restart the game for changes to take effect\n\
         #\n\
         # Key binding format: Use \"Up\", \"Down\", \"Left\", \"Right\", \"Enter\", \"Esc\"\n\
         #                     or single characters like \"W\", \"S\", \"R\", etc.\n\
         #\n\
         # Speeds are board units per tick (one tick per frame)\n\
         #\n\
         # AI backend: \"local\" or \"remote\" (remote posts to [ai].endpoint)\n\
         # AI difficulties: \"classic\", \"easy\", \"medium\", \"hard\"\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    tracing::info!("Created default config file at: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AIBackend;

    #[test]
    fn test_default_config_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        let parsed: Config = toml::from_str(&toml_string).unwrap();

        assert_eq!(parsed.physics, config.physics);
        assert_eq!(
            parsed.keybindings.left_paddle_up,
            config.keybindings.left_paddle_up
        );
        assert_eq!(parsed.display.target_fps, config.display.target_fps);
        assert_eq!(parsed.ai.difficulty, config.ai.difficulty);
        assert_eq!(parsed.ai.backend, AIBackend::Local);
    }

    #[test]
    fn test_partial_config_with_defaults() {
        let partial_toml = r#"
            [physics]
            winning_score = 11

            [ai]
            backend = "remote"
        "#;

        let config: Config = toml::from_str(partial_toml).unwrap();

        assert_eq!(config.physics.winning_score, 11);
        assert_eq!(config.ai.backend, AIBackend::Remote);

        // Untouched fields keep their defaults, even inside a given section
        assert_eq!(config.physics.paddle_height, 100.0);
        assert_eq!(config.ai.poll_interval_ms, 150);
        assert_eq!(config.keybindings.left_paddle_up, "W");
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let config = parse_config("physics = [not toml");
        assert_eq!(config.physics.board_width, 800.0);
    }

    #[test]
    fn test_default_physics_is_valid() {
        assert_eq!(PhysicsConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_unplayable_physics_falls_back_to_defaults() {
        let cases = [
            "[physics]\npaddle_height = 700.0",
            "[physics]\nmin_ball_speed = 0.0",
            "[physics]\nspeed_growth_factor = 0.5",
            "[physics]\nmin_ball_speed = 8.0",
            "[physics]\nwinning_score = 0",
            "[physics]\nboard_width = -800.0",
        ];

        for contents in cases {
            let config = parse_config(contents);
            assert_eq!(config.physics, PhysicsConfig::default(), "{}", contents);
        }
    }

    #[test]
    fn test_invalid_physics_keeps_other_sections() {
        let config = parse_config(
            r#"
            [physics]
            paddle_height = 700.0

            [ai]
            backend = "remote"
        "#,
        );

        assert_eq!(config.physics.paddle_height, 100.0);
        assert_eq!(config.ai.backend, AIBackend::Remote);
    }

    #[test]
    fn test_validate_reports_each_problem() {
        let physics = PhysicsConfig {
            paddle_height: 700.0,
            min_ball_speed: 6.0,
            speed_growth_factor: 0.5,
            ..PhysicsConfig::default()
        };

        let problems = physics.validate().unwrap_err();
        assert_eq!(problems.len(), 3, "{:?}", problems);
        assert!(problems[0].contains("paddle_height"));
        assert!(problems[1].contains("min <= cruise <= max"));
        assert!(problems[2].contains("speed_growth_factor"));
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = std::env::temp_dir().join(format!("retropong-cfg-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.physics.winning_score, 5);
        assert!(path.exists());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# RetroPong Configuration File"));
        assert_eq!(parse_config(&written).physics, config.physics);

        let _ = fs::remove_dir_all(&dir);
    }
}
