// Configuration module for RetroPong
// Handles loading and managing game configuration from TOML file

pub mod loader;
pub mod types;

pub use loader::{create_default_config, get_config_path, load_config, load_config_from, ConfigError};
pub use types::{
    AIBackend, AIConfig, Config, DisplayConfig, KeyBindings, PhysicsConfig, ServerConfig,
};
