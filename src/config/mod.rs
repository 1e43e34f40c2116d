/// Database configuration and connection management
pub mod database;

/// Application settings loading from config.toml
pub mod settings;

pub use settings::{AppConfig, FormConfig, StoreConfig, load_app_configuration, load_config};
