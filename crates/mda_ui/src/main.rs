//! MD Analyzer - Main entry point
//!
//! Handles application-level logging initialization, configuration
//! loading, directory creation, and dashboard launch.

use std::path::PathBuf;

use mda_core::config::ConfigManager;
use mda_core::logging::{init_tracing, init_tracing_with_file};

mod app;
mod chart;
mod theme;
mod view;

use app::App;

/// Default config path: .config/settings.toml (relative to the working
/// directory).
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

fn main() -> iced::Result {
    // Load configuration first (needed for the logs directory path).
    let config_path = default_config_path();
    let mut config = ConfigManager::new(&config_path);

    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {e}. Using defaults.");
    }
    if let Err(e) = config.ensure_dirs_exist() {
        eprintln!("Warning: Failed to create directories: {e}");
    }

    // Initialize application-level logging; keep the file guard alive.
    let level = config.settings().logging.level;
    let _log_guard = if config.settings().logging.log_to_file {
        Some(init_tracing_with_file(level, &config.logs_folder()))
    } else {
        init_tracing(level);
        None
    };

    tracing::info!("MD Analyzer starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", mda_core::version());

    iced::application("MD Analyzer", App::update, App::view)
        .theme(App::theme)
        .window_size((1280.0, 820.0))
        .run_with(move || (App::new(config), iced::Task::none()))
}
