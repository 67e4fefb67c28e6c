//! Simple Video Editor - Main entry point
//!
//! Loads configuration, sets up logging and opens the iced window.

use sve_core::config::{default_config_path, ConfigManager};
use sve_core::logging::{init_tracing, init_tracing_with_file};

mod app;
mod handlers;
mod pages;
mod theme;
mod widgets;

use app::App;

fn main() -> iced::Result {
    // Load configuration first (needed for logs directory path)
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    let config_warning = config_manager.load_or_create().err();

    let logging = config_manager.settings().logging.clone();
    let _log_guard = if logging.file_logging {
        if let Err(e) = config_manager.ensure_dirs_exist() {
            eprintln!("Warning: Failed to create logs folder: {}", e);
        }
        Some(init_tracing_with_file(
            logging.level,
            &config_manager.logs_folder(),
        ))
    } else {
        init_tracing(logging.level);
        None
    };

    if let Some(e) = config_warning {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
    }

    tracing::info!("Simple Video Editor starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", sve_core::version());

    iced::application(
        move || App::new(config_manager.clone()),
        App::update,
        App::view,
    )
    .title(App::title)
    .subscription(App::subscription)
    .window_size((600.0, 500.0))
    .run()
}
