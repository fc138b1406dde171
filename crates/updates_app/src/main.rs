mod config;
mod platform;

use std::path::{Path, PathBuf};

use updates_logging::{updates_info, updates_warn};

const LOG_FILE: &str = "./updates.log";

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILE));

    let loaded = config::load(&config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => config::AppConfig::default(),
    };

    updates_logging::initialize(
        config.log_destination(),
        config.log_level(),
        Path::new(LOG_FILE),
    );
    match loaded {
        Ok(Some(_)) => updates_info!("Loaded configuration from {:?}", config_path),
        Ok(None) => updates_info!(
            "No configuration at {:?}; using defaults",
            config_path
        ),
        Err(err) => updates_warn!("Using default configuration: {}", err),
    }
    updates_info!(
        "Reading update feed from {} ({} per page)",
        config.base_url,
        config.page_size
    );

    platform::run_app(&config)
}
