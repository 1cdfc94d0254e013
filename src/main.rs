// Re-export library modules so binary-internal modules can use crate::api:: and crate::calendar::
pub(crate) use cockpit_calendar::{api, calendar, error};

mod app;
mod config;
mod keys;
mod logging;
mod ui;

use std::path::PathBuf;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

use config::AppConfig;

fn config_path() -> PathBuf {
    AppConfig::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path();

    if !path.exists() {
        AppConfig::write_default(&path)?;
        eprintln!(
            "Created default config at: {}\nPlease edit it with your cockpit server URL, then run again.",
            path.display()
        );
        return Ok(());
    }

    let config = match AppConfig::load_from_path(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", path.display(), e);
            eprintln!("Fix the config file or delete it to regenerate defaults.");
            return Ok(());
        }
    };

    if let Err(e) = logging::init_logging(&config.logging.level, &AppConfig::log_dir()) {
        eprintln!("Logging disabled: {}", e);
    }

    let mut terminal = ratatui::init();
    let _ = crossterm::execute!(std::io::stdout(), EnableMouseCapture);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
        ratatui::restore();
        hook(info);
    }));

    let result = app::run(&config, &mut terminal).await;

    let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = result {
        log::error!("event=app_exit module=host status=error error={}", e);
        eprintln!("Error: {}", e);
        if let Some((_, dir)) = logging::logging_status() {
            eprintln!("See logs in {}", dir.display());
        }
    }

    Ok(())
}
