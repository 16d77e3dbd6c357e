//! DigiTrack: hand-presence activity tracking for production orders.

mod app;
mod config;
mod console;
mod console_command;
mod controller;
mod error;
mod http;
mod logging;

pub(crate) use {
    app::App,
    console::Console,
    console_command::ConsoleCommand,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::time::Duration;

use tracing::error;

/// Time allowed for blocking tasks (stdin reader, detection worker) to
/// wind down after the app returns.
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    // Flushes the log file on drop; must outlive the runtime.
    let _log_guard = match logging::init(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e}");
            std::process::exit(1);
        }
    };

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to create App: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = rt.block_on(app.run());
    rt.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}
