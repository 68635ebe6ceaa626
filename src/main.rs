//! xcmd GUI - Main Entry Point
//!
//! Dual-pane file manager client for the xcmd backing service.

use anyhow::Context as _;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use xcmd_gui::app::application::run_app;
use xcmd_gui::helpers::get_or_create_log_dir;
use xcmd_gui::utils::config_store::load_config;

fn main() -> anyhow::Result<()> {
    // Console plus a daily rolling file in the log directory
    let log_dir = get_or_create_log_dir().context("Failed to create log directory")?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "xcmd-gui.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    tracing::info!("Starting xcmd GUI...");

    let config = load_config().context("Failed to load configuration")?;
    run_app(config).context("Failed to start application")?;
    Ok(())
}
