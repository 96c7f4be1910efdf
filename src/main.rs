use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use renamer_dash::app::DashboardApp;
use renamer_dash::cli::{self, Cli};
use renamer_dash::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.output.verbose {
        "renamer_dash=debug,info"
    } else if cli.command.is_some() {
        "renamer_dash=warn"
    } else {
        "renamer_dash=debug,info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.command.is_some() {
        return cli::run(cli).await;
    }

    tracing::info!("Starting Renamer Dash");

    let mut settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {}", e);
        Settings::default()
    });
    if let Some(server) = cli.server {
        settings.server.base_url = server;
    }

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 760.0])
        .with_min_inner_size([720.0, 520.0])
        .with_title("Renamer Dash");

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Renamer Dash",
        native_options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
