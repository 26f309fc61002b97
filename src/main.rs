//! cgen entry point: CLI, logging, configuration and the window loop.

use clap::Parser;
use eframe::egui;
use tracing::info;

use cgen::config::{Cli, Config};
use cgen::ui::CodegenApp;

const WINDOW_TITLE: &str = "Offline C Code Generator";

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose { "cgen=debug" } else { "cgen=info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with_target(true)
        .init();

    info!("cgen v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(model) = cli.model {
        config.model.model_path = Some(model);
    }

    info!(
        model = %config.model.model_filename,
        context_size = config.model.context_size,
        max_tokens = config.generation.max_tokens,
        "Configuration loaded"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([640.0, 480.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(|_cc| Box::new(CodegenApp::new(config))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))?;

    Ok(())
}
