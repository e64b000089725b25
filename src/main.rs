//! Indexicate: browse a folder as a tree grouped by file type.
//!
//! Thin binary entry point. All logic lives in the `indexicate-core`
//! and `indexicate-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use indexicate_core::settings::Settings;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "indexicate", version, about)]
struct Cli {
    /// Folder to open on startup.
    path: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("Indexicate starting");

    let settings_path = Settings::default_path();
    let settings = match settings_path.as_deref() {
        Some(path) => Settings::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Using default settings: {e}");
            Settings::default()
        }),
        None => Settings::default(),
    };

    let icon = indexicate_gui::icon::generate_icon(64);

    // Build state before opening the window so the initial scan is already
    // running when the first frame is drawn.
    let state = indexicate_gui::IndexicateState::build(cli.path, settings, settings_path);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Indexicate")
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([760.0, 480.0])
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "Indexicate",
        options,
        Box::new(|cc| {
            Ok(Box::new(indexicate_gui::IndexicateApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
