use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod media;
mod ui;

use clap::Parser;
use client_core::config::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{AnimatorApp, PersistedGuiSettings, StartupConfig, SETTINGS_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(about = "Desktop client for the photo animation service")]
struct Args {
    /// Backend base URL. Overrides animator.toml, the environment and the last used URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Directory the save dialog opens in.
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// tracing filter directive, e.g. `info` or `client_core=debug`.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let settings = load_settings();

    let filter = args.log.as_deref().unwrap_or(&settings.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Photo Animator")
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Photo Animator",
        options,
        Box::new(move |cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedGuiSettings>(&text).ok())
            });
            let server_url = args
                .server_url
                .or_else(|| persisted.and_then(|settings| settings.server_url))
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(settings.server_url);
            tracing::info!(%server_url, "starting desktop client");

            backend_bridge::runtime::launch(server_url.clone(), cmd_rx, ui_tx);
            Ok(Box::new(AnimatorApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig {
                    server_url,
                    download_dir: args.download_dir.or(settings.download_dir),
                },
            )))
        }),
    )
}
