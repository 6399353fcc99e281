//! Runtime bridge between UI command queue and backend event intake.

use std::{path::PathBuf, sync::Arc, thread};

use client_core::{AnimatorApi, AnimatorClient};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::domain::AnimationResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorCategory, UiErrorContext, UiEvent};
use crate::media::decode_preview_image;

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut api = build_api(&server_url, &ui_tx);
            if api.is_some() {
                let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            }

            while let Ok(cmd) = cmd_rx.recv() {
                if let BackendCommand::SetServer { server_url } = cmd {
                    // A rejected URL must not leave commands going to the previous server.
                    api = build_api(&server_url, &ui_tx);
                    if api.is_some() {
                        tracing::info!(%server_url, "switched backend server");
                        let _ = ui_tx.try_send(UiEvent::Info(format!("Using server {server_url}")));
                    }
                    continue;
                }

                let Some(api) = api.clone() else {
                    report_unconfigured(cmd, &ui_tx);
                    continue;
                };
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    run_command(api, cmd, ui_tx).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn build_api(server_url: &str, ui_tx: &Sender<UiEvent>) -> Option<Arc<dyn AnimatorApi>> {
    match AnimatorClient::new(server_url) {
        Ok(client) => Some(Arc::new(client)),
        Err(err) => {
            tracing::warn!("rejected server url: {err}");
            send_blocking(
                ui_tx,
                UiEvent::Error(UiError::new(
                    UiErrorCategory::of(&err),
                    UiErrorContext::Configuration,
                    err.to_string(),
                )),
            );
            None
        }
    }
}

fn report_unconfigured(cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
    let message = "No usable server URL is configured".to_string();
    let category = UiErrorCategory::Validation;
    let event = match cmd {
        BackendCommand::Search { generation } => UiEvent::SearchFailed {
            generation,
            category,
            message,
        },
        BackendCommand::Upload { .. } => UiEvent::UploadFailed { category, message },
        BackendCommand::Animate { .. } => UiEvent::AnimateFailed { category, message },
        BackendCommand::SaveAnimation { .. } | BackendCommand::SetServer { .. } => {
            UiEvent::Error(UiError::new(category, UiErrorContext::General, message))
        }
    };
    send_blocking(ui_tx, event);
}

/// Results that end an in-flight request must reach the UI, otherwise its
/// request guard never clears. They wait for room instead of being dropped.
fn send_blocking(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if ui_tx.send(event).is_err() {
        tracing::debug!("ui event queue closed; dropping result");
    }
}

async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui event queue closed; dropping result");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };
    tracing::warn!("ui event queue is full; waiting to deliver result");
    let ui_tx = ui_tx.clone();
    if let Err(err) = tokio::task::spawn_blocking(move || send_blocking(&ui_tx, event)).await {
        tracing::error!("failed to deliver ui event: {err}");
    }
}

async fn run_command(api: Arc<dyn AnimatorApi>, cmd: BackendCommand, ui_tx: Sender<UiEvent>) {
    match cmd {
        BackendCommand::SetServer { .. } => {}
        BackendCommand::Search { generation } => match api.search().await {
            Ok(items) => {
                let urls: Vec<_> = items.into_iter().map(|item| item.base_url).collect();
                deliver(
                    &ui_tx,
                    UiEvent::SearchCompleted {
                        generation,
                        urls: urls.clone(),
                    },
                )
                .await;
                for (index, url) in urls.into_iter().enumerate() {
                    let api = Arc::clone(&api);
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match api.fetch_bytes(url.as_str()).await {
                            Ok(bytes) => match decode_preview_image(&bytes) {
                                Ok(image) => UiEvent::PhotoLoaded {
                                    generation,
                                    index,
                                    image,
                                },
                                Err(reason) => UiEvent::PhotoFailed {
                                    generation,
                                    index,
                                    reason,
                                },
                            },
                            Err(err) => UiEvent::PhotoFailed {
                                generation,
                                index,
                                reason: format!("Failed to download photo: {}", err.user_message()),
                            },
                        };
                        if let Err(TrySendError::Full(_)) = ui_tx.try_send(event) {
                            tracing::warn!(index, "ui event queue is full; dropping thumbnail");
                        }
                    });
                }
            }
            Err(err) => {
                tracing::warn!("search failed: {err}");
                let event = UiEvent::SearchFailed {
                    generation,
                    category: UiErrorCategory::of(&err),
                    message: err.user_message(),
                };
                deliver(&ui_tx, event).await;
            }
        },
        BackendCommand::Upload { files } => {
            let event = match api.upload(&files).await {
                Ok(urls) => UiEvent::UploadSucceeded { urls },
                Err(err) => {
                    tracing::warn!("upload failed: {err}");
                    UiEvent::UploadFailed {
                        category: UiErrorCategory::of(&err),
                        message: err.user_message(),
                    }
                }
            };
            deliver(&ui_tx, event).await;
        }
        BackendCommand::Animate { images } => {
            let event = match api.animate(&images).await {
                Ok(result) => UiEvent::AnimateSucceeded(result),
                Err(err) => {
                    tracing::warn!("animate failed: {err}");
                    UiEvent::AnimateFailed {
                        category: UiErrorCategory::of(&err),
                        message: err.user_message(),
                    }
                }
            };
            deliver(&ui_tx, event).await;
        }
        BackendCommand::SaveAnimation {
            animation,
            download_dir,
        } => {
            let event = match save_animation(api.as_ref(), &animation, download_dir).await {
                Ok(Some(path)) => UiEvent::AnimationSaved(path),
                Ok(None) => UiEvent::Info("Save cancelled".to_string()),
                Err(err) => UiEvent::Error(err),
            };
            deliver(&ui_tx, event).await;
        }
    }
}

async fn save_animation(
    api: &dyn AnimatorApi,
    animation: &AnimationResult,
    download_dir: Option<PathBuf>,
) -> Result<Option<PathBuf>, UiError> {
    let reference = animation
        .download_path
        .as_deref()
        .unwrap_or(animation.animation_url.as_str());
    let bytes = api.fetch_bytes(reference).await.map_err(|err| {
        UiError::new(
            UiErrorCategory::of(&err),
            UiErrorContext::SaveAnimation,
            format!("Failed to download animation: {}", err.user_message()),
        )
    })?;

    let file_name = animation.suggested_file_name();
    let save_path = tokio::task::spawn_blocking(move || {
        let mut dialog = rfd::FileDialog::new().set_file_name(&file_name);
        if let Some(dir) = download_dir.or_else(dirs::download_dir) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    })
    .await
    .map_err(|err| {
        UiError::from_message(UiErrorContext::SaveAnimation, format!("Save dialog failed: {err}"))
    })?;

    let Some(path) = save_path else {
        return Ok(None);
    };
    tokio::fs::write(&path, bytes).await.map_err(|err| {
        UiError::from_message(UiErrorContext::SaveAnimation, format!("Failed to save animation: {err}"))
    })?;
    tracing::info!(path = %path.display(), "saved animation");
    Ok(Some(path))
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
