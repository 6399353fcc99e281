use std::{collections::HashMap, path::PathBuf};

use arboard::Clipboard;
use client_core::{
    feedback::{self, ResultArea},
    login_url_for,
    types::IMAGE_EXTENSIONS,
    SelectedImage,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use serde::{Deserialize, Serialize};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{PhotoState, PreviewSlot, WorkspaceState};
use crate::media::{load_local_preview, PreviewImage};

pub const SETTINGS_STORAGE_KEY: &str = "photo_animator.settings";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub download_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedGuiSettings {
    pub server_url: Option<String>,
}

pub struct AnimatorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    server_url: String,
    applied_server_url: String,
    download_dir: Option<PathBuf>,

    workspace: WorkspaceState,
    textures: HashMap<String, TextureHandle>,
}

impl AnimatorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            applied_server_url: startup.server_url.clone(),
            server_url: startup.server_url,
            download_dir: startup.download_dir,
            workspace: WorkspaceState::default(),
            textures: HashMap::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            if matches!(event, UiEvent::SearchCompleted { .. }) {
                self.textures.retain(|key, _| !key.starts_with("photo:"));
            }
            self.workspace.apply(event);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        let name = cmd.name();
        let mut status = String::new();
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut status) {
            self.workspace.set_status(status);
            self.workspace.command_not_sent(name);
        }
    }

    fn apply_server_url(&mut self) {
        let server_url = self.server_url.trim().to_string();
        if server_url == self.applied_server_url {
            return;
        }
        self.applied_server_url = server_url.clone();
        self.dispatch(BackendCommand::SetServer { server_url });
    }

    fn open_login(&mut self, ctx: &egui::Context) {
        match login_url_for(&self.server_url) {
            Ok(url) => {
                tracing::info!(%url, "opening login page");
                ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
                self.workspace.set_status(format!("Opened {url} in the browser"));
            }
            Err(err) => {
                self.workspace.alert = Some(err.to_string());
            }
        }
    }

    fn pick_files(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = dirs::picture_dir().or_else(dirs::home_dir) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(paths) = dialog.pick_files() {
            self.select_paths(paths);
        }
    }

    fn select_paths(&mut self, paths: Vec<PathBuf>) {
        let files = paths
            .into_iter()
            .map(|path| {
                let preview = load_local_preview(&path);
                (SelectedImage::from_path(path), preview)
            })
            .collect();
        self.textures.retain(|key, _| !key.starts_with("preview:"));
        self.workspace.select_files(files);
    }

    fn copy_link(&mut self, url: &str) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url.to_string())) {
            Ok(()) => self.workspace.set_status("Copied animation link to clipboard"),
            Err(err) => self.workspace.set_status(format!("Failed to copy link: {err}")),
        }
    }

    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        key: String,
        image: &PreviewImage,
    ) -> TextureHandle {
        self.textures
            .entry(key.clone())
            .or_insert_with(|| {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), &image.rgba);
                ctx.load_texture(key, color_image, egui::TextureOptions::LINEAR)
            })
            .clone()
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Photo Animator");
                ui.separator();
                ui.label("Server");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.server_url)
                        .hint_text("http://127.0.0.1:8080")
                        .desired_width(260.0),
                );
                if response.lost_focus() {
                    self.apply_server_url();
                }
                if ui.button("Log in").clicked() {
                    self.apply_server_url();
                    self.open_login(ctx);
                }
                let search_label = if self.workspace.search_in_flight {
                    "Searching..."
                } else {
                    "Search photos"
                };
                if ui.button(search_label).clicked() {
                    self.apply_server_url();
                    let cmd = self.workspace.request_search();
                    self.dispatch(cmd);
                }
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.workspace.last_error {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        format!("{} issue", err_label(err.category())),
                    )
                    .on_hover_text(format!("{:?}: {}", err.context(), err.message()));
                    ui.separator();
                }
                ui.label(&self.workspace.status);
            });
        });
    }

    fn show_selection(&mut self, ui: &mut egui::Ui) {
        ui.heading("Images to animate");
        ui.horizontal(|ui| {
            if ui.button("Choose images...").clicked() {
                self.pick_files();
            }
            if ui
                .add_enabled(
                    !self.workspace.previews.is_empty(),
                    egui::Button::new("Clear selection"),
                )
                .clicked()
            {
                self.select_paths(Vec::new());
            }
            let upload = ui.add_enabled(self.workspace.upload_enabled(), egui::Button::new("Upload"));
            if upload.clicked() {
                self.apply_server_url();
                if let Some(cmd) = self.workspace.request_upload() {
                    self.dispatch(cmd);
                }
            }
            let animate =
                ui.add_enabled(self.workspace.animate_enabled(), egui::Button::new("Animate"));
            if animate.clicked() {
                self.apply_server_url();
                if let Some(cmd) = self.workspace.request_animate() {
                    self.dispatch(cmd);
                }
            }
            if self.workspace.session.upload_in_flight() || self.workspace.session.animate_in_flight() {
                ui.spinner();
            }
        });

        let generation = self.workspace.selection_generation;
        let ctx = ui.ctx().clone();
        let previews: Vec<(usize, String, Option<PreviewImage>, Option<String>)> = self
            .workspace
            .previews
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let filename = slot.filename().to_string();
                match slot {
                    PreviewSlot::Ready { image, .. } => (index, filename, Some(image.clone()), None),
                    PreviewSlot::Unreadable { reason, .. } => {
                        (index, filename, None, Some(reason.clone()))
                    }
                }
            })
            .collect();

        ui.horizontal_wrapped(|ui| {
            for (index, filename, image, reason) in previews {
                ui.vertical(|ui| {
                    match image {
                        Some(image) => {
                            let texture =
                                self.texture_for(&ctx, format!("preview:{generation}:{index}"), &image);
                            let size = egui::vec2(image.width as f32, image.height as f32);
                            ui.add(egui::Image::new((texture.id(), size)));
                        }
                        None => {
                            ui.weak(reason.unwrap_or_default());
                        }
                    }
                    ui.small(filename);
                });
            }
        });
    }

    fn show_result(&mut self, ui: &mut egui::Ui) {
        let mut copy_url = None;
        let mut save_clicked = false;
        match &self.workspace.result {
            ResultArea::Empty => {}
            ResultArea::Success(text) => {
                ui.label(text);
            }
            ResultArea::Failure(text) => {
                ui.colored_label(ui.visuals().error_fg_color, text);
            }
            ResultArea::AnimationReady(animation) => {
                ui.horizontal(|ui| {
                    ui.label(feedback::ANIMATION_CREATED);
                    ui.hyperlink_to(feedback::VIEW_ANIMATION, animation.animation_url.as_str());
                    if ui.button("Copy link").clicked() {
                        copy_url = Some(animation.animation_url.to_string());
                    }
                    if ui.button("Save animation...").clicked() {
                        save_clicked = true;
                    }
                });
            }
        }

        if let Some(url) = copy_url {
            self.copy_link(&url);
        }
        if save_clicked {
            if let Some(cmd) = self.workspace.request_save_animation(self.download_dir.clone()) {
                self.dispatch(cmd);
            }
        }
    }

    fn show_photos(&mut self, ui: &mut egui::Ui) {
        ui.heading("Photos");
        if self.workspace.photos.is_empty() {
            ui.weak("Use \"Search photos\" to list your library.");
            return;
        }

        let generation = self.workspace.search_generation;
        let ctx = ui.ctx().clone();
        let photos: Vec<(usize, String, Option<PreviewImage>, Option<String>)> = self
            .workspace
            .photos
            .iter()
            .enumerate()
            .map(|(index, slot)| match &slot.state {
                PhotoState::Loading => (index, slot.url.to_string(), None, None),
                PhotoState::Ready(image) => (index, slot.url.to_string(), Some(image.clone()), None),
                PhotoState::Failed(reason) => {
                    (index, slot.url.to_string(), None, Some(reason.clone()))
                }
            })
            .collect();

        ui.horizontal_wrapped(|ui| {
            for (index, url, image, failure) in photos {
                match (image, failure) {
                    (Some(image), _) => {
                        let texture =
                            self.texture_for(&ctx, format!("photo:{generation}:{index}"), &image);
                        let size = egui::vec2(image.width as f32, image.height as f32);
                        ui.add(egui::Image::new((texture.id(), size)))
                            .on_hover_text(url);
                    }
                    (None, Some(reason)) => {
                        ui.weak("unavailable").on_hover_text(reason);
                    }
                    (None, None) => {
                        ui.spinner().on_hover_text(url);
                    }
                }
            }
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.workspace.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.workspace.dismiss_alert();
        }
    }
}

impl eframe::App for AnimatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(self.workspace.alert.is_none(), |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_selection(ui);
                    ui.add_space(8.0);
                    self.show_result(ui);
                    ui.separator();
                    self.show_photos(ui);
                });
            });
        });
        self.show_alert(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedGuiSettings {
            server_url: Some(self.server_url.trim().to_string()),
        };
        if let Ok(serialized) = serde_json::to_string(&settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
