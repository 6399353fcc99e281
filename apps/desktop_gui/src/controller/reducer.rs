//! Workspace state and its transitions. Kept free of egui types so every
//! transition can be exercised without a window.

use std::path::PathBuf;

use chrono::Local;
use client_core::{
    feedback::{self, ResultArea},
    AnimatorSession, SelectedImage, SessionError,
};
use shared::domain::ImageUrl;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::PreviewImage;

pub enum PreviewSlot {
    Ready {
        filename: String,
        image: PreviewImage,
    },
    Unreadable {
        filename: String,
        reason: String,
    },
}

impl PreviewSlot {
    pub fn filename(&self) -> &str {
        match self {
            Self::Ready { filename, .. } | Self::Unreadable { filename, .. } => filename,
        }
    }
}

pub enum PhotoState {
    Loading,
    Ready(PreviewImage),
    Failed(String),
}

pub struct PhotoSlot {
    pub url: ImageUrl,
    pub state: PhotoState,
}

pub struct WorkspaceState {
    pub session: AnimatorSession,
    pub previews: Vec<PreviewSlot>,
    /// Bumped on every new selection so cached textures can be keyed by it.
    pub selection_generation: u64,
    pub photos: Vec<PhotoSlot>,
    pub search_generation: u64,
    pub search_in_flight: bool,
    pub result: ResultArea,
    /// Blocking notice shown until dismissed.
    pub alert: Option<String>,
    pub last_error: Option<UiError>,
    pub status: String,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            session: AnimatorSession::new(),
            previews: Vec::new(),
            selection_generation: 0,
            photos: Vec::new(),
            search_generation: 0,
            search_in_flight: false,
            result: ResultArea::Empty,
            alert: None,
            last_error: None,
            status: "Ready".to_string(),
        }
    }
}

impl WorkspaceState {
    /// Replaces the selection. Each entry carries its already decoded preview,
    /// so exactly one preview slot exists per selected file.
    pub fn select_files(&mut self, files: Vec<(SelectedImage, Result<PreviewImage, String>)>) {
        self.selection_generation = self.selection_generation.wrapping_add(1);
        self.previews = files
            .iter()
            .map(|(file, preview)| match preview {
                Ok(image) => PreviewSlot::Ready {
                    filename: file.filename.clone(),
                    image: image.clone(),
                },
                Err(reason) => PreviewSlot::Unreadable {
                    filename: file.filename.clone(),
                    reason: reason.clone(),
                },
            })
            .collect();
        let count = files.len();
        self.session
            .select_files(files.into_iter().map(|(file, _)| file).collect());
        self.set_status(format!("{count} image(s) selected"));
    }

    pub fn upload_enabled(&self) -> bool {
        self.session.can_upload()
    }

    pub fn animate_enabled(&self) -> bool {
        self.session.can_animate()
    }

    pub fn request_search(&mut self) -> BackendCommand {
        self.search_generation = self.search_generation.wrapping_add(1);
        self.search_in_flight = true;
        self.set_status("Searching photos...");
        BackendCommand::Search {
            generation: self.search_generation,
        }
    }

    /// `None` when the upload was rejected locally; the alert explains why.
    pub fn request_upload(&mut self) -> Option<BackendCommand> {
        match self.session.begin_upload() {
            Ok(files) => {
                self.set_status(format!("Uploading {} image(s)...", files.len()));
                Some(BackendCommand::Upload { files })
            }
            Err(err) => {
                self.reject(UiErrorContext::Upload, err);
                None
            }
        }
    }

    /// `None` when the animate action was rejected locally; the alert explains why.
    pub fn request_animate(&mut self) -> Option<BackendCommand> {
        match self.session.begin_animate() {
            Ok(images) => {
                self.set_status(format!("Creating animation from {} image(s)...", images.len()));
                Some(BackendCommand::Animate { images })
            }
            Err(err) => {
                self.reject(UiErrorContext::Animate, err);
                None
            }
        }
    }

    pub fn request_save_animation(&mut self, download_dir: Option<PathBuf>) -> Option<BackendCommand> {
        let animation = self.session.animation()?.clone();
        self.set_status("Downloading animation...");
        Some(BackendCommand::SaveAnimation {
            animation,
            download_dir,
        })
    }

    /// Undoes the in-flight marker of a command that never reached the worker.
    pub fn command_not_sent(&mut self, cmd_name: &str) {
        match cmd_name {
            "upload" => self.session.fail_upload(),
            "animate" => self.session.fail_animate(),
            "search" => self.search_in_flight = false,
            _ => {}
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.set_status(message),
            UiEvent::Error(err) => {
                self.set_status(err.message().to_string());
                self.last_error = Some(err);
            }
            UiEvent::SearchCompleted { generation, urls } => {
                if generation != self.search_generation {
                    return;
                }
                self.search_in_flight = false;
                self.set_status(format!("Found {} photo(s)", urls.len()));
                self.photos = urls
                    .into_iter()
                    .map(|url| PhotoSlot {
                        url,
                        state: PhotoState::Loading,
                    })
                    .collect();
            }
            UiEvent::SearchFailed {
                generation,
                category,
                message,
            } => {
                if generation != self.search_generation {
                    return;
                }
                self.search_in_flight = false;
                let err = UiError::new(
                    category,
                    UiErrorContext::Search,
                    format!("Search failed: {message}"),
                );
                self.set_status(err.message().to_string());
                self.last_error = Some(err);
            }
            UiEvent::PhotoLoaded {
                generation,
                index,
                image,
            } => {
                if generation == self.search_generation {
                    if let Some(slot) = self.photos.get_mut(index) {
                        slot.state = PhotoState::Ready(image);
                    }
                }
            }
            UiEvent::PhotoFailed {
                generation,
                index,
                reason,
            } => {
                if generation == self.search_generation {
                    if let Some(slot) = self.photos.get_mut(index) {
                        slot.state = PhotoState::Failed(reason);
                    }
                }
            }
            UiEvent::UploadSucceeded { urls } => {
                let count = urls.len();
                if self.session.complete_upload(urls) {
                    self.result = ResultArea::Success(feedback::UPLOAD_SUCCEEDED.to_string());
                    self.set_status(format!("Uploaded {count} image(s)"));
                } else {
                    self.result =
                        ResultArea::Failure(feedback::UPLOAD_RETURNED_NOTHING.to_string());
                    self.set_status(feedback::UPLOAD_RETURNED_NOTHING);
                }
            }
            UiEvent::UploadFailed { category, message } => {
                self.session.fail_upload();
                let text = feedback::upload_failed(&message);
                self.last_error = Some(UiError::new(category, UiErrorContext::Upload, text.clone()));
                self.set_status("Upload failed");
                self.result = ResultArea::Failure(text);
            }
            UiEvent::AnimateSucceeded(animation) => {
                self.session.complete_animate(animation.clone());
                self.set_status(feedback::ANIMATION_CREATED);
                self.result = ResultArea::AnimationReady(animation);
            }
            UiEvent::AnimateFailed { category, message } => {
                self.session.fail_animate();
                let text = feedback::animate_failed(&message);
                self.last_error = Some(UiError::new(category, UiErrorContext::Animate, text.clone()));
                self.set_status("Animation failed");
                self.result = ResultArea::Failure(text);
            }
            UiEvent::AnimationSaved(path) => {
                self.set_status(format!("Saved animation to {}", path.display()));
            }
        }
    }

    fn reject(&mut self, context: UiErrorContext, err: SessionError) {
        let message = err.to_string();
        tracing::info!(?context, "action rejected: {message}");
        self.last_error = Some(UiError::from_message(context, message.clone()));
        self.alert = Some(message);
    }

    /// Every status line carries the local time it was written.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = format!("[{}] {}", Local::now().format("%H:%M:%S"), message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiErrorCategory;
    use shared::domain::AnimationResult;

    fn preview() -> PreviewImage {
        PreviewImage {
            width: 2,
            height: 1,
            rgba: vec![0; 8],
        }
    }

    fn selection(names: &[&str]) -> Vec<(SelectedImage, Result<PreviewImage, String>)> {
        names
            .iter()
            .map(|name| (SelectedImage::from_path(format!("/frames/{name}")), Ok(preview())))
            .collect()
    }

    fn uploaded_state(urls: &[&str]) -> WorkspaceState {
        let mut state = WorkspaceState::default();
        state.select_files(selection(&["a.png", "b.png"]));
        assert!(state.request_upload().is_some());
        state.apply(UiEvent::UploadSucceeded {
            urls: urls.iter().map(|url| ImageUrl::from(*url)).collect(),
        });
        state
    }

    #[test]
    fn selecting_zero_files_keeps_upload_disabled() {
        let mut state = WorkspaceState::default();
        assert!(!state.upload_enabled());

        state.select_files(Vec::new());
        assert!(!state.upload_enabled());
        assert!(state.previews.is_empty());
    }

    #[test]
    fn selection_renders_one_preview_per_file_and_enables_upload() {
        let mut state = WorkspaceState::default();
        let mut files = selection(&["a.png", "b.png"]);
        files.push((
            SelectedImage::from_path("/frames/broken.png"),
            Err("unsupported image".to_string()),
        ));

        state.select_files(files);
        assert_eq!(state.previews.len(), 3);
        assert!(matches!(state.previews[2], PreviewSlot::Unreadable { .. }));
        assert_eq!(state.previews[1].filename(), "b.png");
        assert!(state.upload_enabled());
    }

    #[test]
    fn upload_without_selection_alerts_and_sends_nothing() {
        let mut state = WorkspaceState::default();
        assert!(state.request_upload().is_none());
        assert_eq!(state.alert.as_deref(), Some("Please select images to upload."));
    }

    #[test]
    fn animate_before_upload_alerts_and_sends_nothing() {
        let mut state = WorkspaceState::default();
        state.select_files(selection(&["a.png"]));
        assert!(!state.animate_enabled());
        assert!(state.request_animate().is_none());
        assert_eq!(state.alert.as_deref(), Some("No images to animate."));

        state.dismiss_alert();
        assert!(state.alert.is_none());
    }

    #[test]
    fn successful_upload_enables_animate_with_exact_urls() {
        let mut state = uploaded_state(&["a", "b"]);
        assert!(state.animate_enabled());
        assert_eq!(state.result.text(), feedback::UPLOAD_SUCCEEDED);

        match state.request_animate() {
            Some(BackendCommand::Animate { images }) => {
                assert_eq!(images.urls(), &[ImageUrl::from("a"), ImageUrl::from("b")]);
            }
            _ => panic!("expected animate command"),
        }
    }

    #[test]
    fn successful_animate_renders_link_to_result_url() {
        let mut state = uploaded_state(&["a"]);
        assert!(state.request_animate().is_some());
        state.apply(UiEvent::AnimateSucceeded(AnimationResult {
            animation_url: "https://storage.example/anim.gif".into(),
            download_path: Some("/download/anim.gif".to_string()),
        }));

        assert_eq!(
            state.result.link_target().map(|url| url.as_str()),
            Some("https://storage.example/anim.gif")
        );
        assert!(state.request_save_animation(None).is_some());
    }

    #[test]
    fn rejected_upload_shows_error_and_leaves_animate_disabled() {
        let mut state = WorkspaceState::default();
        state.select_files(selection(&["a.png"]));
        assert!(state.request_upload().is_some());
        state.apply(UiEvent::UploadFailed {
            category: UiErrorCategory::Server,
            message: "bad file".to_string(),
        });

        assert!(state.result.text().contains("bad file"));
        assert!(!state.animate_enabled());
        assert!(state.upload_enabled());
        assert_eq!(
            state.last_error.as_ref().map(|err| err.category()),
            Some(UiErrorCategory::Server)
        );
    }

    #[test]
    fn empty_upload_response_keeps_earlier_upload_animatable() {
        let mut state = uploaded_state(&["first"]);
        state.select_files(selection(&["c.png"]));
        assert!(state.request_upload().is_some());
        state.apply(UiEvent::UploadSucceeded { urls: Vec::new() });

        assert!(state.result.is_failure());
        assert_eq!(state.result.text(), feedback::UPLOAD_RETURNED_NOTHING);
        assert!(state.upload_enabled());
        match state.request_animate() {
            Some(BackendCommand::Animate { images }) => {
                assert_eq!(images.urls(), &[ImageUrl::from("first")]);
            }
            _ => panic!("expected animate command"),
        }
    }

    #[test]
    fn status_lines_are_timestamped() {
        let mut state = WorkspaceState::default();
        state.set_status("Copied animation link to clipboard");
        assert!(state.status.starts_with('['));
        assert!(state.status.ends_with("] Copied animation link to clipboard"));
    }

    #[test]
    fn second_upload_while_in_flight_is_rejected() {
        let mut state = WorkspaceState::default();
        state.select_files(selection(&["a.png"]));
        assert!(state.request_upload().is_some());
        assert!(!state.upload_enabled());
        assert!(state.request_upload().is_none());
        assert_eq!(
            state.alert.as_deref(),
            Some("An upload is already in progress.")
        );

        state.command_not_sent("upload");
        assert!(state.upload_enabled());
    }

    #[test]
    fn search_results_replace_photos_and_ignore_stale_generations() {
        let mut state = WorkspaceState::default();
        let first = match state.request_search() {
            BackendCommand::Search { generation } => generation,
            _ => panic!("expected search command"),
        };
        state.apply(UiEvent::SearchCompleted {
            generation: first,
            urls: vec!["https://p/1".into(), "https://p/2".into()],
        });
        assert_eq!(state.photos.len(), 2);

        let second = match state.request_search() {
            BackendCommand::Search { generation } => generation,
            _ => panic!("expected search command"),
        };
        state.apply(UiEvent::PhotoLoaded {
            generation: first,
            index: 0,
            image: preview(),
        });
        assert!(matches!(state.photos[0].state, PhotoState::Loading));

        state.apply(UiEvent::SearchCompleted {
            generation: second,
            urls: vec!["https://p/3".into()],
        });
        assert_eq!(state.photos.len(), 1);
        assert_eq!(state.photos[0].url.as_str(), "https://p/3");
        assert!(!state.search_in_flight);

        state.apply(UiEvent::PhotoFailed {
            generation: second,
            index: 0,
            reason: "404".to_string(),
        });
        assert!(matches!(state.photos[0].state, PhotoState::Failed(_)));
    }
}
