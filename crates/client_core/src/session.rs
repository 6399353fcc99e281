//! Explicit state container for one animator session.
//!
//! Phases advance unselected -> selected -> uploaded -> animated. Selecting new
//! files never drops an earlier upload; a later successful upload replaces it.

use shared::domain::{AnimationResult, ImageUrl, UploadedImages};
use thiserror::Error;

use crate::types::SelectedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unselected,
    Selected,
    Uploaded,
    Animated,
}

/// Rejections raised before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please select images to upload.")]
    NoFilesSelected,
    #[error("No images to animate.")]
    NothingUploaded,
    #[error("An upload is already in progress.")]
    UploadInFlight,
    #[error("An animation request is already in progress.")]
    AnimateInFlight,
}

#[derive(Debug, Default)]
pub struct AnimatorSession {
    selected: Vec<SelectedImage>,
    uploaded: Option<UploadedImages>,
    animation: Option<AnimationResult>,
    upload_in_flight: bool,
    animate_in_flight: bool,
}

impl AnimatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.animation.is_some() {
            SessionPhase::Animated
        } else if self.uploaded.is_some() {
            SessionPhase::Uploaded
        } else if !self.selected.is_empty() {
            SessionPhase::Selected
        } else {
            SessionPhase::Unselected
        }
    }

    pub fn select_files(&mut self, files: Vec<SelectedImage>) {
        self.selected = files;
    }

    pub fn selected_files(&self) -> &[SelectedImage] {
        &self.selected
    }

    pub fn uploaded(&self) -> Option<&UploadedImages> {
        self.uploaded.as_ref()
    }

    pub fn animation(&self) -> Option<&AnimationResult> {
        self.animation.as_ref()
    }

    pub fn upload_in_flight(&self) -> bool {
        self.upload_in_flight
    }

    pub fn animate_in_flight(&self) -> bool {
        self.animate_in_flight
    }

    pub fn can_upload(&self) -> bool {
        !self.selected.is_empty() && !self.upload_in_flight
    }

    pub fn can_animate(&self) -> bool {
        self.uploaded.is_some() && !self.animate_in_flight
    }

    /// Marks an upload as started and returns the files to send.
    pub fn begin_upload(&mut self) -> Result<Vec<SelectedImage>, SessionError> {
        if self.selected.is_empty() {
            return Err(SessionError::NoFilesSelected);
        }
        if self.upload_in_flight {
            return Err(SessionError::UploadInFlight);
        }
        self.upload_in_flight = true;
        Ok(self.selected.clone())
    }

    /// Records the URLs returned by the backend. Returns `false` when the
    /// backend answered with an empty list; that counts as a failed upload
    /// and any earlier upload and animation stay in place.
    pub fn complete_upload(&mut self, urls: Vec<ImageUrl>) -> bool {
        self.upload_in_flight = false;
        let Some(uploaded) = UploadedImages::new(urls) else {
            return false;
        };
        self.uploaded = Some(uploaded);
        self.animation = None;
        true
    }

    pub fn fail_upload(&mut self) {
        self.upload_in_flight = false;
    }

    /// Marks an animate request as started and returns the URL list to send.
    pub fn begin_animate(&mut self) -> Result<UploadedImages, SessionError> {
        let Some(uploaded) = self.uploaded.clone() else {
            return Err(SessionError::NothingUploaded);
        };
        if self.animate_in_flight {
            return Err(SessionError::AnimateInFlight);
        }
        self.animate_in_flight = true;
        Ok(uploaded)
    }

    pub fn complete_animate(&mut self, result: AnimationResult) {
        self.animate_in_flight = false;
        self.animation = Some(result);
    }

    pub fn fail_animate(&mut self) {
        self.animate_in_flight = false;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
