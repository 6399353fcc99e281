//! User-facing text for the result area.

use shared::domain::{AnimationResult, AnimationUrl};

pub const UPLOAD_SUCCEEDED: &str = "Images uploaded successfully!";
pub const UPLOAD_RETURNED_NOTHING: &str =
    "Upload finished but the server returned no image URLs.";
pub const ANIMATION_CREATED: &str = "Animation created!";
pub const VIEW_ANIMATION: &str = "View Animation";

pub fn upload_failed(message: &str) -> String {
    format!("Failed to upload images: {message}")
}

pub fn animate_failed(message: &str) -> String {
    format!("Failed to create animation: {message}")
}

/// What the result area shows after the latest upload or animate action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultArea {
    #[default]
    Empty,
    Success(String),
    Failure(String),
    AnimationReady(AnimationResult),
}

impl ResultArea {
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Success(text) | Self::Failure(text) => text.clone(),
            Self::AnimationReady(result) => {
                format!("{ANIMATION_CREATED} {VIEW_ANIMATION}: {}", result.animation_url)
            }
        }
    }

    /// Target of the rendered link, if the area shows one.
    pub fn link_target(&self) -> Option<&AnimationUrl> {
        match self {
            Self::AnimationReady(result) => Some(&result.animation_url),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}
