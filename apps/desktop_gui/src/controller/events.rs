//! UI/backend events and error modeling for the desktop controller.

use std::path::PathBuf;

use client_core::ClientError;
use shared::domain::{AnimationResult, ImageUrl};

use crate::media::PreviewImage;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    SearchCompleted {
        generation: u64,
        urls: Vec<ImageUrl>,
    },
    SearchFailed {
        generation: u64,
        category: UiErrorCategory,
        message: String,
    },
    PhotoLoaded {
        generation: u64,
        index: usize,
        image: PreviewImage,
    },
    PhotoFailed {
        generation: u64,
        index: usize,
        reason: String,
    },
    UploadSucceeded {
        urls: Vec<ImageUrl>,
    },
    UploadFailed {
        category: UiErrorCategory,
        message: String,
    },
    AnimateSucceeded(AnimationResult),
    AnimateFailed {
        category: UiErrorCategory,
        message: String,
    },
    AnimationSaved(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Server,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Configuration,
    Search,
    Upload,
    Animate,
    SaveAnimation,
    General,
}

impl UiErrorCategory {
    /// Category of a failed request, taken from the error variant rather than
    /// from the text the server chose to send.
    pub fn of(err: &ClientError) -> Self {
        match err {
            ClientError::Api(_) => Self::Server,
            ClientError::Transport(err) if err.status().is_some() => Self::Server,
            ClientError::Transport(_) => Self::Transport,
            ClientError::ReadFile { .. }
            | ClientError::InvalidServerUrl { .. }
            | ClientError::UnsupportedServerUrl(_) => Self::Validation,
        }
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Server => "Server",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// Classifies locally produced messages, where no typed error is at hand.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("please select")
            || message_lower.contains("no images to animate")
            || message_lower.contains("already in progress")
            || message_lower.contains("invalid server url")
            || message_lower.contains("cannot be used as a base")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("error sending request")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
            || message_lower.contains("disconnected")
            || message_lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("http 4")
            || message_lower.contains("http 5")
            || message_lower.contains("failed to upload")
            || message_lower.contains("failed to create")
        {
            UiErrorCategory::Server
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_empty_selection_as_validation() {
        let err = UiError::from_message(UiErrorContext::Upload, "Please select images to upload.");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::Upload);
    }

    #[test]
    fn classifies_backend_disconnect_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected; restart the app",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err_label(err.category()), "Transport");
    }

    #[test]
    fn server_error_text_mentioning_connection_stays_a_server_error() {
        let err = ClientError::Api(shared::error::ApiException::new(
            502,
            "upstream connection refused",
        ));
        assert_eq!(UiErrorCategory::of(&err), UiErrorCategory::Server);

        let unreadable = ClientError::ReadFile {
            path: "/frames/a.png".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(UiErrorCategory::of(&unreadable), UiErrorCategory::Validation);
    }

    #[test]
    fn classifies_rejected_upload_as_server() {
        let err = UiError::from_message(UiErrorContext::Upload, "Failed to upload images: bad file");
        assert_eq!(err.category(), UiErrorCategory::Server);
        assert_eq!(err.message(), "Failed to upload images: bad file");
    }
}
