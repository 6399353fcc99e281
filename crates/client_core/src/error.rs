use std::path::PathBuf;

use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("could not read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url '{0}' cannot be used as a base for API endpoints")]
    UnsupportedServerUrl(String),
}

impl ClientError {
    /// The text shown to the user: the backend's `error` field when the server
    /// answered, otherwise the underlying failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(err) => Some(err.status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
