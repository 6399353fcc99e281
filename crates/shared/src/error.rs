use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body the backend attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Extracts the human-readable message from a failed response body.
    ///
    /// Some backend routes reply with plain text instead of `{"error": ...}`;
    /// the trimmed body is used as-is then. `None` for an empty body.
    pub fn message_from_body(body: &str) -> Option<String> {
        if let Ok(parsed) = serde_json::from_str::<ApiError>(body) {
            return Some(parsed.error);
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[derive(Debug, Error)]
#[error("HTTP {status}: {message}")]
pub struct ApiException {
    pub status: u16,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ApiException> for ApiError {
    fn from(value: ApiException) -> Self {
        Self {
            error: value.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn prefers_json_error_field() {
        assert_eq!(
            ApiError::message_from_body(r#"{"error":"bad file"}"#).as_deref(),
            Some("bad file")
        );
    }

    #[test]
    fn falls_back_to_plain_text_body() {
        assert_eq!(
            ApiError::message_from_body("No images provided\n").as_deref(),
            Some("No images provided")
        );
        assert_eq!(ApiError::message_from_body("   "), None);
    }
}
