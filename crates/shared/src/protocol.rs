use serde::{Deserialize, Serialize};

use crate::domain::{AnimationResult, AnimationUrl, ImageUrl};

/// One entry of the `/search` response array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub base_url: ImageUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub image_urls: Vec<ImageUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimateRequest {
    pub image_urls: Vec<ImageUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimateResponse {
    pub animation_url: AnimationUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl From<AnimateResponse> for AnimationResult {
    fn from(value: AnimateResponse) -> Self {
        Self {
            animation_url: value.animation_url,
            download_path: value.download_url,
        }
    }
}
