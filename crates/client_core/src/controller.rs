//! Canonical handler set: each user action runs against the session and the API.

use std::sync::Arc;

use shared::domain::ImageUrl;
use tracing::{info, warn};
use url::Url;

use crate::{
    error::ClientError,
    feedback::{self, ResultArea},
    session::{AnimatorSession, SessionError},
    types::SelectedImage,
    AnimatorApi,
};

pub struct AnimatorController {
    api: Arc<dyn AnimatorApi>,
    session: AnimatorSession,
    result: ResultArea,
}

impl AnimatorController {
    pub fn new(api: Arc<dyn AnimatorApi>) -> Self {
        Self {
            api,
            session: AnimatorSession::new(),
            result: ResultArea::Empty,
        }
    }

    pub fn session(&self) -> &AnimatorSession {
        &self.session
    }

    pub fn result(&self) -> &ResultArea {
        &self.result
    }

    pub fn login_url(&self) -> Url {
        self.api.login_url()
    }

    /// Image sources for the search results, in response order.
    pub async fn search(&self) -> Result<Vec<ImageUrl>, ClientError> {
        let items = self.api.search().await?;
        Ok(items.into_iter().map(|item| item.base_url).collect())
    }

    pub fn select_files(&mut self, files: Vec<SelectedImage>) {
        info!(count = files.len(), "files selected");
        self.session.select_files(files);
    }

    /// `Err` is a validation rejection: nothing was sent.
    pub async fn upload(&mut self) -> Result<&ResultArea, SessionError> {
        let files = self.session.begin_upload()?;
        self.result = match self.api.upload(&files).await {
            Ok(urls) => {
                if self.session.complete_upload(urls) {
                    ResultArea::Success(feedback::UPLOAD_SUCCEEDED.to_string())
                } else {
                    ResultArea::Failure(feedback::UPLOAD_RETURNED_NOTHING.to_string())
                }
            }
            Err(err) => {
                warn!("upload failed: {err}");
                self.session.fail_upload();
                ResultArea::Failure(feedback::upload_failed(&err.user_message()))
            }
        };
        Ok(&self.result)
    }

    /// `Err` is a validation rejection: nothing was sent.
    pub async fn animate(&mut self) -> Result<&ResultArea, SessionError> {
        let images = self.session.begin_animate()?;
        self.result = match self.api.animate(&images).await {
            Ok(result) => {
                self.session.complete_animate(result.clone());
                ResultArea::AnimationReady(result)
            }
            Err(err) => {
                warn!("animate failed: {err}");
                self.session.fail_animate();
                ResultArea::Failure(feedback::animate_failed(&err.user_message()))
            }
        };
        Ok(&self.result)
    }

    /// Downloads the finished animation through the server's download route,
    /// falling back to the public animation URL.
    pub async fn download_animation(&self) -> Result<Option<(String, Vec<u8>)>, ClientError> {
        let Some(animation) = self.session.animation() else {
            return Ok(None);
        };
        let reference = animation
            .download_path
            .as_deref()
            .unwrap_or(animation.animation_url.as_str());
        let bytes = self.api.fetch_bytes(reference).await?;
        Ok(Some((animation.suggested_file_name(), bytes)))
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
