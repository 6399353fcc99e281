use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::{AnimationResult, ImageUrl, UploadedImages},
    error::{ApiError, ApiException},
    protocol::{AnimateRequest, AnimateResponse, SearchItem, UploadResponse},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod session;
pub mod types;

pub use controller::AnimatorController;
pub use error::ClientError;
pub use feedback::ResultArea;
pub use session::{AnimatorSession, SessionError, SessionPhase};
pub use types::SelectedImage;

/// Multipart field name the backend reads uploaded files from.
pub const UPLOAD_FIELD: &str = "images";

const SEARCH_PATH: &str = "search";
const UPLOAD_PATH: &str = "upload";
const ANIMATE_PATH: &str = "animate";
const LOGIN_PATH: &str = "login";

/// The HTTP surface of the animation backend.
#[async_trait]
pub trait AnimatorApi: Send + Sync {
    async fn search(&self) -> Result<Vec<SearchItem>, ClientError>;
    /// Uploads every file as one multipart request and returns the stored image URLs.
    async fn upload(&self, files: &[SelectedImage]) -> Result<Vec<ImageUrl>, ClientError>;
    async fn animate(&self, images: &UploadedImages) -> Result<AnimationResult, ClientError>;
    /// Fetches raw bytes from an absolute URL or a server-relative path.
    async fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>, ClientError>;
    /// Where the browser should be sent to sign in. No request is made.
    fn login_url(&self) -> Url;
}

pub struct AnimatorClient {
    http: Client,
    base_url: Url,
    login_url: Url,
}

impl AnimatorClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(Client::new(), server_url)
    }

    pub fn with_http_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let base_url = parse_base_url(server_url)?;
        let login_url = join(&base_url, LOGIN_PATH)?;
        Ok(Self {
            http,
            base_url,
            login_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        join(&self.base_url, path)
    }
}

#[async_trait]
impl AnimatorApi for AnimatorClient {
    async fn search(&self) -> Result<Vec<SearchItem>, ClientError> {
        let response = self.http.get(self.endpoint(SEARCH_PATH)?).send().await?;
        let items: Vec<SearchItem> = check_status(response).await?.json().await?;
        info!(count = items.len(), "search returned items");
        Ok(items)
    }

    async fn upload(&self, files: &[SelectedImage]) -> Result<Vec<ImageUrl>, ClientError> {
        let mut form = Form::new();
        for file in files {
            let bytes = tokio::fs::read(&file.path)
                .await
                .map_err(|source| ClientError::ReadFile {
                    path: file.path.clone(),
                    source,
                })?;
            debug!(file = %file.filename, size = bytes.len(), "adding upload part");
            let mut part = Part::bytes(bytes).file_name(file.filename.clone());
            if let Some(mime_type) = &file.mime_type {
                part = part.mime_str(mime_type)?;
            }
            form = form.part(UPLOAD_FIELD, part);
        }

        let response = self
            .http
            .post(self.endpoint(UPLOAD_PATH)?)
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = check_status(response).await?.json().await?;
        info!(
            files = files.len(),
            urls = body.image_urls.len(),
            "upload completed"
        );
        Ok(body.image_urls)
    }

    async fn animate(&self, images: &UploadedImages) -> Result<AnimationResult, ClientError> {
        let response = self
            .http
            .post(self.endpoint(ANIMATE_PATH)?)
            .json(&AnimateRequest {
                image_urls: images.urls().to_vec(),
            })
            .send()
            .await?;
        let body: AnimateResponse = check_status(response).await?.json().await?;
        info!(animation_url = %body.animation_url, "animation created");
        Ok(body.into())
    }

    async fn fetch_bytes(&self, reference: &str) -> Result<Vec<u8>, ClientError> {
        let url = join(&self.base_url, reference)?;
        let response = self.http.get(url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn login_url(&self) -> Url {
        self.login_url.clone()
    }
}

/// Parses the configured server URL so relative endpoint joins keep any path prefix.
pub fn parse_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| ClientError::InvalidServerUrl {
        url: server_url.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::UnsupportedServerUrl(server_url.to_string()));
    }
    Ok(url)
}

/// Login navigation target for a server URL, without building a client.
pub fn login_url_for(server_url: &str) -> Result<Url, ClientError> {
    join(&parse_base_url(server_url)?, LOGIN_PATH)
}

fn join(base: &Url, reference: &str) -> Result<Url, ClientError> {
    base.join(reference)
        .map_err(|source| ClientError::InvalidServerUrl {
            url: reference.to_string(),
            source,
        })
}

async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            warn!(%status, "failed to read error body: {err}");
            String::new()
        }
    };
    let message = ApiError::message_from_body(&body).unwrap_or_else(|| status.to_string());
    warn!(%status, %message, "backend rejected request");
    Err(ApiException::new(status.as_u16(), message).into())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
