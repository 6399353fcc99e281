use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! url_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

url_newtype!(ImageUrl);
url_newtype!(AnimationUrl);

/// Image URLs returned by a successful upload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImages(Vec<ImageUrl>);

impl UploadedImages {
    pub fn new(urls: Vec<ImageUrl>) -> Option<Self> {
        if urls.is_empty() {
            None
        } else {
            Some(Self(urls))
        }
    }

    pub fn urls(&self) -> &[ImageUrl] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<ImageUrl> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationResult {
    pub animation_url: AnimationUrl,
    /// Server-relative path such as `/download/<name>.gif`.
    pub download_path: Option<String>,
}

impl AnimationResult {
    /// File name to suggest when saving the animation locally.
    pub fn suggested_file_name(&self) -> String {
        self.download_path
            .as_deref()
            .unwrap_or(self.animation_url.as_str())
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("animation.gif")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploaded_images_rejects_empty_list() {
        assert!(UploadedImages::new(Vec::new()).is_none());
        let uploaded = UploadedImages::new(vec!["a".into(), "b".into()]).expect("non-empty");
        assert_eq!(uploaded.len(), 2);
        assert_eq!(uploaded.urls()[1].as_str(), "b");
    }

    #[test]
    fn suggests_file_name_from_download_path_then_animation_url() {
        let with_download = AnimationResult {
            animation_url: "https://storage.example/bucket/x.gif".into(),
            download_path: Some("/download/abc.gif".to_string()),
        };
        assert_eq!(with_download.suggested_file_name(), "abc.gif");

        let without_download = AnimationResult {
            animation_url: "https://storage.example/bucket/x.gif".into(),
            download_path: None,
        };
        assert_eq!(without_download.suggested_file_name(), "x.gif");
    }
}
