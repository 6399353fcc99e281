use std::path::{Path, PathBuf};

/// Extensions the backend accepts for uploads.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: Option<String>,
}

impl SelectedImage {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image.bin")
            .to_string();
        let mime_type = mime_guess::from_path(&path).first_raw().map(str::to_string);
        Self {
            path,
            filename,
            mime_type,
        }
    }

    pub fn from_paths<I, P>(paths: I) -> Vec<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().map(Self::from_path).collect()
    }
}

pub fn is_image_filename(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_file_name_and_mime_type_from_path() {
        let image = SelectedImage::from_path("/tmp/frames/cat-01.PNG");
        assert_eq!(image.filename, "cat-01.PNG");
        assert_eq!(image.mime_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn unknown_extension_has_no_mime_type() {
        let image = SelectedImage::from_path("notes.zzz-unknown");
        assert_eq!(image.filename, "notes.zzz-unknown");
        assert!(image.mime_type.is_none());
    }

    #[test]
    fn recognizes_accepted_image_extensions() {
        assert!(is_image_filename(Path::new("a.jpeg")));
        assert!(is_image_filename(Path::new("b.GIF")));
        assert!(!is_image_filename(Path::new("c.webp")));
        assert!(!is_image_filename(Path::new("README")));
    }
}
