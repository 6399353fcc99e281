//! Image decoding for local previews and search thumbnails.

use std::path::Path;

use image::GenericImageView;

/// Previews fit inside a square of this many pixels.
pub const PREVIEW_MAX_DIMENSION: u32 = 240;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }
}

impl std::fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let (orig_w, orig_h) = dynamic.dimensions();
    let resized = if orig_w.max(orig_h) > PREVIEW_MAX_DIMENSION {
        dynamic.thumbnail(PREVIEW_MAX_DIMENSION, PREVIEW_MAX_DIMENSION)
    } else {
        dynamic
    }
    .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// Reads and decodes a local file. No network access.
pub fn load_local_preview(path: &Path) -> Result<PreviewImage, String> {
    let bytes = std::fs::read(path).map_err(|err| format!("could not read file: {err}"))?;
    decode_preview_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn large_images_are_scaled_into_preview_box() {
        let preview = decode_preview_image(&png_bytes(960, 480)).expect("decode");
        assert_eq!(preview.size(), [240, 120]);
        assert_eq!(preview.rgba.len(), 240 * 120 * 4);
    }

    #[test]
    fn small_images_keep_their_size() {
        let preview = decode_preview_image(&png_bytes(32, 16)).expect("decode");
        assert_eq!(preview.size(), [32, 16]);
    }

    #[test]
    fn undecodable_bytes_are_reported() {
        assert!(decode_preview_image(b"definitely not an image").is_err());
    }

    #[test]
    fn missing_local_file_is_reported() {
        let err = load_local_preview(Path::new("/no/such/frame.png")).expect_err("must fail");
        assert!(err.contains("could not read file"));
    }
}
