use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};

/// Decodes screenshots into RGBA buffers sized for display.
///
/// Tiles hold the returned buffer only while they are visible, so a loader
/// must not keep its own copy.
pub trait ThumbnailLoader {
    /// Decodes `path` scaled down to fit inside `max_width` x `max_height`,
    /// keeping its aspect ratio. Images that already fit are not upscaled.
    fn load(&self, path: &Path, max_width: u32, max_height: u32) -> Result<RgbaImage>;
}

/// Loader backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecodingLoader;

impl ThumbnailLoader for DecodingLoader {
    fn load(&self, path: &Path, max_width: u32, max_height: u32) -> Result<RgbaImage> {
        let image = open_image(path)?;
        Ok(fit_within(image, max_width, max_height).to_rgba8())
    }
}

pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read image: {:?}", path))?;

    match image::guess_format(&bytes).ok() {
        Some(fmt) => image::load_from_memory_with_format(&bytes, fmt)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
        None => image::load_from_memory(&bytes)
            .with_context(|| format!("Failed to decode image: {:?}", path)),
    }
}

fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);
    if image.width() <= max_width && image.height() <= max_height {
        return image;
    }
    image.thumbnail(max_width, max_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_scales_down_keeping_aspect() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbaImage::new(40, 20).save(&path).unwrap();

        let thumb = DecodingLoader.load(&path, 10, 10).unwrap();
        assert_eq!(thumb.width(), 10);
        assert_eq!(thumb.height(), 5);
    }

    #[test]
    fn test_load_does_not_upscale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbaImage::new(8, 6).save(&path).unwrap();

        let thumb = DecodingLoader.load(&path, 100, 100).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (8, 6));
    }

    #[test]
    fn test_load_errors_on_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(DecodingLoader.load(&path, 10, 10).is_err());
        assert!(DecodingLoader.load(&dir.path().join("missing.png"), 10, 10).is_err());
    }
}
