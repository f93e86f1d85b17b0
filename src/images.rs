use crate::ebook::Ebook;
use crate::error::ImageDecodeError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};

/// Every embedded image is shown at this size regardless of its aspect ratio.
pub const DISPLAY_WIDTH: u32 = 800;
pub const DISPLAY_HEIGHT: u32 = 600;

#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Path inside the archive the bytes were read from.
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

/// Resolve an `src` attribute against the archive path of the chapter that
/// references it.
pub fn resolve_image_path(chapter_path: &str, src: &str) -> String {
    let src = src.split(['#', '?']).next().unwrap_or("");

    let mut parts: Vec<&str> = Vec::new();
    let relative = if let Some(rooted) = src.strip_prefix('/') {
        rooted
    } else {
        if let Some((dir, _file)) = chapter_path.rsplit_once('/') {
            parts.extend(dir.split('/').filter(|p| !p.is_empty()));
        }
        src
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    parts.join("/")
}

/// Decode `bytes` and scale to the fixed display size.
pub fn decode_and_scale(path: &str, bytes: &[u8]) -> Result<RenderedImage, ImageDecodeError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| ImageDecodeError::Decode {
        path: path.to_string(),
        source,
    })?;
    let pixels = imageops::resize(
        &decoded.to_rgba8(),
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        FilterType::Triangle,
    );

    Ok(RenderedImage {
        path: path.to_string(),
        width: pixels.width(),
        height: pixels.height(),
        pixels,
    })
}

/// Locate an image referenced from a chapter and prepare it for display.
///
/// The path is tried relative to the chapter first, then exactly as written.
pub fn load_image(
    book: &mut dyn Ebook,
    chapter_path: &str,
    src: &str,
) -> Result<RenderedImage, ImageDecodeError> {
    let resolved = resolve_image_path(chapter_path, src);
    let (path, bytes) = match book.resource_bytes(&resolved) {
        Some(bytes) => (resolved, bytes),
        None => {
            let raw = src.trim_start_matches('/').to_string();
            match book.resource_bytes(&raw) {
                Some(bytes) => (raw, bytes),
                None => return Err(ImageDecodeError::Missing(src.to_string())),
            }
        }
    };

    decode_and_scale(&path, &bytes)
}

/// Save the scaled pixels as `bookleaf_img_<name>.png` inside `dir` so an
/// external viewer can open them.
pub fn write_png(image: &RenderedImage, dir: &Path) -> Result<PathBuf, ImageDecodeError> {
    let name = Path::new(&image.path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("image");
    let target = dir.join(format!("bookleaf_img_{name}.png"));

    image
        .pixels
        .save_with_format(&target, ImageFormat::Png)
        .map_err(|source| ImageDecodeError::Write {
            path: target.display().to_string(),
            source,
        })?;
    Ok(target)
}
