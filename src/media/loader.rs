/// Picked-file decoder
///
/// Decodes the user's file into full-resolution RGBA pixels plus the working
/// preview. Decoding is CPU-bound, so it runs on tokio's blocking pool and the
/// UI only sees the finished result.

use image::ImageReader;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;

use super::preview::working_preview;
use crate::error::{EditorError, EditorResult};
use crate::state::data::{DecodedImage, SelectedFileMeta};

/// Extensions offered by the file picker
pub const SUPPORTED_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff", "ico",
];

/// Decode an image file
///
/// # Arguments
/// * `path` - File chosen by the user
/// * `preview_max_edge` - Longest edge of the working preview
pub async fn decode_image(path: PathBuf, preview_max_edge: u32) -> EditorResult<DecodedImage> {
    // Spawn blocking because decoding is CPU-intensive
    task::spawn_blocking(move || decode_image_blocking(path, preview_max_edge)).await?
}

/// Blocking implementation of image decoding
pub fn decode_image_blocking(path: PathBuf, preview_max_edge: u32) -> EditorResult<DecodedImage> {
    let meta = SelectedFileMeta::from_path(path);
    let decode_err = |message: String| EditorError::Decode {
        filename: meta.filename.clone(),
        message,
    };

    // Sniff the format from content so a misnamed file still opens
    let reader = ImageReader::open(&meta.path)
        .map_err(|e| EditorError::io(&meta.path, e))?
        .with_guessed_format()
        .map_err(|e| EditorError::io(&meta.path, e))?;

    let decoded = reader.decode().map_err(|e| decode_err(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(decode_err("image has no pixels".to_string()));
    }

    let source = decoded.into_rgba8();
    let working = working_preview(&source, preview_max_edge);

    tracing::info!(
        file = %meta.filename,
        width = source.width(),
        height = source.height(),
        preview_width = working.width(),
        preview_height = working.height(),
        "decoded image"
    );

    Ok(DecodedImage {
        meta,
        source: Arc::new(source),
        working: Arc::new(working),
    })
}
