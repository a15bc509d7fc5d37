/// Filtered image export
///
/// Renders the full-resolution image through the current filter string,
/// encodes it as WebP and writes `<base>_filtered.webp` into the export
/// directory.

use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

use crate::error::{EditorError, EditorResult};
use crate::render;

/// Suffix appended to the original base name
pub const EXPORT_SUFFIX: &str = "_filtered";
pub const EXPORT_EXTENSION: &str = "webp";

/// Snapshot of everything an export needs
///
/// Taken when the user clicks export, so edits made while encoding do not
/// leak into the file.
#[derive(Clone)]
pub struct ExportJob {
    /// Full-resolution source pixels
    pub source: Arc<RgbaImage>,
    /// Composed filter string, e.g. `brightness(150%) contrast(100%)`
    pub filter: String,
    /// Output filename, e.g. `photo_filtered.webp`
    pub filename: String,
}

impl std::fmt::Debug for ExportJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportJob")
            .field("source", &self.source.dimensions())
            .field("filter", &self.filter)
            .field("filename", &self.filename)
            .finish()
    }
}

/// Derive the export filename from the picked file's name
///
/// The last extension is stripped: `photo.jpg` -> `photo_filtered.webp`,
/// `archive.tar.gz` -> `archive.tar_filtered.webp`.
pub fn export_filename(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    format!("{}{}.{}", stem, EXPORT_SUFFIX, EXPORT_EXTENSION)
}

/// Render the job at original resolution with its filters baked in
pub fn render_export(job: &ExportJob) -> EditorResult<RgbaImage> {
    render::render(&job.source, &job.filter, 1.0)
}

/// Encode RGBA pixels as WebP
///
/// The `image` crate's WebP encoder is lossless, which is the maximum
/// quality the format offers.
pub fn encode_webp(image: &RgbaImage) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    WebPEncoder::new_lossless(&mut bytes)
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EditorError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Run an export job and return the written path
pub async fn run_export(job: ExportJob, export_dir: PathBuf) -> EditorResult<PathBuf> {
    let filename = job.filename.clone();

    // Rendering and encoding are CPU-bound
    let bytes = task::spawn_blocking(move || {
        let rendered = render_export(&job)?;
        encode_webp(&rendered)
    })
    .await??;

    tokio::fs::create_dir_all(&export_dir)
        .await
        .map_err(|e| EditorError::io(&export_dir, e))?;

    let path = export_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| EditorError::io(&path, e))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "exported image");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("photo.jpg"), "photo_filtered.webp");
        assert_eq!(export_filename("archive.tar.gz"), "archive.tar_filtered.webp");
        assert_eq!(export_filename("noext"), "noext_filtered.webp");
        assert_eq!(export_filename(".hidden"), ".hidden_filtered.webp");
        assert_eq!(export_filename(""), "image_filtered.webp");
    }

    #[tokio::test]
    async fn test_export_writes_original_size_webp() {
        let dir = tempfile::tempdir().unwrap();
        let job = ExportJob {
            source: Arc::new(RgbaImage::from_pixel(80, 60, Rgba([100, 100, 100, 255]))),
            filter: "brightness(150%)".to_string(),
            filename: export_filename("photo.jpg"),
        };

        let path = run_export(job, dir.path().join("out")).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "photo_filtered.webp");

        let written = image::open(&path).unwrap().into_rgba8();
        assert_eq!(written.dimensions(), (80, 60));
        // Lossless, so the baked-in brightness survives exactly
        assert_eq!(written.get_pixel(10, 10).0, [150, 150, 150, 255]);
    }

    #[test]
    fn test_bad_filter_fails_before_encoding() {
        let job = ExportJob {
            source: Arc::new(RgbaImage::new(2, 2)),
            filter: "glow(5)".to_string(),
            filename: "x_filtered.webp".to_string(),
        };
        assert!(matches!(render_export(&job), Err(EditorError::FilterSyntax { .. })));
    }
}
