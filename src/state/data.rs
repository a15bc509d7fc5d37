/// Shared data structures for the editor state
///
/// These structs describe the single image the editor works on and where it
/// came from. They flow from the decode task into the controller.

use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// The file the user picked
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFileMeta {
    /// Filename only (e.g., "photo.jpg"); drives the export name
    pub filename: String,
    /// Full path to the picked file
    pub path: PathBuf,
}

impl SelectedFileMeta {
    pub fn from_path(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self { filename, path }
    }
}

/// Output of the background decode task
#[derive(Clone)]
pub struct DecodedImage {
    pub meta: SelectedFileMeta,
    /// Full-resolution pixels
    pub source: Arc<RgbaImage>,
    /// Display-sized copy the live preview is rendered from
    pub working: Arc<RgbaImage>,
}

/// The currently loaded image
///
/// Owns the decoded pixels. Dropping it releases them; the editor never
/// holds more than one.
#[derive(Clone)]
pub struct LoadedImage {
    /// Original pixel width
    pub width: u32,
    /// Original pixel height
    pub height: u32,
    pub source: Arc<RgbaImage>,
    pub working: Arc<RgbaImage>,
}

impl LoadedImage {
    pub fn new(source: Arc<RgbaImage>, working: Arc<RgbaImage>) -> Self {
        Self {
            width: source.width(),
            height: source.height(),
            source,
            working,
        }
    }

    /// Ratio of the working preview to the original (1.0 when not scaled)
    pub fn preview_scale(&self) -> f32 {
        if self.width == 0 {
            return 1.0;
        }
        self.working.width() as f32 / self.width as f32
    }
}

/// Image lifecycle as seen by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLifecycle {
    NoImage,
    /// A decode is in flight; a previously loaded image stays visible
    Loading,
    Loaded,
}

// Implement Debug by hand so pixel buffers are not dumped into logs
impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("meta", &self.meta)
            .field("source", &self.source.dimensions())
            .field("working", &self.working.dimensions())
            .finish()
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("working", &self.working.dimensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_from_path() {
        let meta = SelectedFileMeta::from_path(PathBuf::from("/tmp/shots/photo.jpg"));
        assert_eq!(meta.filename, "photo.jpg");
    }

    #[test]
    fn test_preview_scale() {
        let source = Arc::new(RgbaImage::new(800, 600));
        let working = Arc::new(RgbaImage::new(400, 300));
        let loaded = LoadedImage::new(source, working);
        assert_eq!((loaded.width, loaded.height), (800, 600));
        assert_eq!(loaded.preview_scale(), 0.5);
    }
}
