/// Working preview generation
///
/// The live preview is rendered from a downscaled copy of the image so slider
/// changes stay interactive on large photos. The export always uses the
/// full-resolution source.

use image::{imageops::FilterType, RgbaImage};

/// Downscale `source` so neither side exceeds `max_edge`
///
/// Images that already fit are returned unchanged.
pub fn working_preview(source: &RgbaImage, max_edge: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    if width <= max_edge && height <= max_edge {
        return source.clone();
    }

    let (target_w, target_h) = fit_within(width, height, max_edge);
    image::imageops::resize(source, target_w, target_h, FilterType::Lanczos3)
}

/// Largest size with the same aspect ratio that fits in a `max_edge` square
fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let scale = max_edge as f64 / width.max(height) as f64;
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_edge);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_edge);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_images_are_not_resized() {
        let src = RgbaImage::new(800, 600);
        assert_eq!(working_preview(&src, 1280).dimensions(), (800, 600));
    }

    #[test]
    fn test_large_images_keep_aspect_ratio() {
        let src = RgbaImage::new(4000, 3000);
        assert_eq!(working_preview(&src, 1280).dimensions(), (1280, 960));

        let tall = RgbaImage::new(100, 5000);
        assert_eq!(working_preview(&tall, 1000).dimensions(), (20, 1000));
    }

    #[test]
    fn test_extreme_ratio_never_hits_zero() {
        assert_eq!(fit_within(10_000, 1, 100), (100, 1));
    }
}
