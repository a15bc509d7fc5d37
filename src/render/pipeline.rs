/// CPU filter pipeline
///
/// Applies a parsed filter list to an RGBA bitmap. Consecutive point-wise
/// filters are folded into one parallel pass over the pixels; blur breaks the
/// run because it needs its neighbours. Work happens in f32 so chained
/// filters do not band, and components are clamped after every filter.

use cgmath::Matrix3;
use image::{imageops, DynamicImage, Rgba32FImage, RgbaImage};
use rayon::prelude::*;

use super::parse::{parse_filter_list, FilterOp};
use crate::color;
use crate::error::EditorResult;

/// Below this sigma the Gaussian kernel is effectively the identity
const MIN_BLUR_SIGMA: f32 = 0.3;

/// A point-wise filter with its matrix precomputed
#[derive(Debug, Clone, Copy)]
enum Stage {
    /// `x * slope + intercept` on each colour component
    Linear { slope: f32, intercept: f32 },
    Matrix(Matrix3<f32>),
    Invert(f32),
}

impl Stage {
    fn from_op(op: FilterOp) -> Option<Stage> {
        let stage = match op {
            FilterOp::Brightness(b) => Stage::Linear { slope: b, intercept: 0.0 },
            FilterOp::Contrast(c) => Stage::Linear { slope: c, intercept: 0.5 - 0.5 * c },
            FilterOp::Saturate(s) => Stage::Matrix(color::saturate_matrix(s)),
            FilterOp::Grayscale(a) => Stage::Matrix(color::grayscale_matrix(a)),
            FilterOp::Sepia(a) => Stage::Matrix(color::sepia_matrix(a)),
            FilterOp::HueRotate(deg) => Stage::Matrix(color::hue_rotate_matrix(deg)),
            FilterOp::Invert(a) => Stage::Invert(a.clamp(0.0, 1.0)),
            FilterOp::Blur(_) => return None,
        };
        Some(stage)
    }

    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match *self {
            Stage::Linear { slope, intercept } => rgb.map(|x| x * slope + intercept),
            Stage::Matrix(ref m) => color::apply_matrix(m, rgb),
            Stage::Invert(a) => rgb.map(|x| x * (1.0 - a) + (1.0 - x) * a),
        };
        out.map(|x| x.clamp(0.0, 1.0))
    }
}

/// Parse `filter` and render `source` through it
///
/// `scale` is the ratio of `source` to the image the filter values were
/// chosen for; it keeps blur radii visually consistent between the scaled
/// preview and the full-resolution export.
pub fn render(source: &RgbaImage, filter: &str, scale: f32) -> EditorResult<RgbaImage> {
    let ops: Vec<FilterOp> = parse_filter_list(filter)?
        .into_iter()
        .map(|op| op.scaled(scale))
        .collect();
    Ok(apply_filters(source, &ops))
}

/// Apply `ops` left to right, returning a new bitmap
pub fn apply_filters(source: &RgbaImage, ops: &[FilterOp]) -> RgbaImage {
    let active: Vec<FilterOp> = ops.iter().copied().filter(|op| !op.is_noop()).collect();
    if active.is_empty() {
        return source.clone();
    }

    let mut buf = DynamicImage::ImageRgba8(source.clone()).into_rgba32f();
    let mut run: Vec<Stage> = Vec::new();

    for op in active {
        match (Stage::from_op(op), op) {
            (Some(Stage::Matrix(m)), _) if color::is_identity_matrix(&m) => {}
            (Some(stage), _) => run.push(stage),
            (None, FilterOp::Blur(sigma)) if sigma < MIN_BLUR_SIGMA => {
                tracing::trace!(filter = %op.id(), sigma, "skipping sub-pixel blur");
            }
            (None, FilterOp::Blur(sigma)) => {
                apply_stages(&mut buf, &run);
                run.clear();
                buf = blur_premultiplied(&buf, sigma);
            }
            (None, _) => {}
        }
    }
    apply_stages(&mut buf, &run);

    DynamicImage::ImageRgba32F(buf).into_rgba8()
}

/// One parallel pass running every stage on each pixel
fn apply_stages(buf: &mut Rgba32FImage, stages: &[Stage]) {
    if stages.is_empty() {
        return;
    }
    let raw: &mut [f32] = buf;
    raw.par_chunks_mut(4).for_each(|px| {
        let mut rgb = [px[0], px[1], px[2]];
        for stage in stages {
            rgb = stage.apply(rgb);
        }
        px[..3].copy_from_slice(&rgb);
    });
}

/// Gaussian blur on premultiplied colour so transparent pixels do not bleed
///
/// Pixels outside the image count as transparent, so edges fade out the way
/// a canvas blur does instead of smearing the border pixels outward.
fn blur_premultiplied(buf: &Rgba32FImage, sigma: f32) -> Rgba32FImage {
    let (width, height) = buf.dimensions();
    let pad = (sigma * 3.0).ceil() as u32;

    let mut padded = Rgba32FImage::new(width + 2 * pad, height + 2 * pad);
    imageops::replace(&mut padded, buf, pad as i64, pad as i64);
    {
        let raw: &mut [f32] = &mut padded;
        raw.par_chunks_mut(4).for_each(|px| {
            let a = px[3];
            px[0] *= a;
            px[1] *= a;
            px[2] *= a;
        });
    }

    let blurred = imageops::blur(&padded, sigma);
    let mut out = imageops::crop_imm(&blurred, pad, pad, width, height).to_image();
    let raw: &mut [f32] = &mut out;
    raw.par_chunks_mut(4).for_each(|px| {
        let a = px[3];
        if a > 0.0 {
            px[0] = (px[0] / a).clamp(0.0, 1.0);
            px[1] = (px[1] / a).clamp(0.0, 1.0);
            px[2] = (px[2] / a).clamp(0.0, 1.0);
        }
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn test_initial_filters_leave_pixels_untouched() {
        let src = solid(4, 3, [10, 120, 250, 255]);
        let out = render(&src, &crate::state::filters::FilterState::initial().compose(), 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_brightness_scales_components() {
        let src = solid(2, 2, [100, 50, 200, 255]);
        let out = render(&src, "brightness(150%)", 1.0).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [150, 75, 255, 255]);
    }

    #[test]
    fn test_zero_contrast_is_mid_grey() {
        let src = solid(2, 2, [0, 255, 30, 255]);
        let out = render(&src, "contrast(0%)", 1.0).unwrap();
        let [r, g, b, a] = out.get_pixel(1, 1).0;
        for c in [r, g, b] {
            assert!((127..=128).contains(&c));
        }
        assert_eq!(a, 255);
    }

    #[test]
    fn test_full_invert() {
        let src = solid(1, 1, [0, 100, 255, 128]);
        let out = render(&src, "invert(100%)", 1.0).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [255, 155, 0, 128]);
    }

    #[test]
    fn test_order_matters() {
        let src = solid(1, 1, [200, 200, 200, 255]);
        let a = render(&src, "brightness(200%) invert(100%)", 1.0).unwrap();
        let b = render(&src, "invert(100%) brightness(200%)", 1.0).unwrap();
        assert_eq!(a.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(b.get_pixel(0, 0).0, [110, 110, 110, 255]);
    }

    #[test]
    fn test_blur_keeps_solid_colour_and_size() {
        let src = solid(16, 9, [40, 80, 160, 255]);
        let out = render(&src, "blur(3px)", 1.0).unwrap();
        assert_eq!(out.dimensions(), (16, 9));
        let [r, g, b, _] = out.get_pixel(8, 4).0;
        assert!(r.abs_diff(40) <= 1 && g.abs_diff(80) <= 1 && b.abs_diff(160) <= 1);
    }

    #[test]
    fn test_sub_pixel_blur_on_one_pixel_tall_image() {
        // A 25600x1 strip previews at 1280x1, shrinking blur(1px) to 0.05
        let src = solid(1280, 1, [40, 80, 160, 255]);
        let out = apply_filters(&src, &[FilterOp::Blur(0.05)]);
        assert_eq!(out, src);

        let tiny = solid(1, 1, [40, 80, 160, 255]);
        let out = render(&tiny, "blur(1px)", 0.01).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [40, 80, 160, 255]);
    }

    #[test]
    fn test_blur_on_one_pixel_tall_image_keeps_colour() {
        let src = solid(64, 1, [40, 80, 160, 255]);
        let out = render(&src, "blur(1px)", 1.0).unwrap();
        assert_eq!(out.dimensions(), (64, 1));

        let [r, g, b, a] = out.get_pixel(32, 0).0;
        assert!(a > 0);
        assert!(r.abs_diff(40) <= 1 && g.abs_diff(80) <= 1 && b.abs_diff(160) <= 1);
    }

    #[test]
    fn test_blur_fades_edges_to_transparent() {
        let src = solid(40, 40, [255, 255, 255, 255]);
        let out = render(&src, "blur(5px)", 1.0).unwrap();

        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert!(a < 200, "corner alpha {} should fade", a);
        assert!(r >= 254 && g >= 254 && b >= 254);
        assert!(out.get_pixel(20, 20).0[3] >= 254);
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let src = solid(1, 1, [0, 0, 0, 255]);
        assert!(render(&src, "brightness(lots)", 1.0).is_err());
    }
}
