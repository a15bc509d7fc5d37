/// Colour matrix helpers for the filter pipeline
///
/// The matrix filters (saturate, hue-rotate, grayscale, sepia) are 3x3
/// transforms on sRGB components, using the coefficients from the W3C
/// Filter Effects definitions. Matrices are written row-major here and
/// converted to cgmath's column-major layout by `from_rows`.

use cgmath::{Matrix3, Vector3};

/// Luminance weights shared by saturate and hue-rotate
const LUMA: [f32; 3] = [0.213, 0.715, 0.072];

/// Rec. 709 luminance weights used by grayscale
const LUMA_709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Build a cgmath matrix from row-major rows
fn from_rows(r: [[f32; 3]; 3]) -> Matrix3<f32> {
    // cgmath::Matrix3::new takes columns
    Matrix3::new(
        r[0][0], r[1][0], r[2][0],
        r[0][1], r[1][1], r[2][1],
        r[0][2], r[1][2], r[2][2],
    )
}

/// `saturate(s)`: 0 = fully desaturated, 1 = unchanged, >1 oversaturated
pub fn saturate_matrix(s: f32) -> Matrix3<f32> {
    let [lr, lg, lb] = LUMA;
    from_rows([
        [lr + (1.0 - lr) * s, lg - lg * s, lb - lb * s],
        [lr - lr * s, lg + (1.0 - lg) * s, lb - lb * s],
        [lr - lr * s, lg - lg * s, lb + (1.0 - lb) * s],
    ])
}

/// `hue-rotate(θ)` with the angle in degrees
pub fn hue_rotate_matrix(degrees: f32) -> Matrix3<f32> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    from_rows([
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ])
}

/// `grayscale(a)` with `a` clamped to [0, 1]
pub fn grayscale_matrix(amount: f32) -> Matrix3<f32> {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    let [lr, lg, lb] = LUMA_709;
    from_rows([
        [lr + (1.0 - lr) * k, lg - lg * k, lb - lb * k],
        [lr - lr * k, lg + (1.0 - lg) * k, lb - lb * k],
        [lr - lr * k, lg - lg * k, lb + (1.0 - lb) * k],
    ])
}

/// `sepia(a)` with `a` clamped to [0, 1]
pub fn sepia_matrix(amount: f32) -> Matrix3<f32> {
    let k = 1.0 - amount.clamp(0.0, 1.0);
    from_rows([
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ])
}

/// Apply a colour matrix to one RGB triple (components in [0, 1])
pub fn apply_matrix(m: &Matrix3<f32>, rgb: [f32; 3]) -> [f32; 3] {
    let v = *m * Vector3::new(rgb[0], rgb[1], rgb[2]);
    [v.x, v.y, v.z]
}

/// Check if a colour matrix is the identity matrix (no conversion)
pub fn is_identity_matrix(m: &Matrix3<f32>) -> bool {
    const EPSILON: f32 = 0.001;

    for col in 0..3 {
        for row in 0..3 {
            let expected = if col == row { 1.0 } else { 0.0 };
            if (m[col][row] - expected).abs() >= EPSILON {
                return false;
            }
        }
    }
    true
}
