/// Parser for composed filter strings
///
/// Accepts the same shape the editor composes, a whitespace-separated list of
/// filter functions such as `brightness(150%) hue-rotate(90deg) blur(2px)`,
/// and turns it into typed operations. `none` and the empty string both mean
/// "no filters".

use crate::error::{EditorError, EditorResult};
use crate::state::filters::FilterId;

/// One parsed filter function with its value normalised
///
/// Amount filters hold a ratio (`150%` -> 1.5), hue-rotate holds degrees and
/// blur holds the standard deviation in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Grayscale(f32),
    Sepia(f32),
    Invert(f32),
    HueRotate(f32),
    Blur(f32),
}

impl FilterOp {
    pub fn id(&self) -> FilterId {
        match self {
            FilterOp::Brightness(_) => FilterId::Brightness,
            FilterOp::Contrast(_) => FilterId::Contrast,
            FilterOp::Saturate(_) => FilterId::Saturate,
            FilterOp::Grayscale(_) => FilterId::Grayscale,
            FilterOp::Sepia(_) => FilterId::Sepia,
            FilterOp::Invert(_) => FilterId::Invert,
            FilterOp::HueRotate(_) => FilterId::HueRotate,
            FilterOp::Blur(_) => FilterId::Blur,
        }
    }

    /// True when applying this op leaves every pixel unchanged
    pub fn is_noop(&self) -> bool {
        match *self {
            FilterOp::Brightness(v) | FilterOp::Contrast(v) | FilterOp::Saturate(v) => v == 1.0,
            FilterOp::Grayscale(v) | FilterOp::Sepia(v) | FilterOp::Invert(v) => v <= 0.0,
            FilterOp::HueRotate(deg) => deg.rem_euclid(360.0) == 0.0,
            FilterOp::Blur(px) => px <= 0.0,
        }
    }

    /// Blur is the only op whose strength depends on resolution
    pub fn scaled(self, factor: f32) -> FilterOp {
        match self {
            FilterOp::Blur(px) => FilterOp::Blur(px * factor),
            other => other,
        }
    }
}

/// Parse a composed filter string into operations, in order
pub fn parse_filter_list(input: &str) -> EditorResult<Vec<FilterOp>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == "none" {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut rest = trimmed;

    while !rest.is_empty() {
        let open = rest
            .find('(')
            .ok_or_else(|| EditorError::syntax(input, format!("expected '(' after \"{}\"", rest)))?;
        let name = rest[..open].trim();
        let id = FilterId::from_name(name)
            .ok_or_else(|| EditorError::syntax(input, format!("unknown filter \"{}\"", name)))?;

        let close = rest[open..]
            .find(')')
            .map(|p| open + p)
            .ok_or_else(|| EditorError::syntax(input, format!("unclosed \"{}(\"", name)))?;
        let arg = rest[open + 1..close].trim();

        ops.push(parse_op(input, id, arg)?);
        rest = rest[close + 1..].trim_start();
    }

    Ok(ops)
}

fn parse_op(input: &str, id: FilterId, arg: &str) -> EditorResult<FilterOp> {
    // An omitted argument takes the function's default
    if arg.is_empty() {
        return Ok(match id {
            FilterId::Brightness => FilterOp::Brightness(1.0),
            FilterId::Contrast => FilterOp::Contrast(1.0),
            FilterId::Saturate => FilterOp::Saturate(1.0),
            FilterId::Grayscale => FilterOp::Grayscale(1.0),
            FilterId::Sepia => FilterOp::Sepia(1.0),
            FilterId::Invert => FilterOp::Invert(1.0),
            FilterId::HueRotate => FilterOp::HueRotate(0.0),
            FilterId::Blur => FilterOp::Blur(0.0),
        });
    }

    let (number, unit) = split_number(arg);
    let value: f32 = number
        .parse()
        .ok()
        .filter(|v: &f32| v.is_finite())
        .ok_or_else(|| EditorError::syntax(input, format!("bad number in {}({})", id, arg)))?;

    let bad_unit = || EditorError::syntax(input, format!("unsupported unit \"{}\" for {}", unit, id));

    match id {
        FilterId::HueRotate => {
            let degrees = match unit {
                "deg" => value,
                "rad" => value.to_degrees(),
                "turn" => value * 360.0,
                "grad" => value * 0.9,
                "" if value == 0.0 => 0.0,
                _ => return Err(bad_unit()),
            };
            Ok(FilterOp::HueRotate(degrees))
        }
        FilterId::Blur => {
            let px = match unit {
                "px" => value,
                "" if value == 0.0 => 0.0,
                _ => return Err(bad_unit()),
            };
            if px < 0.0 {
                return Err(EditorError::syntax(input, "blur radius must not be negative"));
            }
            Ok(FilterOp::Blur(px))
        }
        _ => {
            let ratio = match unit {
                "%" => value / 100.0,
                "" => value,
                _ => return Err(bad_unit()),
            };
            if ratio < 0.0 {
                return Err(EditorError::syntax(input, format!("{} must not be negative", id)));
            }
            Ok(match id {
                FilterId::Brightness => FilterOp::Brightness(ratio),
                FilterId::Contrast => FilterOp::Contrast(ratio),
                FilterId::Saturate => FilterOp::Saturate(ratio),
                FilterId::Grayscale => FilterOp::Grayscale(ratio),
                FilterId::Sepia => FilterOp::Sepia(ratio),
                _ => FilterOp::Invert(ratio),
            })
        }
    }
}

/// Split `"150%"` into `("150", "%")`
fn split_number(arg: &str) -> (&str, &str) {
    let end = arg
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(arg.len());
    (&arg[..end], arg[end..].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::filters::FilterState;

    #[test]
    fn test_empty_and_none() {
        assert!(parse_filter_list("").unwrap().is_empty());
        assert!(parse_filter_list("   ").unwrap().is_empty());
        assert!(parse_filter_list("none").unwrap().is_empty());
    }

    #[test]
    fn test_units_are_normalised() {
        let ops = parse_filter_list("brightness(150%) contrast(0.5) hue-rotate(0.5turn) blur(2px)").unwrap();
        assert_eq!(
            ops,
            vec![
                FilterOp::Brightness(1.5),
                FilterOp::Contrast(0.5),
                FilterOp::HueRotate(180.0),
                FilterOp::Blur(2.0),
            ]
        );
    }

    #[test]
    fn test_composed_state_parses_in_order() {
        let mut state = FilterState::initial();
        state.set(FilterId::Sepia, 40.0);
        let ops = parse_filter_list(&state.compose()).unwrap();

        let ids: Vec<FilterId> = ops.iter().map(|op| op.id()).collect();
        assert_eq!(ids, FilterId::ALL.to_vec());
        assert_eq!(ops[FilterId::Sepia.index()], FilterOp::Sepia(0.4));
        assert_eq!(ops.iter().filter(|op| !op.is_noop()).count(), 1);
    }

    #[test]
    fn test_default_arguments() {
        assert_eq!(parse_filter_list("grayscale()").unwrap(), vec![FilterOp::Grayscale(1.0)]);
        assert_eq!(parse_filter_list("hue-rotate(0)").unwrap(), vec![FilterOp::HueRotate(0.0)]);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(parse_filter_list("opacity(50%)").is_err());
        assert!(parse_filter_list("brightness(abc)").is_err());
        assert!(parse_filter_list("brightness(50%").is_err());
        assert!(parse_filter_list("blur(3deg)").is_err());
        assert!(parse_filter_list("blur(-1px)").is_err());
        assert!(parse_filter_list("hue-rotate(30)").is_err());
        assert!(parse_filter_list("contrast(-20%)").is_err());
    }

    #[test]
    fn test_blur_scales_with_resolution() {
        assert_eq!(FilterOp::Blur(4.0).scaled(0.5), FilterOp::Blur(2.0));
        assert_eq!(FilterOp::Sepia(0.4).scaled(0.5), FilterOp::Sepia(0.4));
    }
}
