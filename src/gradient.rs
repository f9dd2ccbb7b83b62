//! Color stops for slider previews.
//!
//! Stops are interpolated in HSWL space, so a gradient shows exactly the
//! colors a slider would produce rather than a straight RGB blend.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::Hswl;
use crate::derive::{derive, DeriveOptions};
use crate::error::PaletteError;
use crate::sampler::Range;

/// The attribute a gradient varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientAttr {
    Hue,
    Sat,
    Lum,
    /// Contrast against the base color, via the contrast luminance rule.
    Contrast,
}

impl GradientAttr {
    pub fn default_range(self) -> Range {
        match self {
            GradientAttr::Hue => Range::new(0.0, 360.0),
            GradientAttr::Sat | GradientAttr::Lum => Range::new(0.0, 1.0),
            GradientAttr::Contrast => Range::new(1.0, 21.0),
        }
    }
}

impl FromStr for GradientAttr {
    type Err = PaletteError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "h" => Ok(GradientAttr::Hue),
            "s" => Ok(GradientAttr::Sat),
            "wl" => Ok(GradientAttr::Lum),
            "con" => Ok(GradientAttr::Contrast),
            _ => Err(PaletteError::Config(format!(
                "unknown gradient attribute `{tag}` (expected h, s, wl or con)"
            ))),
        }
    }
}

impl fmt::Display for GradientAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientAttr::Hue => write!(f, "h"),
            GradientAttr::Sat => write!(f, "s"),
            GradientAttr::Lum => write!(f, "wl"),
            GradientAttr::Contrast => write!(f, "con"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    /// Percent along the gradient, 0 to 100.
    pub position: f64,
    pub hex: String,
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `num_stops` evenly spaced stops varying `attr` of `base` from `begin` to
/// `end` (the attribute's default range where omitted).
///
/// For [`GradientAttr::Contrast`], `base` is the color contrast is measured
/// against, usually the parent of the swatch being edited.
pub fn gradient_stops(
    base: &Hswl,
    attr: GradientAttr,
    begin: Option<f64>,
    end: Option<f64>,
    num_stops: usize,
) -> Vec<GradientStop> {
    let defaults = attr.default_range();
    let begin = begin.unwrap_or(defaults.min);
    let end = end.unwrap_or(defaults.max);
    let last = num_stops.saturating_sub(1).max(1) as f64;

    (0..num_stops)
        .map(|i| {
            let progress = i as f64 / last;
            let value = lerp(begin, end, progress);
            let color = match attr {
                GradientAttr::Hue => Hswl { h: value, ..*base },
                GradientAttr::Sat => Hswl { s: value, ..*base },
                GradientAttr::Lum => Hswl { wl: value, ..*base },
                GradientAttr::Contrast => derive(base, &DeriveOptions::new().contrast(value)),
            };
            GradientStop {
                position: progress * 100.0,
                hex: color.to_hex(),
            }
        })
        .collect()
}

/// CSS `linear-gradient(90deg, ...)` for a list of stops.
pub fn css_linear_gradient(stops: &[GradientStop]) -> String {
    let stops: Vec<String> = stops
        .iter()
        .map(|stop| format!("{} {}%", stop.hex, stop.position))
        .collect();
    format!("linear-gradient(90deg, {})", stops.join(", "))
}
