//! WCAG contrast ratio math over relative luminance.

use serde::Serialize;

use crate::color::{is_light, normalize01, Hswl};

pub const MIN_CONTRAST: f64 = 1.0;
pub const MAX_CONTRAST: f64 = 21.0;

/// WCAG contrast ratio between two relative luminances, in `[1, 21]`.
///
/// Argument order does not matter.
pub fn contrast_ratio(a: f64, b: f64) -> f64 {
    let (a, b) = (normalize01(a), normalize01(b));
    let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// The most contrast any color can have against `hswl`: the better of pure
/// black and pure white.
pub fn max_achievable_contrast(hswl: &Hswl) -> f64 {
    let wl = normalize01(hswl.wl);
    contrast_ratio(wl, 0.0).max(contrast_ratio(wl, 1.0))
}

/// Luminances that reach a target contrast against a base color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastLuminance {
    /// Lighter candidate.
    pub light: f64,
    /// Darker candidate.
    pub dark: f64,
    /// `dark` for light bases and `light` for dark bases.
    pub best: f64,
}

/// Luminances that achieve `contrast` against `hswl`.
///
/// When `contrast` exceeds [`max_achievable_contrast`] the candidates clamp
/// to 0 or 1 and only reach the maximum, so the result is a lower bound on
/// what was asked for, never an equality.
pub fn contrast_luminance(hswl: &Hswl, contrast: f64) -> ContrastLuminance {
    let wl0 = normalize01(hswl.wl);
    let light = normalize01(contrast * (wl0 + 0.05) - 0.05);
    let dark = normalize01((wl0 + 0.05) / contrast - 0.05);
    let best = if is_light(wl0) { dark } else { light };
    ContrastLuminance { light, dark, best }
}

/// Highest luminance a dark color may have and still reach `contrast`
/// against white.
pub fn dark_ceiling(contrast: f64) -> f64 {
    normalize01(1.05 / contrast - 0.05)
}

/// Lowest luminance a light color may have and still reach `contrast`
/// against black.
pub fn light_floor(contrast: f64) -> f64 {
    normalize01(0.05 * contrast - 0.05)
}
