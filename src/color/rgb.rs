//! Conversions between HSWL and 8-bit sRGB / hex strings.
//!
//! HSWL shares hue and saturation with HSL. Going to sRGB means finding the
//! HSL lightness whose relative luminance matches `wl`, which is monotonic in
//! lightness for a fixed hue and saturation, so a bisection converges.

use crate::color::{normalize, Hswl};
use crate::error::{PaletteError, Result};

const BISECT_STEPS: usize = 64;

/// Decode a gamma-encoded sRGB channel in `[0, 1]` into linear light.
#[inline]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of a gamma-encoded sRGB triple in `[0, 1]`.
pub fn relative_luminance(rgb: [f64; 3]) -> f64 {
    let [r, g, b] = rgb.map(srgb_to_linear);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

// https://www.rapidtables.com/convert/color/hsl-to-rgb.html
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

fn rgb_to_hue_sat(rgb: [f64; 3]) -> (f64, f64) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= f64::EPSILON {
        return (0.0, 0.0);
    }

    let l = (max + min) / 2.0;
    let s = delta / (1.0 - (2.0 * l - 1.0).abs());
    let h = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (h, s.clamp(0.0, 1.0))
}

/// Gamma-encoded sRGB in `[0, 1]` for an HSWL color.
pub fn to_rgb(hswl: Hswl) -> [f64; 3] {
    let Hswl { h, s, wl } = normalize(hswl);
    if wl <= 0.0 {
        return [0.0; 3];
    }
    if wl >= 1.0 {
        return [1.0; 3];
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    for _ in 0..BISECT_STEPS {
        let mid = (lo + hi) * 0.5;
        if relative_luminance(hsl_to_rgb(h, s, mid)) < wl {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hsl_to_rgb(h, s, (lo + hi) * 0.5)
}

pub fn to_rgb8(hswl: Hswl) -> [u8; 3] {
    to_rgb(hswl).map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

pub fn to_hex(hswl: Hswl) -> String {
    let [r, g, b] = to_rgb8(hswl);
    format!("#{r:02x}{g:02x}{b:02x}")
}

pub fn from_rgb8(rgb: [u8; 3]) -> Hswl {
    let rgb = rgb.map(|c| f64::from(c) / 255.0);
    let (h, s) = rgb_to_hue_sat(rgb);
    Hswl {
        h,
        s,
        wl: relative_luminance(rgb),
    }
}

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (case insensitive).
pub fn from_hex(hex: &str) -> Result<Hswl> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let invalid = || PaletteError::InvalidHex(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return Err(invalid()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok(from_rgb8([channel(0)?, channel(2)?, channel(4)?]))
}
