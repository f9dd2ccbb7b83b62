//! The HSWL color model.
//!
//! HSWL keeps hue and saturation from HSL but replaces lightness with WCAG
//! relative luminance, so contrast targets become a function of one field.

pub mod rgb;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relative luminance that splits colors into "light" and "dark".
///
/// Colors at or above it get darker contrast partners, colors below it get
/// lighter ones. Both partners reach equal contrast against this luminance.
pub const LIGHT_THRESHOLD: f64 = 0.1791104;

/// Hue in degrees, saturation and WCAG relative luminance in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hswl {
    pub h: f64,
    pub s: f64,
    pub wl: f64,
}

impl Hswl {
    pub const BLACK: Hswl = Hswl { h: 0.0, s: 0.0, wl: 0.0 };
    pub const WHITE: Hswl = Hswl { h: 0.0, s: 0.0, wl: 1.0 };

    pub const fn new(h: f64, s: f64, wl: f64) -> Self {
        Self { h, s, wl }
    }

    /// Copy with every field wrapped or clamped into range.
    #[must_use]
    pub fn normalized(self) -> Self {
        normalize(self)
    }

    pub fn is_light(&self) -> bool {
        is_light(self.wl)
    }

    /// `#rrggbb` for this color. Does not touch `self`.
    pub fn to_hex(&self) -> String {
        rgb::to_hex(*self)
    }

    pub fn from_hex(hex: &str) -> crate::error::Result<Self> {
        rgb::from_hex(hex)
    }
}

impl fmt::Display for Hswl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hswl({:.0}, {:.2}, {:.3})", self.h, self.s, self.wl)
    }
}

/// Wrap a hue into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp into `[0, 1]`. NaN is treated as a missing value and maps to 0.
pub fn normalize01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

pub fn normalize(hswl: Hswl) -> Hswl {
    Hswl {
        h: normalize_hue(hswl.h),
        s: normalize01(hswl.s),
        wl: normalize01(hswl.wl),
    }
}

pub fn is_light(wl: f64) -> bool {
    wl >= LIGHT_THRESHOLD
}
