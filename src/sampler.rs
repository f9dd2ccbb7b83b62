//! Constrained random colors.
//!
//! Every function takes the random source as an argument so callers (and
//! tests) decide how draws are seeded.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Hswl;
use crate::contrast::{dark_ceiling, light_floor, MIN_CONTRAST};

/// Default floor for how much contrast a sampled root color must allow.
pub const DEFAULT_MIN_MAX_CONTRAST: f64 = 7.0;

/// Inclusive sampling bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Per-channel bounds for [`random_hswl`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleRanges {
    pub hue: Range,
    pub sat: Range,
    pub lum: Range,
}

impl Default for SampleRanges {
    // Saturation avoids the bland and the fatiguing ends; luminance keeps
    // clear of pure black and of pastel whites.
    fn default() -> Self {
        Self {
            hue: Range::new(0.0, 360.0),
            sat: Range::new(0.2, 0.8),
            lum: Range::new(0.01, 0.8),
        }
    }
}

impl SampleRanges {
    /// Absolute values for a channel in "fix" mode.
    pub fn fix() -> Self {
        Self {
            hue: Range::new(0.0, 360.0),
            sat: Range::new(0.0, 1.0),
            lum: Range::new(0.0, 1.0),
        }
    }

    /// Signed deltas for a channel in "adjust" mode.
    pub fn adjust() -> Self {
        Self {
            hue: Range::new(-180.0, 180.0),
            sat: Range::new(-1.0, 1.0),
            lum: Range::new(-1.0, 1.0),
        }
    }
}

// Known-good base colors that read well as a first impression.
const PRESETS: &[Hswl] = &[
    Hswl::new(231.0, 0.48, 0.08),
    Hswl::new(338.0, 1.0, 0.22),
    Hswl::new(199.0, 0.65, 0.05),
    Hswl::new(160.0, 0.45, 0.34),
    Hswl::new(28.0, 0.85, 0.42),
    Hswl::new(270.0, 0.35, 0.03),
    Hswl::new(48.0, 0.9, 0.62),
    Hswl::new(5.0, 0.6, 0.12),
];

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Random color whose maximum achievable contrast is at least
/// `min_max_contrast`.
///
/// Light and dark candidates are equally likely. When `ranges.lum` leaves no
/// room on the chosen side, the boundary luminance for that side is used.
/// A `min_max_contrast` of 1 or less puts no constraint on luminance, which
/// is then drawn straight from `ranges.lum`.
/// Hue is whole degrees; saturation and luminance have two decimals. The
/// result is not normalized, so signed adjustment ranges survive intact.
pub fn random_hswl<R: Rng + ?Sized>(rng: &mut R, min_max_contrast: f64, ranges: &SampleRanges) -> Hswl {
    let h = sample(rng, ranges.hue).floor();
    let s = round2(sample(rng, ranges.sat)).max(ranges.sat.min).min(ranges.sat.max);

    let wl = if min_max_contrast <= MIN_CONTRAST {
        round2(sample(rng, ranges.lum)).max(ranges.lum.min).min(ranges.lum.max)
    } else if rng.gen_bool(0.5) {
        let ceiling = dark_ceiling(min_max_contrast);
        if ranges.lum.min > ceiling {
            ceiling
        } else {
            // round down so the draw never crosses the ceiling
            let drawn = sample(rng, Range::new(ranges.lum.min, ranges.lum.max.min(ceiling)));
            ((drawn * 100.0).floor() / 100.0).min(ceiling)
        }
    } else {
        let floor = light_floor(min_max_contrast);
        if ranges.lum.max < floor {
            floor
        } else {
            let drawn = sample(rng, Range::new(ranges.lum.min.max(floor), ranges.lum.max));
            ((drawn * 100.0).ceil() / 100.0).max(floor)
        }
    };

    Hswl { h, s, wl }
}

/// One of a short curated list of base colors.
pub fn random_preset<R: Rng + ?Sized>(rng: &mut R) -> Hswl {
    PRESETS.choose(rng).copied().unwrap_or(Hswl::BLACK)
}

fn sample<R: Rng + ?Sized>(rng: &mut R, range: Range) -> f64 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::max_achievable_contrast;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_sampling_respects_contrast_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = random_hswl(&mut rng, DEFAULT_MIN_MAX_CONTRAST, &SampleRanges::default());
            assert!(max_achievable_contrast(&c) >= DEFAULT_MIN_MAX_CONTRAST - 1e-9, "{c:?}");
            assert!((0.0..360.0).contains(&c.h));
            assert!((0.2..=0.8).contains(&c.s));
            assert_eq!(c.h.fract(), 0.0);
        }
    }

    #[test]
    fn maximum_floor_yields_boundary_colors() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..1000 {
            let c = random_hswl(&mut rng, 21.0, &SampleRanges::default());
            assert!(max_achievable_contrast(&c) >= 21.0 - 1e-9, "{c:?}");
        }
    }

    #[test]
    fn seeded_draws_repeat() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..5)
                .map(|_| random_hswl(&mut rng, 7.0, &SampleRanges::default()))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(3), draw(3));
    }

    #[test]
    fn adjust_ranges_keep_sign() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut saw_negative = false;
        for _ in 0..200 {
            let c = random_hswl(&mut rng, 1.0, &SampleRanges::adjust());
            assert!((-180.0..180.0).contains(&c.h));
            assert!((-1.0..=1.0).contains(&c.s));
            saw_negative |= c.h < 0.0;
        }
        assert!(saw_negative);
    }

    #[test]
    fn unconstrained_luminance_deltas_are_balanced() {
        let mut rng = StdRng::seed_from_u64(12);
        let draws = 2000;
        let negative = (0..draws)
            .map(|_| random_hswl(&mut rng, 1.0, &SampleRanges::adjust()))
            .filter(|c| c.wl < 0.0)
            .count();
        // symmetric range, so roughly half the deltas darken
        assert!((800..1200).contains(&negative), "{negative} of {draws} negative");
    }

    #[test]
    fn presets_come_from_the_curated_list() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert!(PRESETS.contains(&random_preset(&mut rng)));
        }
    }
}
