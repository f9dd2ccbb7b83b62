//! Deriving a child color from its parent.

use serde::{Deserialize, Serialize};

use crate::color::{normalize, Hswl};
use crate::contrast::contrast_luminance;
use crate::sampler::{Range, SampleRanges};
use crate::swatch::{ChannelMode, LumMode, Swatch};

/// Per-channel derivation settings. For each channel a fix value wins over
/// an adjustment; a `contrast` above 1 wins over both for luminance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeriveOptions {
    pub fix_hue: Option<f64>,
    pub adjust_hue: Option<f64>,
    pub fix_sat: Option<f64>,
    pub adjust_sat: Option<f64>,
    pub fix_lum: Option<f64>,
    pub adjust_lum: Option<f64>,
    pub contrast: Option<f64>,
}

impl DeriveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fix_hue(mut self, h: f64) -> Self {
        self.fix_hue = Some(h);
        self
    }

    #[must_use]
    pub fn adjust_hue(mut self, dh: f64) -> Self {
        self.adjust_hue = Some(dh);
        self
    }

    #[must_use]
    pub fn fix_sat(mut self, s: f64) -> Self {
        self.fix_sat = Some(s);
        self
    }

    #[must_use]
    pub fn adjust_sat(mut self, ds: f64) -> Self {
        self.adjust_sat = Some(ds);
        self
    }

    #[must_use]
    pub fn fix_lum(mut self, wl: f64) -> Self {
        self.fix_lum = Some(wl);
        self
    }

    #[must_use]
    pub fn adjust_lum(mut self, dwl: f64) -> Self {
        self.adjust_lum = Some(dwl);
        self
    }

    #[must_use]
    pub fn contrast(mut self, ratio: f64) -> Self {
        self.contrast = Some(ratio);
        self
    }

    /// Options selected by a swatch's stored modes. Exactly one setting per
    /// channel is filled in.
    pub fn for_swatch(swatch: &Swatch) -> Self {
        let modes = swatch.toggle_opts;
        let mut options = Self::new();

        match modes.h {
            ChannelMode::Adjust => options.adjust_hue = Some(swatch.adjust_hswl.h),
            ChannelMode::Fix => options.fix_hue = Some(swatch.fix_hswl.h),
        }
        match modes.s {
            ChannelMode::Adjust => options.adjust_sat = Some(swatch.adjust_hswl.s),
            ChannelMode::Fix => options.fix_sat = Some(swatch.fix_hswl.s),
        }
        match modes.wl {
            LumMode::Contrast => options.contrast = Some(swatch.contrast),
            LumMode::Adjust => options.adjust_lum = Some(swatch.adjust_hswl.wl),
            LumMode::Fix => options.fix_lum = Some(swatch.fix_hswl.wl),
        }
        options
    }
}

fn channel(parent: f64, fix: Option<f64>, adjust: Option<f64>) -> f64 {
    match (fix, adjust) {
        (Some(value), _) => value,
        (None, Some(delta)) => parent + delta,
        (None, None) => parent,
    }
}

/// Child color for `parent` under `options`, always normalized.
pub fn derive(parent: &Hswl, options: &DeriveOptions) -> Hswl {
    let h = channel(parent.h, options.fix_hue, options.adjust_hue);
    let s = channel(parent.s, options.fix_sat, options.adjust_sat);
    let wl = match options.contrast {
        Some(ratio) if ratio > 1.0 => contrast_luminance(parent, ratio).best,
        _ => channel(parent.wl, options.fix_lum, options.adjust_lum),
    };
    normalize(Hswl { h, s, wl })
}

/// Readable label color drawn on top of a swatch.
pub fn label_color(background: &Hswl) -> Hswl {
    derive(
        background,
        &DeriveOptions::new().contrast(5.0).adjust_hue(15.0).adjust_sat(-0.2),
    )
}

/// Bounds for adjustment controls under `parent`: hue may swing half a
/// turn either way, saturation and luminance may reach 0 or 1 but no further.
pub fn adjust_bounds(parent: &Hswl) -> SampleRanges {
    let parent = normalize(*parent);
    SampleRanges {
        hue: Range::new(-180.0, 180.0),
        sat: Range::new(-parent.s, 1.0 - parent.s),
        lum: Range::new(-parent.wl, 1.0 - parent.wl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::contrast_ratio;
    use crate::swatch::{SwatchDefaults, ToggleOpts};
    use proptest::prelude::*;

    fn parent() -> Hswl {
        Hswl::new(200.0, 0.5, 0.1)
    }

    #[test]
    fn no_options_is_a_normalized_copy() {
        assert_eq!(derive(&parent(), &DeriveOptions::new()), parent());
        let wild = Hswl::new(-30.0, 1.5, -0.2);
        assert_eq!(derive(&wild, &DeriveOptions::new()), Hswl::new(330.0, 1.0, 0.0));
    }

    #[test]
    fn fix_beats_adjust() {
        let options = DeriveOptions::new().fix_hue(90.0).adjust_hue(20.0);
        assert_eq!(derive(&parent(), &options).h, 90.0);
    }

    #[test]
    fn adjust_wraps_hue_and_clamps_sat() {
        let options = DeriveOptions::new().adjust_hue(170.0).adjust_sat(0.8);
        let child = derive(&parent(), &options);
        assert_eq!(child.h, 10.0);
        assert_eq!(child.s, 1.0);
    }

    #[test]
    fn contrast_overrides_luminance_settings() {
        let options = DeriveOptions::new().contrast(4.5).fix_lum(0.9);
        let child = derive(&parent(), &options);
        assert!((contrast_ratio(0.1, child.wl) - 4.5).abs() < 1e-9);
        assert!(child.wl > 0.1);
    }

    #[test]
    fn contrast_of_one_falls_back_to_luminance_settings() {
        let options = DeriveOptions::new().contrast(1.0).adjust_lum(0.2);
        assert!((derive(&parent(), &options).wl - 0.3).abs() < 1e-12);
    }

    #[test]
    fn swatch_modes_select_one_setting_per_channel() {
        let mut swatch = Swatch::child(0, &SwatchDefaults::default());
        swatch.adjust_hswl = Hswl::new(20.0, -0.1, 0.05);
        swatch.fix_hswl = Hswl::new(300.0, 0.9, 0.6);
        swatch.toggle_opts = ToggleOpts {
            h: ChannelMode::Fix,
            s: ChannelMode::Adjust,
            wl: LumMode::Adjust,
        };

        let options = DeriveOptions::for_swatch(&swatch);
        assert_eq!(options.fix_hue, Some(300.0));
        assert_eq!(options.adjust_hue, None);
        assert_eq!(options.adjust_sat, Some(-0.1));
        assert_eq!(options.adjust_lum, Some(0.05));
        assert_eq!(options.contrast, None);

        let child = derive(&parent(), &options);
        assert_eq!(child.h, 300.0);
        assert!((child.s - 0.4).abs() < 1e-12);
        assert!((child.wl - 0.15).abs() < 1e-12);
    }

    #[test]
    fn label_color_is_readable() {
        let bg = Hswl::new(40.0, 0.7, 0.6);
        let label = label_color(&bg);
        assert!(contrast_ratio(bg.wl, label.wl) >= 5.0 - 1e-9);
        assert_eq!(label.h, 55.0);
    }

    #[test]
    fn adjust_bounds_stop_at_the_unit_interval() {
        let bounds = adjust_bounds(&Hswl::new(10.0, 0.3, 0.25));
        assert_eq!(bounds.sat.min, -0.3);
        assert!((bounds.sat.max - 0.7).abs() < 1e-12);
        assert_eq!(bounds.lum, Range::new(-0.25, 0.75));
        assert_eq!(bounds.hue, Range::new(-180.0, 180.0));
    }

    proptest! {
        #[test]
        fn derived_colors_are_always_in_range(
            h in -1e3f64..1e3, s in -1f64..2.0, wl in -1f64..2.0,
            dh in -720f64..720.0, ds in -2f64..2.0, c in 0f64..30.0,
        ) {
            let options = DeriveOptions::new().adjust_hue(dh).adjust_sat(ds).contrast(c);
            let child = derive(&Hswl::new(h, s, wl), &options);
            prop_assert_eq!(child, normalize(child));
        }
    }
}
