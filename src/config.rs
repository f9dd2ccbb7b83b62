use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contrast::{MAX_CONTRAST, MIN_CONTRAST};
use crate::error::{PaletteError, Result};
use crate::sampler::{Range, SampleRanges, DEFAULT_MIN_MAX_CONTRAST};
use crate::swatch::{SwatchDefaults, SwatchId};

fn default_initial_children() -> Vec<f64> {
    vec![4.5, 7.0, 1.5]
}

fn default_gradient_stops() -> usize {
    16
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaletteConfig {
    /// Swatch that actions target when they carry no id, and the parent of
    /// every added swatch.
    pub root_id: SwatchId,

    /// Contrast floor that sampled root colors must be able to reach.
    pub min_max_contrast: f64,

    /// Hue/saturation/luminance bounds for sampled root colors.
    pub sample_ranges: SampleRanges,

    /// Settings for swatches added by `new_swatch`.
    pub swatch_defaults: SwatchDefaults,

    /// One child of the root per entry, with that contrast target.
    #[serde(default = "default_initial_children")]
    pub initial_children: Vec<f64>,

    #[serde(default = "default_gradient_stops")]
    pub gradient_stops: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            root_id: 0,
            min_max_contrast: DEFAULT_MIN_MAX_CONTRAST,
            sample_ranges: SampleRanges::default(),
            swatch_defaults: SwatchDefaults::default(),
            initial_children: default_initial_children(),
            gradient_stops: default_gradient_stops(),
        }
    }
}

impl PaletteConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: PaletteConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_contrast(self.min_max_contrast, "minMaxContrast")?;
        validate_contrast(self.swatch_defaults.contrast, "swatchDefaults.contrast")?;
        for (i, contrast) in self.initial_children.iter().enumerate() {
            validate_contrast(*contrast, &format!("initialChildren[{i}]"))?;
        }

        let ranges = &self.sample_ranges;
        validate_range(ranges.hue, "sampleRanges.hue")?;
        validate_range(ranges.sat, "sampleRanges.sat")?;
        validate_range(ranges.lum, "sampleRanges.lum")?;
        validate_within(ranges.hue, Range::new(0.0, 360.0), "sampleRanges.hue")?;
        validate_within(ranges.sat, Range::new(0.0, 1.0), "sampleRanges.sat")?;
        validate_within(ranges.lum, Range::new(0.0, 1.0), "sampleRanges.lum")?;

        if self.gradient_stops < 2 {
            return Err(PaletteError::Config(format!(
                "gradientStops must be at least 2, got {}",
                self.gradient_stops
            )));
        }
        Ok(())
    }
}

fn validate_contrast(value: f64, field: &str) -> Result<()> {
    if !(MIN_CONTRAST..=MAX_CONTRAST).contains(&value) {
        return Err(PaletteError::Config(format!(
            "{field} must be between {MIN_CONTRAST} and {MAX_CONTRAST}, got {value}"
        )));
    }
    Ok(())
}

fn validate_range(range: Range, field: &str) -> Result<()> {
    if !range.is_valid() {
        return Err(PaletteError::Config(format!(
            "{field} needs finite bounds with min <= max, got {}..{}",
            range.min, range.max
        )));
    }
    Ok(())
}

fn validate_within(range: Range, bounds: Range, field: &str) -> Result<()> {
    if range.min < bounds.min || range.max > bounds.max {
        return Err(PaletteError::Config(format!(
            "{field} must lie within {}..{}, got {}..{}",
            bounds.min, bounds.max, range.min, range.max
        )));
    }
    Ok(())
}
