pub mod propagate;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Hswl;
use crate::error::{PaletteError, Result};

pub use propagate::{propagate, propagate_all, Propagation};

pub type SwatchId = u32;

/// How the hue or saturation channel follows the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    /// Parent value plus the swatch's adjustment.
    #[default]
    Adjust,
    /// The swatch's fixed value, ignoring the parent.
    Fix,
}

/// How the luminance channel follows the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumMode {
    /// Whatever luminance reaches the swatch's contrast target.
    #[default]
    Contrast,
    Adjust,
    Fix,
}

impl ChannelMode {
    /// Parse a mode tag for `channel`. Unknown tags are a configuration
    /// error; there is no fallback mode.
    pub fn parse(tag: &str, channel: &'static str) -> Result<Self> {
        match tag {
            "adjust" => Ok(ChannelMode::Adjust),
            "fix" => Ok(ChannelMode::Fix),
            _ => Err(PaletteError::UnknownMode {
                channel,
                tag: tag.to_string(),
            }),
        }
    }
}

impl LumMode {
    /// Like [`ChannelMode::parse`], with `contrast` as a third mode.
    pub fn parse(tag: &str, channel: &'static str) -> Result<Self> {
        match tag {
            "contrast" => Ok(LumMode::Contrast),
            "adjust" => Ok(LumMode::Adjust),
            "fix" => Ok(LumMode::Fix),
            _ => Err(PaletteError::UnknownMode {
                channel,
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Adjust => write!(f, "adjust"),
            ChannelMode::Fix => write!(f, "fix"),
        }
    }
}

impl fmt::Display for LumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LumMode::Contrast => write!(f, "contrast"),
            LumMode::Adjust => write!(f, "adjust"),
            LumMode::Fix => write!(f, "fix"),
        }
    }
}

/// Per-channel mode selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToggleOpts {
    pub h: ChannelMode,
    pub s: ChannelMode,
    pub wl: LumMode,
}

/// Configuration a freshly added swatch starts with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwatchDefaults {
    pub contrast: f64,
    pub adjust_hswl: Hswl,
    pub fix_hswl: Hswl,
    pub toggle_opts: ToggleOpts,
}

impl Default for SwatchDefaults {
    fn default() -> Self {
        Self {
            contrast: 4.5,
            adjust_hswl: Hswl::new(0.0, 0.0, 0.0),
            fix_hswl: Hswl::new(0.0, 0.5, 0.5),
            toggle_opts: ToggleOpts::default(),
        }
    }
}

/// One node of the palette tree.
///
/// `hswl` holds the native color for roots and the derived (effective)
/// color for every other swatch once propagation has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub hswl: Hswl,
    pub parent_id: Option<SwatchId>,
    /// Target WCAG contrast against the parent, in `[1, 21]`.
    pub contrast: f64,
    pub adjust_hswl: Hswl,
    pub fix_hswl: Hswl,
    pub toggle_opts: ToggleOpts,
}

impl Swatch {
    pub fn root(hswl: Hswl) -> Self {
        let defaults = SwatchDefaults::default();
        Self {
            hswl: hswl.normalized(),
            parent_id: None,
            contrast: defaults.contrast,
            adjust_hswl: defaults.adjust_hswl,
            fix_hswl: defaults.fix_hswl,
            toggle_opts: defaults.toggle_opts,
        }
    }

    /// A child of `parent_id` seeded from `defaults`. Its color is a
    /// placeholder until the next propagation.
    pub fn child(parent_id: SwatchId, defaults: &SwatchDefaults) -> Self {
        Self {
            hswl: Hswl::BLACK,
            parent_id: Some(parent_id),
            contrast: defaults.contrast,
            adjust_hswl: defaults.adjust_hswl,
            fix_hswl: defaults.fix_hswl,
            toggle_opts: defaults.toggle_opts,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Swatches keyed by id. Parents are resolved by lookup, never by reference.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwatchMap(BTreeMap<SwatchId, Swatch>);

impl SwatchMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, id: SwatchId) -> Option<&Swatch> {
        self.0.get(&id)
    }

    pub fn get_mut(&mut self, id: SwatchId) -> Option<&mut Swatch> {
        self.0.get_mut(&id)
    }

    pub fn insert(&mut self, id: SwatchId, swatch: Swatch) -> Option<Swatch> {
        self.0.insert(id, swatch)
    }

    pub fn contains(&self, id: SwatchId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SwatchId> + '_ {
        self.0.keys().copied()
    }

    /// Id policy for new swatches: one past the largest id in use.
    pub fn next_id(&self) -> Result<SwatchId> {
        match self.0.keys().next_back() {
            None => Ok(0),
            Some(last) => last.checked_add(1).ok_or(PaletteError::IdsExhausted),
        }
    }

    /// Decode a map from its JSON form. Mode tags are checked first so an
    /// unknown tag surfaces as [`PaletteError::UnknownMode`] rather than a
    /// generic JSON error.
    pub fn from_json(value: Value) -> Result<Self> {
        if let Some(entries) = value.as_object() {
            for swatch in entries.values() {
                check_mode_tags(&swatch["toggleOpts"])?;
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Child ids per parent id, each list in ascending id order.
    pub fn children_index(&self) -> HashMap<SwatchId, Vec<SwatchId>> {
        let mut index: HashMap<SwatchId, Vec<SwatchId>> = HashMap::new();
        for (id, swatch) in &self.0 {
            if let Some(parent) = swatch.parent_id {
                index.entry(parent).or_default().push(*id);
            }
        }
        index
    }

    /// Swatches that start a tree: true roots plus those whose parent is
    /// missing from the map.
    pub fn tree_roots(&self) -> Vec<SwatchId> {
        self.0
            .iter()
            .filter(|(_, s)| s.is_root() || s.parent_id.is_some_and(|p| !self.contains(p)))
            .map(|(id, _)| *id)
            .collect()
    }
}

fn check_mode_tags(opts: &Value) -> Result<()> {
    if let Some(tag) = opts["h"].as_str() {
        ChannelMode::parse(tag, "hue")?;
    }
    if let Some(tag) = opts["s"].as_str() {
        ChannelMode::parse(tag, "saturation")?;
    }
    if let Some(tag) = opts["wl"].as_str() {
        LumMode::parse(tag, "luminance")?;
    }
    Ok(())
}

impl FromIterator<(SwatchId, Swatch)> for SwatchMap {
    fn from_iter<I: IntoIterator<Item = (SwatchId, Swatch)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
