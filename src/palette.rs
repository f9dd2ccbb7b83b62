//! Applying user edits to the swatch tree.
//!
//! [`reduce`] is the whole state machine: one action against one map gives a
//! new map, already propagated. [`Palette`] owns the current map plus the
//! random source and only swaps in a new map once an action fully succeeded.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::color::{normalize01, normalize_hue, Hswl};
use crate::config::PaletteConfig;
use crate::contrast::{MAX_CONTRAST, MIN_CONTRAST};
use crate::derive::adjust_bounds;
use crate::error::{PaletteError, Result};
use crate::sampler::{random_hswl, random_preset, SampleRanges};
use crate::swatch::{
    propagate, propagate_all, ChannelMode, LumMode, Propagation, Swatch, SwatchId, SwatchMap,
};

/// Which field of an HSWL triple an action edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Hue,
    Sat,
    Lum,
}

impl Channel {
    fn set(self, hswl: &mut Hswl, value: f64) {
        match self {
            Channel::Hue => hswl.h = value,
            Channel::Sat => hswl.s = value,
            Channel::Lum => hswl.wl = value,
        }
    }

    fn normalize(self, value: f64) -> f64 {
        match self {
            Channel::Hue => normalize_hue(value),
            Channel::Sat | Channel::Lum => normalize01(value),
        }
    }
}

/// Every edit the palette understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the whole map. Not propagated.
    Refresh(SwatchMap),
    /// `changed_hue` / `changed_sat` / `changed_lum`: the swatch's own color.
    ChangedColor {
        id: Option<SwatchId>,
        channel: Channel,
        value: f64,
    },
    /// `changed_adjust_*`
    ChangedAdjust {
        id: Option<SwatchId>,
        channel: Channel,
        value: f64,
    },
    /// `changed_fix_*`
    ChangedFix {
        id: Option<SwatchId>,
        channel: Channel,
        value: f64,
    },
    ChangedContrast {
        id: Option<SwatchId>,
        value: f64,
    },
    /// A `None` mode leaves the swatch as it is.
    ChangedHueToggle {
        id: Option<SwatchId>,
        mode: Option<ChannelMode>,
    },
    ChangedSatToggle {
        id: Option<SwatchId>,
        mode: Option<ChannelMode>,
    },
    ChangedLumToggle {
        id: Option<SwatchId>,
        mode: Option<LumMode>,
    },
    RandomColor {
        id: Option<SwatchId>,
    },
    /// Add a swatch under the designated root. The caller picks the id.
    NewSwatch {
        id: SwatchId,
    },
}

impl Action {
    /// The swatch this action edits, with the designated root filled in.
    pub fn target(&self, root: SwatchId) -> Option<SwatchId> {
        match self {
            Action::Refresh(_) => None,
            Action::NewSwatch { id } => Some(*id),
            Action::ChangedColor { id, .. }
            | Action::ChangedAdjust { id, .. }
            | Action::ChangedFix { id, .. }
            | Action::ChangedContrast { id, .. }
            | Action::ChangedHueToggle { id, .. }
            | Action::ChangedSatToggle { id, .. }
            | Action::ChangedLumToggle { id, .. }
            | Action::RandomColor { id } => Some(id.unwrap_or(root)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Refresh(_) => "refresh",
            Action::ChangedColor { .. } => "changed_color",
            Action::ChangedAdjust { .. } => "changed_adjust",
            Action::ChangedFix { .. } => "changed_fix",
            Action::ChangedContrast { .. } => "changed_contrast",
            Action::ChangedHueToggle { .. } => "changed_hue_toggle",
            Action::ChangedSatToggle { .. } => "changed_sat_toggle",
            Action::ChangedLumToggle { .. } => "changed_lum_toggle",
            Action::RandomColor { .. } => "random_color",
            Action::NewSwatch { .. } => "new_swatch",
        }
    }
}

/// An action as it arrives from outside: `{"type": ..., "id": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SwatchId>,
    #[serde(default)]
    pub value: Value,
}

impl RawAction {
    pub fn new(kind: &str, id: Option<SwatchId>, value: Value) -> Self {
        Self {
            kind: kind.to_string(),
            id,
            value,
        }
    }

    fn number(&self) -> Result<f64> {
        self.value.as_f64().ok_or_else(|| self.invalid("expected a number"))
    }

    fn mode_tag(&self) -> Result<Option<&str>> {
        match &self.value {
            Value::Null => Ok(None),
            Value::String(tag) => Ok(Some(tag)),
            _ => Err(self.invalid("expected a mode tag or null")),
        }
    }

    fn invalid(&self, reason: &str) -> PaletteError {
        PaletteError::InvalidActionValue {
            action: self.kind.clone(),
            reason: reason.to_string(),
        }
    }
}

impl TryFrom<RawAction> for Action {
    type Error = PaletteError;

    fn try_from(raw: RawAction) -> Result<Self> {
        let id = raw.id;
        let action = match raw.kind.as_str() {
            "refresh" => Action::Refresh(SwatchMap::from_json(raw.value.clone())?),

            "changed_hue" => Action::ChangedColor { id, channel: Channel::Hue, value: raw.number()? },
            "changed_sat" => Action::ChangedColor { id, channel: Channel::Sat, value: raw.number()? },
            "changed_lum" => Action::ChangedColor { id, channel: Channel::Lum, value: raw.number()? },

            "changed_adjust_hue" => Action::ChangedAdjust { id, channel: Channel::Hue, value: raw.number()? },
            "changed_adjust_sat" => Action::ChangedAdjust { id, channel: Channel::Sat, value: raw.number()? },
            "changed_adjust_lum" => Action::ChangedAdjust { id, channel: Channel::Lum, value: raw.number()? },

            "changed_fix_hue" => Action::ChangedFix { id, channel: Channel::Hue, value: raw.number()? },
            "changed_fix_sat" => Action::ChangedFix { id, channel: Channel::Sat, value: raw.number()? },
            "changed_fix_lum" => Action::ChangedFix { id, channel: Channel::Lum, value: raw.number()? },

            "changed_contrast" => Action::ChangedContrast { id, value: raw.number()? },

            "changed_hue_toggle" => Action::ChangedHueToggle {
                id,
                mode: raw.mode_tag()?.map(|tag| ChannelMode::parse(tag, "hue")).transpose()?,
            },
            "changed_sat_toggle" => Action::ChangedSatToggle {
                id,
                mode: raw.mode_tag()?.map(|tag| ChannelMode::parse(tag, "saturation")).transpose()?,
            },
            "changed_lum_toggle" => Action::ChangedLumToggle {
                id,
                mode: raw.mode_tag()?.map(|tag| LumMode::parse(tag, "luminance")).transpose()?,
            },

            "random_color" => Action::RandomColor { id },
            "new_swatch" => Action::NewSwatch {
                id: id.ok_or_else(|| raw.invalid("new swatches need an explicit id"))?,
            },

            other => return Err(PaletteError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

/// Apply `action` to `swatches` and propagate from the edited swatch.
///
/// The input map is never modified; on error nothing has changed.
pub fn reduce<R: Rng + ?Sized>(
    swatches: &SwatchMap,
    action: Action,
    config: &PaletteConfig,
    rng: &mut R,
) -> Result<Propagation> {
    debug!(action = action.name(), swatch = ?action.target(config.root_id), "reducing");

    let id = match &action {
        Action::Refresh(_) => None,
        other => other.target(config.root_id),
    };

    let mut next = swatches.clone();
    match action {
        Action::Refresh(map) => {
            // walked only to find cycles and orphans; colors stay as given
            let check = propagate_all(&map)?;
            return Ok(Propagation {
                swatches: map,
                visited: Vec::new(),
                orphans: check.orphans,
            });
        }

        Action::NewSwatch { id } => {
            if next.contains(id) {
                return Err(PaletteError::InvalidActionValue {
                    action: "new_swatch".to_string(),
                    reason: format!("id {id} is already in use"),
                });
            }
            let root = next
                .get(config.root_id)
                .ok_or(PaletteError::UnknownSwatch(config.root_id))?;
            let mut swatch = Swatch::child(config.root_id, &config.swatch_defaults);
            swatch.hswl = root.hswl;
            next.insert(id, swatch);
        }

        edit => {
            let target = id.unwrap_or(config.root_id);
            let parent = next
                .get(target)
                .and_then(|swatch| swatch.parent_id)
                .and_then(|parent_id| next.get(parent_id))
                .map(|parent| parent.hswl);
            let swatch = next.get_mut(target).ok_or(PaletteError::UnknownSwatch(target))?;
            apply_edit(swatch, edit, parent.as_ref(), config, rng);
        }
    }

    match id {
        Some(id) => propagate(id, &next),
        None => Ok(Propagation::untouched(next)),
    }
}

fn apply_edit<R: Rng + ?Sized>(
    swatch: &mut Swatch,
    action: Action,
    parent: Option<&Hswl>,
    config: &PaletteConfig,
    rng: &mut R,
) {
    match action {
        Action::ChangedColor { channel, value, .. } => {
            channel.set(&mut swatch.hswl, channel.normalize(value));
        }
        // adjustments are signed deltas and stay as given
        Action::ChangedAdjust { channel, value, .. } => channel.set(&mut swatch.adjust_hswl, value),
        Action::ChangedFix { channel, value, .. } => {
            channel.set(&mut swatch.fix_hswl, channel.normalize(value));
        }
        Action::ChangedContrast { value, .. } => {
            swatch.contrast = if value.is_nan() {
                MIN_CONTRAST
            } else {
                value.clamp(MIN_CONTRAST, MAX_CONTRAST)
            };
        }
        Action::ChangedHueToggle { mode, .. } => {
            if let Some(mode) = mode {
                swatch.toggle_opts.h = mode;
            }
        }
        Action::ChangedSatToggle { mode, .. } => {
            if let Some(mode) = mode {
                swatch.toggle_opts.s = mode;
            }
        }
        Action::ChangedLumToggle { mode, .. } => {
            if let Some(mode) = mode {
                swatch.toggle_opts.wl = mode;
            }
        }
        // contrast is kept
        Action::RandomColor { .. } => {
            swatch.hswl = random_hswl(rng, config.min_max_contrast, &config.sample_ranges).normalized();
            swatch.fix_hswl = random_hswl(rng, MIN_CONTRAST, &SampleRanges::fix()).normalized();
            let adjust_ranges = parent.map_or_else(SampleRanges::adjust, adjust_bounds);
            swatch.adjust_hswl = random_hswl(rng, MIN_CONTRAST, &adjust_ranges);
        }
        Action::Refresh(_) | Action::NewSwatch { .. } => {}
    }
}

/// A fresh map: the root at `config.root_id` plus one child per entry of
/// `config.initial_children`. Colors are not propagated yet.
pub fn initial_swatches(root: Hswl, config: &PaletteConfig) -> Result<SwatchMap> {
    let mut swatches = SwatchMap::new();
    swatches.insert(config.root_id, Swatch::root(root));
    for contrast in &config.initial_children {
        let mut child = Swatch::child(config.root_id, &config.swatch_defaults);
        child.contrast = *contrast;
        swatches.insert(swatches.next_id()?, child);
    }
    Ok(swatches)
}

/// Current palette state plus the random source its actions draw from.
pub struct Palette<R = StdRng> {
    swatches: SwatchMap,
    config: PaletteConfig,
    rng: R,
    orphans: Vec<SwatchId>,
}

impl<R: Rng> Palette<R> {
    /// Build the initial tree around `root` and propagate it.
    pub fn new(root: Hswl, config: PaletteConfig, rng: R) -> Result<Self> {
        let mut palette = Self {
            swatches: SwatchMap::new(),
            config,
            rng,
            orphans: Vec::new(),
        };
        palette.refresh(root)?;
        Ok(palette)
    }

    /// Like [`Palette::new`] with a sampled root color.
    pub fn random(config: PaletteConfig, mut rng: R) -> Result<Self> {
        let root = random_hswl(&mut rng, config.min_max_contrast, &config.sample_ranges);
        Self::new(root, config, rng)
    }

    /// Like [`Palette::new`] with a curated root color.
    pub fn preset(config: PaletteConfig, mut rng: R) -> Result<Self> {
        let root = random_preset(&mut rng);
        Self::new(root, config, rng)
    }

    pub fn swatches(&self) -> &SwatchMap {
        &self.swatches
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    pub fn root_id(&self) -> SwatchId {
        self.config.root_id
    }

    /// Swatches the last action found without a parent.
    pub fn orphans(&self) -> &[SwatchId] {
        &self.orphans
    }

    /// The single mutation entry point. The current map is only replaced
    /// once the action and its propagation both succeeded.
    pub fn dispatch(&mut self, action: Action) -> Result<&SwatchMap> {
        let result = reduce(&self.swatches, action, &self.config, &mut self.rng)?;
        self.publish(result);
        Ok(&self.swatches)
    }

    /// Decode and dispatch an action from its external form. A `new_swatch`
    /// without an id gets the map's next free id.
    pub fn dispatch_raw(&mut self, mut raw: RawAction) -> Result<&SwatchMap> {
        if raw.kind == "new_swatch" && raw.id.is_none() {
            raw.id = Some(self.swatches.next_id()?);
        }
        let action = Action::try_from(raw)?;
        self.dispatch(action)
    }

    /// Replace the palette with a new tree seeded from `preview`, then
    /// propagate the whole tree.
    pub fn refresh(&mut self, preview: Hswl) -> Result<&SwatchMap> {
        let fresh = initial_swatches(preview, &self.config)?;
        let result = propagate_all(&fresh)?;
        self.publish(result);
        Ok(&self.swatches)
    }

    fn publish(&mut self, result: Propagation) {
        if !result.orphans.is_empty() {
            warn!(orphans = ?result.orphans, "swatches with missing parents");
        }
        self.swatches = result.swatches;
        self.orphans = result.orphans;
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;
