use serde_json::Value;

use crate::color::Hswl;
use crate::palette::RawAction;
use crate::swatch::{Swatch, SwatchDefaults, SwatchId, SwatchMap};

pub fn hswl(h: f64, s: f64, wl: f64) -> Hswl {
    Hswl::new(h, s, wl)
}

/// A root swatch with the given native color.
pub fn root(color: Hswl) -> Swatch {
    Swatch::root(color)
}

/// A child with default modes (adjust/adjust/contrast) and the given contrast.
pub fn child(parent: SwatchId, contrast: f64) -> Swatch {
    let mut s = Swatch::child(parent, &SwatchDefaults::default());
    s.contrast = contrast;
    s
}

/// A child that only shifts the parent's hue.
pub fn hue_child(parent: SwatchId, dh: f64) -> Swatch {
    let mut s = child(parent, 1.0);
    s.adjust_hswl.h = dh;
    s
}

pub fn map_of(swatches: Vec<(SwatchId, Swatch)>) -> SwatchMap {
    swatches.into_iter().collect()
}

pub fn raw(kind: &str, id: Option<SwatchId>, value: Value) -> RawAction {
    RawAction::new(kind, id, value)
}
