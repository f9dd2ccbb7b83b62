//! Accessible color palettes derived from a single base color.
//!
//! Colors live in HSWL space (hue, saturation, WCAG relative luminance), which
//! makes contrast targets a direct computation. Swatches form a tree: each
//! child is derived from its parent and recomputed whenever an ancestor
//! changes. All edits go through [`palette::Palette::dispatch`].

pub mod color;
pub mod config;
pub mod contrast;
pub mod derive;
pub mod error;
pub mod gradient;
pub mod logging;
pub mod palette;
pub mod report;
pub mod sampler;
pub mod swatch;

pub use color::Hswl;
pub use error::{PaletteError, Result};
pub use palette::{Action, Palette, RawAction};
