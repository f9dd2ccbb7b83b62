//! Keeping descendants consistent after an edit.
//!
//! A swatch's effective color depends only on its own configuration and its
//! parent's effective color, so a pre-order walk from the edited swatch
//! recomputes everything that can have changed, parents before children.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use super::{SwatchId, SwatchMap};
use crate::derive::{derive, DeriveOptions};
use crate::error::{PaletteError, Result};

/// Result of a propagation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    pub swatches: SwatchMap,
    /// Swatches recomputed, in visiting order.
    pub visited: Vec<SwatchId>,
    /// Swatches whose parent id points at nothing. They kept their own color.
    pub orphans: Vec<SwatchId>,
}

impl Propagation {
    /// Wrap a map that was not walked.
    pub fn untouched(swatches: SwatchMap) -> Self {
        Self {
            swatches,
            visited: Vec::new(),
            orphans: Vec::new(),
        }
    }
}

/// Re-derive `start` from its parent, then every descendant of `start`.
///
/// Each swatch is visited at most once; meeting one again means the parent
/// links loop, which is reported as [`PaletteError::Cycle`]. The input map
/// is left untouched.
pub fn propagate(start: SwatchId, swatches: &SwatchMap) -> Result<Propagation> {
    if !swatches.contains(start) {
        return Err(PaletteError::UnknownSwatch(start));
    }

    let children = swatches.children_index();
    let mut next = swatches.clone();
    let mut visited = Vec::new();
    let mut seen = HashSet::new();
    let mut orphans = Vec::new();
    let mut stack = vec![start];

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            return Err(PaletteError::Cycle { id });
        }
        visited.push(id);

        let Some(swatch) = next.get(id) else {
            continue;
        };

        let options = DeriveOptions::for_swatch(swatch);
        if let Some(parent_id) = swatch.parent_id {
            match next.get(parent_id).map(|parent| derive(&parent.hswl, &options)) {
                Some(derived) => {
                    trace!(id, parent_id, color = %derived, "derived swatch");
                    if let Some(swatch) = next.get_mut(id) {
                        swatch.hswl = derived;
                    }
                }
                None => {
                    warn!(id, parent_id, "parent missing, treating swatch as a root");
                    orphans.push(id);
                }
            }
        }

        if let Some(kids) = children.get(&id) {
            // reversed so the lowest id is walked first
            stack.extend(kids.iter().rev().copied());
        }
    }

    debug!(start, visited = visited.len(), orphans = orphans.len(), "propagated");
    Ok(Propagation {
        swatches: next,
        visited,
        orphans,
    })
}

/// Propagate from every tree root in the map, e.g. after it was replaced
/// wholesale. Swatches no root reaches sit on a parent cycle.
pub fn propagate_all(swatches: &SwatchMap) -> Result<Propagation> {
    let mut result = Propagation::untouched(swatches.clone());

    for root in swatches.tree_roots() {
        let pass = propagate(root, &result.swatches)?;
        result.swatches = pass.swatches;
        result.visited.extend(pass.visited);
        result.orphans.extend(pass.orphans);
    }

    if result.visited.len() < swatches.len() {
        let reached: HashSet<SwatchId> = result.visited.iter().copied().collect();
        if let Some(id) = swatches.ids().find(|id| !reached.contains(id)) {
            return Err(PaletteError::Cycle { id });
        }
    }
    Ok(result)
}
