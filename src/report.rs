//! Palette dumps for the terminal.
//!
//! A [`PaletteReport`] flattens the swatch tree into display rows; formatters
//! turn it into text or JSON.

use std::collections::HashSet;

use serde::Serialize;

use crate::color::Hswl;
use crate::contrast::contrast_ratio;
use crate::derive::label_color;
use crate::error::Result;
use crate::gradient::{css_linear_gradient, gradient_stops, GradientAttr, GradientStop};
use crate::swatch::{SwatchId, SwatchMap, ToggleOpts};

/// One swatch, ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwatchRow {
    pub id: SwatchId,
    pub parent_id: Option<SwatchId>,
    /// Nesting depth below the tree root.
    pub depth: usize,
    pub hex: String,
    pub hswl: Hswl,
    pub label_hex: String,
    /// Target contrast; `None` for roots.
    pub target_contrast: Option<f64>,
    /// Contrast actually reached against the parent.
    pub achieved_contrast: Option<f64>,
    pub toggle_opts: Option<ToggleOpts>,
    pub orphan: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Vec<GradientStop>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaletteReport {
    pub root_id: SwatchId,
    pub rows: Vec<SwatchRow>,
}

impl PaletteReport {
    /// Rows in tree order (each parent directly above its children).
    pub fn from_swatches(swatches: &SwatchMap, root_id: SwatchId) -> Self {
        let children = swatches.children_index();
        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for tree_root in swatches.tree_roots() {
            let mut stack = vec![(tree_root, 0usize)];
            while let Some((id, depth)) = stack.pop() {
                if !seen.insert(id) {
                    continue;
                }
                let Some(swatch) = swatches.get(id) else {
                    continue;
                };
                let parent = swatch.parent_id.and_then(|p| swatches.get(p));

                rows.push(SwatchRow {
                    id,
                    parent_id: swatch.parent_id,
                    depth,
                    hex: swatch.hswl.to_hex(),
                    hswl: swatch.hswl,
                    label_hex: label_color(&swatch.hswl).to_hex(),
                    target_contrast: parent.map(|_| swatch.contrast),
                    achieved_contrast: parent.map(|p| contrast_ratio(p.hswl.wl, swatch.hswl.wl)),
                    toggle_opts: parent.map(|_| swatch.toggle_opts),
                    orphan: !swatch.is_root() && parent.is_none(),
                    gradient: None,
                });

                if let Some(kids) = children.get(&id) {
                    stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
                }
            }
        }

        Self { root_id, rows }
    }

    /// Attach gradient stops for `attr` to every row. Contrast gradients are
    /// measured against the row's parent, or the swatch itself for roots.
    #[must_use]
    pub fn with_gradients(mut self, swatches: &SwatchMap, attr: GradientAttr, num_stops: usize) -> Self {
        for row in &mut self.rows {
            let base = match attr {
                GradientAttr::Contrast => row
                    .parent_id
                    .and_then(|p| swatches.get(p))
                    .map_or(row.hswl, |p| p.hswl),
                _ => row.hswl,
            };
            row.gradient = Some(gradient_stops(&base, attr, None, None, num_stops));
        }
        self
    }
}

/// Implement this to add another output format.
pub trait PaletteFormatter {
    fn format(&self, report: &PaletteReport) -> Result<String>;
}

#[derive(Debug, Clone, Default)]
pub struct TextFormatter;

impl PaletteFormatter for TextFormatter {
    fn format(&self, report: &PaletteReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!(
            "Palette (root {}, {} swatches)\n",
            report.root_id,
            report.rows.len()
        ));

        for row in &report.rows {
            let pad = "  ".repeat(row.depth + 1);
            let mut line = format!("{pad}[{}] {} {} label {}", row.id, row.hex, row.hswl, row.label_hex);

            if let (Some(target), Some(achieved), Some(modes)) =
                (row.target_contrast, row.achieved_contrast, row.toggle_opts)
            {
                line.push_str(&format!(
                    " contrast {achieved:.2}/{target:.2} modes h={} s={} wl={}",
                    modes.h, modes.s, modes.wl
                ));
            }
            if row.orphan {
                line.push_str(" (missing parent)");
            }
            output.push_str(&line);
            output.push('\n');

            if let Some(stops) = &row.gradient {
                output.push_str(&format!("{pad}  {}\n", css_linear_gradient(stops)));
            }
        }
        Ok(output)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl PaletteFormatter for JsonFormatter {
    fn format(&self, report: &PaletteReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swatch::{propagate, Swatch, SwatchDefaults};

    fn swatches() -> SwatchMap {
        let defaults = SwatchDefaults::default();
        let map: SwatchMap = [
            (0, Swatch::root(Hswl::new(220.0, 0.6, 0.05))),
            (1, Swatch::child(0, &defaults)),
            (2, Swatch::child(1, &defaults)),
            (3, Swatch::child(0, &defaults)),
        ]
        .into_iter()
        .collect();
        propagate(0, &map).unwrap().swatches
    }

    #[test]
    fn rows_follow_tree_order() {
        let report = PaletteReport::from_swatches(&swatches(), 0);
        let order: Vec<(SwatchId, usize)> = report.rows.iter().map(|r| (r.id, r.depth)).collect();
        assert_eq!(order, vec![(0, 0), (1, 1), (2, 2), (3, 1)]);
        assert!(report.rows[0].target_contrast.is_none());
        let achieved = report.rows[1].achieved_contrast.unwrap();
        assert!((achieved - 4.5).abs() < 1e-9);
    }

    #[test]
    fn text_output_indents_children() {
        let report = PaletteReport::from_swatches(&swatches(), 0);
        let text = TextFormatter.format(&report).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Palette (root 0, 4 swatches)");
        assert!(lines[1].starts_with("  [0] #"));
        assert!(lines[2].starts_with("    [1] #"));
        assert!(lines[2].contains("contrast 4.50/4.50 modes h=adjust s=adjust wl=contrast"));
        assert!(lines[3].starts_with("      [2] #"));
    }

    #[test]
    fn json_output_carries_rows() {
        let report = PaletteReport::from_swatches(&swatches(), 0)
            .with_gradients(&swatches(), GradientAttr::Lum, 4);
        let json: serde_json::Value = serde_json::from_str(&JsonFormatter.format(&report).unwrap()).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 4);
        assert_eq!(json["rows"][1]["parentId"], 0);
        assert_eq!(json["rows"][0]["gradient"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn orphans_are_marked() {
        let mut map = swatches();
        map.insert(9, Swatch::child(40, &SwatchDefaults::default()));
        let report = PaletteReport::from_swatches(&map, 0);
        let text = TextFormatter.format(&report).unwrap();
        assert!(text.contains("[9]"));
        assert!(text.contains("(missing parent)"));
    }
}
