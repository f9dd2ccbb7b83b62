//! End-to-end tests for the palette pipeline.
//!
//! Each test drives the public API the way the binary does: config → palette
//! → raw actions → report.

use std::io::Write;

use instint::color::Hswl;
use instint::config::PaletteConfig;
use instint::contrast::{contrast_ratio, max_achievable_contrast};
use instint::report::{PaletteFormatter, PaletteReport, TextFormatter};
use instint::sampler::{random_hswl, SampleRanges};
use instint::swatch::{ChannelMode, LumMode, SwatchMap};
use instint::{Palette, PaletteError, RawAction};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn palette_from(h: f64, s: f64, wl: f64) -> Palette {
    Palette::new(Hswl::new(h, s, wl), PaletteConfig::default(), StdRng::seed_from_u64(7)).unwrap()
}

fn action(kind: &str, id: Option<u32>, value: Value) -> RawAction {
    RawAction::new(kind, id, value)
}

fn write_script(actions: &Value) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{actions}").unwrap();
    tmp.flush().unwrap();
    tmp
}

fn run_script(palette: &mut Palette, script: &NamedTempFile) -> Result<(), PaletteError> {
    let text = std::fs::read_to_string(script.path())?;
    let actions: Vec<RawAction> = serde_json::from_str(&text)?;
    for raw in actions {
        palette.dispatch_raw(raw)?;
    }
    Ok(())
}

fn hswl_of(map: &SwatchMap, id: u32) -> Hswl {
    map.get(id).unwrap().hswl
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn dark_root_child_leans_light() {
    let palette = palette_from(200.0, 0.5, 0.1);
    let root = hswl_of(palette.swatches(), 0);
    let child = hswl_of(palette.swatches(), 1);

    assert!(!root.is_light());
    assert!(child.wl > root.wl);
    assert!((contrast_ratio(root.wl, child.wl) - 4.5).abs() < 1e-9);
}

#[test]
fn random_roots_reach_full_contrast() {
    let mut rng = StdRng::seed_from_u64(21);
    let ranges = SampleRanges::default();
    for _ in 0..1000 {
        let color = random_hswl(&mut rng, 21.0, &ranges).normalized();
        assert!(max_achievable_contrast(&color) >= 21.0 - 1e-9, "{color}");
    }
}

#[test]
fn hue_wraps_and_flows_to_adjusting_child() {
    let mut palette = palette_from(200.0, 0.5, 0.1);
    palette.dispatch_raw(action("changed_adjust_hue", Some(1), json!(20))).unwrap();
    palette.dispatch_raw(action("changed_hue", None, json!(370))).unwrap();

    let swatches = palette.swatches();
    assert!((hswl_of(swatches, 0).h - 10.0).abs() < 1e-9);
    assert!((hswl_of(swatches, 1).h - 30.0).abs() < 1e-9);
}

#[test]
fn bogus_toggle_is_rejected_and_state_kept() {
    let mut palette = palette_from(200.0, 0.5, 0.1);
    let before = palette.swatches().clone();

    let err = palette
        .dispatch_raw(action("changed_hue_toggle", Some(1), json!("bogus")))
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, PaletteError::UnknownMode { .. }));
    assert_eq!(palette.swatches(), &before);
}

#[test]
fn action_script_from_file() {
    let mut palette = palette_from(30.0, 0.7, 0.8);
    let script = write_script(&json!([
        {"type": "new_swatch"},
        {"type": "changed_contrast", "id": 4, "value": 12},
        {"type": "changed_sat_toggle", "id": 4, "value": "fix"},
        {"type": "changed_fix_sat", "id": 4, "value": 0.1},
        {"type": "changed_lum_toggle", "id": 2, "value": "adjust"},
        {"type": "changed_adjust_lum", "id": 2, "value": -0.3},
    ]));
    run_script(&mut palette, &script).unwrap();

    let swatches = palette.swatches();
    let root = hswl_of(swatches, 0);
    let added = swatches.get(4).unwrap();
    assert_eq!(added.parent_id, Some(0));
    assert_eq!(added.toggle_opts.s, ChannelMode::Fix);
    assert!((added.hswl.s - 0.1).abs() < 1e-9);
    assert!((contrast_ratio(root.wl, added.hswl.wl) - 12.0).abs() < 1e-6);

    let adjusted = swatches.get(2).unwrap();
    assert_eq!(adjusted.toggle_opts.wl, LumMode::Adjust);
    assert!((adjusted.hswl.wl - 0.5).abs() < 1e-9);
}

#[test]
fn script_stops_at_first_bad_action() {
    let mut palette = palette_from(200.0, 0.5, 0.1);
    let script = write_script(&json!([
        {"type": "changed_hue", "value": 120},
        {"type": "changed_everything", "value": 1},
        {"type": "changed_hue", "value": 240},
    ]));
    let err = run_script(&mut palette, &script).unwrap_err();
    assert!(matches!(err, PaletteError::UnknownAction(ref kind) if kind == "changed_everything"));
    assert!((hswl_of(palette.swatches(), 0).h - 120.0).abs() < 1e-9);
}

#[test]
fn editing_one_child_leaves_siblings_alone() {
    let mut palette = palette_from(120.0, 0.4, 0.6);
    palette.dispatch_raw(action("new_swatch", None, Value::Null)).unwrap();
    let before = palette.swatches().clone();

    palette.dispatch_raw(action("changed_contrast", Some(1), json!(3))).unwrap();
    let after = palette.swatches();

    for id in [0, 2, 3, 4] {
        assert_eq!(before.get(id), after.get(id), "swatch {id} changed");
    }
    assert_ne!(before.get(1), after.get(1));
}

#[test]
fn same_seed_same_palette() {
    let config = PaletteConfig::default();
    let a = Palette::random(config.clone(), StdRng::seed_from_u64(99)).unwrap();
    let b = Palette::random(config, StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a.swatches(), b.swatches());
}

#[test]
fn report_lists_whole_tree() {
    let mut palette = palette_from(200.0, 0.5, 0.1);
    palette.dispatch_raw(action("new_swatch", None, Value::Null)).unwrap();

    let report = PaletteReport::from_swatches(palette.swatches(), palette.root_id());
    let text = TextFormatter.format(&report).unwrap();

    assert_eq!(report.rows.len(), 5);
    assert!(text.starts_with("Palette (root 0, 5 swatches)"));
    for id in 0..5 {
        assert!(text.contains(&format!("[{id}] #")), "missing swatch {id}");
    }
}
