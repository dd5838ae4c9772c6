//! Integration tests for the full warehouse pipeline.
//!
//! Exercises: WarehouseConfig → generate → derive_view_state / browse /
//! details / validation
//!
//! All tests are pure logic, no rendering.

use floorplan_logic::anomalies::{find_by_id, AnomalyCategory};
use floorplan_logic::browse::{group_assets, type_summaries};
use floorplan_logic::catalog::type_names;
use floorplan_logic::config::{WarehouseConfig, ZonePath};
use floorplan_logic::dataset::{generate, WarehouseDataset};
use floorplan_logic::details::asset_details;
use floorplan_logic::geometry::{Offset, Point, ViewBox};
use floorplan_logic::blueprint::Blueprint;
use floorplan_logic::outline::{build_outline, OutlineSource};
use floorplan_logic::selection::SelectionState;
use floorplan_logic::validation::{validate_all, Severity};
use floorplan_logic::view::{derive_view_state, ViewState, ViewStateCache};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

fn build(config: &WarehouseConfig, seed: u64) -> WarehouseDataset {
    generate(config, &mut StdRng::seed_from_u64(seed))
}

fn default_dataset() -> (WarehouseConfig, WarehouseDataset) {
    let config = WarehouseConfig::default();
    let dataset = build(&config, 42);
    (config, dataset)
}

fn view(config: &WarehouseConfig, dataset: &WarehouseDataset, s: &SelectionState) -> ViewState {
    derive_view_state(s, dataset, &config.view)
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
}

const ZONE_D_FOCUS: ViewBox = ViewBox {
    x: 730.0,
    y: 100.0,
    width: 240.0,
    height: 270.0,
};

// ── Pipeline coherence ─────────────────────────────────────────────────

#[test]
fn test_pipeline_validates_cleanly() {
    let (config, dataset) = default_dataset();
    let errors: Vec<_> = validate_all(&dataset, &config)
        .into_iter()
        .filter(|e| e.severity == Severity::Error)
        .collect();
    assert!(errors.is_empty(), "{:#?}", errors);
}

#[test]
fn test_pipeline_shape() {
    let (_, d) = default_dataset();
    assert_eq!(d.version, "v3-unique-asset-ids");
    assert_eq!(d.zones.len(), 6);
    assert!(d.assets.len() > 500, "only {} assets", d.assets.len());
    assert_eq!(d.outline.source, OutlineSource::Manual);
    assert!(d.outline.to_svg_path().starts_with("M -100 80 L -100 -150"));
    assert_eq!(d.forklifts.len(), 3);
}

#[test]
fn test_config_json_round_trip_generates_same_warehouse() {
    let config = WarehouseConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let restored: WarehouseConfig = serde_json::from_str(&json).unwrap();
    let a = build(&config, 9);
    let b = build(&restored, 9);
    let ids = |d: &WarehouseDataset| d.assets.iter().map(|x| x.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&a), ids(&b));
    assert_eq!(a.outline.points, b.outline.points);
}

#[test]
fn test_zone_c_holds_only_pallets() {
    let (_, d) = default_dataset();
    for a in d.assets.iter().filter(|a| a.zone_id == "zone-c") {
        assert_eq!(a.asset_type, type_names::PALLETS);
    }
}

#[test]
fn test_hull_outline_when_manual_points_disabled() {
    let mut config = WarehouseConfig::default();
    config.outline.use_manual_points = false;
    let d = build(&config, 7);
    assert_eq!(d.outline.source, OutlineSource::Hull);
    let pts = &d.outline.points;
    assert!(pts.len() >= 4);
    assert_eq!(pts.first(), pts.last());
    assert!(pts.windows(2).all(|w| w[0].x == w[1].x || w[0].y == w[1].y));
}

#[test]
fn test_shapeless_zone_is_skipped() {
    let mut config = WarehouseConfig::default();
    config.zones[1].rect = None;
    let d = build(&config, 3);
    assert!(d.assets.iter().all(|a| a.zone_id != "zone-b"));
    assert!(!d.placements.contains_key("zone-b"));
    let v = view(&config, &d, &SelectionState::default());
    assert_eq!(v.zone_opacity("zone-b"), 1.0);
}

#[test]
fn test_shapeless_zone_left_out_of_hull_outline() {
    let mut config = WarehouseConfig::default();
    config.outline.use_manual_points = false;
    config.zones[1].rect = None;
    let d = build(&config, 3);
    let outline = build_outline(&d.zones, &Blueprint::default(), &[], &config.outline);
    assert_eq!(outline.source, OutlineSource::Hull);

    // Zones A, C-F span (-50, -100)-(1280, 600); buffer 40
    let xs = outline.points.iter().map(|p| p.x);
    let ys = outline.points.iter().map(|p| p.y);
    assert_eq!(xs.clone().fold(f32::MAX, f32::min), -90.0);
    assert_eq!(xs.fold(f32::MIN, f32::max), 1320.0);
    assert_eq!(ys.clone().fold(f32::MAX, f32::min), -140.0);
    assert_eq!(ys.fold(f32::MIN, f32::max), 640.0);

    // Zone B's buffered bottom-left corner is a hull vertex only while B has a shape
    let b_corner = Point::new(240.0, 640.0);
    assert!(!outline.points.contains(&b_corner));
    let full = build(&WarehouseConfig { outline: config.outline.clone(), ..Default::default() }, 3);
    let with_b = build_outline(&full.zones, &Blueprint::default(), &[], &config.outline);
    assert!(with_b.points.contains(&b_corner));
}

#[test]
fn test_freeform_zone_uses_path_view_box() {
    let mut config = WarehouseConfig::default();
    config.zones[5].rect = None;
    config.zones[5].path = Some(ZonePath {
        d: "M 1060 120 L 1280 120 L 1280 350 Z".to_string(),
        view_box: Some(ViewBox::new(1040.0, 100.0, 260.0, 270.0)),
    });
    let d = build(&config, 3);
    let mut s = SelectionState::default();
    s.select_zone("zone-f");
    assert_eq!(
        view(&config, &d, &s).view_box,
        ViewBox::new(1040.0, 100.0, 260.0, 270.0)
    );
}

// ── View-state scenarios ───────────────────────────────────────────────

#[test]
fn test_scenario_default_view() {
    let (config, d) = default_dataset();
    let v = view(&config, &d, &SelectionState::default());
    assert_eq!(v.view_box, ViewBox::new(-10.0, -290.0, 1630.0, 1090.0));
    for z in &d.zones {
        assert_eq!(v.zone_opacity(&z.id), 1.0);
    }
    assert!(v.anomaly_markers.is_empty());
}

#[test]
fn test_scenario_pallets_type_selected() {
    let (config, d) = default_dataset();
    let mut s = SelectionState::default();
    s.select_asset_type(type_names::PALLETS);
    let v = view(&config, &d, &s);
    for z in &d.zones {
        let expected = if z.id == "zone-c" { 1.0 } else { 0.15 };
        assert_eq!(v.zone_opacity(&z.id), expected, "{}", z.id);
    }
    let ids: Vec<&str> = v.anomaly_markers.iter().map(|m| m.anomaly_id.as_str()).collect();
    assert_eq!(ids, vec!["Pallets-InTransit-001", "Pallets-InTransit-002"]);
    assert!(v
        .anomaly_markers
        .iter()
        .all(|m| m.category == AnomalyCategory::InTransit));
}

#[test]
fn test_scenario_specific_anomaly_selected() {
    let (config, d) = default_dataset();
    let anomaly = find_by_id(&d.anomalies, "Bins-Large-Missing-001").unwrap();

    for prior_zone in [None, Some("zone-d")] {
        let mut s = SelectionState::default();
        if let Some(z) = prior_zone {
            s.select_zone(z);
        }
        let before = view(&config, &d, &s).view_box;
        s.select_anomaly(Some(anomaly.to_ref()));
        let v = view(&config, &d, &s);

        assert_eq!(v.view_box, before);
        assert!(v.zone_opacity.values().all(|&o| o == 0.25));
        assert_eq!(v.anomaly_markers.len(), 1);
        let m = &v.anomaly_markers[0];
        assert!(close(m.position, Point::new(41.0, -37.0)), "{:?}", m.position);
        assert_eq!(m.color, "#ef4444");
        assert!(v.assets.values().all(|a| (a.opacity - 0.08).abs() < 1e-6));
    }
}

#[test]
fn test_scenario_rack_in_zone_d() {
    let (config, d) = default_dataset();
    let mut s = SelectionState::default();
    s.select_zone("zone-a");
    s.select_rack("d-r3");
    assert_eq!(view(&config, &d, &s).view_box, ZONE_D_FOCUS);

    let mut fresh = SelectionState::default();
    fresh.select_rack("d-r3");
    assert_eq!(view(&config, &d, &fresh).view_box, ZONE_D_FOCUS);
}

#[test]
fn test_zone_offset_moves_camera_and_markers() {
    let mut config = WarehouseConfig::default();
    config.zones[0].offset = Offset { dx: 15.0, dy: -10.0 };
    let d = build(&config, 42);

    let mut s = SelectionState::default();
    s.select_zone("zone-a");
    assert_eq!(
        view(&config, &d, &s).view_box,
        ViewBox::new(-55.0, -130.0, 300.0, 180.0)
    );

    s.set_anomaly_filter(Some(AnomalyCategory::Missing));
    let v = view(&config, &d, &s);
    let m = v
        .anomaly_markers
        .iter()
        .find(|m| m.anomaly_id == "Bins-Large-Missing-001")
        .unwrap();
    assert!(close(m.position, Point::new(56.0, -47.0)), "{:?}", m.position);

    let a = d.assets.iter().find(|a| a.zone_id == "zone-a").unwrap();
    let r = v.asset(&a.id).unwrap();
    assert!(close(r.position, Point::new(a.position.x + 15.0, a.position.y - 10.0)));
}

#[test]
fn test_deselecting_anomaly_returns_to_filtered_list() {
    let (config, d) = default_dataset();
    let anomaly = find_by_id(&d.anomalies, "Boxes-InTransit-001").unwrap();
    let mut s = SelectionState::default();
    s.select_zone("zone-b");
    s.set_anomaly_filter(Some(AnomalyCategory::InTransit));
    s.select_anomaly(Some(anomaly.to_ref()));
    assert_eq!(view(&config, &d, &s).anomaly_markers.len(), 1);

    s.select_anomaly(None);
    let v = view(&config, &d, &s);
    assert_eq!(v.anomaly_markers.len(), 4);
    assert!(v.zone_opacity.values().all(|&o| o == 0.25));
    assert_eq!(v.view_box, ViewBox::new(260.0, 460.0, 590.0, 160.0));
}

#[test]
fn test_clear_selection_keeps_zone_camera() {
    let (config, d) = default_dataset();
    let mut s = SelectionState::default();
    s.select_zone("zone-b");
    s.select_asset_type(type_names::PALLETS);
    s.clear_selection();
    let v = view(&config, &d, &s);
    assert_eq!(v.view_box, ViewBox::new(260.0, 460.0, 590.0, 160.0));
    assert!(v.zone_opacity.values().all(|&o| o == 1.0));
    assert!(v.anomaly_markers.is_empty());
}

#[test]
fn test_reset_returns_to_default_view() {
    let (config, d) = default_dataset();
    let baseline = view(&config, &d, &SelectionState::default());
    let mut s = SelectionState::default();
    s.select_zone("zone-e");
    s.select_asset(&d.assets[10].id);
    s.set_anomaly_filter(Some(AnomalyCategory::InTransit));
    assert_ne!(view(&config, &d, &s), baseline);
    s.reset();
    assert_eq!(view(&config, &d, &s), baseline);
}

#[test]
fn test_cache_tracks_dataset_revision() {
    let config = WarehouseConfig::default();
    let first = build(&config, 1);
    let second = build(&config, 1);
    let mut cache = ViewStateCache::new(config.view.clone());
    let s = SelectionState::default();
    cache.get(&first, &s);
    cache.get(&first, &s);
    cache.get(&second, &s);
    assert_eq!(cache.stats(), (1, 2));
}

// ── Browse and details ─────────────────────────────────────────────────

#[test]
fn test_browse_totals_match_dataset() {
    let (_, d) = default_dataset();
    let groups = group_assets(&d, "");
    for g in &groups {
        let in_zone = d
            .assets
            .iter()
            .filter(|a| a.zone_id == g.zone_id && a.row_id.is_some())
            .count();
        assert_eq!(g.total(), in_zone, "{}", g.zone_id);
    }
    let racks = type_summaries(&d)
        .into_iter()
        .find(|t| t.asset_type == type_names::RACKS)
        .unwrap();
    assert_eq!((racks.missing, racks.in_transit), (0, 0));
    assert!(racks.count > 0);
}

#[test]
fn test_asset_details_for_every_asset() {
    let (_, d) = default_dataset();
    for a in &d.assets {
        let details = asset_details(&d, &a.id).unwrap();
        assert!(details.item_number.starts_with("ITEM-"));
        assert!((1..=50).contains(&details.quantity));
    }
}
