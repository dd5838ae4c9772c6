//! Declarative warehouse configuration.
//!
//! Every zone-specific rule lives in a [`ZoneSpec`] row instead of being
//! branched on in code: the row layout kind, the hidden placement grid and
//! the occupancy rules. Generation runs one generic algorithm per layout kind
//! over this table. [`WarehouseConfig::default`] reproduces the authored
//! six-zone warehouse; any field can be overridden from JSON since every
//! table carries `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use crate::catalog::type_names;
use crate::geometry::{Offset, Point, Rect, ViewBox};

/// Complete configuration for generating and viewing a warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Dataset version tag; changing it invalidates cached view state.
    pub version: String,
    pub zones: Vec<ZoneSpec>,
    pub layout: LayoutTuning,
    pub outline: OutlineTuning,
    pub view: ViewTuning,
    /// Run occupancy over the selector's active cells rather than the full grid.
    pub populate_active_only: bool,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            version: "v3-unique-asset-ids".to_string(),
            zones: default_zones(),
            layout: LayoutTuning::default(),
            outline: OutlineTuning::default(),
            view: ViewTuning::default(),
            populate_active_only: false,
        }
    }
}

/// One row of the zone table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: String,
    pub name: String,
    pub color: String,
    pub border_color: String,
    #[serde(default)]
    pub label_pos: Point,
    /// Rectangular footprint. Takes precedence over `path` for layout.
    #[serde(default)]
    pub rect: Option<Rect>,
    /// Freeform footprint for zones without a rectangle.
    #[serde(default)]
    pub path: Option<ZonePath>,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub rows: RowLayout,
    #[serde(default)]
    pub placement: Option<PlacementGrid>,
    #[serde(default)]
    pub occupancy: OccupancyRules,
}

/// SVG path outline plus the camera window to use when zooming to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZonePath {
    pub d: String,
    #[serde(default)]
    pub view_box: Option<ViewBox>,
}

/// How a zone's padded interior is partitioned into visible rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowLayout {
    /// No visible rows.
    #[default]
    None,
    /// Full-height vertical strips, left to right.
    Columns { count: usize, gap: f32 },
    /// Full-width horizontal strips, top to bottom.
    Bars { count: usize, gap: f32 },
    /// `columns` x `rows` cells, row-major.
    Grid { columns: usize, rows: usize, gap: f32 },
}

/// Hidden placement grid: `total` cells in `rows` rows, `fill` of them active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacementGrid {
    pub total: usize,
    pub rows: usize,
    pub fill: usize,
}

/// Which asset families a zone holds and how densely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OccupancyRules {
    /// Exclusive types, reserved in this order.
    pub exclusive: Vec<ExclusiveReservation>,
    pub racks: RackPolicy,
    /// Random pallet count per unreserved cell, inclusive.
    pub pallets: Option<CountRange>,
    /// Boxes go into every `stride`-th unreserved cell.
    pub boxes_stride: Option<usize>,
}

/// An exclusive type and how many cells it reserves.
/// `cells: None` falls back to the layout default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExclusiveReservation {
    pub asset_type: String,
    #[serde(default)]
    pub cells: Option<usize>,
}

impl ExclusiveReservation {
    pub fn new(asset_type: &str, cells: Option<usize>) -> Self {
        Self {
            asset_type: asset_type.to_string(),
            cells,
        }
    }
}

/// Where racks are placed, one per cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RackPolicy {
    #[default]
    None,
    /// Every cell, reserved ones included.
    EveryCell,
    /// Only cells left after exclusive reservation.
    UnreservedCells,
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

/// Generation constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutTuning {
    /// Interior padding used for visible rows.
    pub row_padding: f32,
    /// Interior padding used for placement cells.
    pub placement_padding: f32,
    pub placement_gap: f32,
    /// Scatter points stay this far from cell edges.
    pub scatter_margin: f32,
    /// Jitter radius per history sample, oldest first.
    pub history_jitter: Vec<f32>,
    /// Timestamps per history sample; one more than `history_jitter`.
    pub history_timestamps: Vec<u32>,
    pub cluster_base: u32,
    pub cluster_spread: u32,
    pub reservation_stride: usize,
    /// Cells reserved for an exclusive type with no explicit count.
    pub default_reservation: usize,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            row_padding: 10.0,
            placement_padding: 12.0,
            placement_gap: 8.0,
            scatter_margin: 6.0,
            history_jitter: vec![40.0, 20.0],
            history_timestamps: vec![0, 2, 4],
            cluster_base: 6,
            cluster_spread: 10,
            reservation_stride: 997,
            default_reservation: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutlineTuning {
    /// Clearance kept between the outline and any element.
    pub buffer: f32,
    /// Use the blueprint's hand-placed outline points when present.
    pub use_manual_points: bool,
}

impl Default for OutlineTuning {
    fn default() -> Self {
        Self {
            buffer: 40.0,
            use_manual_points: true,
        }
    }
}

/// View derivation constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewTuning {
    /// Margin around a zone when zoomed to it.
    pub zone_padding: f32,
    pub default_padding: f32,
    /// Manual recentering of the default view.
    pub default_shift: Offset,
    /// The default view always covers at least this rectangle.
    pub min_extent: Rect,
    pub zone_opacity_anomaly: f32,
    pub zone_opacity_type_absent: f32,
    pub zone_opacity_asset_elsewhere: f32,
    pub asset_opacity_type_mismatch: f32,
    pub asset_opacity_anomaly_selected: f32,
    pub asset_opacity_anomaly_filter: f32,
    pub highlight_color: String,
    pub rack_color: String,
    pub neutral_color: String,
    pub missing_color: String,
    pub in_transit_color: String,
    pub dot_radius: f32,
    pub highlighted_dot_radius: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            zone_padding: 20.0,
            default_padding: 150.0,
            default_shift: Offset {
                dx: 190.0,
                dy: -40.0,
            },
            min_extent: Rect::new(0.0, 0.0, 800.0, 600.0),
            zone_opacity_anomaly: 0.25,
            zone_opacity_type_absent: 0.15,
            zone_opacity_asset_elsewhere: 0.3,
            asset_opacity_type_mismatch: 0.2,
            asset_opacity_anomaly_selected: 0.08,
            asset_opacity_anomaly_filter: 0.2,
            highlight_color: "#22c55e".to_string(),
            rack_color: "#3b82f6".to_string(),
            neutral_color: "#9ca3af".to_string(),
            missing_color: "#ef4444".to_string(),
            in_transit_color: "#fb923c".to_string(),
            dot_radius: 1.0,
            highlighted_dot_radius: 3.0,
        }
    }
}

// ── Authored zone table ─────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn zone(
    id: &str,
    name: &str,
    color: &str,
    border_color: &str,
    label_pos: (f32, f32),
    rect: (f32, f32, f32, f32),
    rows: RowLayout,
    placement: (usize, usize, usize),
    occupancy: OccupancyRules,
) -> ZoneSpec {
    ZoneSpec {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        border_color: border_color.to_string(),
        label_pos: Point::new(label_pos.0, label_pos.1),
        rect: Some(Rect::new(rect.0, rect.1, rect.2, rect.3)),
        path: None,
        offset: Offset::default(),
        rows,
        placement: Some(PlacementGrid {
            total: placement.0,
            rows: placement.1,
            fill: placement.2,
        }),
        occupancy,
    }
}

fn reserve(types: &[(&str, Option<usize>)]) -> Vec<ExclusiveReservation> {
    types
        .iter()
        .map(|(t, n)| ExclusiveReservation::new(t, *n))
        .collect()
}

/// The six authored zones.
///
/// Bins are confined to D and F, totes to A and E, crates to A and D.
pub fn default_zones() -> Vec<ZoneSpec> {
    use type_names::*;

    vec![
        zone(
            "zone-a",
            "Zone A",
            "rgba(59, 130, 246, 0.25)",
            "rgb(59, 130, 246)",
            (60.0, 60.0),
            (-50.0, -100.0, 260.0, 140.0),
            RowLayout::Columns { count: 8, gap: 6.0 },
            (40, 4, 8),
            OccupancyRules {
                exclusive: reserve(&[
                    (TOTES_LARGE, Some(2)),
                    (TOTES_MEDIUM, Some(4)),
                    (TOTES_SMALL, Some(3)),
                    (CRATES_LARGE, None),
                    (CRATES_SMALL, None),
                ]),
                racks: RackPolicy::EveryCell,
                ..Default::default()
            },
        ),
        zone(
            "zone-b",
            "Zone B",
            "rgba(34, 197, 94, 0.25)",
            "rgb(34, 197, 94)",
            (60.0, 280.0),
            (280.0, 480.0, 550.0, 120.0),
            RowLayout::Bars { count: 12, gap: 4.0 },
            (120, 6, 25),
            OccupancyRules {
                racks: RackPolicy::UnreservedCells,
                boxes_stride: Some(4),
                ..Default::default()
            },
        ),
        zone(
            "zone-c",
            "Zone C",
            "rgba(239, 68, 68, 0.3)",
            "rgb(239, 68, 68)",
            (520.0, 80.0),
            (220.0, 100.0, 350.0, 260.0),
            RowLayout::Grid {
                columns: 6,
                rows: 4,
                gap: 8.0,
            },
            (80, 4, 15),
            OccupancyRules {
                pallets: Some(CountRange { min: 1, max: 5 }),
                ..Default::default()
            },
        ),
        zone(
            "zone-d",
            "Zone D",
            "rgba(234, 179, 8, 0.25)",
            "rgb(234, 179, 8)",
            (520.0, 340.0),
            (750.0, 120.0, 200.0, 230.0),
            RowLayout::Grid {
                columns: 4,
                rows: 2,
                gap: 8.0,
            },
            (60, 3, 10),
            OccupancyRules {
                exclusive: reserve(&[
                    (BINS_LARGE, Some(1)),
                    (BINS_MEDIUM, Some(4)),
                    (BINS_SMALL, Some(6)),
                    (CRATES_LARGE, None),
                    (CRATES_SMALL, None),
                ]),
                ..Default::default()
            },
        ),
        zone(
            "zone-e",
            "Zone E",
            "rgba(168, 85, 247, 0.25)",
            "rgb(168, 85, 247)",
            (820.0, 340.0),
            (900.0, 480.0, 320.0, 120.0),
            RowLayout::Columns {
                count: 12,
                gap: 4.0,
            },
            (40, 4, 10),
            OccupancyRules {
                exclusive: reserve(&[
                    (TOTES_LARGE, Some(2)),
                    (TOTES_MEDIUM, Some(2)),
                    (TOTES_SMALL, Some(5)),
                ]),
                racks: RackPolicy::EveryCell,
                boxes_stride: Some(6),
                ..Default::default()
            },
        ),
        zone(
            "zone-f",
            "Zone F",
            "rgba(251, 146, 60, 0.25)",
            "rgb(251, 146, 60)",
            (1040.0, 340.0),
            (1060.0, 120.0, 220.0, 230.0),
            RowLayout::Bars { count: 8, gap: 4.0 },
            (60, 3, 15),
            OccupancyRules {
                exclusive: reserve(&[
                    (BINS_LARGE, Some(2)),
                    (BINS_MEDIUM, Some(2)),
                    (BINS_SMALL, Some(3)),
                ]),
                ..Default::default()
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_six_zones_with_unique_ids() {
        let config = WarehouseConfig::default();
        assert_eq!(config.zones.len(), 6);
        let mut ids: Vec<_> = config.zones.iter().map(|z| z.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_history_tuning_is_consistent() {
        let layout = LayoutTuning::default();
        assert_eq!(
            layout.history_timestamps.len(),
            layout.history_jitter.len() + 1
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "outline": { "buffer": 25.0 }, "populate_active_only": true }"#;
        let config: WarehouseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.outline.buffer, 25.0);
        assert!(config.outline.use_manual_points);
        assert!(config.populate_active_only);
        assert_eq!(config.zones.len(), 6);
        assert_eq!(config.view.zone_padding, 20.0);
    }

    #[test]
    fn test_row_layout_json_shape() {
        let json = r#"{ "kind": "grid", "columns": 4, "rows": 2, "gap": 8.0 }"#;
        let layout: RowLayout = serde_json::from_str(json).unwrap();
        assert_eq!(
            layout,
            RowLayout::Grid {
                columns: 4,
                rows: 2,
                gap: 8.0
            }
        );
    }
}
