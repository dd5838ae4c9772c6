//! View-state derivation: what the map shows for a given selection.
//!
//! [`derive_view_state`] is a pure function of the selection, the dataset
//! and the view tuning. Selections naming ids that the dataset does not
//! contain are treated as absent. [`ViewStateCache`] memoizes the last
//! result per dataset revision and selection.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::anomalies::{self, Anomaly, AnomalyCategory};
use crate::catalog;
use crate::config::ViewTuning;
use crate::dataset::WarehouseDataset;
use crate::geometry::{Bounds, Point, ViewBox};
use crate::scatter::Asset;
use crate::selection::{ActiveView, SelectionState};
use crate::zones::Zone;

/// How one asset dot is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRender {
    /// Display position, zone offset applied.
    pub position: Point,
    pub fill: String,
    pub opacity: f32,
    /// Pulsing ring around the dot.
    pub ping: bool,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyMarker {
    pub anomaly_id: String,
    pub asset_type: String,
    pub category: AnomalyCategory,
    /// Display position, zone offset applied.
    pub position: Point,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub view_box: ViewBox,
    pub zone_opacity: BTreeMap<String, f32>,
    pub assets: BTreeMap<String, AssetRender>,
    pub anomaly_markers: Vec<AnomalyMarker>,
}

impl ViewState {
    /// Opacity of `zone_id`; unknown zones are drawn at full opacity.
    pub fn zone_opacity(&self, zone_id: &str) -> f32 {
        self.zone_opacity.get(zone_id).copied().unwrap_or(1.0)
    }

    pub fn asset(&self, asset_id: &str) -> Option<&AssetRender> {
        self.assets.get(asset_id)
    }
}

/// Selection with every id resolved against the dataset.
struct Resolved<'a> {
    asset: Option<&'a Asset>,
    rack_id: Option<&'a str>,
    asset_type: Option<&'static str>,
    anomaly: Option<&'a Anomaly>,
    filter: Option<AnomalyCategory>,
}

impl<'a> Resolved<'a> {
    fn new(selection: &'a SelectionState, dataset: &'a WarehouseDataset) -> Self {
        let rack_id = selection.selected_rack_id.as_deref().filter(|id| {
            dataset.zone_of_row(id).is_some() || dataset.assets_in_row(id).next().is_some()
        });
        let anomaly = selection.selected_anomaly.as_ref().and_then(|r| {
            dataset
                .anomalies
                .values()
                .flat_map(|g| g.iter())
                .find(|a| r.matches(a))
        });
        Self {
            asset: selection
                .selected_asset_id
                .as_deref()
                .and_then(|id| dataset.asset(id)),
            rack_id,
            asset_type: selection
                .selected_asset_type
                .as_deref()
                .and_then(catalog::find)
                .map(|t| t.name),
            anomaly,
            filter: selection.anomaly_filter,
        }
    }

    fn anomaly_context(&self) -> bool {
        self.anomaly.is_some() || self.filter.is_some()
    }
}

/// Zone framed when a rack is selected: the zone whose rows include it,
/// else the zone of the first asset in it.
fn rack_zone<'a>(dataset: &'a WarehouseDataset, rack_id: &str) -> Option<&'a Zone> {
    dataset.zone_of_row(rack_id).or_else(|| {
        dataset
            .assets_in_row(rack_id)
            .next()
            .and_then(|a| dataset.zone(&a.zone_id))
    })
}

/// Full-map camera: every zone (offset applied) and framing fixture, never
/// smaller than the minimum extent, padded and shifted.
pub fn default_view_box(dataset: &WarehouseDataset, tuning: &ViewTuning) -> ViewBox {
    let mut b = Bounds::from_rect(&tuning.min_extent);
    for rect in dataset.zones.iter().filter_map(|z| z.display_rect()) {
        b.include_rect(&rect);
    }
    for rect in dataset.blueprint.framing_rects() {
        b.include_rect(rect);
    }
    let pad = tuning.default_padding;
    ViewBox::new(
        b.min_x - pad + tuning.default_shift.dx,
        b.min_y - pad + tuning.default_shift.dy,
        b.width() + pad * 2.0,
        b.height() + pad * 2.0,
    )
}

fn view_box(
    selection: &SelectionState,
    resolved: &Resolved<'_>,
    dataset: &WarehouseDataset,
    tuning: &ViewTuning,
) -> ViewBox {
    let rack_focus = resolved
        .rack_id
        .and_then(|id| rack_zone(dataset, id))
        .and_then(|z| z.focus_view_box(tuning.zone_padding));
    if let Some(vb) = rack_focus {
        return vb;
    }
    if let ActiveView::Zone(zone_id) = &selection.view {
        if let Some(vb) = dataset
            .zone(zone_id)
            .and_then(|z| z.focus_view_box(tuning.zone_padding))
        {
            return vb;
        }
    }
    default_view_box(dataset, tuning)
}

fn zone_opacity(zone: &Zone, resolved: &Resolved<'_>, dataset: &WarehouseDataset, tuning: &ViewTuning) -> f32 {
    if resolved.anomaly_context() {
        tuning.zone_opacity_anomaly
    } else if let Some(t) = resolved.asset_type {
        if dataset.zone_has_type(&zone.id, t) {
            1.0
        } else {
            tuning.zone_opacity_type_absent
        }
    } else if let Some(asset) = resolved.asset {
        if asset.zone_id == zone.id {
            1.0
        } else {
            tuning.zone_opacity_asset_elsewhere
        }
    } else {
        1.0
    }
}

fn asset_render(asset: &Asset, resolved: &Resolved<'_>, dataset: &WarehouseDataset, tuning: &ViewTuning) -> AssetRender {
    let selected = resolved.asset.is_some_and(|a| a.id == asset.id);
    let in_rack = resolved
        .rack_id
        .is_some_and(|r| asset.row_id.as_deref() == Some(r));
    let type_match = resolved.asset_type.map(|t| asset.asset_type == t);

    let (fill, ping) = match type_match {
        Some(true) => (&tuning.highlight_color, true),
        Some(false) => (&tuning.neutral_color, false),
        None if selected => (&tuning.highlight_color, true),
        None if in_rack => (&tuning.rack_color, false),
        None => (&tuning.neutral_color, false),
    };
    let radius = if selected || in_rack || type_match == Some(true) {
        tuning.highlighted_dot_radius
    } else {
        tuning.dot_radius
    };
    let by_type = if type_match == Some(false) {
        tuning.asset_opacity_type_mismatch
    } else {
        1.0
    };
    let by_anomaly = if resolved.anomaly.is_some() {
        tuning.asset_opacity_anomaly_selected
    } else if resolved.filter.is_some() {
        tuning.asset_opacity_anomaly_filter
    } else {
        1.0
    };

    AssetRender {
        position: asset.position.offset(dataset.zone_offset(Some(&asset.zone_id))),
        fill: fill.clone(),
        opacity: by_type * by_anomaly,
        ping,
        radius,
    }
}

fn marker(a: &Anomaly, dataset: &WarehouseDataset, tuning: &ViewTuning) -> AnomalyMarker {
    let category = a.status.category();
    let color = match category {
        AnomalyCategory::Missing => &tuning.missing_color,
        AnomalyCategory::InTransit => &tuning.in_transit_color,
    };
    AnomalyMarker {
        anomaly_id: a.id.clone(),
        asset_type: a.asset_type.to_string(),
        category,
        position: a.position.offset(dataset.zone_offset(a.zone_id.as_deref())),
        color: color.clone(),
    }
}

fn anomaly_markers(resolved: &Resolved<'_>, dataset: &WarehouseDataset, tuning: &ViewTuning) -> Vec<AnomalyMarker> {
    if let Some(a) = resolved.anomaly {
        return vec![marker(a, dataset, tuning)];
    }
    if let Some(category) = resolved.filter {
        return anomalies::all_in_category(&dataset.anomalies, category)
            .map(|a| marker(a, dataset, tuning))
            .collect();
    }
    let active_type = resolved
        .asset_type
        .or_else(|| resolved.asset.map(|a| a.asset_type));
    match active_type.and_then(|t| dataset.anomalies.get(t)) {
        Some(group) => group.iter().map(|a| marker(a, dataset, tuning)).collect(),
        None => Vec::new(),
    }
}

/// Derive everything the map needs to draw `selection`.
pub fn derive_view_state(
    selection: &SelectionState,
    dataset: &WarehouseDataset,
    tuning: &ViewTuning,
) -> ViewState {
    let resolved = Resolved::new(selection, dataset);
    ViewState {
        view_box: view_box(selection, &resolved, dataset, tuning),
        zone_opacity: dataset
            .zones
            .iter()
            .map(|z| (z.id.clone(), zone_opacity(z, &resolved, dataset, tuning)))
            .collect(),
        assets: dataset
            .assets
            .iter()
            .map(|a| (a.id.clone(), asset_render(a, &resolved, dataset, tuning)))
            .collect(),
        anomaly_markers: anomaly_markers(&resolved, dataset, tuning),
    }
}

struct CacheEntry {
    revision: u64,
    selection: SelectionState,
    state: ViewState,
}

/// Keeps the last derived view state and recomputes only when the dataset
/// revision or the selection changes.
pub struct ViewStateCache {
    tuning: ViewTuning,
    entry: Option<CacheEntry>,
    hits: u64,
    misses: u64,
}

impl ViewStateCache {
    pub fn new(tuning: ViewTuning) -> Self {
        Self {
            tuning,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, dataset: &WarehouseDataset, selection: &SelectionState) -> &ViewState {
        let stale = self
            .entry
            .as_ref()
            .map_or(true, |e| e.revision != dataset.revision || e.selection != *selection);
        if stale {
            self.entry = None;
            self.misses += 1;
        } else {
            self.hits += 1;
        }
        let tuning = &self.tuning;
        &self
            .entry
            .get_or_insert_with(|| CacheEntry {
                revision: dataset.revision,
                selection: selection.clone(),
                state: derive_view_state(selection, dataset, tuning),
            })
            .state
    }

    /// `(hits, misses)` so far.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
