//! The generated warehouse: one immutable value built by [`generate`].
//!
//! Pipeline, per zone in table order:
//!   1. Zone::from_spec       -- zone plus its visible rows
//!   2. ZonePlacement::build  -- hidden placement grid and active subset
//!   3. populate_zone         -- exclusive clusters, racks, pallets, boxes
//!
//! then the authored anomalies, blueprint and forklifts, and finally the
//! outline around everything. Lookup maps are built once here so view
//! derivation never scans the asset list for a single id.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::anomalies::{authored_anomalies, AnomalyMap};
use crate::blueprint::{authored_blueprint, authored_forklifts, Blueprint, Forklift};
use crate::config::WarehouseConfig;
use crate::geometry::Offset;
use crate::occupancy::populate_zone;
use crate::outline::{build_outline, Outline};
use crate::placement::{PlacementCell, ZonePlacement};
use crate::scatter::{Asset, Scatterer};
use crate::zones::Zone;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

/// Read-only floor plan shared by every consumer.
#[derive(Debug, Clone, Serialize)]
pub struct WarehouseDataset {
    pub version: String,
    /// Distinct for every generated dataset; keys memoized view state.
    pub revision: u64,
    pub zones: Vec<Zone>,
    /// Placement grids by zone id. Zones without a rectangle or grid have none.
    pub placements: HashMap<String, ZonePlacement>,
    pub assets: Vec<Asset>,
    pub anomalies: AnomalyMap,
    pub blueprint: Blueprint,
    pub forklifts: Vec<Forklift>,
    pub outline: Outline,
    #[serde(skip)]
    index: DatasetIndex,
}

#[derive(Debug, Clone, Default)]
struct DatasetIndex {
    zone_by_id: HashMap<String, usize>,
    zone_by_row: HashMap<String, usize>,
    asset_by_id: HashMap<String, usize>,
    assets_by_row: HashMap<String, Vec<usize>>,
    types_by_zone: HashMap<String, HashSet<&'static str>>,
}

impl DatasetIndex {
    fn build(zones: &[Zone], assets: &[Asset]) -> Self {
        let mut index = Self::default();
        for (i, zone) in zones.iter().enumerate() {
            index.zone_by_id.entry(zone.id.clone()).or_insert(i);
            for row in &zone.rows {
                index.zone_by_row.entry(row.id.clone()).or_insert(i);
            }
        }
        for (i, asset) in assets.iter().enumerate() {
            index.asset_by_id.insert(asset.id.clone(), i);
            if let Some(row_id) = &asset.row_id {
                index.assets_by_row.entry(row_id.clone()).or_default().push(i);
            }
            index
                .types_by_zone
                .entry(asset.zone_id.clone())
                .or_default()
                .insert(asset.asset_type);
        }
        index
    }
}

impl WarehouseDataset {
    /// Assemble a dataset from already generated parts.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        version: String,
        zones: Vec<Zone>,
        placements: HashMap<String, ZonePlacement>,
        assets: Vec<Asset>,
        anomalies: AnomalyMap,
        blueprint: Blueprint,
        forklifts: Vec<Forklift>,
        outline: Outline,
    ) -> Self {
        let index = DatasetIndex::build(&zones, &assets);
        Self {
            version,
            revision: NEXT_REVISION.fetch_add(1, Ordering::Relaxed),
            zones,
            placements,
            assets,
            anomalies,
            blueprint,
            forklifts,
            outline,
            index,
        }
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.index.zone_by_id.get(id).map(|&i| &self.zones[i])
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.index.asset_by_id.get(id).map(|&i| &self.assets[i])
    }

    /// Zone whose rows include `row_id`.
    pub fn zone_of_row(&self, row_id: &str) -> Option<&Zone> {
        self.index.zone_by_row.get(row_id).map(|&i| &self.zones[i])
    }

    /// Assets whose row is `row_id`, in generation order.
    pub fn assets_in_row<'a>(&'a self, row_id: &str) -> impl Iterator<Item = &'a Asset> + 'a {
        self.index
            .assets_by_row
            .get(row_id)
            .into_iter()
            .flatten()
            .map(|&i| &self.assets[i])
    }

    pub fn zone_has_type(&self, zone_id: &str, asset_type: &str) -> bool {
        self.index
            .types_by_zone
            .get(zone_id)
            .is_some_and(|types| types.contains(asset_type))
    }

    pub fn has_type(&self, asset_type: &str) -> bool {
        self.index
            .types_by_zone
            .values()
            .any(|types| types.contains(asset_type))
    }

    /// Display offset of a zone; zero for `None` or an unknown id.
    pub fn zone_offset(&self, zone_id: Option<&str>) -> Offset {
        zone_id
            .and_then(|id| self.zone(id))
            .map(|z| z.offset)
            .unwrap_or_default()
    }
}

/// Generate the complete warehouse from `config`.
///
/// Only pallet counts and scatter jitter consume `rng`; everything else is
/// a pure function of the configuration.
pub fn generate(config: &WarehouseConfig, rng: &mut impl Rng) -> WarehouseDataset {
    let layout = &config.layout;
    let zones: Vec<Zone> = config
        .zones
        .iter()
        .map(|spec| Zone::from_spec(spec, layout.row_padding))
        .collect();

    let mut scatterer = Scatterer::new(layout);
    let mut placements = HashMap::new();
    let mut assets = Vec::new();

    for (zone, spec) in zones.iter().zip(&config.zones) {
        if !zone.has_shape() {
            warn!("zone {}: has neither rectangle nor path, skipped", zone.id);
            continue;
        }
        let (Some(rect), Some(grid)) = (zone.rect, spec.placement) else {
            continue;
        };
        let placement = ZonePlacement::build(
            &zone.id,
            &rect,
            &grid,
            layout.placement_padding,
            layout.placement_gap,
        );
        let before = assets.len();
        if config.populate_active_only {
            let active: Vec<PlacementCell> = placement.active_cells().cloned().collect();
            populate_zone(zone, &active, &spec.occupancy, layout, &mut scatterer, rng, &mut assets);
        } else {
            populate_zone(
                zone,
                &placement.all,
                &spec.occupancy,
                layout,
                &mut scatterer,
                rng,
                &mut assets,
            );
        }
        info!(
            "zone {}: {} rows, {} cells ({} active), {} assets",
            zone.id,
            zone.rows.len(),
            placement.all.len(),
            placement.active.len(),
            assets.len() - before
        );
        placements.insert(zone.id.clone(), placement);
    }

    let anomalies = authored_anomalies(&zones);
    let blueprint = authored_blueprint(&zones);
    let forklifts = authored_forklifts(&zones, &assets);
    let outline = build_outline(&zones, &blueprint, &assets, &config.outline);

    info!(
        "warehouse {}: {} zones, {} assets, {} anomalies, outline {:?} with {} points",
        config.version,
        zones.len(),
        assets.len(),
        anomalies.values().map(|g| g.iter().count()).sum::<usize>(),
        outline.source,
        outline.points.len()
    );

    WarehouseDataset::from_parts(
        config.version.clone(),
        zones,
        placements,
        assets,
        anomalies,
        blueprint,
        forklifts,
        outline,
    )
}
