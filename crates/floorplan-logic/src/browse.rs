//! Sidebar queries: assets grouped by zone and row, per-type counts and
//! the flattened anomaly lists.

use serde::Serialize;

use crate::anomalies::{self, Anomaly, AnomalyCategory};
use crate::catalog::ASSET_TYPES;
use crate::dataset::WarehouseDataset;
use crate::scatter::Asset;
use crate::selection::SelectionState;

#[derive(Debug, Clone, Serialize)]
pub struct RowGroup<'a> {
    pub row_id: &'a str,
    pub label: String,
    pub assets: Vec<&'a Asset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneGroup<'a> {
    pub zone_id: &'a str,
    pub name: &'a str,
    pub rows: Vec<RowGroup<'a>>,
}

impl ZoneGroup<'_> {
    /// Assets across all rows of the zone.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.assets.len()).sum()
    }
}

/// `a-r3` → `Row r3`.
pub fn row_label(row_id: &str) -> String {
    let suffix = row_id.split('-').nth(1).unwrap_or(row_id);
    format!("Row {}", suffix)
}

/// Assets whose id contains `query` (case-insensitive), grouped zone → row.
///
/// Every zone and every row appears even when nothing matches. Assets
/// without a row are not listed.
pub fn group_assets<'a>(dataset: &'a WarehouseDataset, query: &str) -> Vec<ZoneGroup<'a>> {
    let q = query.to_lowercase();
    dataset
        .zones
        .iter()
        .map(|zone| ZoneGroup {
            zone_id: &zone.id,
            name: &zone.name,
            rows: zone
                .rows
                .iter()
                .map(|row| RowGroup {
                    row_id: &row.id,
                    label: row_label(&row.id),
                    assets: dataset
                        .assets_in_row(&row.id)
                        .filter(|a| a.zone_id == zone.id && a.id.to_lowercase().contains(&q))
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub asset_type: &'static str,
    pub image: &'static str,
    pub count: usize,
    pub missing: usize,
    pub in_transit: usize,
}

/// One entry per asset type present in the dataset, in catalog order.
pub fn type_summaries(dataset: &WarehouseDataset) -> Vec<TypeSummary> {
    ASSET_TYPES
        .iter()
        .filter_map(|t| {
            let count = dataset
                .assets
                .iter()
                .filter(|a| a.asset_type == t.name)
                .count();
            if count == 0 {
                return None;
            }
            let group = dataset.anomalies.get(t.name);
            Some(TypeSummary {
                asset_type: t.name,
                image: t.image,
                count,
                missing: group.map_or(0, |g| g.missing.len()),
                in_transit: group.map_or(0, |g| g.in_transit.len()),
            })
        })
        .collect()
}

/// Every anomaly in `category`, types in key order.
pub fn anomaly_list(dataset: &WarehouseDataset, category: AnomalyCategory) -> Vec<&Anomaly> {
    anomalies::all_in_category(&dataset.anomalies, category).collect()
}

/// Whether `anomaly` is the one currently selected.
pub fn is_selected(selection: &SelectionState, anomaly: &Anomaly) -> bool {
    selection
        .selected_anomaly
        .as_ref()
        .is_some_and(|r| r.matches(anomaly))
}
