//! Map and sidebar selection state.
//!
//! Selecting a zone, rack, asset, asset type or anomaly filter clears every
//! other selection first. Selecting a specific anomaly clears the primary
//! selections but keeps the anomaly filter, so a filtered list stays
//! filtered while one of its entries is inspected. Deselecting (the
//! sidebar toggle-off) clears without moving the camera target; only
//! [`SelectionState::reset`] returns to the full map.

use serde::{Deserialize, Serialize};

use crate::anomalies::{AnomalyCategory, AnomalyRef};

/// What the map camera is framing, independent of the sidebar selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveView {
    #[default]
    Default,
    Zone(String),
    /// Assets do not zoom; the target only records that one was picked.
    Asset(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_asset_id: Option<String>,
    pub selected_zone_id: Option<String>,
    pub selected_rack_id: Option<String>,
    pub selected_asset_type: Option<String>,
    pub anomaly_filter: Option<AnomalyCategory>,
    pub selected_anomaly: Option<AnomalyRef>,
    pub view: ActiveView,
}

impl SelectionState {
    fn clear_all(&mut self) {
        self.selected_asset_id = None;
        self.selected_zone_id = None;
        self.selected_rack_id = None;
        self.selected_asset_type = None;
        self.anomaly_filter = None;
        self.selected_anomaly = None;
    }

    pub fn select_zone(&mut self, zone_id: &str) {
        self.clear_all();
        self.selected_zone_id = Some(zone_id.to_string());
        self.view = ActiveView::Zone(zone_id.to_string());
    }

    pub fn select_rack(&mut self, rack_id: &str) {
        self.clear_all();
        self.selected_rack_id = Some(rack_id.to_string());
    }

    /// Keeps an active zone view; otherwise the asset becomes the view target.
    pub fn select_asset(&mut self, asset_id: &str) {
        self.clear_all();
        self.selected_asset_id = Some(asset_id.to_string());
        if !matches!(self.view, ActiveView::Zone(_)) {
            self.view = ActiveView::Asset(asset_id.to_string());
        }
    }

    pub fn select_asset_type(&mut self, asset_type: &str) {
        self.clear_all();
        self.selected_asset_type = Some(asset_type.to_string());
    }

    pub fn set_anomaly_filter(&mut self, filter: Option<AnomalyCategory>) {
        self.clear_all();
        self.anomaly_filter = filter;
    }

    /// Does not touch `anomaly_filter`. `None` deselects the specific
    /// anomaly and leaves the filtered list showing.
    pub fn select_anomaly(&mut self, anomaly: Option<AnomalyRef>) {
        self.selected_asset_id = None;
        self.selected_zone_id = None;
        self.selected_rack_id = None;
        self.selected_asset_type = None;
        self.selected_anomaly = anomaly;
    }

    /// Toggle-off: drops every selection but keeps the camera where it is.
    pub fn clear_selection(&mut self) {
        self.clear_all();
    }

    pub fn clear_anomalies(&mut self) {
        self.anomaly_filter = None;
        self.selected_anomaly = None;
    }

    /// Back to the full map with nothing selected.
    pub fn reset(&mut self) {
        self.clear_all();
        self.view = ActiveView::Default;
    }

    /// True when a specific anomaly or an anomaly filter is set.
    pub fn anomaly_context(&self) -> bool {
        self.selected_anomaly.is_some() || self.anomaly_filter.is_some()
    }
}
