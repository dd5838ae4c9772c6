//! Asset scatter: one asset at a jittered point inside a placement cell.

use log::warn;
use rand::Rng;
use serde::Serialize;

use crate::catalog::{self, AssetType};
use crate::config::LayoutTuning;
use crate::geometry::{Point, Rect};
use crate::zones::Zone;

/// Movement state of a generated asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetStatus {
    Stationary,
}

/// One prior position sample. Histories are oldest first.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HistorySample {
    pub x: f32,
    pub y: f32,
    pub timestamp: u32,
}

/// A generated inventory item. Immutable once generated.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    /// `<type slug>-<zone id>-<1000 + global sequence>`.
    pub id: String,
    pub zone_id: String,
    pub row_id: Option<String>,
    /// Map coordinates; the zone offset is not applied.
    pub position: Point,
    pub status: AssetStatus,
    pub history: Vec<HistorySample>,
    pub asset_type: &'static str,
    pub image: &'static str,
    pub category: &'static str,
}

/// Emits assets with a dataset-wide sequence number.
pub struct Scatterer<'a> {
    tuning: &'a LayoutTuning,
    next_seq: u32,
}

impl<'a> Scatterer<'a> {
    pub fn new(tuning: &'a LayoutTuning) -> Self {
        Self {
            tuning,
            next_seq: 0,
        }
    }

    /// Number of assets emitted so far.
    pub fn emitted(&self) -> u32 {
        self.next_seq
    }

    /// Scatter one `type_name` asset into `cell` of `zone`.
    ///
    /// Returns `None` without consuming a sequence number when the type is
    /// not in the catalog.
    pub fn scatter(
        &mut self,
        zone: &Zone,
        cell: &Rect,
        type_name: &str,
        rng: &mut impl Rng,
    ) -> Option<Asset> {
        let Some(asset_type) = catalog::find(type_name) else {
            warn!("zone {}: unknown asset type {:?} skipped", zone.id, type_name);
            return None;
        };
        let position = jittered_point(cell, self.tuning.scatter_margin, rng);
        let history = synthetic_history(position, self.tuning, rng);
        let row_id = zone.row_at(position).map(|r| r.id.clone());
        let asset = build_asset(asset_type, zone, row_id, position, history, self.next_seq);
        self.next_seq += 1;
        Some(asset)
    }
}

fn build_asset(
    asset_type: &'static AssetType,
    zone: &Zone,
    row_id: Option<String>,
    position: Point,
    history: Vec<HistorySample>,
    seq: u32,
) -> Asset {
    Asset {
        id: format!(
            "{}-{}-{}",
            catalog::id_slug(asset_type.name),
            zone.id,
            1000 + seq
        ),
        zone_id: zone.id.clone(),
        row_id,
        position,
        status: AssetStatus::Stationary,
        history,
        asset_type: asset_type.name,
        image: asset_type.image,
        category: asset_type.category,
    }
}

/// Uniform point inside `cell` shrunk by `margin`. Cells too small for the
/// margin collapse to their center.
pub fn jittered_point(cell: &Rect, margin: f32, rng: &mut impl Rng) -> Point {
    let inner = cell.inset(margin);
    let x = if inner.width > 0.0 {
        rng.gen_range(inner.x..=inner.right())
    } else {
        cell.center().x
    };
    let y = if inner.height > 0.0 {
        rng.gen_range(inner.y..=inner.bottom())
    } else {
        cell.center().y
    };
    Point::new(x, y)
}

/// Cosmetic trail ending at `end`: earlier samples are offset by up to the
/// configured jitter radius, shrinking toward the present.
pub fn synthetic_history(end: Point, tuning: &LayoutTuning, rng: &mut impl Rng) -> Vec<HistorySample> {
    let mut history: Vec<HistorySample> = tuning
        .history_jitter
        .iter()
        .zip(&tuning.history_timestamps)
        .map(|(&radius, &timestamp)| {
            let r = radius.max(0.0).round() as i32;
            HistorySample {
                x: end.x + rng.gen_range(-r..=r) as f32,
                y: end.y + rng.gen_range(-r..=r) as f32,
                timestamp,
            }
        })
        .collect();
    let last_timestamp = tuning
        .history_timestamps
        .get(history.len())
        .copied()
        .unwrap_or_else(|| history.last().map_or(0, |h| h.timestamp + 1));
    history.push(HistorySample {
        x: end.x,
        y: end.y,
        timestamp: last_timestamp,
    });
    history
}
