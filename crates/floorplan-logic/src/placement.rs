//! Hidden placement grid and deterministic cell selection.
//!
//! Placement cells are never rendered. They are a denser grid than the
//! visible rows and exist only to steer where assets are scattered.

use serde::Serialize;

use crate::config::PlacementGrid;
use crate::geometry::Rect;
use crate::zones::grid_cells;

/// One hidden placement rectangle.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlacementCell {
    pub id: String,
    pub rect: Rect,
}

/// All cells of a zone plus the evenly spread active subset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ZonePlacement {
    pub all: Vec<PlacementCell>,
    /// Indices into `all`.
    pub active: Vec<usize>,
}

impl ZonePlacement {
    pub fn build(zone_id: &str, zone_rect: &Rect, grid: &PlacementGrid, pad: f32, gap: f32) -> Self {
        let all = generate_cells(zone_id, zone_rect, grid, pad, gap);
        let active = pick_active(all.len(), grid.fill);
        Self { all, active }
    }

    pub fn active_cells(&self) -> impl Iterator<Item = &PlacementCell> {
        self.active.iter().map(|&i| &self.all[i])
    }
}

/// Tile the padded interior of `zone_rect` with `grid.rows` rows of
/// `grid.total / grid.rows` columns, row-major, capped at `grid.total` cells.
///
/// Pure: the same inputs always give the same cells in the same order.
pub fn generate_cells(
    zone_id: &str,
    zone_rect: &Rect,
    grid: &PlacementGrid,
    pad: f32,
    gap: f32,
) -> Vec<PlacementCell> {
    if grid.rows == 0 || grid.total == 0 {
        return Vec::new();
    }
    let inner = zone_rect.inset(pad);
    let columns = (grid.total / grid.rows).max(1);
    grid_cells(&inner, columns, grid.rows, gap)
        .into_iter()
        .take(grid.total)
        .enumerate()
        .map(|(i, rect)| PlacementCell {
            id: format!("{}-p{}", zone_id, i + 1),
            rect,
        })
        .collect()
}

/// Evenly spaced stride sample of `k` indices out of `len`.
///
/// Returns every index when `k >= len`; otherwise `floor(i * len / k)` for
/// `i` in `0..k`, ascending and without repeats.
pub fn pick_active(len: usize, k: usize) -> Vec<usize> {
    if k >= len {
        return (0..len).collect();
    }
    (0..k).map(|i| i * len / k).collect()
}
