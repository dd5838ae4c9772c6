//! Zones and their visible row partitioning.
//!
//! A zone is built once from its [`ZoneSpec`] and gets its rows attached
//! immediately; neither changes afterwards. Rows tile the zone's padded
//! interior according to the zone's [`RowLayout`], never overlapping and
//! never leaving the interior.

use serde::Serialize;

use crate::config::{RowLayout, ZonePath, ZoneSpec};
use crate::geometry::{even_spans, Offset, Point, Rect, ViewBox};

/// A visible sub-partition of a zone. Row ids encode zone and sequence
/// (`a-r3` is the third row of `zone-a`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Row {
    pub id: String,
    pub rect: Rect,
}

/// A named region of the floor plan.
#[derive(Debug, Clone, Serialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub color: String,
    pub border_color: String,
    pub label_pos: Point,
    pub rect: Option<Rect>,
    pub path: Option<ZonePath>,
    pub offset: Offset,
    pub rows: Vec<Row>,
}

impl Zone {
    /// Build a zone and attach its rows.
    pub fn from_spec(spec: &ZoneSpec, row_padding: f32) -> Self {
        let rows = match spec.rect {
            Some(rect) => generate_rows(&spec.id, &rect, spec.rows, row_padding),
            None => Vec::new(),
        };
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            color: spec.color.clone(),
            border_color: spec.border_color.clone(),
            label_pos: spec.label_pos,
            rect: spec.rect,
            path: spec.path.clone(),
            offset: spec.offset,
            rows,
        }
    }

    /// Zones with neither a rectangle nor a path are configuration defects.
    pub fn has_shape(&self) -> bool {
        self.rect.is_some() || self.path.is_some()
    }

    /// Rectangle in display coordinates (offset applied).
    pub fn display_rect(&self) -> Option<Rect> {
        self.rect.map(|r| r.translate(self.offset))
    }

    /// Camera window for zooming to this zone: the display rectangle grown
    /// by `pad`, or the path's alternate viewbox when the zone is freeform.
    pub fn focus_view_box(&self, pad: f32) -> Option<ViewBox> {
        match self.display_rect() {
            Some(r) => Some(ViewBox::around(&r, pad)),
            None => self.path.as_ref().and_then(|p| p.view_box),
        }
    }

    /// Center of the zone's label: rectangle center, else the authored position.
    pub fn label_anchor(&self) -> Point {
        self.rect.map(|r| r.center()).unwrap_or(self.label_pos)
    }

    /// First row containing `p`, in generation order.
    pub fn row_at(&self, p: Point) -> Option<&Row> {
        self.rows.iter().find(|r| r.rect.contains(p))
    }

    pub fn row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == row_id)
    }
}

/// Short zone tag used in row ids: `zone-a` → `a`.
pub fn row_prefix(zone_id: &str) -> &str {
    zone_id.strip_prefix("zone-").unwrap_or(zone_id)
}

/// Partition the padded interior of `rect` into rows.
pub fn generate_rows(zone_id: &str, rect: &Rect, layout: RowLayout, pad: f32) -> Vec<Row> {
    let inner = rect.inset(pad);
    if inner.width <= 0.0 || inner.height <= 0.0 {
        return Vec::new();
    }
    let prefix = row_prefix(zone_id);
    let cells: Vec<Rect> = match layout {
        RowLayout::None => Vec::new(),
        RowLayout::Columns { count, gap } => even_spans(inner.width, count, gap)
            .into_iter()
            .map(|(dx, w)| Rect::new(inner.x + dx, inner.y, w, inner.height))
            .collect(),
        RowLayout::Bars { count, gap } => even_spans(inner.height, count, gap)
            .into_iter()
            .map(|(dy, h)| Rect::new(inner.x, inner.y + dy, inner.width, h))
            .collect(),
        RowLayout::Grid { columns, rows, gap } => grid_cells(&inner, columns, rows, gap),
    };
    cells
        .into_iter()
        .filter(|r| r.width > 0.0 && r.height > 0.0)
        .enumerate()
        .map(|(i, rect)| Row {
            id: format!("{}-r{}", prefix, i + 1),
            rect,
        })
        .collect()
}

/// Row-major `columns` x `rows` grid over `inner`.
pub(crate) fn grid_cells(inner: &Rect, columns: usize, rows: usize, gap: f32) -> Vec<Rect> {
    let xs = even_spans(inner.width, columns, gap);
    let ys = even_spans(inner.height, rows, gap);
    let mut cells = Vec::with_capacity(xs.len() * ys.len());
    for &(dy, h) in &ys {
        for &(dx, w) in &xs {
            cells.push(Rect::new(inner.x + dx, inner.y + dy, w, h));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_zones;

    fn zone_a() -> Zone {
        Zone::from_spec(&default_zones()[0], 10.0)
    }

    #[test]
    fn test_zone_a_has_eight_columns() {
        let z = zone_a();
        assert_eq!(z.rows.len(), 8);
        assert_eq!(z.rows[0].id, "a-r1");
        assert_eq!(z.rows[7].id, "a-r8");
        // Full interior height
        assert_eq!(z.rows[0].rect.y, -90.0);
        assert_eq!(z.rows[0].rect.height, 120.0);
    }

    #[test]
    fn test_row_counts_per_layout() {
        let counts: Vec<usize> = default_zones()
            .iter()
            .map(|s| Zone::from_spec(s, 10.0).rows.len())
            .collect();
        assert_eq!(counts, vec![8, 12, 24, 8, 12, 8]);
    }

    #[test]
    fn test_rows_within_padded_interior_and_disjoint() {
        for spec in default_zones() {
            let z = Zone::from_spec(&spec, 10.0);
            let inner = z.rect.unwrap().inset(10.0);
            for (i, a) in z.rows.iter().enumerate() {
                assert!(inner.contains_rect(&a.rect, 1e-3), "{} escapes {}", a.id, z.id);
                for b in &z.rows[i + 1..] {
                    assert!(!a.rect.overlaps(&b.rect), "{} overlaps {}", a.id, b.id);
                }
            }
        }
    }

    #[test]
    fn test_grid_is_row_major() {
        let rows = generate_rows(
            "zone-d",
            &Rect::new(0.0, 0.0, 100.0, 100.0),
            RowLayout::Grid {
                columns: 2,
                rows: 2,
                gap: 0.0,
            },
            0.0,
        );
        assert_eq!(rows[1].rect.x, 50.0);
        assert_eq!(rows[1].rect.y, 0.0);
        assert_eq!(rows[2].rect.x, 0.0);
        assert_eq!(rows[2].rect.y, 50.0);
    }

    #[test]
    fn test_row_lookup_takes_first_match() {
        let z = zone_a();
        let p = z.rows[2].rect.center();
        assert_eq!(z.row_at(p).map(|r| r.id.as_str()), Some("a-r3"));
        assert!(z.row_at(Point::new(-1000.0, 0.0)).is_none());
    }

    #[test]
    fn test_pathless_zone_has_no_rows() {
        let mut spec = default_zones()[0].clone();
        spec.rect = None;
        let z = Zone::from_spec(&spec, 10.0);
        assert!(z.rows.is_empty());
        assert!(!z.has_shape());
        assert!(z.focus_view_box(20.0).is_none());
    }

    #[test]
    fn test_focus_view_box_applies_offset() {
        let mut spec = default_zones()[3].clone();
        spec.offset = Offset { dx: 5.0, dy: -5.0 };
        let z = Zone::from_spec(&spec, 10.0);
        assert_eq!(
            z.focus_view_box(20.0),
            Some(ViewBox::new(735.0, 95.0, 240.0, 270.0))
        );
    }
}
