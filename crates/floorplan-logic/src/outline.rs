//! Building outline: a rectilinear closed path around all floor geometry.
//!
//! Either the blueprint's hand-placed points are used directly, or the
//! outline is derived from the convex hull of every zone, fixture and asset
//! grown by a clearance buffer. In both cases consecutive vertices are joined
//! by an axis-aligned elbow so the result only has horizontal and vertical
//! edges.

use std::fmt::Write as _;

use log::{debug, warn};
use serde::Serialize;

use crate::blueprint::Blueprint;
use crate::config::OutlineTuning;
use crate::geometry::{Point, Rect};
use crate::scatter::Asset;
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutlineSource {
    Manual,
    Hull,
}

/// Closed outline. `points` is empty when no outline can be drawn,
/// otherwise its first and last points are equal.
#[derive(Debug, Clone, Serialize)]
pub struct Outline {
    pub source: OutlineSource,
    pub points: Vec<Point>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_svg_path(&self) -> String {
        to_svg_path(&self.points)
    }
}

fn cross(o: Point, a: Point, b: Point) -> f64 {
    let (ox, oy) = (o.x as f64, o.y as f64);
    (a.x as f64 - ox) * (b.y as f64 - oy) - (a.y as f64 - oy) * (b.x as f64 - ox)
}

/// Monotone-chain convex hull. Collinear points are dropped.
/// Returns fewer than 3 points for degenerate input.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// True when `p` lies inside or on a convex polygon given counter-clockwise
/// (as returned by [`convex_hull`]).
pub fn hull_contains(hull: &[Point], p: Point) -> bool {
    if hull.len() < 3 {
        return false;
    }
    let eps = 1e-6;
    (0..hull.len()).all(|i| cross(hull[i], hull[(i + 1) % hull.len()], p) >= -eps)
}

fn push_elbow(path: &mut Vec<Point>, a: Point, b: Point) {
    if a.x != b.x && a.y != b.y {
        path.push(Point::new(a.x, b.y));
    }
    path.push(b);
}

/// Join `points` in order with vertical-then-horizontal elbows and close
/// back to the start the same way. Fewer than 3 points gives an empty path.
pub fn rectilinear_path(points: &[Point]) -> Vec<Point> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 3 {
        return Vec::new();
    }
    let mut path = Vec::with_capacity(points.len() * 2 + 1);
    path.push(first);
    for pair in points.windows(2) {
        push_elbow(&mut path, pair[0], pair[1]);
    }
    push_elbow(&mut path, last, first);
    path
}

/// Outline around everything on the floor.
pub fn build_outline(
    zones: &[Zone],
    blueprint: &Blueprint,
    assets: &[Asset],
    tuning: &OutlineTuning,
) -> Outline {
    if tuning.use_manual_points && blueprint.outline_points.len() >= 3 {
        return Outline {
            source: OutlineSource::Manual,
            points: rectilinear_path(&blueprint.outline_points),
        };
    }

    let mut rects: Vec<Rect> = Vec::with_capacity(zones.len() + assets.len() + 32);
    for zone in zones {
        match zone.rect {
            Some(r) => rects.push(r),
            None if zone.has_shape() => debug!("zone {}: freeform zone left out of outline", zone.id),
            None => warn!("zone {}: no rectangle or path, left out of outline", zone.id),
        }
    }
    rects.extend(blueprint.all_rects().copied());
    rects.extend(assets.iter().map(|a| Rect::at_point(a.position)));

    let corners: Vec<Point> = rects
        .iter()
        .flat_map(|r| r.inflate(tuning.buffer).corners())
        .collect();
    let hull = convex_hull(&corners);
    let points = if hull.len() < 3 {
        Vec::new()
    } else {
        rectilinear_path(&hull)
    };
    Outline {
        source: OutlineSource::Hull,
        points,
    }
}

/// SVG path data: `M x y L x y ... Z`. Empty input renders as an empty string.
pub fn to_svg_path(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut d = format!("M {} {}", first.x, first.y);
    for p in rest {
        let _ = write!(d, " L {} {}", p.x, p.y);
    }
    d.push_str(" Z");
    d
}
