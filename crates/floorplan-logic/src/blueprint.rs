//! Static building fixtures drawn around the zones: offices, bathrooms,
//! conference rooms, walls, plus the hand-placed outline and forklifts.
//!
//! Fixture positions are authored relative to the bounding box of the zone
//! rectangles, so moving the zone table moves the building with it.

use log::warn;
use serde::Serialize;

use crate::geometry::{Bounds, Point, Rect, Segment};
use crate::scatter::Asset;
use crate::zones::Zone;

/// A named rectangular fixture.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Fixture {
    pub id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Wall {
    pub id: String,
    pub segment: Segment,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Blueprint {
    pub offices: Vec<Fixture>,
    pub bathrooms: Vec<Fixture>,
    pub conference_rooms: Vec<Fixture>,
    pub hallways: Vec<Fixture>,
    pub docks: Vec<Fixture>,
    pub walls: Vec<Wall>,
    /// Hand-placed outline vertices, in drawing order.
    pub outline_points: Vec<Point>,
}

impl Blueprint {
    /// Rectangles that count toward the default camera extent.
    /// Conference rooms are not included.
    pub fn framing_rects(&self) -> impl Iterator<Item = &Rect> {
        self.offices
            .iter()
            .chain(&self.bathrooms)
            .chain(&self.docks)
            .chain(&self.hallways)
            .map(|f| &f.rect)
    }

    /// Every rectangular fixture, as used for the outline hull.
    pub fn all_rects(&self) -> impl Iterator<Item = &Rect> {
        self.offices
            .iter()
            .chain(&self.bathrooms)
            .chain(&self.docks)
            .chain(&self.hallways)
            .chain(&self.conference_rooms)
            .map(|f| &f.rect)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Forklift {
    pub id: String,
    pub position: Point,
    pub asset_id: String,
}

fn fixture(id: &str, x: f32, y: f32, width: f32, height: f32) -> Fixture {
    Fixture {
        id: id.to_string(),
        rect: Rect::new(x, y, width, height),
    }
}

/// Bounding box of every zone that has a rectangle.
pub fn zone_bounds(zones: &[Zone]) -> Bounds {
    let mut b = Bounds::EMPTY;
    for rect in zones.iter().filter_map(|z| z.rect.as_ref()) {
        b.include_rect(rect);
    }
    b
}

/// The authored building around `zones`.
pub fn authored_blueprint(zones: &[Zone]) -> Blueprint {
    let outline_points = [
        (-100.0, 80.0),
        (700.0, -150.0),
        (1320.0, 50.0),
        (900.0, 650.0),
        (140.0, 650.0),
        (140.0, 120.0),
    ]
    .into_iter()
    .map(|(x, y)| Point::new(x, y))
    .collect();

    let b = zone_bounds(zones);
    if b.is_empty() {
        warn!("no rectangular zones, blueprint fixtures omitted");
        return Blueprint {
            outline_points,
            ..Default::default()
        };
    }

    let mut offices = Vec::with_capacity(12);
    for (i, dx) in [260.0, 300.0, 340.0, 380.0, 420.0].into_iter().enumerate() {
        offices.push(fixture(&format!("off-b{}", i + 1), b.min_x + dx, b.max_y + 60.0, 30.0, 30.0));
    }
    for (i, dy) in [440.0, 480.0, 520.0].into_iter().enumerate() {
        offices.push(fixture(&format!("off-r{}", i + 1), b.max_x - 1180.0, b.min_y + dy, 30.0, 30.0));
    }
    for (i, dx) in [480.0, 520.0, 560.0, 600.0].into_iter().enumerate() {
        offices.push(fixture(&format!("off-m{}", i + 1), b.max_x - dx, b.min_y + 510.0, 30.0, 30.0));
    }

    let walls = [
        ("wall-1.1", 750.0, 150.0, 750.0, 231.0),
        ("wall-1.2", 690.0, 230.0, 750.0, 230.0),
        ("wall-1.3", 690.0, 229.0, 690.0, 480.0),
        ("wall-2.1", 190.0, 500.0, 350.0, 500.0),
        ("wall-2.2", 370.0, 500.0, 670.0, 500.0),
        ("wall-2.3", 690.0, 500.0, 1030.0, 500.0),
        ("wall-2.4", 1050.0, 500.0, 1150.0, 500.0),
        ("wall-2.5", 1170.0, 500.0, 1370.0, 500.0),
        ("wall-3.1", 1050.0, 150.0, 1050.0, 480.0),
        ("wall-4.1", 280.0, 500.0, 280.0, 750.0),
        ("wall-4.2", 200.0, 620.0, 270.0, 620.0),
    ]
    .into_iter()
    .map(|(id, x1, y1, x2, y2)| Wall {
        id: id.to_string(),
        segment: Segment {
            x1: b.min_x + x1,
            y1: b.min_y + y1,
            x2: b.min_x + x2,
            y2: b.min_y + y2,
        },
    })
    .collect();

    let conference_rooms = vec![
        fixture("conf-1", b.max_x - 500.0, b.min_y + 110.0, 120.0, 30.0),
        fixture("conf-2", b.min_x + 500.0, b.max_y + 60.0, 120.0, 30.0),
    ];

    let bathrooms = vec![
        fixture("bath-1", b.min_x + 150.0, b.max_y - 100.0, 30.0, 20.0),
        fixture("bath-2", b.min_x + 150.0, b.max_y - 70.0, 30.0, 20.0),
        fixture("bath-3", b.min_x + 60.0, b.max_y - 510.0, 20.0, 30.0),
        fixture("bath-4", b.max_x - 1240.0, b.min_y + 190.0, 20.0, 30.0),
        fixture("bath-5", b.max_x - 300.0, b.min_y + 110.0, 20.0, 30.0),
        fixture("bath-6", b.max_x - 330.0, b.min_y + 110.0, 20.0, 30.0),
    ];

    Blueprint {
        offices,
        bathrooms,
        conference_rooms,
        hallways: Vec::new(),
        docks: Vec::new(),
        walls,
        outline_points,
    }
}

/// Three forklifts parked beside zones A, C and E, each tagged with one of
/// the first generated assets.
pub fn authored_forklifts(zones: &[Zone], assets: &[Asset]) -> Vec<Forklift> {
    let rect_of = |id: &str| zones.iter().find(|z| z.id == id).and_then(|z| z.rect);
    let spots: [(&str, fn(Rect) -> Point); 3] = [
        ("zone-a", |r: Rect| Point::new(r.x - 30.0, r.y + 50.0)),
        ("zone-c", |r: Rect| Point::new(r.right() + 20.0, r.y + 50.0)),
        ("zone-e", |r: Rect| Point::new(r.x - 30.0, r.y + 50.0)),
    ];
    spots
        .into_iter()
        .enumerate()
        .filter_map(|(i, (zone_id, place))| {
            let rect = rect_of(zone_id)?;
            let asset_id = assets
                .get(i)
                .map(|a| a.id.clone())
                .unwrap_or_else(|| format!("G2-10000{}", i));
            Some(Forklift {
                id: format!("forklift-{}", i + 1),
                position: place(rect),
                asset_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_zones;

    fn zones() -> Vec<Zone> {
        default_zones().iter().map(|s| Zone::from_spec(s, 10.0)).collect()
    }

    #[test]
    fn test_fixture_counts() {
        let bp = authored_blueprint(&zones());
        assert_eq!(bp.offices.len(), 12);
        assert_eq!(bp.bathrooms.len(), 6);
        assert_eq!(bp.conference_rooms.len(), 2);
        assert_eq!(bp.walls.len(), 11);
        assert!(bp.hallways.is_empty());
        assert!(bp.docks.is_empty());
        assert_eq!(bp.outline_points.len(), 6);
    }

    #[test]
    fn test_positions_follow_zone_bounds() {
        let z = zones();
        let b = zone_bounds(&z);
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-50.0, -100.0, 1280.0, 600.0));
        let bp = authored_blueprint(&z);
        assert_eq!(bp.offices[0].rect, Rect::new(210.0, 660.0, 30.0, 30.0));
        assert_eq!(bp.offices[5].rect, Rect::new(100.0, 340.0, 30.0, 30.0));
        assert_eq!(bp.conference_rooms[0].rect, Rect::new(780.0, 10.0, 120.0, 30.0));
        let w = bp.walls[0].segment;
        assert_eq!((w.x1, w.y1, w.x2, w.y2), (700.0, 50.0, 700.0, 131.0));
    }

    #[test]
    fn test_framing_excludes_conference_rooms() {
        let bp = authored_blueprint(&zones());
        assert_eq!(bp.framing_rects().count(), 18);
        assert_eq!(bp.all_rects().count(), 20);
    }

    #[test]
    fn test_no_zones_keeps_outline_points() {
        let bp = authored_blueprint(&[]);
        assert!(bp.offices.is_empty());
        assert_eq!(bp.outline_points.len(), 6);
    }

    #[test]
    fn test_forklifts_fall_back_without_assets() {
        let f = authored_forklifts(&zones(), &[]);
        assert_eq!(f.len(), 3);
        assert_eq!(f[0].asset_id, "G2-100000");
        assert_eq!(f[2].asset_id, "G2-100002");
        assert_eq!(f[1].position, Point::new(590.0, 150.0));
    }
}
