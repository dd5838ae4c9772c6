//! Hand-authored inventory anomalies: items reported missing or in transit.
//!
//! Anomalies are not generated by the placement engine. Their positions are
//! authored relative to zone rectangles so they follow the zone table.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, type_names};
use crate::geometry::Point;
use crate::zones::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyStatus {
    Missing,
    #[serde(rename = "In-Transit")]
    InTransit,
}

/// Which list an anomaly sits in. Also the global anomaly filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnomalyCategory {
    Missing,
    InTransit,
}

impl AnomalyStatus {
    pub fn category(&self) -> AnomalyCategory {
        match self {
            Self::Missing => AnomalyCategory::Missing,
            Self::InTransit => AnomalyCategory::InTransit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    pub id: String,
    /// `None` means outside every zone.
    pub zone_id: Option<String>,
    pub position: Point,
    pub status: AnomalyStatus,
    pub asset_type: &'static str,
    pub image: &'static str,
    pub category: &'static str,
    /// Always `None`: anomalies are never assigned to rows.
    pub row_id: Option<String>,
}

impl Anomaly {
    /// Selection handle for this anomaly.
    pub fn to_ref(&self) -> AnomalyRef {
        AnomalyRef {
            asset_type: self.asset_type.to_string(),
            category: self.status.category(),
            zone_id: self.zone_id.clone(),
            position: self.position,
        }
    }
}

/// Identity of a specific anomaly as held by the selection state:
/// type + category + zone + position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRef {
    pub asset_type: String,
    pub category: AnomalyCategory,
    pub zone_id: Option<String>,
    pub position: Point,
}

impl AnomalyRef {
    pub fn matches(&self, a: &Anomaly) -> bool {
        self.asset_type == a.asset_type
            && self.category == a.status.category()
            && self.zone_id == a.zone_id
            && self.position == a.position
    }
}

/// Both anomaly lists of one asset type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnomalyGroup {
    pub missing: Vec<Anomaly>,
    pub in_transit: Vec<Anomaly>,
}

impl AnomalyGroup {
    pub fn list(&self, category: AnomalyCategory) -> &[Anomaly] {
        match category {
            AnomalyCategory::Missing => &self.missing,
            AnomalyCategory::InTransit => &self.in_transit,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.missing.iter().chain(&self.in_transit)
    }
}

/// Anomalies keyed by asset type name.
pub type AnomalyMap = BTreeMap<String, AnomalyGroup>;

/// Where an authored anomaly sits relative to its anchor zone's rectangle.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    /// Inside the zone at fractional coordinates.
    Inside { fx: f32, fy: f32 },
    /// Outside, `gap` above the top edge.
    Above { fx: f32, gap: f32 },
    /// Outside, `gap` below the bottom edge.
    Below { fx: f32, gap: f32 },
    /// Outside, `gap` right of the right edge.
    RightOf { fy: f32, gap: f32 },
}

struct AuthoredAnomaly {
    id: &'static str,
    asset_type: &'static str,
    status: AnomalyStatus,
    zone: &'static str,
    anchor: Anchor,
}

const fn missing(id: &'static str, asset_type: &'static str, zone: &'static str, fx: f32, fy: f32) -> AuthoredAnomaly {
    AuthoredAnomaly {
        id,
        asset_type,
        status: AnomalyStatus::Missing,
        zone,
        anchor: Anchor::Inside { fx, fy },
    }
}

const fn in_transit(id: &'static str, asset_type: &'static str, zone: &'static str, anchor: Anchor) -> AuthoredAnomaly {
    AuthoredAnomaly {
        id,
        asset_type,
        status: AnomalyStatus::InTransit,
        zone,
        anchor,
    }
}

const AUTHORED: &[AuthoredAnomaly] = &[
    missing("Bins-Large-Missing-001", type_names::BINS_LARGE, "zone-a", 0.35, 0.45),
    missing("Bins-Medium-Missing-001", type_names::BINS_MEDIUM, "zone-e", 0.25, 0.5),
    missing("Bins-Medium-Missing-002", type_names::BINS_MEDIUM, "zone-e", 0.28, 0.52),
    missing("Bins-Medium-Missing-003", type_names::BINS_MEDIUM, "zone-e", 0.7, 0.35),
    missing("Bins-Small-Missing-001", type_names::BINS_SMALL, "zone-a", 0.6, 0.3),
    in_transit(
        "Bins-Small-InTransit-001",
        type_names::BINS_SMALL,
        "zone-f",
        Anchor::Above { fx: 0.5, gap: 40.0 },
    ),
    missing("Boxes-Missing-001", type_names::BOXES, "zone-d", 0.30, 0.35),
    missing("Boxes-Missing-002", type_names::BOXES, "zone-d", 0.65, 0.60),
    missing("Boxes-Missing-003", type_names::BOXES, "zone-f", 0.20, 0.40),
    missing("Boxes-Missing-004", type_names::BOXES, "zone-f", 0.25, 0.55),
    missing("Boxes-Missing-005", type_names::BOXES, "zone-f", 0.70, 0.35),
    missing("Boxes-Missing-006", type_names::BOXES, "zone-f", 0.78, 0.65),
    in_transit(
        "Boxes-InTransit-001",
        type_names::BOXES,
        "zone-b",
        Anchor::Below { fx: 0.5, gap: 40.0 },
    ),
    missing("Crates-Large-Missing-001", type_names::CRATES_LARGE, "zone-e", 0.30, 0.60),
    missing("Crates-Large-Missing-002", type_names::CRATES_LARGE, "zone-e", 0.65, 0.40),
    missing("Crates-Large-Missing-003", type_names::CRATES_LARGE, "zone-f", 0.50, 0.30),
    missing("Crates-Small-Missing-001", type_names::CRATES_SMALL, "zone-c", 0.20, 0.70),
    in_transit(
        "Pallets-InTransit-001",
        type_names::PALLETS,
        "zone-c",
        Anchor::Above { fx: 0.50, gap: 40.0 },
    ),
    in_transit(
        "Pallets-InTransit-002",
        type_names::PALLETS,
        "zone-c",
        Anchor::RightOf { fy: 0.50, gap: 40.0 },
    ),
];

/// Resolve the authored anomaly table against `zones`.
///
/// Entries whose anchor zone is missing or has no rectangle are dropped.
pub fn authored_anomalies(zones: &[Zone]) -> AnomalyMap {
    let mut map = AnomalyMap::new();
    for entry in AUTHORED {
        let Some(rect) = zones.iter().find(|z| z.id == entry.zone).and_then(|z| z.rect) else {
            warn!("anomaly {}: anchor zone {} has no rectangle", entry.id, entry.zone);
            continue;
        };
        let Some(asset_type) = catalog::find(entry.asset_type) else {
            continue;
        };
        let (position, zone_id) = match entry.anchor {
            Anchor::Inside { fx, fy } => (
                Point::new(rect.x + rect.width * fx, rect.y + rect.height * fy),
                Some(entry.zone.to_string()),
            ),
            Anchor::Above { fx, gap } => (Point::new(rect.x + rect.width * fx, rect.y - gap), None),
            Anchor::Below { fx, gap } => {
                (Point::new(rect.x + rect.width * fx, rect.bottom() + gap), None)
            }
            Anchor::RightOf { fy, gap } => {
                (Point::new(rect.right() + gap, rect.y + rect.height * fy), None)
            }
        };
        let anomaly = Anomaly {
            id: entry.id.to_string(),
            zone_id,
            position,
            status: entry.status,
            asset_type: asset_type.name,
            image: asset_type.image,
            category: asset_type.category,
            row_id: None,
        };
        let group = map.entry(asset_type.name.to_string()).or_default();
        match entry.status {
            AnomalyStatus::Missing => group.missing.push(anomaly),
            AnomalyStatus::InTransit => group.in_transit.push(anomaly),
        }
    }
    map
}

/// Every anomaly of `category`, across all types in key order.
pub fn all_in_category(map: &AnomalyMap, category: AnomalyCategory) -> impl Iterator<Item = &Anomaly> {
    map.values().flat_map(move |g| g.list(category).iter())
}

pub fn find_by_id<'a>(map: &'a AnomalyMap, id: &str) -> Option<&'a Anomaly> {
    map.values().flat_map(|g| g.iter()).find(|a| a.id == id)
}
