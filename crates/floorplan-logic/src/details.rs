//! Detail cards for the selected asset or anomaly.
//!
//! Item numbers and quantities are synthetic, derived from ids and
//! positions so the same record always shows the same values.

use serde::Serialize;

use crate::anomalies::AnomalyRef;
use crate::catalog::{self, AssetType};
use crate::dataset::WarehouseDataset;
use crate::scatter::Asset;
use crate::zones::Zone;

#[derive(Debug, Clone, Serialize)]
pub struct AssetDetails<'a> {
    pub asset: &'a Asset,
    pub zone: Option<&'a Zone>,
    /// Row id, or `Rack-NA` for assets outside every row.
    pub rack_number: String,
    pub item_number: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyDetails<'a> {
    pub anomaly: AnomalyRef,
    /// Present only when the dataset holds at least one asset of the type.
    pub asset_type: Option<&'static AssetType>,
    pub zone: Option<&'a Zone>,
    pub item_number: String,
    pub quantity: u32,
}

/// `ITEM-` plus the last four characters of the id.
fn asset_item_number(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("ITEM-{}", tail)
}

fn asset_quantity(id: &str) -> u32 {
    let first = id.chars().next().map_or(0, u32::from);
    let last = id.chars().next_back().map_or(0, u32::from);
    (first + last) % 50 + 1
}

pub fn asset_details<'a>(dataset: &'a WarehouseDataset, asset_id: &str) -> Option<AssetDetails<'a>> {
    let asset = dataset.asset(asset_id)?;
    Some(AssetDetails {
        asset,
        zone: dataset.zone(&asset.zone_id),
        rack_number: asset
            .row_id
            .clone()
            .unwrap_or_else(|| "Rack-NA".to_string()),
        item_number: asset_item_number(&asset.id),
        quantity: asset_quantity(&asset.id),
    })
}

/// `ITEM-<first 4 non-space chars of the type, upper-cased>-<|x + y| mod 1000>`.
///
/// The key is truncated to an integer before the modulo, so fractional
/// positions give `ITEM-BINS-280` rather than `ITEM-BINS-280.5`.
fn anomaly_item_number(r: &AnomalyRef) -> String {
    let prefix: String = r
        .asset_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let key = ((r.position.x + r.position.y).abs() as u64) % 1000;
    format!("ITEM-{}-{}", prefix, key)
}

pub fn anomaly_details<'a>(dataset: &'a WarehouseDataset, r: &AnomalyRef) -> AnomalyDetails<'a> {
    AnomalyDetails {
        anomaly: r.clone(),
        asset_type: catalog::find(&r.asset_type).filter(|t| dataset.has_type(t.name)),
        zone: r.zone_id.as_deref().and_then(|id| dataset.zone(id)),
        item_number: anomaly_item_number(r),
        quantity: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomalies::{find_by_id, AnomalyCategory};
    use crate::config::WarehouseConfig;
    use crate::dataset::generate;
    use crate::geometry::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> WarehouseDataset {
        generate(&WarehouseConfig::default(), &mut StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_asset_item_and_quantity() {
        assert_eq!(asset_item_number("Pallets-zone-c-1234"), "ITEM-1234");
        assert_eq!(asset_item_number("ab"), "ITEM-ab");
        // 'P' = 80, '4' = 52 → 132 % 50 + 1
        assert_eq!(asset_quantity("Pallets-zone-c-1234"), 33);
    }

    #[test]
    fn test_asset_details_lookup() {
        let d = dataset();
        let a = &d.assets[0];
        let details = asset_details(&d, &a.id).unwrap();
        assert_eq!(details.zone.map(|z| z.id.as_str()), Some(a.zone_id.as_str()));
        match &a.row_id {
            Some(row) => assert_eq!(&details.rack_number, row),
            None => assert_eq!(details.rack_number, "Rack-NA"),
        }
        assert!((1..=50).contains(&details.quantity));
        assert!(asset_details(&d, "ghost").is_none());
    }

    #[test]
    fn test_anomaly_item_number() {
        let r = AnomalyRef {
            asset_type: "Bins (Large)".into(),
            category: AnomalyCategory::Missing,
            zone_id: None,
            position: Point::new(1200.5, 80.0),
        };
        assert_eq!(anomaly_item_number(&r), "ITEM-BINS-280");

        let negative = AnomalyRef {
            position: Point::new(-1500.75, 200.0),
            ..r
        };
        // |-1300.75| truncates to 1300
        assert_eq!(anomaly_item_number(&negative), "ITEM-BINS-300");
    }

    #[test]
    fn test_anomaly_details() {
        let d = dataset();
        let a = find_by_id(&d.anomalies, "Crates-Small-Missing-001").unwrap();
        let details = anomaly_details(&d, &a.to_ref());
        assert_eq!(details.zone.map(|z| z.id.as_str()), Some("zone-c"));
        assert_eq!(details.quantity, 1);
        assert!(details.item_number.starts_with("ITEM-CRAT-"));
        assert!(details.asset_type.is_some());

        let outside = find_by_id(&d.anomalies, "Pallets-InTransit-002").unwrap();
        assert!(anomaly_details(&d, &outside.to_ref()).zone.is_none());
    }

    #[test]
    fn test_anomaly_type_absent_from_dataset() {
        let d = dataset();
        let r = AnomalyRef {
            asset_type: "Totes (Large)".into(),
            category: AnomalyCategory::Missing,
            zone_id: None,
            position: Point::ZERO,
        };
        let config = WarehouseConfig {
            zones: Vec::new(),
            ..Default::default()
        };
        let empty = generate(&config, &mut StdRng::seed_from_u64(1));
        assert!(anomaly_details(&empty, &r).asset_type.is_none());
        assert!(anomaly_details(&d, &r).asset_type.is_some());
    }
}
