//! Zone occupancy rules: exclusive cell reservation and stock population.
//!
//! Each zone first reserves cells for its exclusive types, fills those cells
//! densely with their assigned type, then spreads the general stock (racks,
//! pallets, boxes) over the remaining cells. The reservation index and the
//! cluster size are deterministic functions of the zone and cell geometry;
//! only the pallet counts and the scatter jitter draw from the RNG.

use log::{debug, warn};
use rand::Rng;
use serde::Serialize;

use crate::catalog::{self, type_names};
use crate::config::{LayoutTuning, OccupancyRules, RackPolicy};
use crate::geometry::Rect;
use crate::placement::PlacementCell;
use crate::scatter::{Asset, Scatterer};
use crate::zones::Zone;

/// A cell handed to one exclusive type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    /// Index into the zone's cell list.
    pub cell: usize,
    pub asset_type: String,
}

/// Assign cells to the zone's exclusive types.
///
/// Types are processed in rule order. For the `i`-th pick of a type the cell
/// at `(i * stride + len(zone_id)) mod available` is taken out of the
/// available pool, so no cell is reserved twice. Types missing from the
/// catalog reserve nothing.
pub fn reserve_cells(
    zone_id: &str,
    rules: &OccupancyRules,
    cell_count: usize,
    tuning: &LayoutTuning,
) -> Vec<Reservation> {
    let mut available: Vec<usize> = (0..cell_count).collect();
    let mut reserved = Vec::new();

    for rule in &rules.exclusive {
        if catalog::find(&rule.asset_type).is_none() {
            warn!(
                "zone {}: exclusive type {:?} is not in the catalog, no cells reserved",
                zone_id, rule.asset_type
            );
            continue;
        }
        let wanted = rule
            .cells
            .unwrap_or_else(|| tuning.default_reservation.min(available.len()).max(1));
        let count = wanted.min(available.len());
        if count < wanted {
            warn!(
                "zone {}: {} wants {} cells, only {} left",
                zone_id, rule.asset_type, wanted, count
            );
        }
        for i in 0..count {
            let idx = (i * tuning.reservation_stride + zone_id.len()) % available.len();
            let cell = available.remove(idx);
            reserved.push(Reservation {
                cell,
                asset_type: rule.asset_type.clone(),
            });
        }
        debug!(
            "zone {}: reserved {} cells for {}",
            zone_id, count, rule.asset_type
        );
    }
    reserved
}

/// Dense cluster size for a reserved cell: `base + (|trunc(x + y)| mod spread)`.
pub fn cluster_size(cell: &Rect, tuning: &LayoutTuning) -> u32 {
    let key = ((cell.x + cell.y) as i32).unsigned_abs();
    tuning.cluster_base + key % tuning.cluster_spread.max(1)
}

/// Populate one zone and append its assets to `out`.
pub fn populate_zone(
    zone: &Zone,
    cells: &[PlacementCell],
    rules: &OccupancyRules,
    tuning: &LayoutTuning,
    scatterer: &mut Scatterer<'_>,
    rng: &mut impl Rng,
    out: &mut Vec<Asset>,
) {
    if cells.is_empty() {
        return;
    }
    let reservations = reserve_cells(&zone.id, rules, cells.len(), tuning);

    // Exclusive clusters, in reservation order
    for r in &reservations {
        let rect = cells[r.cell].rect;
        for _ in 0..cluster_size(&rect, tuning) {
            out.extend(scatterer.scatter(zone, &rect, &r.asset_type, rng));
        }
    }

    let mut is_reserved = vec![false; cells.len()];
    for r in &reservations {
        is_reserved[r.cell] = true;
    }
    let unreserved: Vec<&PlacementCell> = cells
        .iter()
        .zip(&is_reserved)
        .filter(|&(_, &taken)| !taken)
        .map(|(c, _)| c)
        .collect();

    match rules.racks {
        RackPolicy::None => {}
        RackPolicy::EveryCell => {
            for cell in cells {
                out.extend(scatterer.scatter(zone, &cell.rect, type_names::RACKS, rng));
            }
        }
        RackPolicy::UnreservedCells => {
            for cell in &unreserved {
                out.extend(scatterer.scatter(zone, &cell.rect, type_names::RACKS, rng));
            }
        }
    }

    if let Some(range) = rules.pallets {
        let (lo, hi) = (range.min.min(range.max), range.min.max(range.max));
        for cell in &unreserved {
            let count = rng.gen_range(lo..=hi);
            for _ in 0..count {
                out.extend(scatterer.scatter(zone, &cell.rect, type_names::PALLETS, rng));
            }
        }
    }

    if let Some(stride) = rules.boxes_stride {
        for (i, cell) in unreserved.iter().enumerate().step_by(stride.max(1)) {
            let count = 2 + i % 3;
            for _ in 0..count {
                out.extend(scatterer.scatter(zone, &cell.rect, type_names::BOXES, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_zones, CountRange, ExclusiveReservation};
    use crate::placement::generate_cells;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn tuning() -> LayoutTuning {
        LayoutTuning::default()
    }

    fn zone_and_cells(index: usize) -> (Zone, Vec<PlacementCell>, OccupancyRules) {
        let spec = &default_zones()[index];
        let zone = Zone::from_spec(spec, 10.0);
        let grid = spec.placement.unwrap();
        let cells = generate_cells(&spec.id, &spec.rect.unwrap(), &grid, 12.0, 8.0);
        (zone, cells, spec.occupancy.clone())
    }

    #[test]
    fn test_reservation_index_formula() {
        let rules = OccupancyRules {
            exclusive: vec![ExclusiveReservation::new(type_names::BINS_LARGE, Some(2))],
            ..Default::default()
        };
        // len("zone-d") = 6; i=0 → 6 % 60 = 6; i=1 → (997 + 6) % 59 = 0
        let r = reserve_cells("zone-d", &rules, 60, &tuning());
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].cell, 6);
        assert_eq!(r[1].cell, 0);
    }

    #[test]
    fn test_zone_d_reservations_disjoint_and_counted() {
        let (_, cells, rules) = zone_and_cells(3);
        let r = reserve_cells("zone-d", &rules, cells.len(), &tuning());
        // 1 + 4 + 6 bins, 2 + 2 crates by default
        assert_eq!(r.len(), 15);
        let unique: HashSet<usize> = r.iter().map(|x| x.cell).collect();
        assert_eq!(unique.len(), r.len());
    }

    #[test]
    fn test_reservation_shortfall_is_capped() {
        let rules = OccupancyRules {
            exclusive: vec![
                ExclusiveReservation::new(type_names::TOTES_SMALL, Some(3)),
                ExclusiveReservation::new(type_names::TOTES_LARGE, Some(3)),
                ExclusiveReservation::new(type_names::CRATES_LARGE, None),
            ],
            ..Default::default()
        };
        let r = reserve_cells("zone-a", &rules, 4, &tuning());
        assert_eq!(r.len(), 4);
        assert_eq!(r.iter().filter(|x| x.asset_type == type_names::TOTES_LARGE).count(), 1);
    }

    #[test]
    fn test_unknown_exclusive_type_reserves_nothing() {
        let rules = OccupancyRules {
            exclusive: vec![ExclusiveReservation::new("Drums", Some(3))],
            ..Default::default()
        };
        assert!(reserve_cells("zone-a", &rules, 10, &tuning()).is_empty());
    }

    #[test]
    fn test_cluster_size_range() {
        let t = tuning();
        assert_eq!(cluster_size(&Rect::new(10.0, 3.5, 1.0, 1.0), &t), 9);
        assert_eq!(cluster_size(&Rect::new(-25.7, 0.0, 1.0, 1.0), &t), 11);
        for x in -50..50 {
            let n = cluster_size(&Rect::new(x as f32 * 7.3, 11.0, 1.0, 1.0), &t);
            assert!((6..=15).contains(&n));
        }
    }

    #[test]
    fn test_zone_c_is_pallets_only() {
        let (zone, cells, rules) = zone_and_cells(2);
        let t = tuning();
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = Scatterer::new(&t);
        let mut out = Vec::new();
        populate_zone(&zone, &cells, &rules, &t, &mut s, &mut rng, &mut out);
        assert!(out.len() >= cells.len() && out.len() <= cells.len() * 5);
        assert!(out.iter().all(|a| a.asset_type == type_names::PALLETS));
    }

    #[test]
    fn test_zone_a_racks_in_every_cell() {
        let (zone, cells, rules) = zone_and_cells(0);
        let t = tuning();
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = Scatterer::new(&t);
        let mut out = Vec::new();
        populate_zone(&zone, &cells, &rules, &t, &mut s, &mut rng, &mut out);
        let racks = out.iter().filter(|a| a.asset_type == type_names::RACKS).count();
        assert_eq!(racks, cells.len());
        assert!(out.iter().all(|a| a.asset_type != type_names::BINS_LARGE));
    }

    #[test]
    fn test_zone_b_boxes_and_racks() {
        let (zone, cells, rules) = zone_and_cells(1);
        let t = tuning();
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = Scatterer::new(&t);
        let mut out = Vec::new();
        populate_zone(&zone, &cells, &rules, &t, &mut s, &mut rng, &mut out);
        let racks = out.iter().filter(|a| a.asset_type == type_names::RACKS).count();
        let boxes = out.iter().filter(|a| a.asset_type == type_names::BOXES).count();
        assert_eq!(racks, 120);
        // 30 scattered cells (every 4th of 120), 2-4 boxes each
        let expected: usize = (0..120).step_by(4).map(|i| 2 + i % 3).sum();
        assert_eq!(boxes, expected);
    }

    #[test]
    fn test_pallet_range_is_respected() {
        let (zone, cells, _) = zone_and_cells(2);
        let rules = OccupancyRules {
            pallets: Some(CountRange { min: 2, max: 2 }),
            ..Default::default()
        };
        let t = tuning();
        let mut rng = StdRng::seed_from_u64(9);
        let mut s = Scatterer::new(&t);
        let mut out = Vec::new();
        populate_zone(&zone, &cells, &rules, &t, &mut s, &mut rng, &mut out);
        assert_eq!(out.len(), cells.len() * 2);
    }
}
