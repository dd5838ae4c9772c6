//! Invariant checks over a generated warehouse.
//!
//! Pure functions that take the dataset and return validation errors.
//! Nothing here panics; callers decide what a failed check means.

use std::collections::HashSet;

use crate::catalog::Family;
use crate::config::WarehouseConfig;
use crate::dataset::WarehouseDataset;

/// A dataset validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

const TOLERANCE: f32 = 1e-3;

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

// ── A. Zones ────────────────────────────────────────────────────────────

/// Zones need a rectangle or a path; ids must be unique.
pub fn check_zones(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for z in &dataset.zones {
        if !z.has_shape() {
            errors.push(ValidationError {
                category: "zone_config",
                severity: Severity::Warning,
                message: format!("Zone {} has neither rectangle nor path", z.id),
            });
        }
        if !seen.insert(z.id.as_str()) {
            errors.push(error("zone_config", format!("Duplicate zone id {}", z.id)));
        }
    }
    errors
}

// ── B. Rows ─────────────────────────────────────────────────────────────

/// Every row lies inside its zone's padded interior.
pub fn check_rows_within_zones(dataset: &WarehouseDataset, row_padding: f32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for z in &dataset.zones {
        let Some(rect) = z.rect else { continue };
        let inner = rect.inset(row_padding);
        for row in &z.rows {
            if !inner.contains_rect(&row.rect, TOLERANCE) {
                errors.push(error(
                    "row_geometry",
                    format!("Row {} extends outside the interior of {}", row.id, z.id),
                ));
            }
        }
    }
    errors
}

/// Rows of a zone never overlap. Touching edges are allowed.
pub fn check_row_overlaps(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for z in &dataset.zones {
        for (i, a) in z.rows.iter().enumerate() {
            for b in &z.rows[i + 1..] {
                if a.rect.inset(TOLERANCE).overlaps(&b.rect.inset(TOLERANCE)) {
                    errors.push(error(
                        "row_geometry",
                        format!("Rows {} and {} overlap", a.id, b.id),
                    ));
                }
            }
        }
    }
    errors
}

// ── C. Assets ───────────────────────────────────────────────────────────

pub fn check_unique_asset_ids(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    dataset
        .assets
        .iter()
        .filter(|a| !seen.insert(a.id.as_str()))
        .map(|a| error("asset_ids", format!("Duplicate asset id {}", a.id)))
        .collect()
}

/// An asset's row belongs to its zone and contains its position.
pub fn check_asset_rows(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for a in &dataset.assets {
        let Some(row_id) = &a.row_id else { continue };
        let row = dataset.zone(&a.zone_id).and_then(|z| z.row(row_id));
        match row {
            None => errors.push(error(
                "asset_rows",
                format!("Asset {} names row {} outside zone {}", a.id, row_id, a.zone_id),
            )),
            Some(r) if !r.rect.contains(a.position) => errors.push(error(
                "asset_rows",
                format!("Asset {} lies outside its row {}", a.id, row_id),
            )),
            Some(_) => {}
        }
    }
    errors
}

/// Histories have strictly increasing timestamps and end at the position.
pub fn check_asset_histories(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for a in &dataset.assets {
        if !a.history.windows(2).all(|w| w[0].timestamp < w[1].timestamp) {
            errors.push(error(
                "asset_history",
                format!("Asset {} history timestamps are not increasing", a.id),
            ));
        }
        match a.history.last() {
            Some(h) if h.x == a.position.x && h.y == a.position.y => {}
            _ => errors.push(error(
                "asset_history",
                format!("Asset {} history does not end at its position", a.id),
            )),
        }
    }
    errors
}

/// Bin, tote and crate types only appear in zones that reserve them.
pub fn check_exclusive_confinement(
    dataset: &WarehouseDataset,
    config: &WarehouseConfig,
) -> Vec<ValidationError> {
    let mut reported = HashSet::new();
    let mut errors = Vec::new();
    for a in &dataset.assets {
        if Family::of(a.asset_type).is_none() {
            continue;
        }
        let allowed = config
            .zones
            .iter()
            .find(|s| s.id == a.zone_id)
            .is_some_and(|s| s.occupancy.exclusive.iter().any(|e| e.asset_type == a.asset_type));
        if !allowed && reported.insert((a.zone_id.as_str(), a.asset_type)) {
            errors.push(error(
                "exclusive_types",
                format!("{} found in {}, which does not reserve it", a.asset_type, a.zone_id),
            ));
        }
    }
    errors
}

// ── D. Anomalies ────────────────────────────────────────────────────────

/// Anomalies carry no row and are filed under their own type.
pub fn check_anomalies(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (key, group) in &dataset.anomalies {
        for a in group.iter() {
            if a.row_id.is_some() {
                errors.push(error(
                    "anomalies",
                    format!("Anomaly {} has a row assignment", a.id),
                ));
            }
            if a.asset_type != key.as_str() {
                errors.push(error(
                    "anomalies",
                    format!("Anomaly {} of type {} filed under {}", a.id, a.asset_type, key),
                ));
            }
        }
    }
    errors
}

// ── E. Outline ──────────────────────────────────────────────────────────

/// A drawn outline is closed and only has axis-aligned edges.
pub fn check_outline(dataset: &WarehouseDataset) -> Vec<ValidationError> {
    let points = &dataset.outline.points;
    let mut errors = Vec::new();
    if points.is_empty() {
        errors.push(ValidationError {
            category: "outline",
            severity: Severity::Warning,
            message: "No outline drawn".to_string(),
        });
        return errors;
    }
    if points.first() != points.last() {
        errors.push(error("outline", "Outline is not closed".to_string()));
    }
    if let Some(w) = points
        .windows(2)
        .find(|w| w[0].x != w[1].x && w[0].y != w[1].y)
    {
        errors.push(error(
            "outline",
            format!(
                "Diagonal outline edge ({}, {}) → ({}, {})",
                w[0].x, w[0].y, w[1].x, w[1].y
            ),
        ));
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Checks that need only the dataset.
pub fn validate_dataset(dataset: &WarehouseDataset, row_padding: f32) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_zones(dataset));
    all.extend(check_rows_within_zones(dataset, row_padding));
    all.extend(check_row_overlaps(dataset));
    all.extend(check_unique_asset_ids(dataset));
    all.extend(check_asset_rows(dataset));
    all.extend(check_asset_histories(dataset));
    all.extend(check_anomalies(dataset));
    all.extend(check_outline(dataset));
    all
}

/// Run all validations and return combined results.
pub fn validate_all(dataset: &WarehouseDataset, config: &WarehouseConfig) -> Vec<ValidationError> {
    let mut all = validate_dataset(dataset, config.layout.row_padding);
    all.extend(check_exclusive_confinement(dataset, config));
    all
}
