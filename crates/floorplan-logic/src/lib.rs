//! Warehouse floor-plan logic.
//!
//! This crate contains the layout and view logic behind the warehouse map,
//! independent of any renderer. It procedurally generates zones, rows and
//! inventory assets, derives the building outline, and computes what the
//! map shows for a given selection. Functions take plain data and return
//! results, so everything here is unit-testable without a UI.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`anomalies`] | Authored missing / in-transit records, anchored to zones |
//! | [`blueprint`] | Offices, bathrooms, walls, manual outline points, forklifts |
//! | [`browse`] | Sidebar queries: zone → row grouping, per-type counts |
//! | [`catalog`] | Static asset type catalog and exclusive type families |
//! | [`config`] | Declarative zone table and generation / view tuning |
//! | [`dataset`] | Generation pipeline and the immutable dataset with lookups |
//! | [`details`] | Detail cards for a selected asset or anomaly |
//! | [`geometry`] | Points, rectangles, bounds, viewboxes |
//! | [`occupancy`] | Exclusive cell reservation and stock population rules |
//! | [`outline`] | Convex hull and rectilinear building outline |
//! | [`placement`] | Hidden placement grid and deterministic cell selection |
//! | [`scatter`] | Jittered asset emission with synthetic history |
//! | [`selection`] | Selection state and its clearing rules |
//! | [`validation`] | Dataset invariant checks |
//! | [`view`] | Viewbox, opacity, asset attributes, anomaly markers |
//! | [`zones`] | Zones and their row partitioning |

pub mod anomalies;
pub mod blueprint;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod details;
pub mod geometry;
pub mod occupancy;
pub mod outline;
pub mod placement;
pub mod scatter;
pub mod selection;
pub mod validation;
pub mod view;
pub mod zones;
