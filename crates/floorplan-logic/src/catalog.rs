//! Static asset-type catalog.
//!
//! Type names are human-readable and double as lookup keys throughout the
//! dataset (assets, anomalies, occupancy rules and selection all refer to a
//! type by name).

use serde::{Deserialize, Serialize};

/// Canonical asset type names.
pub mod type_names {
    pub const BINS_LARGE: &str = "Bins (Large)";
    pub const BINS_MEDIUM: &str = "Bins (Medium)";
    pub const BINS_SMALL: &str = "Bins (Small)";
    pub const BOXES: &str = "Boxes";
    pub const CRATES_LARGE: &str = "Crates (Large)";
    pub const CRATES_SMALL: &str = "Crates (Small)";
    pub const PALLETS: &str = "Pallets";
    pub const RACKS: &str = "Racks";
    pub const TOTES_LARGE: &str = "Totes (Large)";
    pub const TOTES_MEDIUM: &str = "Totes (Medium)";
    pub const TOTES_SMALL: &str = "Totes (Small)";
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AssetType {
    pub name: &'static str,
    pub image: &'static str,
    pub category: &'static str,
}

const fn entry(name: &'static str, image: &'static str, category: &'static str) -> AssetType {
    AssetType {
        name,
        image,
        category,
    }
}

/// Every known asset type, in display order.
pub static ASSET_TYPES: [AssetType; 11] = [
    entry(type_names::BINS_LARGE, "Bins (Large).png", "Storage"),
    entry(type_names::BINS_MEDIUM, "Bins (Medium).png", "Storage"),
    entry(type_names::BINS_SMALL, "Bins (Small).png", "Storage"),
    entry(type_names::BOXES, "Boxes.png", "Packaging"),
    entry(type_names::CRATES_LARGE, "Crates (Large).png", "Storage"),
    entry(type_names::CRATES_SMALL, "Crates (Small).png", "Storage"),
    entry(type_names::PALLETS, "Pallets.png", "Material Handling"),
    entry(type_names::RACKS, "Racks.png", "Storage"),
    entry(type_names::TOTES_LARGE, "Totes (Large).png", "Storage"),
    entry(type_names::TOTES_MEDIUM, "Totes (Medium).png", "Storage"),
    entry(type_names::TOTES_SMALL, "Totes (Small).png", "Storage"),
];

/// Look up a type by exact name.
pub fn find(name: &str) -> Option<&'static AssetType> {
    ASSET_TYPES.iter().find(|t| t.name == name)
}

/// Id-safe form of a type name: whitespace runs become single dashes.
pub fn id_slug(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Type families that can be confined to specific zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Family {
    Bins,
    Totes,
    Crates,
}

impl Family {
    pub fn members(&self) -> &'static [&'static str] {
        use type_names::*;
        match self {
            Self::Bins => &[BINS_LARGE, BINS_MEDIUM, BINS_SMALL],
            Self::Totes => &[TOTES_LARGE, TOTES_MEDIUM, TOTES_SMALL],
            Self::Crates => &[CRATES_LARGE, CRATES_SMALL],
        }
    }

    pub fn of(type_name: &str) -> Option<Self> {
        [Self::Bins, Self::Totes, Self::Crates]
            .into_iter()
            .find(|f| f.members().iter().any(|m| *m == type_name))
    }
}
