use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{LocationEntry, PartDetail, StockItemId, StockStatus};

/// Raw stock-item record as fetched from the backend.
///
/// `quantity` and `allocated` are optional because a record observed during
/// the loading state may not carry them yet; derivation short-circuits in
/// that case instead of computing on absent inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub pk: StockItemId,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub allocated: Option<Decimal>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub status: StockStatus,
    #[serde(default)]
    pub location: Option<i64>,
    pub part: i64,
    #[serde(default)]
    pub part_detail: Option<PartDetail>,
    #[serde(default)]
    pub supplier_part: Option<i64>,
    #[serde(default)]
    pub belongs_to: Option<Box<ParentStockItem>>,
    #[serde(default)]
    pub consumed_by: Option<i64>,
    #[serde(default)]
    pub build: Option<i64>,
    #[serde(default)]
    pub sales_order: Option<i64>,
    #[serde(default)]
    pub customer: Option<i64>,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub stocktake: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub barcode_hash: Option<String>,
    #[serde(default)]
    pub child_items: u32,
    #[serde(default)]
    pub location_path: Vec<LocationEntry>,
    #[serde(default)]
    pub tests: Option<u32>,
}

impl StockItem {
    /// Part flags degrade to `false` when the detail expansion is absent,
    /// so visibility rules hide rather than fail.
    pub fn is_trackable(&self) -> bool {
        self.part_detail.as_ref().is_some_and(|p| p.trackable)
    }

    pub fn is_assembly(&self) -> bool {
        self.part_detail.as_ref().is_some_and(|p| p.assembly)
    }

    pub fn is_salable(&self) -> bool {
        self.part_detail.as_ref().is_some_and(|p| p.salable)
    }

    pub fn is_component(&self) -> bool {
        self.part_detail.as_ref().is_some_and(|p| p.component)
    }
}

/// Summary of the parent unit a record is installed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentStockItem {
    pub pk: StockItemId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub part_detail: Option<PartDetail>,
}
