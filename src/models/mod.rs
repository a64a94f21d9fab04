//! Serde data model for the stock-item detail view.
//!
//! These types mirror the record payload returned by the backend when the
//! detail expansions (`part_detail`, `location_detail`, `path_detail`) are
//! requested. They are plain snapshots: nothing in this crate mutates a
//! fetched record in place.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod location;
pub mod part;
pub mod status;
pub mod stock_item;

pub use location::LocationEntry;
pub use part::PartDetail;
pub use status::{BadgeColor, StockStatus};
pub use stock_item::{ParentStockItem, StockItem};

/// Primary key of a stock item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct StockItemId(pub i64);

impl fmt::Display for StockItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StockItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
