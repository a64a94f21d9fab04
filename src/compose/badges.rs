//! Status badges shown in the page header.

use serde::{Deserialize, Serialize};

use crate::derive::AugmentedStockItem;
use crate::models::BadgeColor;

/// One header badge. Order in the assembled list is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub color: BadgeColor,
    pub visible: bool,
}

/// Assembles the badge list.
///
/// While the record is loading the list is empty. Once loaded the serial and
/// quantity badges are complements: exactly one of them is visible for any
/// record.
pub fn assemble(item: Option<&AugmentedStockItem>, loading: bool) -> Vec<Badge> {
    let item = match (loading, item) {
        (false, Some(item)) => item,
        _ => return Vec::new(),
    };

    vec![
        Badge {
            label: format!(
                "Serial Number: {}",
                item.serial.as_deref().unwrap_or_default()
            ),
            color: BadgeColor::Blue,
            visible: item.serial.is_some(),
        },
        Badge {
            label: format!("Quantity: {}", item.quantity),
            color: BadgeColor::Blue,
            visible: item.serial.is_none(),
        },
        Badge {
            label: format!("Batch Code: {}", item.batch.as_deref().unwrap_or_default()),
            color: BadgeColor::Blue,
            visible: item.batch.is_some(),
        },
        Badge {
            label: item.status.to_string(),
            color: item.status.color(),
            visible: true,
        },
    ]
}
