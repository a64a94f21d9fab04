//! Derived attribute computation.
//!
//! The only derived attribute on this view is `available_stock`. The raw
//! snapshot is never written back to; derivation produces a new value.

use std::ops::Deref;

use rust_decimal::Decimal;

use crate::models::StockItem;

/// A raw record plus its computed attributes.
///
/// Dereferences to the underlying [`StockItem`] so visibility predicates can
/// read raw fields directly. `quantity` and `allocated` are re-exposed as
/// resolved values since augmentation requires both to be present.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedStockItem {
    item: StockItem,
    pub quantity: Decimal,
    pub allocated: Decimal,
    /// `max(0, quantity - allocated)`. Clamped: never negative even when
    /// upstream data over-allocates.
    pub available_stock: Decimal,
}

impl Deref for AugmentedStockItem {
    type Target = StockItem;

    fn deref(&self) -> &StockItem {
        &self.item
    }
}

impl AugmentedStockItem {
    pub fn raw(&self) -> &StockItem {
        &self.item
    }
}

/// Computes the augmented record, or `None` when the snapshot is not ready
/// (quantity or allocation absent during the loading state).
pub fn augment(item: &StockItem) -> Option<AugmentedStockItem> {
    let quantity = item.quantity?;
    let allocated = item.allocated?;
    let available_stock = (quantity - allocated).max(Decimal::ZERO);

    Some(AugmentedStockItem {
        item: item.clone(),
        quantity,
        allocated,
        available_stock,
    })
}
