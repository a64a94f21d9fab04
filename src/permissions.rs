//! Explicit user-context capability for action enablement.
//!
//! The action layer never reads ambient session state; the acting user's
//! permissions are passed in as a capability object and consulted when the
//! action surface is assembled.

use std::collections::HashSet;

use strum::{Display, EnumIter, IntoEnumIterator};

/// Permissions relevant to the stock detail view's actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StockPermission {
    /// Read access, required to view barcodes.
    View,
    /// Create access, required to duplicate a record.
    Add,
    /// Write access, required for stock operations, barcode linking and edit.
    Change,
    /// Delete access.
    Delete,
}

/// Permission-check capability supplied by the embedding application.
pub trait PermissionCheck: Send + Sync {
    fn is_allowed(&self, permission: StockPermission) -> bool;
}

/// Fixed permission set, useful for tests and simple hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    granted: HashSet<StockPermission>,
}

impl StaticPermissions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            granted: StockPermission::iter().collect(),
        }
    }

    pub fn grant(mut self, permission: StockPermission) -> Self {
        self.granted.insert(permission);
        self
    }
}

impl PermissionCheck for StaticPermissions {
    fn is_allowed(&self, permission: StockPermission) -> bool {
        self.granted.contains(&permission)
    }
}
