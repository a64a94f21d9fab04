//! Descriptor assembly for the detail view's UI regions.
//!
//! Each submodule is a pure projection of the augmented record into an
//! ordered, renderer-agnostic descriptor list. Visibility is carried as an
//! explicit predicate on every descriptor and evaluated at render time
//! against the latest immutable snapshot, never baked in at build time.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::derive::AugmentedStockItem;

pub mod actions;
pub mod badges;
pub mod breadcrumbs;
pub mod fields;
pub mod panels;

pub use actions::{Action, ActionMenu, ActionTrigger};
pub use badges::Badge;
pub use breadcrumbs::{Breadcrumb, LocationTreeSeed, NavTarget};
pub use fields::{FieldDescriptor, FieldGroups, FieldKind};
pub use panels::{Panel, PanelContent};

/// Boolean rule over the current augmented record.
pub type Predicate = Arc<dyn Fn(&AugmentedStockItem) -> bool + Send + Sync>;

/// Value formatter bound to the current augmented record.
pub type Formatter = Arc<dyn Fn(&AugmentedStockItem) -> Option<String> + Send + Sync>;

/// Visibility rule attached to a descriptor.
#[derive(Clone)]
pub enum Visibility {
    Always,
    When(Predicate),
}

impl Visibility {
    pub fn when<F>(rule: F) -> Self
    where
        F: Fn(&AugmentedStockItem) -> bool + Send + Sync + 'static,
    {
        Visibility::When(Arc::new(rule))
    }

    /// Evaluates the rule. A conditional descriptor with no record to
    /// evaluate against degrades to hidden, never to an error.
    pub fn evaluate(&self, item: Option<&AugmentedStockItem>) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::When(rule) => item.map(|it| rule(it)).unwrap_or(false),
        }
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Always => write!(f, "Always"),
            Visibility::When(_) => write!(f, "When(..)"),
        }
    }
}

/// Target model of a link descriptor or navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Part,
    StockItem,
    StockLocation,
    SupplierPart,
    Build,
    SalesOrder,
    Company,
}
