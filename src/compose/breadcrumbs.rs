//! Navigation trail built from the record's ancestor location path.

use serde::{Deserialize, Serialize};

use crate::derive::AugmentedStockItem;

/// Navigable target of one breadcrumb entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTarget {
    /// The stock collection root.
    Collection,
    Location(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    pub target: NavTarget,
}

/// Seed for the auxiliary location-tree view opened by the breadcrumb
/// action; presentation is an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationTreeSeed {
    pub selected: Option<i64>,
}

/// Builds the trail: the collection root followed by one entry per ancestor
/// location, root-first.
pub fn trail(collection_label: &str, item: Option<&AugmentedStockItem>) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        label: collection_label.to_string(),
        target: NavTarget::Collection,
    }];

    if let Some(item) = item {
        crumbs.extend(item.location_path.iter().map(|entry| Breadcrumb {
            label: entry.name.clone(),
            target: NavTarget::Location(entry.pk),
        }));
    }

    crumbs
}

/// Seeds the location tree with the record's current location.
pub fn location_tree_seed(item: Option<&AugmentedStockItem>) -> LocationTreeSeed {
    LocationTreeSeed {
        selected: item.and_then(|it| it.location),
    }
}
