//! Content panels of the detail page, in fixed order.

use std::fmt;

use super::Visibility;
use crate::derive::AugmentedStockItem;
use crate::models::StockItemId;

/// Model name used when listing attachments for a stock item.
pub const ATTACHMENT_MODEL: &str = "stockitem";

/// Renderer-agnostic content source for a panel.
///
/// Identity-bound sources fall back to [`PanelContent::Pending`] when
/// assembled before the record is available, so a panel renders a
/// deterministic placeholder rather than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    /// The four field groups plus the part image, laid out as quadrants.
    Details,
    /// Tracking history, provided by an external collaborator.
    TrackingHistory,
    /// Allocation listing, provided by an external collaborator.
    Allocations,
    TestResults { item: StockItemId, part: i64 },
    InstalledItems { parent: StockItemId },
    ChildItems { ancestor: StockItemId },
    Attachments { model: &'static str, id: StockItemId },
    Notes { id: StockItemId },
    Pending,
}

/// One named content panel.
pub struct Panel {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub content: PanelContent,
    visible: Visibility,
}

impl Panel {
    fn new(key: &'static str, label: &'static str, icon: &'static str, content: PanelContent) -> Self {
        Self {
            key,
            label,
            icon,
            content,
            visible: Visibility::Always,
        }
    }

    fn visible_when<F>(mut self, rule: F) -> Self
    where
        F: Fn(&AugmentedStockItem) -> bool + Send + Sync + 'static,
    {
        self.visible = Visibility::when(rule);
        self
    }

    pub fn is_visible(&self, item: Option<&AugmentedStockItem>) -> bool {
        self.visible.evaluate(item)
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("key", &self.key)
            .field("content", &self.content)
            .field("visible", &self.visible)
            .finish()
    }
}

/// Assembles the panel list for the current record, `None` while loading.
pub fn assemble(item: Option<&AugmentedStockItem>) -> Vec<Panel> {
    let identity = item.map(|it| it.pk);
    let part = item.map(|it| it.part);

    let test_results = match (identity, part) {
        (Some(item), Some(part)) => PanelContent::TestResults { item, part },
        _ => PanelContent::Pending,
    };
    let installed = identity
        .map(|parent| PanelContent::InstalledItems { parent })
        .unwrap_or(PanelContent::Pending);
    let children = identity
        .map(|ancestor| PanelContent::ChildItems { ancestor })
        .unwrap_or(PanelContent::Pending);
    let attachments = identity
        .map(|id| PanelContent::Attachments {
            model: ATTACHMENT_MODEL,
            id,
        })
        .unwrap_or(PanelContent::Pending);
    let notes = identity
        .map(|id| PanelContent::Notes { id })
        .unwrap_or(PanelContent::Pending);

    vec![
        Panel::new("details", "Stock Details", "info", PanelContent::Details),
        Panel::new(
            "tracking",
            "Stock Tracking",
            "history",
            PanelContent::TrackingHistory,
        ),
        Panel::new(
            "allocations",
            "Allocations",
            "bookmark",
            PanelContent::Allocations,
        )
        .visible_when(|it| it.is_salable() || it.is_component()),
        Panel::new("testdata", "Test Data", "checklist", test_results)
            .visible_when(|it| it.is_trackable()),
        Panel::new(
            "installed_items",
            "Installed Items",
            "box",
            installed,
        )
        .visible_when(|it| it.is_assembly()),
        Panel::new("child_items", "Child Items", "sitemap", children)
            .visible_when(|it| it.child_items > 0),
        Panel::new("attachments", "Attachments", "paperclip", attachments),
        Panel::new("notes", "Notes", "notes", notes),
    ]
}
