//! The grouped action surface of the page header.
//!
//! Visibility is rule-driven (record state); enablement is permission-driven
//! through the injected capability. Triggers are symbolic: dispatching them,
//! including the no-record no-op guard, is the view's job.

use std::fmt;

use super::Visibility;
use crate::client::MutationKind;
use crate::derive::AugmentedStockItem;
use crate::permissions::{PermissionCheck, StockPermission};

/// What invoking an action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTrigger {
    ViewBarcode,
    LinkBarcode,
    UnlinkBarcode,
    OpenWorkflow(MutationKind),
    Duplicate,
    Delete,
}

pub struct Action {
    pub name: &'static str,
    pub tooltip: &'static str,
    pub icon: Option<&'static str>,
    pub enabled: bool,
    pub trigger: ActionTrigger,
    visible: Visibility,
}

impl Action {
    fn new(
        name: &'static str,
        tooltip: &'static str,
        trigger: ActionTrigger,
        enabled: bool,
    ) -> Self {
        Self {
            name,
            tooltip,
            icon: None,
            enabled,
            trigger,
            visible: Visibility::Always,
        }
    }

    fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
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

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("enabled", &self.enabled)
            .field("visible", &self.visible)
            .finish()
    }
}

/// One named dropdown menu of actions.
#[derive(Debug)]
pub struct ActionMenu {
    pub key: &'static str,
    pub tooltip: &'static str,
    pub icon: &'static str,
    pub actions: Vec<Action>,
}

/// Assembles the three action menus for the acting user.
pub fn menus(permissions: &dyn PermissionCheck) -> Vec<ActionMenu> {
    let can_view = permissions.is_allowed(StockPermission::View);
    let can_add = permissions.is_allowed(StockPermission::Add);
    let can_change = permissions.is_allowed(StockPermission::Change);
    let can_delete = permissions.is_allowed(StockPermission::Delete);

    let barcode = ActionMenu {
        key: "barcode",
        tooltip: "Barcode Actions",
        icon: "qrcode",
        actions: vec![
            Action::new(
                "View",
                "View barcode",
                ActionTrigger::ViewBarcode,
                can_view,
            ),
            // Link and unlink are mutually exclusive by construction.
            Action::new(
                "Link Barcode",
                "Link custom barcode",
                ActionTrigger::LinkBarcode,
                can_change,
            )
            .visible_when(|it| it.barcode_hash.is_none()),
            Action::new(
                "Unlink Barcode",
                "Unlink custom barcode",
                ActionTrigger::UnlinkBarcode,
                can_change,
            )
            .visible_when(|it| it.barcode_hash.is_some()),
        ],
    };

    let operations = ActionMenu {
        key: "operations",
        tooltip: "Stock Operations",
        icon: "packages",
        actions: vec![
            Action::new(
                "Count",
                "Count stock",
                ActionTrigger::OpenWorkflow(MutationKind::Count),
                can_change,
            )
            .icon("stocktake"),
            Action::new(
                "Add",
                "Add stock",
                ActionTrigger::OpenWorkflow(MutationKind::Add),
                can_change,
            )
            .icon("add"),
            Action::new(
                "Remove",
                "Remove stock",
                ActionTrigger::OpenWorkflow(MutationKind::Remove),
                can_change,
            )
            .icon("remove"),
            Action::new(
                "Transfer",
                "Transfer stock",
                ActionTrigger::OpenWorkflow(MutationKind::Transfer),
                can_change,
            )
            .icon("transfer"),
        ],
    };

    let general = ActionMenu {
        key: "general",
        tooltip: "Stock Actions",
        icon: "dots",
        actions: vec![
            Action::new(
                "Duplicate",
                "Duplicate stock item",
                ActionTrigger::Duplicate,
                can_add,
            )
            .icon("copy"),
            Action::new(
                "Edit",
                "Edit stock item",
                ActionTrigger::OpenWorkflow(MutationKind::Edit),
                can_change,
            )
            .icon("edit"),
            Action::new(
                "Delete",
                "Delete stock item",
                ActionTrigger::Delete,
                can_delete,
            )
            .icon("delete"),
        ],
    };

    vec![barcode, operations, general]
}
