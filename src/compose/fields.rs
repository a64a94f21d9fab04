//! The four field-descriptor groups of the details panel.
//!
//! Order within a group is significant and fixed here; visibility is a
//! predicate on each descriptor, evaluated per render pass.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Formatter, ModelKind, Visibility};
use crate::derive::AugmentedStockItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Link,
    Status,
}

/// Declarative description of one field row.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub icon: Option<&'static str>,
    pub target_model: Option<ModelKind>,
    /// Field on the linked model used as the link text, when not the default.
    pub target_field: Option<&'static str>,
    pub formatter: Option<Formatter>,
    visible: Visibility,
}

impl FieldDescriptor {
    fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            icon: None,
            target_model: None,
            target_field: None,
            formatter: None,
            visible: Visibility::Always,
        }
    }

    fn link(name: &'static str, label: &'static str, model: ModelKind) -> Self {
        Self {
            kind: FieldKind::Link,
            target_model: Some(model),
            ..Self::text(name, label)
        }
    }

    fn status(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::Status,
            ..Self::text(name, label)
        }
    }

    fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    fn target_field(mut self, field: &'static str) -> Self {
        self.target_field = Some(field);
        self
    }

    fn formatter<F>(mut self, format: F) -> Self
    where
        F: Fn(&AugmentedStockItem) -> Option<String> + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(format));
        self
    }

    fn visible_when<F>(mut self, rule: F) -> Self
    where
        F: Fn(&AugmentedStockItem) -> bool + Send + Sync + 'static,
    {
        self.visible = Visibility::when(rule);
        self
    }

    pub fn is_visible(&self, item: &AugmentedStockItem) -> bool {
        self.visible.evaluate(Some(item))
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// The four ordered regions of the details panel.
#[derive(Debug, Clone)]
pub struct FieldGroups {
    pub identity: Vec<FieldDescriptor>,
    pub quantity: Vec<FieldDescriptor>,
    pub relations: Vec<FieldDescriptor>,
    pub miscellaneous: Vec<FieldDescriptor>,
}

impl FieldGroups {
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.identity
            .iter()
            .chain(&self.quantity)
            .chain(&self.relations)
            .chain(&self.miscellaneous)
    }
}

/// Builds the descriptor groups. The rules bound here read the record at
/// evaluation time, so a group survives snapshot replacement unchanged.
pub fn groups() -> FieldGroups {
    // Identity: core part information.
    let identity = vec![
        FieldDescriptor::link("part", "Base Part", ModelKind::Part),
        FieldDescriptor::status("status", "Stock Status"),
        FieldDescriptor::text("tests", "Completed Tests")
            .icon("progress")
            .visible_when(|it| it.is_trackable()),
        FieldDescriptor::text("updated", "Last Updated").icon("calendar"),
        FieldDescriptor::text("stocktake", "Last Stocktake")
            .icon("calendar")
            .visible_when(|it| it.stocktake.is_some()),
    ];

    // Quantity and availability.
    let quantity = vec![
        FieldDescriptor::text("quantity", "Quantity"),
        FieldDescriptor::text("serial", "Serial Number")
            .visible_when(|it| it.serial.is_some()),
        FieldDescriptor::text("available_stock", "Available").icon("quantity"),
    ];

    // Location and related records.
    let relations = vec![
        FieldDescriptor::link("supplier_part", "Supplier Part", ModelKind::SupplierPart)
            .visible_when(|it| it.supplier_part.is_some()),
        FieldDescriptor::link("location", "Location", ModelKind::StockLocation)
            .visible_when(|it| it.location.is_some()),
        FieldDescriptor::link("belongs_to", "Installed In", ModelKind::StockItem)
            .icon("stock")
            .formatter(installed_in_label)
            .visible_when(|it| it.belongs_to.is_some()),
        FieldDescriptor::link("consumed_by", "Consumed By", ModelKind::Build)
            .icon("build")
            .target_field("reference")
            .visible_when(|it| it.consumed_by.is_some()),
        FieldDescriptor::link("build", "Build Order", ModelKind::Build)
            .target_field("reference")
            .visible_when(|it| it.build.is_some()),
        FieldDescriptor::link("sales_order", "Sales Order", ModelKind::SalesOrder)
            .icon("sales_orders")
            .target_field("reference")
            .visible_when(|it| it.sales_order.is_some()),
        FieldDescriptor::link("customer", "Customer", ModelKind::Company)
            .visible_when(|it| it.customer.is_some()),
    ];

    // Anything else.
    let miscellaneous = vec![FieldDescriptor::text("packaging", "Packaging")
        .icon("part")
        .visible_when(|it| it.packaging.is_some())];

    FieldGroups {
        identity,
        quantity,
        relations,
        miscellaneous,
    }
}

/// Label for the "Installed In" link: parent part name, with the serial
/// suffixed when the parent is a uniquely serialized single unit.
fn installed_in_label(item: &AugmentedStockItem) -> Option<String> {
    let parent = item.belongs_to.as_ref()?;
    let mut text = parent
        .part_detail
        .as_ref()
        .map(|p| p.display_name().to_string())
        .or_else(|| parent.name.clone())?;

    if let Some(serial) = &parent.serial {
        if parent.quantity == Some(Decimal::ONE) {
            text = format!("{} # {}", text, serial);
        }
    }

    Some(text)
}
