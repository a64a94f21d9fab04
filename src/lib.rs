//! stockview
//!
//! Headless composition engine for a stock-item detail view. The crate
//! derives computed attributes from a fetched record, builds the ordered,
//! conditionally-visible descriptor sets for each UI region (field groups,
//! panels, badges, action menus, breadcrumbs), and owns the snapshot
//! refresh contract that keeps those projections consistent across
//! mutations. Networking, rendering and persistence live behind the traits
//! in [`client`].
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod cache;
pub mod client;
pub mod compose;
pub mod config;
pub mod derive;
pub mod errors;
pub mod events;
pub mod models;
pub mod permissions;
pub mod store;
pub mod view;
pub mod workflow;

pub use client::{ClientSet, FetchOptions, MutationKind, MutationReceipt, MutationRequest};
pub use config::ViewConfig;
pub use derive::{augment, AugmentedStockItem};
pub use errors::{PageError, ViewError};
pub use events::{EventSender, StockEvent};
pub use models::{StockItem, StockItemId, StockStatus};
pub use store::{LoadStatus, RecordStore, Snapshot};
pub use view::{PageView, StockDetailView};
pub use workflow::{MutationWorkflow, WorkflowSet, WorkflowState};
