//! External collaborator interfaces.
//!
//! The network layer is out of scope for this crate; everything it needs
//! from the backend is reached through these traits. Implementations are
//! supplied by the embedding application (HTTP client, test double, demo
//! fixture).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{StockItem, StockItemId, StockStatus};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// Request-time expansion options for a record fetch.
///
/// All three expansions are mandatory for the detail view; omitting them
/// breaks multiple descriptors. The defaults therefore enable everything,
/// and [`crate::config::ViewConfig`] re-enables any expansion a config file
/// tries to switch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    pub part_detail: bool,
    pub location_detail: bool,
    pub path_detail: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            part_detail: true,
            location_detail: true,
            path_detail: true,
        }
    }
}

/// The five record mutations backed by modal workflows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MutationKind {
    Count,
    Add,
    Remove,
    Transfer,
    Edit,
}

/// Receipt returned by a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    pub transaction_id: Uuid,
}

impl MutationReceipt {
    pub fn new() -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
        }
    }
}

impl Default for MutationReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload for count/add/remove operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentPayload {
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Payload for a transfer to another location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub location: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update applied by the edit workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EditPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StockStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
}

/// A mutation request tagged with its kind, as submitted to a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationRequest {
    Count(AdjustmentPayload),
    Add(AdjustmentPayload),
    Remove(AdjustmentPayload),
    Transfer(TransferPayload),
    Edit(EditPayload),
}

impl MutationRequest {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationRequest::Count(_) => MutationKind::Count,
            MutationRequest::Add(_) => MutationKind::Add,
            MutationRequest::Remove(_) => MutationKind::Remove,
            MutationRequest::Transfer(_) => MutationKind::Transfer,
            MutationRequest::Edit(_) => MutationKind::Edit,
        }
    }
}

/// Attachment listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub pk: i64,
    pub filename: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub uploaded: Option<DateTime<Utc>>,
}

/// Test result entry for a trackable part's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub pk: i64,
    pub test: String,
    pub result: bool,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Record retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockItemClient: Send + Sync {
    async fn get_stock_item(
        &self,
        id: StockItemId,
        options: &FetchOptions,
    ) -> Result<StockItem, ClientError>;
}

/// Record mutations. Each call targets one record and returns a receipt on
/// success; failures carry the backend's rejection message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockMutationClient: Send + Sync {
    async fn count(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError>;

    async fn add(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError>;

    async fn remove(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError>;

    async fn transfer(
        &self,
        id: StockItemId,
        payload: &TransferPayload,
    ) -> Result<MutationReceipt, ClientError>;

    async fn edit(
        &self,
        id: StockItemId,
        payload: &EditPayload,
    ) -> Result<MutationReceipt, ClientError>;
}

/// Notes blob persistence, keyed by record identity.
#[async_trait]
pub trait NotesClient: Send + Sync {
    async fn get_notes(&self, id: StockItemId) -> Result<String, ClientError>;

    async fn put_notes(&self, id: StockItemId, text: &str) -> Result<(), ClientError>;
}

/// Attachment listing for a model instance.
#[async_trait]
pub trait AttachmentClient: Send + Sync {
    async fn list_attachments(
        &self,
        model: &str,
        id: StockItemId,
    ) -> Result<Vec<Attachment>, ClientError>;
}

/// Sub-resource listings consumed by lazy panel content.
#[async_trait]
pub trait SubResourceClient: Send + Sync {
    async fn test_results(
        &self,
        item: StockItemId,
        part: i64,
    ) -> Result<Vec<TestResult>, ClientError>;

    async fn installed_items(&self, parent: StockItemId) -> Result<Vec<StockItem>, ClientError>;

    async fn child_items(&self, ancestor: StockItemId) -> Result<Vec<StockItem>, ClientError>;
}

/// Bundle of collaborator handles threaded through the view.
#[derive(Clone)]
pub struct ClientSet {
    pub stock: Arc<dyn StockItemClient>,
    pub mutations: Arc<dyn StockMutationClient>,
    pub notes: Arc<dyn NotesClient>,
    pub attachments: Arc<dyn AttachmentClient>,
    pub subresources: Arc<dyn SubResourceClient>,
}
