use thiserror::Error;

use crate::client::MutationKind;
use crate::models::StockItemId;

/// Error taxonomy for the detail-view pipeline.
///
/// Fetch and mutation failures are handled at the component boundary and are
/// never propagated through the assemblers; the assemblers themselves are
/// total functions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The record could not be retrieved; the page renders an error state
    /// and no descriptors are computed.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// The identity does not resolve. Terminal, no retry.
    #[error("stock item {0} not found")]
    NotFound(StockItemId),

    /// A workflow submission failed; the workflow stays open and does not
    /// trigger a refresh.
    #[error("mutation failed: {0}")]
    MutationFailed(String),

    /// A fetch for a superseded identity arrived late. Discarded silently,
    /// never user-visible.
    #[error("stale response for stock item {requested}")]
    StaleResponse {
        requested: StockItemId,
        current: Option<StockItemId>,
    },

    /// An operation that requires a loaded record was invoked without one.
    #[error("no record loaded")]
    NoRecord,

    /// The workflow for this mutation kind is already open or submitting.
    #[error("{0} workflow is already active")]
    WorkflowBusy(MutationKind),

    /// Submit was called on a workflow that is not open.
    #[error("{0} workflow is not open")]
    WorkflowClosed(MutationKind),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Page-level error state surfaced by the store after a failed fetch.
///
/// Kept separate from [`ViewError`] so the store can hold a cloneable copy
/// of the last failure for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    NotFound(StockItemId),
    Fetch(String),
}
