//! Modal mutation workflows.
//!
//! One state machine per mutation kind. The machines are independent: two
//! different kinds may be open (or submitting) at the same time, but the
//! same kind cannot be opened twice. Workflows coordinate only through
//! [`RecordStore::refresh`], which a successful submission triggers exactly
//! once.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::client::{MutationKind, MutationReceipt, MutationRequest, StockMutationClient};
use crate::errors::ViewError;
use crate::events::{EventSender, StockEvent};
use crate::models::StockItemId;
use crate::store::RecordStore;

/// `closed → open → submitting → (closed | open)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug)]
struct WorkflowInner {
    state: WorkflowState,
    last_error: Option<String>,
}

pub struct MutationWorkflow {
    kind: MutationKind,
    store: RecordStore,
    client: Arc<dyn StockMutationClient>,
    events: EventSender,
    inner: Mutex<WorkflowInner>,
}

impl MutationWorkflow {
    pub fn new(
        kind: MutationKind,
        store: RecordStore,
        client: Arc<dyn StockMutationClient>,
        events: EventSender,
    ) -> Self {
        Self {
            kind,
            store,
            client,
            events,
            inner: Mutex::new(WorkflowInner {
                state: WorkflowState::Closed,
                last_error: None,
            }),
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.lock().await.state
    }

    /// Error from the most recent failed submission, surfaced inline while
    /// the workflow stays open.
    pub async fn last_error(&self) -> Option<String> {
        self.inner.lock().await.last_error.clone()
    }

    /// Opens the workflow. Re-opening an active workflow is rejected.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub async fn open(&self) -> Result<(), ViewError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            WorkflowState::Closed => {
                inner.state = WorkflowState::Open;
                inner.last_error = None;
                Ok(())
            }
            WorkflowState::Open | WorkflowState::Submitting => {
                Err(ViewError::WorkflowBusy(self.kind))
            }
        }
    }

    /// Closes an open workflow without submitting. Closing a closed
    /// workflow is a no-op; a submission in flight cannot be abandoned.
    pub async fn close(&self) -> Result<(), ViewError> {
        let mut inner = self.inner.lock().await;
        match inner.state {
            WorkflowState::Submitting => Err(ViewError::WorkflowBusy(self.kind)),
            _ => {
                inner.state = WorkflowState::Closed;
                inner.last_error = None;
                Ok(())
            }
        }
    }

    /// Submits the mutation. On success the workflow closes and the store
    /// refreshes once; on failure it returns to open with the error
    /// surfaced, and no refresh happens.
    #[instrument(skip(self, request), fields(kind = %self.kind))]
    pub async fn submit(&self, request: MutationRequest) -> Result<MutationReceipt, ViewError> {
        if request.kind() != self.kind {
            return Err(ViewError::MutationFailed(format!(
                "{} payload submitted to {} workflow",
                request.kind(),
                self.kind
            )));
        }

        let id = self.store.identity().await.ok_or(ViewError::NoRecord)?;

        {
            let mut inner = self.inner.lock().await;
            match inner.state {
                WorkflowState::Open => inner.state = WorkflowState::Submitting,
                WorkflowState::Submitting => return Err(ViewError::WorkflowBusy(self.kind)),
                WorkflowState::Closed => return Err(ViewError::WorkflowClosed(self.kind)),
            }
        }

        let result = self.dispatch(id, &request).await;

        match result {
            Ok(receipt) => {
                {
                    let mut inner = self.inner.lock().await;
                    inner.state = WorkflowState::Closed;
                    inner.last_error = None;
                }
                info!(stock_item = %id, transaction = %receipt.transaction_id, "mutation applied");

                if let Err(e) = self
                    .events
                    .send(StockEvent::MutationApplied {
                        id,
                        kind: self.kind,
                        transaction_id: receipt.transaction_id,
                        timestamp: Utc::now(),
                    })
                    .await
                {
                    warn!(error = %e, "event channel unavailable");
                }

                // The new snapshot must be installed before assemblers
                // re-run; refresh completes before submit returns.
                if let Err(e) = self.store.refresh().await {
                    warn!(stock_item = %id, error = %e, "refresh after mutation failed");
                }

                Ok(receipt)
            }
            Err(e) => {
                let message = e.to_string();
                let mut inner = self.inner.lock().await;
                inner.state = WorkflowState::Open;
                inner.last_error = Some(message.clone());
                warn!(stock_item = %id, error = %message, "mutation rejected");
                Err(ViewError::MutationFailed(message))
            }
        }
    }

    async fn dispatch(
        &self,
        id: StockItemId,
        request: &MutationRequest,
    ) -> Result<MutationReceipt, crate::client::ClientError> {
        match request {
            MutationRequest::Count(payload) => self.client.count(id, payload).await,
            MutationRequest::Add(payload) => self.client.add(id, payload).await,
            MutationRequest::Remove(payload) => self.client.remove(id, payload).await,
            MutationRequest::Transfer(payload) => self.client.transfer(id, payload).await,
            MutationRequest::Edit(payload) => self.client.edit(id, payload).await,
        }
    }
}

/// The five workflows of the detail page, one per mutation kind.
pub struct WorkflowSet {
    count: Arc<MutationWorkflow>,
    add: Arc<MutationWorkflow>,
    remove: Arc<MutationWorkflow>,
    transfer: Arc<MutationWorkflow>,
    edit: Arc<MutationWorkflow>,
}

impl WorkflowSet {
    pub fn new(
        store: RecordStore,
        client: Arc<dyn StockMutationClient>,
        events: EventSender,
    ) -> Self {
        let workflow = |kind| {
            Arc::new(MutationWorkflow::new(
                kind,
                store.clone(),
                Arc::clone(&client),
                events.clone(),
            ))
        };
        Self {
            count: workflow(MutationKind::Count),
            add: workflow(MutationKind::Add),
            remove: workflow(MutationKind::Remove),
            transfer: workflow(MutationKind::Transfer),
            edit: workflow(MutationKind::Edit),
        }
    }

    pub fn get(&self, kind: MutationKind) -> &Arc<MutationWorkflow> {
        match kind {
            MutationKind::Count => &self.count,
            MutationKind::Add => &self.add,
            MutationKind::Remove => &self.remove,
            MutationKind::Transfer => &self.transfer,
            MutationKind::Edit => &self.edit,
        }
    }

    /// Closes every workflow that is not mid-submission.
    pub async fn close_all(&self) {
        for kind in [
            MutationKind::Count,
            MutationKind::Add,
            MutationKind::Remove,
            MutationKind::Transfer,
            MutationKind::Edit,
        ] {
            let _ = self.get(kind).close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{
        AdjustmentPayload, ClientError, FetchOptions, MockStockItemClient,
        MockStockMutationClient,
    };
    use crate::models::StockItem;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fixture(pk: i64) -> StockItem {
        let mut item: StockItem =
            serde_json::from_value(json!({ "pk": pk, "part": 1 })).unwrap();
        item.quantity = Some(dec!(10));
        item.allocated = Some(dec!(0));
        item
    }

    async fn loaded_store() -> (RecordStore, tokio::sync::mpsc::Receiver<StockEvent>) {
        let mut client = MockStockItemClient::new();
        client
            .expect_get_stock_item()
            .returning(|id, _| Ok(fixture(id.0)));
        let (events, rx) = EventSender::channel(16);
        let store = RecordStore::new(Arc::new(client), FetchOptions::default(), events);
        store.load(StockItemId(42)).await.unwrap();
        (store, rx)
    }

    fn add_request() -> MutationRequest {
        MutationRequest::Add(AdjustmentPayload {
            quantity: dec!(5),
            notes: None,
        })
    }

    #[tokio::test]
    async fn same_kind_cannot_open_twice() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let workflow = MutationWorkflow::new(
            MutationKind::Add,
            store,
            Arc::new(MockStockMutationClient::new()),
            events,
        );

        workflow.open().await.unwrap();
        assert_matches!(
            workflow.open().await,
            Err(ViewError::WorkflowBusy(MutationKind::Add))
        );
    }

    #[tokio::test]
    async fn submit_requires_open_state() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let workflow = MutationWorkflow::new(
            MutationKind::Add,
            store,
            Arc::new(MockStockMutationClient::new()),
            events,
        );

        assert_matches!(
            workflow.submit(add_request()).await,
            Err(ViewError::WorkflowClosed(MutationKind::Add))
        );
    }

    #[tokio::test]
    async fn mismatched_payload_is_rejected() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let workflow = MutationWorkflow::new(
            MutationKind::Count,
            store,
            Arc::new(MockStockMutationClient::new()),
            events,
        );
        workflow.open().await.unwrap();

        assert_matches!(
            workflow.submit(add_request()).await,
            Err(ViewError::MutationFailed(_))
        );
        // A rejected payload does not consume the open state.
        assert_eq!(workflow.state().await, WorkflowState::Open);
    }

    #[tokio::test]
    async fn failed_submission_keeps_workflow_open_with_error() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let mut mutations = MockStockMutationClient::new();
        mutations
            .expect_add()
            .times(1)
            .returning(|_, _| Err(ClientError::Rejected("insufficient stock".into())));

        let workflow =
            MutationWorkflow::new(MutationKind::Add, store, Arc::new(mutations), events);
        workflow.open().await.unwrap();

        let result = workflow.submit(add_request()).await;
        assert_matches!(result, Err(ViewError::MutationFailed(_)));
        assert_eq!(workflow.state().await, WorkflowState::Open);
        assert!(workflow
            .last_error()
            .await
            .unwrap()
            .contains("insufficient stock"));
    }

    #[tokio::test]
    async fn successful_submission_closes_and_clears_error() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let mut mutations = MockStockMutationClient::new();
        mutations
            .expect_add()
            .times(1)
            .returning(|_, _| Ok(MutationReceipt::new()));

        let workflow =
            MutationWorkflow::new(MutationKind::Add, store, Arc::new(mutations), events);
        workflow.open().await.unwrap();
        workflow.submit(add_request()).await.unwrap();

        assert_eq!(workflow.state().await, WorkflowState::Closed);
        assert_eq!(workflow.last_error().await, None);
    }

    #[tokio::test]
    async fn independent_kinds_may_be_open_concurrently() {
        let (store, _rx) = loaded_store().await;
        let (events, _erx) = EventSender::channel(4);
        let set = WorkflowSet::new(store, Arc::new(MockStockMutationClient::new()), events);

        set.get(MutationKind::Add).open().await.unwrap();
        set.get(MutationKind::Transfer).open().await.unwrap();

        assert_eq!(set.get(MutationKind::Add).state().await, WorkflowState::Open);
        assert_eq!(
            set.get(MutationKind::Transfer).state().await,
            WorkflowState::Open
        );
        assert_eq!(
            set.get(MutationKind::Count).state().await,
            WorkflowState::Closed
        );

        set.close_all().await;
        assert_eq!(set.get(MutationKind::Add).state().await, WorkflowState::Closed);
    }
}
