//! Shared test support: an in-memory backend implementing every
//! collaborator trait, with per-record fetch delays and a failure switch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;

use stockview::client::{
    AdjustmentPayload, Attachment, AttachmentClient, ClientError, ClientSet, EditPayload,
    FetchOptions, MutationReceipt, NotesClient, StockItemClient, StockMutationClient,
    SubResourceClient, TestResult, TransferPayload,
};
use stockview::permissions::StaticPermissions;
use stockview::{StockDetailView, StockItem, StockItemId, ViewConfig};

/// Minimal ready-to-derive record.
pub fn stock_item(pk: i64) -> StockItem {
    serde_json::from_value(json!({
        "pk": pk,
        "part": 100 + pk,
        "quantity": "10",
        "allocated": "0",
        "part_detail": { "pk": 100 + pk, "name": format!("Part {pk}") }
    }))
    .unwrap()
}

#[derive(Default)]
pub struct TestBackend {
    items: Mutex<HashMap<i64, StockItem>>,
    fetch_log: Mutex<Vec<StockItemId>>,
    delays: Mutex<HashMap<i64, Duration>>,
    fail_mutations: AtomicBool,
    mutation_delay: Mutex<Option<Duration>>,
}

impl TestBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, item: StockItem) {
        self.items.lock().unwrap().insert(item.pk.0, item);
    }

    pub fn set_fetch_delay(&self, pk: i64, delay: Duration) {
        self.delays.lock().unwrap().insert(pk, delay);
    }

    pub fn set_mutation_delay(&self, delay: Duration) {
        *self.mutation_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> Vec<StockItemId> {
        self.fetch_log.lock().unwrap().clone()
    }

    async fn mutate<F>(&self, id: StockItemId, apply: F) -> Result<MutationReceipt, ClientError>
    where
        F: FnOnce(&mut StockItem),
    {
        let delay = *self.mutation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::Rejected("mutation rejected".into()));
        }
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(&id.0).ok_or(ClientError::NotFound)?;
        apply(item);
        Ok(MutationReceipt::new())
    }
}

#[async_trait]
impl StockItemClient for TestBackend {
    async fn get_stock_item(
        &self,
        id: StockItemId,
        _options: &FetchOptions,
    ) -> Result<StockItem, ClientError> {
        self.fetch_log.lock().unwrap().push(id);
        let delay = self.delays.lock().unwrap().get(&id.0).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let items = self.items.lock().unwrap();
        items.get(&id.0).cloned().ok_or(ClientError::NotFound)
    }
}

#[async_trait]
impl StockMutationClient for TestBackend {
    async fn count(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let quantity = payload.quantity;
        self.mutate(id, |item| item.quantity = Some(quantity)).await
    }

    async fn add(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let delta = payload.quantity;
        self.mutate(id, |item| {
            item.quantity = Some(item.quantity.unwrap_or(Decimal::ZERO) + delta);
        })
        .await
    }

    async fn remove(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let delta = payload.quantity;
        self.mutate(id, |item| {
            item.quantity =
                Some((item.quantity.unwrap_or(Decimal::ZERO) - delta).max(Decimal::ZERO));
        })
        .await
    }

    async fn transfer(
        &self,
        id: StockItemId,
        payload: &TransferPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let location = payload.location;
        self.mutate(id, |item| item.location = Some(location)).await
    }

    async fn edit(
        &self,
        id: StockItemId,
        payload: &EditPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let payload = payload.clone();
        self.mutate(id, move |item| {
            if let Some(status) = payload.status {
                item.status = status;
            }
            if payload.batch.is_some() {
                item.batch = payload.batch;
            }
        })
        .await
    }
}

#[async_trait]
impl NotesClient for TestBackend {
    async fn get_notes(&self, id: StockItemId) -> Result<String, ClientError> {
        let items = self.items.lock().unwrap();
        items
            .get(&id.0)
            .map(|item| item.notes.clone().unwrap_or_default())
            .ok_or(ClientError::NotFound)
    }

    async fn put_notes(&self, id: StockItemId, text: &str) -> Result<(), ClientError> {
        let mut items = self.items.lock().unwrap();
        let item = items.get_mut(&id.0).ok_or(ClientError::NotFound)?;
        item.notes = Some(text.to_string());
        Ok(())
    }
}

#[async_trait]
impl AttachmentClient for TestBackend {
    async fn list_attachments(
        &self,
        _model: &str,
        _id: StockItemId,
    ) -> Result<Vec<Attachment>, ClientError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SubResourceClient for TestBackend {
    async fn test_results(
        &self,
        _item: StockItemId,
        _part: i64,
    ) -> Result<Vec<TestResult>, ClientError> {
        Ok(Vec::new())
    }

    async fn installed_items(&self, _parent: StockItemId) -> Result<Vec<StockItem>, ClientError> {
        Ok(Vec::new())
    }

    async fn child_items(&self, _ancestor: StockItemId) -> Result<Vec<StockItem>, ClientError> {
        Ok(Vec::new())
    }
}

pub fn client_set(backend: &Arc<TestBackend>) -> ClientSet {
    ClientSet {
        stock: backend.clone(),
        mutations: backend.clone(),
        notes: backend.clone(),
        attachments: backend.clone(),
        subresources: backend.clone(),
    }
}

/// Builds a view over the backend with all permissions granted.
pub fn view_over(
    backend: &Arc<TestBackend>,
) -> (
    StockDetailView,
    tokio::sync::mpsc::Receiver<stockview::StockEvent>,
) {
    StockDetailView::new(
        ViewConfig::default(),
        client_set(backend),
        Arc::new(StaticPermissions::all()),
    )
}
