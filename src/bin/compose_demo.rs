//! Runs the composition pipeline against an in-memory backend: loads a
//! record, prints the composed page, applies an "add stock" mutation and
//! shows the refreshed projection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;

use stockview::client::{
    AdjustmentPayload, Attachment, AttachmentClient, ClientError, EditPayload, FetchOptions,
    MutationReceipt, NotesClient, StockItemClient, StockMutationClient, SubResourceClient,
    TestResult, TransferPayload,
};
use stockview::permissions::StaticPermissions;
use stockview::{
    MutationKind, MutationRequest, StockDetailView, StockItem, StockItemId, ViewConfig,
};

struct DemoBackend {
    items: Mutex<HashMap<i64, StockItem>>,
}

impl DemoBackend {
    fn new() -> Self {
        let seeded: StockItem = serde_json::from_value(json!({
            "pk": 42,
            "part": 7,
            "quantity": "25",
            "allocated": "10",
            "batch": "B-2024-11",
            "status": 10,
            "location": 4,
            "child_items": 2,
            "part_detail": {
                "pk": 7,
                "name": "M3 Hex Bolt",
                "full_name": "M3x8 Hex Bolt",
                "thumbnail": "/media/part_images/bolt.thumb.png",
                "salable": true,
                "component": true
            },
            "location_path": [
                { "pk": 1, "name": "Factory" },
                { "pk": 4, "name": "Shelf A" }
            ]
        }))
        .expect("demo record");

        let mut items = HashMap::new();
        items.insert(42, seeded);
        Self {
            items: Mutex::new(items),
        }
    }

    async fn update<F>(&self, id: StockItemId, apply: F) -> Result<MutationReceipt, ClientError>
    where
        F: FnOnce(&mut StockItem),
    {
        let mut items = self.items.lock().await;
        let item = items.get_mut(&id.0).ok_or(ClientError::NotFound)?;
        apply(item);
        Ok(MutationReceipt::new())
    }
}

#[async_trait]
impl StockItemClient for DemoBackend {
    async fn get_stock_item(
        &self,
        id: StockItemId,
        _options: &FetchOptions,
    ) -> Result<StockItem, ClientError> {
        let items = self.items.lock().await;
        items.get(&id.0).cloned().ok_or(ClientError::NotFound)
    }
}

#[async_trait]
impl StockMutationClient for DemoBackend {
    async fn count(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let quantity = payload.quantity;
        self.update(id, |item| item.quantity = Some(quantity)).await
    }

    async fn add(
        &self,
        id: StockItemId,
        payload: &AdjustmentPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let delta = payload.quantity;
        self.update(id, |item| {
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
        self.update(id, |item| {
            item.quantity = Some((item.quantity.unwrap_or(Decimal::ZERO) - delta).max(Decimal::ZERO));
        })
        .await
    }

    async fn transfer(
        &self,
        id: StockItemId,
        payload: &TransferPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let location = payload.location;
        self.update(id, |item| item.location = Some(location)).await
    }

    async fn edit(
        &self,
        id: StockItemId,
        payload: &EditPayload,
    ) -> Result<MutationReceipt, ClientError> {
        let payload = payload.clone();
        self.update(id, move |item| {
            if let Some(status) = payload.status {
                item.status = status;
            }
            if payload.batch.is_some() {
                item.batch = payload.batch;
            }
            if payload.packaging.is_some() {
                item.packaging = payload.packaging;
            }
        })
        .await
    }
}

#[async_trait]
impl NotesClient for DemoBackend {
    async fn get_notes(&self, id: StockItemId) -> Result<String, ClientError> {
        let items = self.items.lock().await;
        items
            .get(&id.0)
            .map(|item| item.notes.clone().unwrap_or_default())
            .ok_or(ClientError::NotFound)
    }

    async fn put_notes(&self, id: StockItemId, text: &str) -> Result<(), ClientError> {
        let text = text.to_string();
        self.update(id, |item| item.notes = Some(text)).await.map(|_| ())
    }
}

#[async_trait]
impl AttachmentClient for DemoBackend {
    async fn list_attachments(
        &self,
        _model: &str,
        _id: StockItemId,
    ) -> Result<Vec<Attachment>, ClientError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SubResourceClient for DemoBackend {
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

fn print_page(page: &stockview::PageView) {
    println!("== {} ({:?})", page.header.title, page.status);
    if let Some(subtitle) = &page.header.subtitle {
        println!("   {}", subtitle);
    }
    let trail: Vec<_> = page.breadcrumbs.iter().map(|c| c.label.as_str()).collect();
    println!("   breadcrumbs: {}", trail.join(" / "));
    for badge in page.badges.iter().filter(|b| b.visible) {
        println!("   badge: {}", badge.label);
    }
    if let Some(record) = &page.record {
        println!("   available stock: {}", record.available_stock);
        for panel in page
            .panels
            .iter()
            .filter(|p| p.is_visible(Some(record.as_ref())))
        {
            println!("   panel: {}", panel.label);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let backend = Arc::new(DemoBackend::new());
    let clients = stockview::ClientSet {
        stock: backend.clone(),
        mutations: backend.clone(),
        notes: backend.clone(),
        attachments: backend.clone(),
        subresources: backend,
    };

    let (view, mut events) = StockDetailView::new(
        ViewConfig::default(),
        clients,
        Arc::new(StaticPermissions::all()),
    );

    view.navigate(StockItemId(42)).await?;
    print_page(&view.compose().await);

    info!("adding 5 units");
    assert!(view.open_workflow(MutationKind::Add).await);
    view.submit(MutationRequest::Add(AdjustmentPayload {
        quantity: Decimal::from(5),
        notes: Some("demo receipt".into()),
    }))
    .await?;

    print_page(&view.compose().await);

    while let Ok(event) = events.try_recv() {
        info!(?event, "pipeline event");
    }

    Ok(())
}
