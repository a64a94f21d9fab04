//! Record snapshot ownership and the refresh contract.
//!
//! The store is the only writer of the record snapshot. Snapshots are
//! replaced wholesale on every successful fetch; there is no partial-update
//! path. Each load is stamped with a generation counter so that a fetch
//! superseded by a newer identity change is discarded on arrival
//! (last-identity-wins).

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::client::{ClientError, FetchOptions, StockItemClient};
use crate::errors::{PageError, ViewError};
use crate::events::{EventSender, StockEvent};
use crate::models::{StockItem, StockItemId};

/// Load state of the record, gating the page-level overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// An installed record snapshot and its monotonic version.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub item: Arc<StockItem>,
    pub version: u64,
}

#[derive(Debug)]
struct StoreInner {
    identity: Option<StockItemId>,
    status: LoadStatus,
    snapshot: Option<Snapshot>,
    page_error: Option<PageError>,
    /// Stamp of the most recent fetch; older results are stale.
    generation: u64,
    /// Bumped once per installed snapshot.
    version: u64,
}

#[derive(Clone)]
pub struct RecordStore {
    client: Arc<dyn StockItemClient>,
    options: FetchOptions,
    events: EventSender,
    inner: Arc<RwLock<StoreInner>>,
}

impl RecordStore {
    pub fn new(client: Arc<dyn StockItemClient>, options: FetchOptions, events: EventSender) -> Self {
        Self {
            client,
            options,
            events,
            inner: Arc::new(RwLock::new(StoreInner {
                identity: None,
                status: LoadStatus::Idle,
                snapshot: None,
                page_error: None,
                generation: 0,
                version: 0,
            })),
        }
    }

    /// Fetches the record for `id` and installs it as the current snapshot.
    ///
    /// If another load for a different identity starts while this fetch is
    /// outstanding, the result is dropped on arrival and
    /// [`ViewError::StaleResponse`] is returned to this caller; the
    /// displayed record is never regressed.
    #[instrument(skip(self), fields(stock_item = %id))]
    pub async fn load(&self, id: StockItemId) -> Result<Snapshot, ViewError> {
        self.fetch(id, false).await
    }

    /// Re-runs the last fetch and atomically replaces the snapshot.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Snapshot, ViewError> {
        let id = {
            let inner = self.inner.read().await;
            inner.identity.ok_or(ViewError::NoRecord)?
        };
        self.fetch(id, true).await
    }

    async fn fetch(&self, id: StockItemId, is_refresh: bool) -> Result<Snapshot, ViewError> {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.identity = Some(id);
            inner.status = LoadStatus::Loading;
            inner.generation += 1;
            inner.generation
        };

        let fetched = self.client.get_stock_item(id, &self.options).await;

        let (event, outcome) = {
            let mut inner = self.inner.write().await;
            if inner.generation != generation {
                debug!(stock_item = %id, "discarding stale fetch result");
                let current = inner.identity;
                (
                    Some(StockEvent::StaleDiscarded { id }),
                    Err(ViewError::StaleResponse {
                        requested: id,
                        current,
                    }),
                )
            } else {
                match fetched {
                    Ok(item) => {
                        inner.version += 1;
                        let snapshot = Snapshot {
                            item: Arc::new(item),
                            version: inner.version,
                        };
                        inner.snapshot = Some(snapshot.clone());
                        inner.status = LoadStatus::Ready;
                        inner.page_error = None;
                        info!(stock_item = %id, version = snapshot.version, "snapshot installed");
                        let event = if is_refresh {
                            StockEvent::RecordRefreshed {
                                id,
                                version: snapshot.version,
                            }
                        } else {
                            StockEvent::RecordLoaded {
                                id,
                                version: snapshot.version,
                            }
                        };
                        (Some(event), Ok(snapshot))
                    }
                    Err(ClientError::NotFound) => {
                        inner.status = LoadStatus::Error;
                        inner.snapshot = None;
                        inner.page_error = Some(PageError::NotFound(id));
                        warn!(stock_item = %id, "record not found");
                        (None, Err(ViewError::NotFound(id)))
                    }
                    Err(e) => {
                        inner.status = LoadStatus::Error;
                        inner.page_error = Some(PageError::Fetch(e.to_string()));
                        warn!(stock_item = %id, error = %e, "fetch failed");
                        (None, Err(ViewError::FetchFailed(e.to_string())))
                    }
                }
            }
        };

        if let Some(event) = event {
            if let Err(e) = self.events.send(event).await {
                warn!(error = %e, "event channel unavailable");
            }
        }

        outcome
    }

    pub async fn status(&self) -> LoadStatus {
        self.inner.read().await.status
    }

    pub async fn identity(&self) -> Option<StockItemId> {
        self.inner.read().await.identity
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.inner.read().await.snapshot.clone()
    }

    pub async fn page_error(&self) -> Option<PageError> {
        self.inner.read().await.page_error.clone()
    }

    pub async fn version(&self) -> u64 {
        self.inner.read().await.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockStockItemClient;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn fixture(pk: i64) -> StockItem {
        let mut item: StockItem =
            serde_json::from_value(json!({ "pk": pk, "part": 1 })).unwrap();
        item.quantity = Some(dec!(10));
        item.allocated = Some(dec!(2));
        item
    }

    fn store_with(
        client: MockStockItemClient,
    ) -> (RecordStore, tokio::sync::mpsc::Receiver<StockEvent>) {
        let (events, rx) = EventSender::channel(16);
        let store = RecordStore::new(Arc::new(client), FetchOptions::default(), events);
        (store, rx)
    }

    #[tokio::test]
    async fn load_installs_snapshot_and_bumps_version() {
        let mut client = MockStockItemClient::new();
        client
            .expect_get_stock_item()
            .times(1)
            .returning(|id, _| Ok(fixture(id.0)));

        let (store, _rx) = store_with(client);
        assert_eq!(store.status().await, LoadStatus::Idle);

        let snapshot = store.load(StockItemId(42)).await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.item.pk, StockItemId(42));
        assert_eq!(store.status().await, LoadStatus::Ready);
        assert_eq!(store.identity().await, Some(StockItemId(42)));
    }

    #[tokio::test]
    async fn refresh_reuses_last_identity() {
        let mut client = MockStockItemClient::new();
        client
            .expect_get_stock_item()
            .times(2)
            .returning(|id, _| Ok(fixture(id.0)));

        let (store, _rx) = store_with(client);
        store.load(StockItemId(7)).await.unwrap();
        let refreshed = store.refresh().await.unwrap();

        assert_eq!(refreshed.item.pk, StockItemId(7));
        assert_eq!(refreshed.version, 2);
    }

    #[tokio::test]
    async fn refresh_without_identity_is_rejected() {
        let client = MockStockItemClient::new();
        let (store, _rx) = store_with(client);
        assert_matches!(store.refresh().await, Err(ViewError::NoRecord));
    }

    #[tokio::test]
    async fn not_found_is_terminal_with_no_snapshot() {
        let mut client = MockStockItemClient::new();
        client
            .expect_get_stock_item()
            .times(1)
            .returning(|_, _| Err(ClientError::NotFound));

        let (store, _rx) = store_with(client);
        let result = store.load(StockItemId(9)).await;

        assert_matches!(result, Err(ViewError::NotFound(StockItemId(9))));
        assert_eq!(store.status().await, LoadStatus::Error);
        assert!(store.snapshot().await.is_none());
        assert_eq!(
            store.page_error().await,
            Some(PageError::NotFound(StockItemId(9)))
        );
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_snapshot() {
        let mut client = MockStockItemClient::new();
        let mut calls = 0;
        client.expect_get_stock_item().returning(move |id, _| {
            calls += 1;
            if calls == 1 {
                Ok(fixture(id.0))
            } else {
                Err(ClientError::Transport("boom".into()))
            }
        });

        let (store, _rx) = store_with(client);
        store.load(StockItemId(1)).await.unwrap();
        let result = store.refresh().await;

        assert_matches!(result, Err(ViewError::FetchFailed(_)));
        assert_eq!(store.status().await, LoadStatus::Error);
        // The last good snapshot is retained for recovery display decisions.
        assert!(store.snapshot().await.is_some());
    }
}
