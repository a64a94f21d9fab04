use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::client::MutationKind;
use crate::models::StockItemId;

/// Events emitted by the store and the mutation workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StockEvent {
    /// A fresh snapshot was installed for a newly navigated identity.
    RecordLoaded { id: StockItemId, version: u64 },

    /// The current identity was re-fetched and its snapshot replaced.
    RecordRefreshed { id: StockItemId, version: u64 },

    /// A fetch result for a superseded identity arrived and was dropped.
    StaleDiscarded { id: StockItemId },

    /// A mutation was accepted by the backend.
    MutationApplied {
        id: StockItemId,
        kind: MutationKind,
        transaction_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

/// Cloneable sending half of the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<StockEvent>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<StockEvent>) -> Self {
        Self { sender }
    }

    /// Creates a bounded channel and returns both halves.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<StockEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx), rx)
    }

    /// Sends an event, mapping channel failures to a plain message.
    pub async fn send(&self, event: StockEvent) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("failed to send event: {}", e))
    }
}
