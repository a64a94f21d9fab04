//! Composition root for the stock-item detail page.
//!
//! Owns the store, the derived-view cache, the workflow set and the
//! permission capability, and projects them into a [`PageView`] on demand.
//! The renderer is external: it reads the descriptor sets and evaluates
//! their visibility predicates against [`PageView::record`].

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::cache::DerivedCache;
use crate::client::{
    Attachment, ClientError, ClientSet, MutationKind, MutationReceipt, MutationRequest,
    TestResult,
};
use crate::compose::{actions, badges, breadcrumbs, fields, panels};
use crate::compose::{
    ActionMenu, Badge, Breadcrumb, FieldGroups, LocationTreeSeed, Panel, PanelContent,
};
use crate::config::ViewConfig;
use crate::derive::AugmentedStockItem;
use crate::errors::{PageError, ViewError};
use crate::events::{EventSender, StockEvent};
use crate::models::{StockItem, StockItemId};
use crate::permissions::PermissionCheck;
use crate::store::{LoadStatus, RecordStore};
use crate::workflow::{MutationWorkflow, WorkflowSet};

/// Fixed page header contract: title, part subtitle, part thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub title: &'static str,
    pub subtitle: Option<String>,
    pub image: Option<String>,
}

/// Resolved content for one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    /// Rendered from the field groups and part image; nothing to fetch.
    Composite,
    /// Supplied by an external collaborator (tracking, allocations).
    External,
    TestResults(Vec<TestResult>),
    InstalledItems(Vec<StockItem>),
    ChildItems(Vec<StockItem>),
    Attachments(Vec<Attachment>),
    Notes(String),
    Pending,
}

/// One full projection of the page, computed from an immutable snapshot.
#[derive(Debug)]
pub struct PageView {
    pub status: LoadStatus,
    /// Gates the full-page blocking overlay while a fetch is pending.
    pub loading_overlay: bool,
    pub error: Option<PageError>,
    pub header: PageHeader,
    pub badges: Vec<Badge>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub location_tree: LocationTreeSeed,
    pub menus: Vec<ActionMenu>,
    pub field_groups: FieldGroups,
    pub panels: Vec<Panel>,
    pub record: Option<Arc<AugmentedStockItem>>,
}

pub struct StockDetailView {
    config: ViewConfig,
    clients: ClientSet,
    store: RecordStore,
    cache: DerivedCache,
    workflows: WorkflowSet,
    permissions: Arc<dyn PermissionCheck>,
}

impl StockDetailView {
    /// Builds the view and returns the event stream fed by the store and
    /// the workflows.
    pub fn new(
        config: ViewConfig,
        clients: ClientSet,
        permissions: Arc<dyn PermissionCheck>,
    ) -> (Self, mpsc::Receiver<StockEvent>) {
        let (events, rx) = EventSender::channel(config.event_buffer);
        let store = RecordStore::new(
            Arc::clone(&clients.stock),
            config.fetch_options(),
            events.clone(),
        );
        let workflows = WorkflowSet::new(
            store.clone(),
            Arc::clone(&clients.mutations),
            events,
        );
        let cache = DerivedCache::new(config.cache_capacity);

        (
            Self {
                config,
                clients,
                store,
                cache,
                workflows,
                permissions,
            },
            rx,
        )
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn workflow(&self, kind: MutationKind) -> Arc<MutationWorkflow> {
        Arc::clone(self.workflows.get(kind))
    }

    /// Handles the page's identity parameter. A changed identity reloads the
    /// record (and closes any open modal workflows, which belong to the
    /// previous record); the same identity degrades to a refresh.
    #[instrument(skip(self), fields(stock_item = %id))]
    pub async fn navigate(&self, id: StockItemId) -> Result<(), ViewError> {
        if self.store.identity().await == Some(id) {
            self.store.refresh().await?;
        } else {
            self.workflows.close_all().await;
            self.store.load(id).await?;
        }
        Ok(())
    }

    /// Opens the modal workflow for a mutation kind. Without a loaded record
    /// this is a no-op, not an error.
    pub async fn open_workflow(&self, kind: MutationKind) -> bool {
        if self.store.snapshot().await.is_none() {
            debug!(%kind, "no record loaded; ignoring workflow open");
            return false;
        }
        self.workflows.get(kind).open().await.is_ok()
    }

    /// Submits a mutation through the workflow matching its kind.
    pub async fn submit(&self, request: MutationRequest) -> Result<MutationReceipt, ViewError> {
        self.workflows.get(request.kind()).submit(request).await
    }

    /// Projects the current snapshot into a full page description.
    pub async fn compose(&self) -> PageView {
        let status = self.store.status().await;
        let error = self.store.page_error().await;
        let snapshot = self.store.snapshot().await;

        let record = snapshot
            .as_ref()
            .and_then(|s| self.cache.get_or_compute(s.item.pk, s.version, &s.item));
        let record_ref = record.as_deref();

        let loading = status == LoadStatus::Loading;
        let part_detail = record_ref.and_then(|r| r.part_detail.as_ref());

        PageView {
            status,
            loading_overlay: loading,
            error,
            header: PageHeader {
                title: "Stock Item",
                subtitle: part_detail.map(|p| p.display_name().to_string()),
                image: part_detail.and_then(|p| p.thumbnail.clone()),
            },
            badges: badges::assemble(record_ref, loading),
            breadcrumbs: breadcrumbs::trail(&self.config.collection_label, record_ref),
            location_tree: breadcrumbs::location_tree_seed(record_ref),
            menus: actions::menus(self.permissions.as_ref()),
            field_groups: fields::groups(),
            panels: panels::assemble(record_ref),
            record,
        }
    }

    /// Resolves one panel's lazy content through the collaborators.
    pub async fn panel_content(&self, content: &PanelContent) -> Result<PanelData, ViewError> {
        match content {
            PanelContent::Details => Ok(PanelData::Composite),
            PanelContent::TrackingHistory | PanelContent::Allocations => Ok(PanelData::External),
            PanelContent::TestResults { item, part } => self
                .clients
                .subresources
                .test_results(*item, *part)
                .await
                .map(PanelData::TestResults)
                .map_err(content_error),
            PanelContent::InstalledItems { parent } => self
                .clients
                .subresources
                .installed_items(*parent)
                .await
                .map(PanelData::InstalledItems)
                .map_err(content_error),
            PanelContent::ChildItems { ancestor } => self
                .clients
                .subresources
                .child_items(*ancestor)
                .await
                .map(PanelData::ChildItems)
                .map_err(content_error),
            PanelContent::Attachments { model, id } => self
                .clients
                .attachments
                .list_attachments(model, *id)
                .await
                .map(PanelData::Attachments)
                .map_err(content_error),
            PanelContent::Notes { id } => self
                .clients
                .notes
                .get_notes(*id)
                .await
                .map(PanelData::Notes)
                .map_err(content_error),
            PanelContent::Pending => Ok(PanelData::Pending),
        }
    }

    /// Resolves the content of every panel in the list concurrently.
    pub async fn load_panels(
        &self,
        panels: &[Panel],
    ) -> Vec<(&'static str, Result<PanelData, ViewError>)> {
        join_all(
            panels
                .iter()
                .map(|panel| async move { (panel.key, self.panel_content(&panel.content).await) }),
        )
        .await
    }

    /// Persists the notes blob for the current record.
    pub async fn save_notes(&self, text: &str) -> Result<(), ViewError> {
        let id = self.store.identity().await.ok_or(ViewError::NoRecord)?;
        self.clients
            .notes
            .put_notes(id, text)
            .await
            .map_err(content_error)
    }
}

fn content_error(e: ClientError) -> ViewError {
    ViewError::FetchFailed(e.to_string())
}
