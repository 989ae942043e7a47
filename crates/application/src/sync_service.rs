use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use storesync_core::{AppError, AppResult, GroupLabel};
use storesync_domain::{AuditRecord, Customer, EntityResource, audit_group_options};
use tracing::{info, warn};

use crate::collection_store::CollectionStore;
use crate::entity::SyncEntity;
use crate::filter_engine::apply;
use crate::records_ports::{AuditQuery, RecordsGateway};


const RELOAD_CANCELLED: &str = "reload cancelled before completion";

/// Load state of one entity coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing requested yet.
    Idle,
    /// A reload is awaiting the backend.
    Loading,
    /// The last reload succeeded.
    Loaded,
    /// The last reload failed with this message.
    LoadFailed(String),
}

impl SyncState {
    /// Returns the stable state name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::LoadFailed(_) => "load_failed",
        }
    }
}

/// Keeps one entity's local collection consistent with the backend.
///
/// Every write is followed by a full reload; local state is never patched.
pub struct EntitySync<E: SyncEntity> {
    gateway: Arc<dyn RecordsGateway>,
    store: CollectionStore<E>,
    statistics: E::Statistics,
    state: SyncState,
    max_wait: Duration,
}

impl<E: SyncEntity> EntitySync<E> {
    /// Creates an idle coordinator; every backend call is bounded by `max_wait`.
    #[must_use]
    pub fn new(gateway: Arc<dyn RecordsGateway>, max_wait: Duration) -> Self {
        Self {
            gateway,
            store: CollectionStore::new(),
            statistics: E::Statistics::default(),
            state: SyncState::Idle,
            max_wait,
        }
    }

    /// Returns the current load state.
    #[must_use]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Returns every record of the last successful load.
    #[must_use]
    pub fn full(&self) -> &[E] {
        self.store.full()
    }

    /// Returns the records passing the current filter.
    #[must_use]
    pub fn visible(&self) -> &[E] {
        self.store.visible()
    }

    /// Returns the current filter state.
    #[must_use]
    pub fn filter(&self) -> &E::Filter {
        self.store.filter()
    }

    /// Returns the statistics of the full set.
    #[must_use]
    pub fn statistics(&self) -> &E::Statistics {
        &self.statistics
    }

    /// Returns the statistics of the visible set.
    #[must_use]
    pub fn visible_statistics(&self) -> E::Statistics {
        E::aggregate(self.store.visible())
    }

    /// Replaces the filter state and recomputes the visible set locally.
    pub fn set_filter(&mut self, filter: E::Filter) {
        self.store.apply_filter(filter);
    }

    /// Fetches the full collection and replaces local state.
    ///
    /// On failure the previous records and statistics stay in place and the
    /// coordinator enters [`SyncState::LoadFailed`].
    pub async fn reload(&mut self) -> AppResult<()> {
        let gateway = Arc::clone(&self.gateway);
        let loading = LoadingState::enter(E::RESOURCE, &mut self.state);
        let result = within(self.max_wait, "list", gateway.list_records(E::RESOURCE)).await;

        match result {
            Ok(raw_records) => {
                self.store.replace_all(&raw_records);
                self.statistics = E::aggregate(self.store.full());
                loading.settle(SyncState::Loaded);
                info!(
                    resource = E::RESOURCE.as_str(),
                    records = self.store.full().len(),
                    visible = self.store.visible().len(),
                    "reload completed"
                );
                Ok(())
            }
            Err(error) => {
                warn!(
                    resource = E::RESOURCE.as_str(),
                    error = %error,
                    "reload failed; keeping previous records"
                );
                loading.settle(SyncState::LoadFailed(error.to_string()));
                Err(error)
            }
        }
    }

    /// Creates a record, then reloads.
    pub async fn create<B>(&mut self, body: &B) -> AppResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.ensure_writable()?;
        let body = to_body(body)?;
        let gateway = Arc::clone(&self.gateway);
        let acknowledgement = within(
            self.max_wait,
            "create",
            gateway.create_record(E::RESOURCE, body),
        )
        .await
        .inspect_err(|error| log_rejected_write(E::RESOURCE, "create", None, error))?;

        self.reload_after_write("create").await;
        Ok(acknowledgement)
    }

    /// Fully replaces a record, then reloads.
    pub async fn update<B>(&mut self, record_id: i64, body: &B) -> AppResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.ensure_writable()?;
        let body = to_body(body)?;
        let gateway = Arc::clone(&self.gateway);
        let acknowledgement = within(
            self.max_wait,
            "update",
            gateway.replace_record(E::RESOURCE, record_id, body),
        )
        .await
        .inspect_err(|error| log_rejected_write(E::RESOURCE, "update", Some(record_id), error))?;

        self.reload_after_write("update").await;
        Ok(acknowledgement)
    }

    /// Updates some fields of a record, then reloads.
    pub async fn patch(&mut self, record_id: i64, fields: Value) -> AppResult<Value> {
        self.ensure_writable()?;
        let gateway = Arc::clone(&self.gateway);
        let acknowledgement = within(
            self.max_wait,
            "patch",
            gateway.patch_record(E::RESOURCE, record_id, fields),
        )
        .await
        .inspect_err(|error| log_rejected_write(E::RESOURCE, "patch", Some(record_id), error))?;

        self.reload_after_write("patch").await;
        Ok(acknowledgement)
    }

    /// Soft-deletes a record, then reloads.
    pub async fn delete(&mut self, record_id: i64) -> AppResult<Value> {
        self.ensure_writable()?;
        let gateway = Arc::clone(&self.gateway);
        let acknowledgement = within(
            self.max_wait,
            "delete",
            gateway.delete_record(E::RESOURCE, record_id),
        )
        .await
        .inspect_err(|error| log_rejected_write(E::RESOURCE, "delete", Some(record_id), error))?;

        self.reload_after_write("delete").await;
        Ok(acknowledgement)
    }

    /// Fetches one record without touching local state.
    pub async fn find(&self, record_id: i64) -> AppResult<E> {
        within(
            self.max_wait,
            "find",
            self.gateway.find_record(E::RESOURCE, record_id),
        )
        .await
        .map(|raw| E::normalize(&raw))
    }

    /// Runs the backend name search without touching local state.
    pub async fn search_remote(&self, term: &str) -> AppResult<Vec<E>> {
        within(
            self.max_wait,
            "search",
            self.gateway.search_records(E::RESOURCE, term),
        )
        .await
        .map(|raw_records| raw_records.iter().map(E::normalize).collect())
    }

    /// Lists records matching `field == value` on the backend.
    pub async fn list_by_field(&self, field: &str, value: &str) -> AppResult<Vec<E>> {
        within(
            self.max_wait,
            "list_by_field",
            self.gateway.list_records_by_field(E::RESOURCE, field, value),
        )
        .await
        .map(|raw_records| raw_records.iter().map(E::normalize).collect())
    }

    /// Returns the visible records of an arbitrary filter without storing it.
    #[must_use]
    pub fn preview(&self, filter: &E::Filter) -> Vec<E> {
        apply(self.store.full(), filter)
    }

    /// Returns whether the backend is reachable.
    pub async fn check_connection(&self) -> bool {
        within(self.max_wait, "check_connection", async {
            Ok(self.gateway.check_connection().await)
        })
        .await
        .unwrap_or(false)
    }

    fn ensure_writable(&self) -> AppResult<()> {
        if E::RESOURCE.is_read_only() {
            return Err(AppError::Validation(format!(
                "resource '{}' is read-only",
                E::RESOURCE.as_str()
            )));
        }

        Ok(())
    }

    async fn reload_after_write(&mut self, operation: &'static str) {
        if let Err(error) = self.reload().await {
            warn!(
                resource = E::RESOURCE.as_str(),
                operation,
                error = %error,
                "write acknowledged but reload failed"
            );
        }
    }
}

impl EntitySync<Customer> {
    /// Fetches the customer registered with `email` without touching local state.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Customer> {
        within(
            self.max_wait,
            "find_by_email",
            self.gateway.find_record_by_email(Customer::RESOURCE, email),
        )
        .await
        .map(|raw| Customer::normalize(&raw))
    }
}

impl EntitySync<AuditRecord> {
    /// Fetches a server-side slice of the audit trail without touching local state.
    pub async fn query(&self, query: &AuditQuery) -> AppResult<Vec<AuditRecord>> {
        within(
            self.max_wait,
            "audit_query",
            self.gateway.list_audit_records(query),
        )
        .await
        .map(|raw_records| raw_records.iter().map(AuditRecord::normalize).collect())
    }

    /// Returns the options of the responsible-group filter.
    #[must_use]
    pub fn group_options(&self) -> Vec<GroupLabel> {
        audit_group_options(self.store.full())
    }
}

/// Holds a coordinator in [`SyncState::Loading`] until the reload settles.
///
/// A reload future dropped before settling leaves the coordinator in
/// [`SyncState::LoadFailed`] with the previous records untouched.
struct LoadingState<'a> {
    resource: EntityResource,
    state: &'a mut SyncState,
    settled: bool,
}

impl<'a> LoadingState<'a> {
    fn enter(resource: EntityResource, state: &'a mut SyncState) -> Self {
        *state = SyncState::Loading;
        Self {
            resource,
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: SyncState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for LoadingState<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                resource = self.resource.as_str(),
                "reload abandoned before completion; keeping previous records"
            );
            *self.state = SyncState::LoadFailed(RELOAD_CANCELLED.to_owned());
        }
    }
}

async fn within<T, F>(max_wait: Duration, operation: &'static str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(max_wait, future)
        .await
        .unwrap_or_else(|_| {
            Err(AppError::Timeout(format!(
                "{operation} did not complete within {} ms",
                max_wait.as_millis()
            )))
        })
}

fn to_body<B>(body: &B) -> AppResult<Value>
where
    B: Serialize + ?Sized,
{
    serde_json::to_value(body)
        .map_err(|error| AppError::Internal(format!("failed to encode request body: {error}")))
}

fn log_rejected_write(
    resource: EntityResource,
    operation: &'static str,
    record_id: Option<i64>,
    error: &AppError,
) {
    warn!(
        resource = resource.as_str(),
        operation,
        record_id = ?record_id,
        error = %error,
        "write failed"
    );
}
