use async_trait::async_trait;
use serde_json::Value;
use storesync_core::{AppResult, GroupLabel, NonEmptyString};
use storesync_domain::{AuditOperation, EntityResource};

/// Server-side slice of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditQuery {
    /// Every audit row.
    All,
    /// Rows written by one group.
    Group(GroupLabel),
    /// Rows affecting one table.
    Table(NonEmptyString),
    /// Rows of one operation kind.
    Operation(AuditOperation),
    /// History of a single record.
    Record {
        /// Affected table.
        table: NonEmptyString,
        /// Affected record identifier.
        record_id: i64,
    },
}

/// Remote collection API.
///
/// Implementations return raw JSON; callers normalize it. Every failure
/// surfaces as an [`storesync_core::AppError`] and is never retried here.
#[async_trait]
pub trait RecordsGateway: Send + Sync {
    /// Lists every record of a resource, inactive ones included.
    async fn list_records(&self, resource: EntityResource) -> AppResult<Vec<Value>>;

    /// Returns one record by identifier.
    async fn find_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value>;

    /// Runs the backend name search.
    async fn search_records(&self, resource: EntityResource, term: &str)
    -> AppResult<Vec<Value>>;

    /// Returns the record registered with `email`.
    async fn find_record_by_email(&self, resource: EntityResource, email: &str)
    -> AppResult<Value>;

    /// Lists records whose `field` equals `value` on the backend.
    async fn list_records_by_field(
        &self,
        resource: EntityResource,
        field: &str,
        value: &str,
    ) -> AppResult<Vec<Value>>;

    /// Lists a slice of the audit trail.
    async fn list_audit_records(&self, query: &AuditQuery) -> AppResult<Vec<Value>>;

    /// Creates a record and returns the backend acknowledgement.
    async fn create_record(&self, resource: EntityResource, body: Value) -> AppResult<Value>;

    /// Fully replaces a record.
    async fn replace_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        body: Value,
    ) -> AppResult<Value>;

    /// Updates only the given fields of a record.
    async fn patch_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        fields: Value,
    ) -> AppResult<Value>;

    /// Soft-deletes a record.
    async fn delete_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value>;

    /// Returns whether the backend answers at all.
    async fn check_connection(&self) -> bool;
}
