use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Local;
use serde_json::{Map, Value, json};
use storesync_application::{AuditQuery, RecordsGateway};
use storesync_core::{AppError, AppResult, GroupLabel};
use storesync_domain::{AuditOperation, EntityResource};
use tokio::sync::RwLock;

mod demo;


/// In-process backend with server-side id assignment and an audit trail.
///
/// Deletes are soft: they set `activo` to `false`. Every write appends an
/// audit row attributed to the configured group.
#[derive(Debug)]
pub struct InMemoryRecordsGateway {
    tables: RwLock<RecordTables>,
}

impl InMemoryRecordsGateway {
    /// Creates an empty backend whose writes are attributed to `group`.
    #[must_use]
    pub fn new(group: GroupLabel) -> Self {
        Self {
            tables: RwLock::new(RecordTables::new(group)),
        }
    }

    /// Creates a backend preloaded with a small product and customer catalog.
    #[must_use]
    pub fn with_demo_data(group: GroupLabel) -> Self {
        let mut tables = RecordTables::new(group);
        demo::seed(&mut tables);

        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[derive(Debug)]
struct RecordTables {
    group: GroupLabel,
    records: HashMap<EntityResource, Vec<Map<String, Value>>>,
}

impl RecordTables {
    fn new(group: GroupLabel) -> Self {
        Self {
            group,
            records: HashMap::new(),
        }
    }

    fn rows(&self, resource: EntityResource) -> &[Map<String, Value>] {
        self.records
            .get(&resource)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn next_id(&self, resource: EntityResource) -> i64 {
        self.rows(resource)
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1
    }

    fn position(&self, resource: EntityResource, record_id: i64) -> AppResult<usize> {
        self.rows(resource)
            .iter()
            .position(|row| row.get("id").and_then(Value::as_i64) == Some(record_id))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} record {record_id} does not exist",
                    resource.as_str()
                ))
            })
    }

    fn create(&mut self, resource: EntityResource, body: Value) -> AppResult<Value> {
        ensure_writable(resource)?;
        let mut row = object_body(body)?;
        let record_id = self.next_id(resource);
        row.insert("id".to_owned(), json!(record_id));
        row.entry("activo").or_insert(json!(true));

        self.records.entry(resource).or_default().push(row.clone());
        let created = Value::Object(row);
        self.append_audit(
            resource,
            record_id,
            AuditOperation::Create,
            None,
            Some(created.clone()),
        );

        Ok(created)
    }

    fn replace(
        &mut self,
        resource: EntityResource,
        record_id: i64,
        body: Value,
    ) -> AppResult<Value> {
        ensure_writable(resource)?;
        let mut row = object_body(body)?;
        row.insert("id".to_owned(), json!(record_id));
        self.overwrite(resource, record_id, AuditOperation::Update, |current| {
            *current = row;
        })
    }

    fn patch(
        &mut self,
        resource: EntityResource,
        record_id: i64,
        fields: Value,
    ) -> AppResult<Value> {
        ensure_writable(resource)?;
        let fields = object_body(fields)?;
        self.overwrite(resource, record_id, AuditOperation::Update, |current| {
            current.extend(fields.into_iter().filter(|(field, _)| field != "id"));
        })
    }

    fn soft_delete(&mut self, resource: EntityResource, record_id: i64) -> AppResult<Value> {
        ensure_writable(resource)?;
        self.overwrite(resource, record_id, AuditOperation::Delete, |current| {
            current.insert("activo".to_owned(), json!(false));
        })
    }

    fn overwrite<F>(
        &mut self,
        resource: EntityResource,
        record_id: i64,
        operation: AuditOperation,
        change: F,
    ) -> AppResult<Value>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let position = self.position(resource, record_id)?;
        let rows = self.records.entry(resource).or_default();
        let previous = Value::Object(rows[position].clone());
        change(&mut rows[position]);
        let updated = Value::Object(rows[position].clone());

        let current = (operation != AuditOperation::Delete).then(|| updated.clone());
        self.append_audit(resource, record_id, operation, Some(previous), current);

        Ok(updated)
    }

    fn append_audit(
        &mut self,
        resource: EntityResource,
        record_id: i64,
        operation: AuditOperation,
        previous: Option<Value>,
        current: Option<Value>,
    ) {
        let audit_id = self.next_id(EntityResource::Audit);
        let occurred_at = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S");
        let row = json!({
            "id": audit_id,
            "tabla_afectada": resource.as_str(),
            "id_registro": record_id,
            "operacion": operation.as_str(),
            "grupo_responsable": self.group.as_str(),
            "datos_anteriores": previous,
            "datos_nuevos": current,
            "fecha_operacion": occurred_at.to_string(),
            "observaciones": format!("{} {} {record_id}", operation.as_str(), resource.as_str()),
        });

        if let Value::Object(row) = row {
            self.records
                .entry(EntityResource::Audit)
                .or_default()
                .push(row);
        }
    }

    fn audit_rows(&self, query: &AuditQuery) -> Vec<Value> {
        self.rows(EntityResource::Audit)
            .iter()
            .filter(|row| audit_row_matches(row, query))
            .cloned()
            .map(Value::Object)
            .collect()
    }
}

fn audit_row_matches(row: &Map<String, Value>, query: &AuditQuery) -> bool {
    let text = |field: &str| row.get(field).and_then(Value::as_str).unwrap_or_default();

    match query {
        AuditQuery::All => true,
        AuditQuery::Group(group) => text("grupo_responsable") == group.as_str(),
        AuditQuery::Table(table) => text("tabla_afectada").eq_ignore_ascii_case(table.as_str()),
        AuditQuery::Operation(operation) => text("operacion") == operation.as_str(),
        AuditQuery::Record { table, record_id } => {
            text("tabla_afectada").eq_ignore_ascii_case(table.as_str())
                && row.get("id_registro").and_then(Value::as_i64) == Some(*record_id)
        }
    }
}

fn ensure_writable(resource: EntityResource) -> AppResult<()> {
    if resource.is_read_only() {
        return Err(AppError::Rejected {
            status: 405,
            message: format!("'{}' does not accept writes", resource.as_str()),
        });
    }

    Ok(())
}

fn object_body(body: Value) -> AppResult<Map<String, Value>> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::Rejected {
            status: 422,
            message: "request body must be a JSON object".to_owned(),
        }),
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[async_trait]
impl RecordsGateway for InMemoryRecordsGateway {
    async fn list_records(&self, resource: EntityResource) -> AppResult<Vec<Value>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows(resource)
            .iter()
            .cloned()
            .map(Value::Object)
            .collect())
    }

    async fn find_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value> {
        let tables = self.tables.read().await;
        let position = tables.position(resource, record_id)?;
        Ok(Value::Object(tables.rows(resource)[position].clone()))
    }

    async fn search_records(
        &self,
        resource: EntityResource,
        term: &str,
    ) -> AppResult<Vec<Value>> {
        let term = term.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .rows(resource)
            .iter()
            .filter(|row| {
                row.get("nombre")
                    .and_then(Value::as_str)
                    .is_some_and(|name| name.to_lowercase().contains(term.as_str()))
            })
            .cloned()
            .map(Value::Object)
            .collect())
    }

    async fn find_record_by_email(
        &self,
        resource: EntityResource,
        email: &str,
    ) -> AppResult<Value> {
        let tables = self.tables.read().await;
        tables
            .rows(resource)
            .iter()
            .find(|row| {
                row.get("email")
                    .and_then(Value::as_str)
                    .is_some_and(|stored| stored.eq_ignore_ascii_case(email.trim()))
            })
            .cloned()
            .map(Value::Object)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "no {} record with email '{email}'",
                    resource.as_str()
                ))
            })
    }

    async fn list_records_by_field(
        &self,
        resource: EntityResource,
        field: &str,
        value: &str,
    ) -> AppResult<Vec<Value>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows(resource)
            .iter()
            .filter(|row| row.get(field).and_then(field_text).as_deref() == Some(value))
            .cloned()
            .map(Value::Object)
            .collect())
    }

    async fn list_audit_records(&self, query: &AuditQuery) -> AppResult<Vec<Value>> {
        Ok(self.tables.read().await.audit_rows(query))
    }

    async fn create_record(&self, resource: EntityResource, body: Value) -> AppResult<Value> {
        self.tables.write().await.create(resource, body)
    }

    async fn replace_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        body: Value,
    ) -> AppResult<Value> {
        self.tables.write().await.replace(resource, record_id, body)
    }

    async fn patch_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        fields: Value,
    ) -> AppResult<Value> {
        self.tables.write().await.patch(resource, record_id, fields)
    }

    async fn delete_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value> {
        self.tables.write().await.soft_delete(resource, record_id)
    }

    async fn check_connection(&self) -> bool {
        true
    }
}
