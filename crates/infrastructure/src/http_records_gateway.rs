use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use storesync_application::{AuditQuery, RecordsGateway};
use storesync_core::{AppError, AppResult};
use storesync_domain::EntityResource;
use tracing::debug;
use url::Url;

#[cfg(test)]
mod tests;

const GENERIC_REJECTION: &str = "the backend rejected the request";

/// Connection settings of the HTTP gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// API root, e.g. `http://localhost:8000/api/v1`.
    pub base_url: Url,
    /// Maximum wait for each request.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Parses the base URL and validates the timeout.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "API base URL '{base_url}' cannot carry resource paths"
            )));
        }
        if timeout.is_zero() {
            return Err(AppError::Validation(
                "request timeout must be greater than zero".to_owned(),
            ));
        }

        Ok(Self { base_url, timeout })
    }
}

/// REST implementation of [`RecordsGateway`].
pub struct HttpRecordsGateway {
    http_client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpRecordsGateway {
    /// Creates a gateway over a shared HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: GatewayConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> AppResult<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                AppError::Validation(format!(
                    "API base URL '{}' cannot carry resource paths",
                    self.config.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
            if trailing_slash {
                path.push("");
            }
        }

        Ok(url)
    }

    fn collection_endpoint(&self, resource: EntityResource) -> AppResult<Url> {
        self.endpoint(&[resource.as_str()], true)
    }

    fn record_endpoint(&self, resource: EntityResource, record_id: i64) -> AppResult<Url> {
        self.endpoint(&[resource.as_str(), record_id.to_string().as_str()], false)
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> AppResult<Value> {
        debug!(method = %method, url = %url, "sending backend request");

        let mut request = self
            .http_client
            .request(method.clone(), url.clone())
            .timeout(self.config.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|error| transport_error(&method, &url, &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, body.as_str()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|error| transport_error(&method, &url, &error))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(body.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "backend returned invalid JSON for {method} {url}: {error}"
            ))
        })
    }

    async fn fetch_list(&self, url: Url) -> AppResult<Vec<Value>> {
        match self.send(Method::GET, url.clone(), None).await? {
            Value::Array(records) => Ok(records),
            other => Err(AppError::Internal(format!(
                "expected a JSON array from {url}, got {}",
                json_kind(&other)
            ))),
        }
    }
}

#[async_trait]
impl RecordsGateway for HttpRecordsGateway {
    async fn list_records(&self, resource: EntityResource) -> AppResult<Vec<Value>> {
        self.fetch_list(self.collection_endpoint(resource)?).await
    }

    async fn find_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value> {
        let url = self.record_endpoint(resource, record_id)?;
        match self.send(Method::GET, url, None).await {
            Err(AppError::Rejected { status: 404, .. }) => Err(AppError::NotFound(format!(
                "{} record {record_id} does not exist",
                resource.as_str()
            ))),
            result => result,
        }
    }

    async fn search_records(
        &self,
        resource: EntityResource,
        term: &str,
    ) -> AppResult<Vec<Value>> {
        let mut url = self.endpoint(&[resource.as_str(), "buscar", "nombre"], false)?;
        url.query_pairs_mut().append_pair("query", term);
        self.fetch_list(url).await
    }

    async fn find_record_by_email(
        &self,
        resource: EntityResource,
        email: &str,
    ) -> AppResult<Value> {
        let url = self.endpoint(&[resource.as_str(), "buscar", "email", email], false)?;
        match self.send(Method::GET, url, None).await {
            Err(AppError::Rejected { status: 404, .. }) => Err(AppError::NotFound(format!(
                "no {} record with email '{email}'",
                resource.as_str()
            ))),
            result => result,
        }
    }

    async fn list_records_by_field(
        &self,
        resource: EntityResource,
        field: &str,
        value: &str,
    ) -> AppResult<Vec<Value>> {
        let mut url = self.collection_endpoint(resource)?;
        url.query_pairs_mut().append_pair(field, value);
        self.fetch_list(url).await
    }

    async fn list_audit_records(&self, query: &AuditQuery) -> AppResult<Vec<Value>> {
        let audit = EntityResource::Audit.as_str();
        let url = match query {
            AuditQuery::All => self.collection_endpoint(EntityResource::Audit)?,
            AuditQuery::Group(group) => self.endpoint(&[audit, "grupo", group.as_str()], false)?,
            AuditQuery::Table(table) => self.endpoint(&[audit, "tabla", table.as_str()], false)?,
            AuditQuery::Operation(operation) => {
                self.endpoint(&[audit, "operacion", operation.as_str()], false)?
            }
            AuditQuery::Record { table, record_id } => self.endpoint(
                &[
                    audit,
                    "registro",
                    table.as_str(),
                    record_id.to_string().as_str(),
                ],
                false,
            )?,
        };

        self.fetch_list(url).await
    }

    async fn create_record(&self, resource: EntityResource, body: Value) -> AppResult<Value> {
        let url = self.collection_endpoint(resource)?;
        self.send(Method::POST, url, Some(&body)).await
    }

    async fn replace_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        body: Value,
    ) -> AppResult<Value> {
        let url = self.record_endpoint(resource, record_id)?;
        self.send(Method::PUT, url, Some(&body)).await
    }

    async fn patch_record(
        &self,
        resource: EntityResource,
        record_id: i64,
        fields: Value,
    ) -> AppResult<Value> {
        let url = self.record_endpoint(resource, record_id)?;
        self.send(Method::PATCH, url, Some(&fields)).await
    }

    async fn delete_record(&self, resource: EntityResource, record_id: i64) -> AppResult<Value> {
        let url = self.record_endpoint(resource, record_id)?;
        self.send(Method::DELETE, url, None).await
    }

    async fn check_connection(&self) -> bool {
        let Ok(url) = self.collection_endpoint(EntityResource::Products) else {
            return false;
        };

        match self
            .http_client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(error = %error, "backend connection check failed");
                false
            }
        }
    }
}

fn transport_error(method: &Method, url: &Url, error: &reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Timeout(format!("{method} {url} timed out"))
    } else {
        AppError::Transport(format!("{method} {url} failed: {error}"))
    }
}

/// Extracts the message a backend error body carries.
fn rejection_message(status: StatusCode, body: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return format!(
            "Error {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
    };

    ["detail", "message"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(message_text))
        .unwrap_or_else(|| GENERIC_REJECTION.to_owned())
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
