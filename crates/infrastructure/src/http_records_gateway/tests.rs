use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use storesync_application::{AuditQuery, RecordsGateway};
use storesync_core::{AppError, GroupLabel, NonEmptyString};
use storesync_domain::{AuditOperation, EntityResource};

use super::{GatewayConfig, HttpRecordsGateway};

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let products = vec![
        json!({"id": 1, "nombre": "Laptop", "categoria": "Electrónica", "activo": true}),
        json!({"id": 2, "nombre": "Silla", "categoria": "Hogar", "activo": false}),
    ];

    Json(Value::Array(
        products
            .into_iter()
            .filter(|product| {
                params
                    .get("categoria")
                    .is_none_or(|category| product["categoria"] == json!(category))
            })
            .collect(),
    ))
}

async fn create_product(Json(body): Json<Value>) -> impl IntoResponse {
    if body["nombre"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "el nombre es obligatorio"})),
        );
    }
    if body["nombre"] == json!("Laptop") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Ya existe un producto con ese nombre"})),
        );
    }

    let mut created = body;
    created["id"] = json!(99);
    (StatusCode::CREATED, Json(created))
}

async fn find_product(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        (StatusCode::OK, Json(json!({"id": 1, "nombre": "Laptop"})))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Producto no encontrado"})),
        )
    }
}

async fn patch_product(Path(id): Path<i64>, Json(fields): Json<Value>) -> Json<Value> {
    Json(json!({"id": id, "cambios": fields}))
}

async fn delete_product(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({"id": id, "activo": false}))
}

async fn search_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!([{"id": 1, "nombre": params.get("query").cloned().unwrap_or_default()}]))
}

async fn replace_customer() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn list_customers() -> Json<Value> {
    Json(json!({"items": []}))
}

async fn customer_by_email(Path(email): Path<String>) -> impl IntoResponse {
    if email == "ana+tienda@outlook.com" {
        (
            StatusCode::OK,
            Json(json!({"id": 2, "nombre": "Ana Torres", "email": email})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Cliente no encontrado"})),
        )
    }
}

async fn slow_audit_trail() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!([]))
}

async fn audit_by_group(Path(group): Path<String>) -> Json<Value> {
    Json(json!([{"grupo_responsable": group}]))
}

async fn audit_by_operation(Path(operation): Path<String>) -> Json<Value> {
    Json(json!([{"operacion": operation}]))
}

async fn audit_by_record(Path((table, id)): Path<(String, i64)>) -> Json<Value> {
    Json(json!([{"tabla_afectada": table, "id_registro": id}]))
}

fn backend() -> Router {
    Router::new()
        .route(
            "/api/v1/productos/",
            get(list_products).post(create_product),
        )
        .route("/api/v1/productos/buscar/nombre", get(search_products))
        .route(
            "/api/v1/productos/{id}",
            get(find_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/api/v1/clientes/", get(list_customers))
        .route("/api/v1/clientes/{id}", axum::routing::put(replace_customer))
        .route("/api/v1/clientes/buscar/email/{email}", get(customer_by_email))
        .route("/api/v1/auditoria/", get(slow_audit_trail))
        .route("/api/v1/auditoria/grupo/{group}", get(audit_by_group))
        .route("/api/v1/auditoria/operacion/{operation}", get(audit_by_operation))
        .route("/api/v1/auditoria/registro/{table}/{id}", get(audit_by_record))
}

async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| panic!("test"));
    let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
    tokio::spawn(async move {
        let _ = axum::serve(listener, backend()).await;
    });

    format!("http://{address}/api/v1")
}

async fn gateway_with_timeout(timeout: Duration) -> HttpRecordsGateway {
    let base_url = spawn_backend().await;
    let config =
        GatewayConfig::new(base_url.as_str(), timeout).unwrap_or_else(|_| panic!("test"));
    HttpRecordsGateway::new(reqwest::Client::new(), config)
}

async fn gateway() -> HttpRecordsGateway {
    gateway_with_timeout(Duration::from_secs(5)).await
}

#[test]
fn config_rejects_bad_values() {
    assert!(GatewayConfig::new("no es una url", Duration::from_secs(1)).is_err());
    assert!(GatewayConfig::new("mailto:equipo@tienda.co", Duration::from_secs(1)).is_err());
    assert!(GatewayConfig::new("http://localhost:8000/api/v1", Duration::ZERO).is_err());
}

#[tokio::test]
async fn list_records_uses_collection_route() {
    let gateway = gateway().await;

    let records = gateway
        .list_records(EntityResource::Products)
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn list_by_field_sends_query_parameter() {
    let gateway = gateway().await;

    let records = gateway
        .list_records_by_field(EntityResource::Products, "categoria", "Hogar")
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(records, vec![json!({"id": 2, "nombre": "Silla", "categoria": "Hogar", "activo": false})]);
}

#[tokio::test]
async fn search_encodes_the_term() {
    let gateway = gateway().await;

    let records = gateway
        .search_records(EntityResource::Products, "laptop hp&co")
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(records[0]["nombre"], json!("laptop hp&co"));
}

#[tokio::test]
async fn customer_lookup_by_email_uses_search_route() {
    let gateway = gateway().await;

    let customer = gateway
        .find_record_by_email(EntityResource::Customers, "ana+tienda@outlook.com")
        .await
        .unwrap_or_else(|_| panic!("test"));
    let missing = gateway
        .find_record_by_email(EntityResource::Customers, "nadie@outlook.com")
        .await;

    assert_eq!(customer["id"], json!(2));
    assert_eq!(customer["email"], json!("ana+tienda@outlook.com"));
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn server_rejection_carries_detail_or_message() {
    let gateway = gateway().await;

    let duplicate = gateway
        .create_record(EntityResource::Products, json!({"nombre": "Laptop"}))
        .await;
    match duplicate {
        Err(AppError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Ya existe un producto con ese nombre");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let unnamed = gateway
        .create_record(EntityResource::Products, json!({"nombre": ""}))
        .await;
    match unnamed {
        Err(AppError::Rejected { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "el nombre es obligatorio");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_rejection_reports_status_line() {
    let gateway = gateway().await;

    let result = gateway
        .replace_record(EntityResource::Customers, 3, json!({"nombre": "Ana"}))
        .await;

    match result {
        Err(AppError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Error 500: Internal Server Error");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn writes_return_backend_acknowledgement() {
    let gateway = gateway().await;

    let created = gateway
        .create_record(EntityResource::Products, json!({"nombre": "Teclado"}))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let patched = gateway
        .patch_record(EntityResource::Products, 5, json!({"stock": 3}))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let deleted = gateway
        .delete_record(EntityResource::Products, 5)
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(created["id"], json!(99));
    assert_eq!(patched["cambios"], json!({"stock": 3}));
    assert_eq!(deleted["activo"], json!(false));
}

#[tokio::test]
async fn missing_record_maps_to_not_found() {
    let gateway = gateway().await;

    let found = gateway.find_record(EntityResource::Products, 1).await;
    let missing = gateway.find_record(EntityResource::Products, 7).await;

    assert!(found.is_ok());
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn non_array_listing_is_an_internal_error() {
    let gateway = gateway().await;

    let result = gateway.list_records(EntityResource::Customers).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn audit_queries_use_dedicated_routes() {
    let gateway = gateway().await;

    let by_group = gateway
        .list_audit_records(&AuditQuery::Group(GroupLabel::numbered(3)))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let by_operation = gateway
        .list_audit_records(&AuditQuery::Operation(AuditOperation::Delete))
        .await
        .unwrap_or_else(|_| panic!("test"));
    let by_record = gateway
        .list_audit_records(&AuditQuery::Record {
            table: NonEmptyString::new("productos").unwrap_or_else(|_| panic!("test")),
            record_id: 12,
        })
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(by_group[0]["grupo_responsable"], json!("GRUPO_3"));
    assert_eq!(by_operation[0]["operacion"], json!("DELETE"));
    assert_eq!(by_record[0], json!({"tabla_afectada": "productos", "id_registro": 12}));
}

#[tokio::test]
async fn slow_backend_is_a_timeout() {
    let gateway = gateway_with_timeout(Duration::from_millis(100)).await;

    let result = gateway.list_audit_records(&AuditQuery::All).await;

    assert!(matches!(result, Err(AppError::Timeout(_))));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| panic!("test"));
    let address = listener.local_addr().unwrap_or_else(|_| panic!("test"));
    drop(listener);

    let config = GatewayConfig::new(
        format!("http://{address}/api/v1").as_str(),
        Duration::from_secs(2),
    )
    .unwrap_or_else(|_| panic!("test"));
    let gateway = HttpRecordsGateway::new(reqwest::Client::new(), config);

    let result = gateway.list_records(EntityResource::Products).await;

    assert!(matches!(result, Err(AppError::Transport(_))));
    assert!(!gateway.check_connection().await);
}

#[tokio::test]
async fn connection_check_probes_products() {
    let gateway = gateway().await;

    assert!(gateway.check_connection().await);
}
