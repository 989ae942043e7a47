//! Application services and ports.

#![forbid(unsafe_code)]

mod collection_store;
mod entity;
mod filter_engine;
mod normalization;
mod records_ports;
mod statistics;
mod sync_service;

pub use collection_store::CollectionStore;
pub use entity::SyncEntity;
pub use filter_engine::{RecordFilter, apply};
pub use normalization::{
    decode_json_value, normalize_audit_record, normalize_customer, normalize_product,
};
pub use records_ports::{AuditQuery, RecordsGateway};
pub use statistics::{
    AuditStatistics, CustomerStatistics, ProductStatistics, audit_statistics,
    customer_statistics, product_statistics,
};
pub use sync_service::{EntitySync, SyncState};
