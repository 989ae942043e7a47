use std::fmt::Debug;

use serde_json::Value;
use storesync_domain::{
    AuditFilter, AuditRecord, Customer, CustomerFilter, EntityResource, Product, ProductFilter,
};

use crate::filter_engine::RecordFilter;
use crate::normalization::{normalize_audit_record, normalize_customer, normalize_product};
use crate::statistics::{
    AuditStatistics, CustomerStatistics, ProductStatistics, audit_statistics,
    customer_statistics, product_statistics,
};

/// Per-entity profile driving the generic store and coordinator.
pub trait SyncEntity: Clone + Debug + Send + Sync + Sized + 'static {
    /// Filter state of this entity's listing.
    type Filter: RecordFilter<Self> + Clone + Debug + Default + Send + Sync;
    /// Aggregate computed over a set of this entity.
    type Statistics: Clone + Debug + Default + PartialEq + Send + Sync;

    /// Backend collection holding this entity.
    const RESOURCE: EntityResource;

    /// Builds a canonical record from one raw backend record.
    fn normalize(raw: &Value) -> Self;

    /// Aggregates a set of records.
    fn aggregate(records: &[Self]) -> Self::Statistics;
}

impl SyncEntity for Product {
    type Filter = ProductFilter;
    type Statistics = ProductStatistics;

    const RESOURCE: EntityResource = EntityResource::Products;

    fn normalize(raw: &Value) -> Self {
        normalize_product(raw)
    }

    fn aggregate(records: &[Self]) -> Self::Statistics {
        product_statistics(records)
    }
}

impl SyncEntity for Customer {
    type Filter = CustomerFilter;
    type Statistics = CustomerStatistics;

    const RESOURCE: EntityResource = EntityResource::Customers;

    fn normalize(raw: &Value) -> Self {
        normalize_customer(raw)
    }

    fn aggregate(records: &[Self]) -> Self::Statistics {
        customer_statistics(records)
    }
}

impl SyncEntity for AuditRecord {
    type Filter = AuditFilter;
    type Statistics = AuditStatistics;

    const RESOURCE: EntityResource = EntityResource::Audit;

    fn normalize(raw: &Value) -> Self {
        normalize_audit_record(raw)
    }

    fn aggregate(records: &[Self]) -> Self::Statistics {
        audit_statistics(records)
    }
}
