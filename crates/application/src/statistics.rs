use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use storesync_core::GroupLabel;
use storesync_domain::{AuditOperation, AuditRecord, Customer, Product};
use tracing::warn;

/// Totals over a product set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductStatistics {
    /// Number of products.
    pub total: usize,
    /// Products with `activo == true`.
    pub active: usize,
    /// Sum of `precio × stock` across every product.
    #[serde(with = "rust_decimal::serde::float")]
    pub inventory_value: Decimal,
}

/// Totals over a customer set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerStatistics {
    /// Number of customers.
    pub total: usize,
    /// Customers with `activo == true`.
    pub active: usize,
}

/// Counts over an audit set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditStatistics {
    /// Number of audit rows.
    pub total: usize,
    /// Rows per known operation kind.
    pub by_operation: BTreeMap<AuditOperation, usize>,
    /// Rows per affected table.
    pub by_table: BTreeMap<String, usize>,
    /// Rows per responsible group.
    pub by_group: BTreeMap<GroupLabel, usize>,
}

impl AuditStatistics {
    /// Returns the number of rows of one operation kind.
    #[must_use]
    pub fn count(&self, operation: AuditOperation) -> usize {
        self.by_operation.get(&operation).copied().unwrap_or(0)
    }
}

/// Aggregates a product set.
///
/// A product whose inventory value leaves decimal range is logged and left
/// out of the sum.
#[must_use]
pub fn product_statistics(products: &[Product]) -> ProductStatistics {
    let mut inventory_value = Decimal::ZERO;
    for product in products {
        match product
            .inventory_value()
            .and_then(|value| inventory_value.checked_add(value))
        {
            Some(sum) => inventory_value = sum,
            None => warn!(product_id = product.id, "inventory value overflow; skipping product"),
        }
    }

    ProductStatistics {
        total: products.len(),
        active: products.iter().filter(|product| product.active).count(),
        inventory_value,
    }
}

/// Aggregates a customer set.
#[must_use]
pub fn customer_statistics(customers: &[Customer]) -> CustomerStatistics {
    CustomerStatistics {
        total: customers.len(),
        active: customers.iter().filter(|customer| customer.active).count(),
    }
}

/// Aggregates an audit set; every known operation kind is present.
#[must_use]
pub fn audit_statistics(records: &[AuditRecord]) -> AuditStatistics {
    let mut by_operation: BTreeMap<AuditOperation, usize> = AuditOperation::all()
        .iter()
        .map(|operation| (*operation, 0))
        .collect();
    let mut by_table = BTreeMap::new();
    let mut by_group = BTreeMap::new();

    for record in records {
        if let Some(operation) = record.operation_kind() {
            *by_operation.entry(operation).or_insert(0) += 1;
        }
        *by_table.entry(record.table.clone()).or_insert(0) += 1;
        *by_group.entry(record.group.clone()).or_insert(0) += 1;
    }

    AuditStatistics {
        total: records.len(),
        by_operation,
        by_table,
        by_group,
    }
}
