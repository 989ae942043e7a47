use storesync_domain::{AuditFilter, AuditRecord, Customer, CustomerFilter, Product, ProductFilter};

/// Predicate set that decides whether one record is visible.
pub trait RecordFilter<R> {
    /// Returns whether the record passes every set predicate.
    fn matches(&self, record: &R) -> bool;
}

/// Returns the records passing `filter`, in their original order.
#[must_use]
pub fn apply<R, F>(full: &[R], filter: &F) -> Vec<R>
where
    R: Clone,
    F: RecordFilter<R> + ?Sized,
{
    full.iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

impl RecordFilter<Product> for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        self.search
            .matches_any(&[Some(product.name.as_str()), product.description.as_deref()])
            && self
                .category
                .is_none_or(|category| product.category == category.as_str())
            && self.status.matches(product.active)
    }
}

impl RecordFilter<Customer> for CustomerFilter {
    fn matches(&self, customer: &Customer) -> bool {
        self.search
            .matches_any(&[Some(customer.name.as_str()), Some(customer.email.as_str())])
            && self.city.is_none_or(|city| customer.city == city.as_str())
            && self.status.matches(customer.active)
    }
}

impl RecordFilter<AuditRecord> for AuditFilter {
    fn matches(&self, record: &AuditRecord) -> bool {
        self.group.as_ref().is_none_or(|group| record.group == *group)
            && self
                .table
                .as_deref()
                .is_none_or(|table| record.table.to_lowercase() == table.to_lowercase())
            && self
                .operation
                .is_none_or(|operation| record.operation == operation.as_str())
            && self.date_range.contains(record.occurred_at)
    }
}
