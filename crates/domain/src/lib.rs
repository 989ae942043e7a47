//! Domain records, filter states and invariants.

#![forbid(unsafe_code)]

mod audit;
mod customer;
mod filter;
mod product;
mod resource;
mod validation;

pub use audit::{
    AuditOperation, AuditRecord, FieldChange, PREDEFINED_GROUP_COUNT, audit_group_options,
    compare_snapshots,
};
pub use customer::{City, Customer, CustomerInput};
pub use filter::{
    AuditFilter, CustomerFilter, DateRange, ProductFilter, SearchTerm, StatusFilter,
    parse_optional_choice,
};
pub use product::{Product, ProductCategory, ProductInput, SignatureKind, sign_description};
pub use resource::EntityResource;
pub use validation::{
    ConstraintViolation, DESCRIPTION_MAX_LENGTH, ensure_no_violations, is_valid_document,
    is_valid_email, is_valid_phone,
};
