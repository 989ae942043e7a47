//! Decoding of raw backend payloads into canonical records.
//!
//! Normalization never fails: absent or unreadable fields take their
//! defaults and the record is kept.

use rust_decimal::Decimal;
use serde_json::Value;
use storesync_core::GroupLabel;
use storesync_domain::{AuditRecord, Customer, Product};
use tracing::{debug, warn};

mod fields;
mod json_text;
mod timestamps;


use fields::RawRecord;
use timestamps::parse_local_timestamp;

pub use json_text::decode_json_value;

/// Builds a canonical product from one raw record.
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let record = checked_record(raw, "product");

    let price = record.decimal(&["precio"]).unwrap_or_else(|| {
        if let Some(value) = record.field(&["precio"]) {
            debug!(value = %value, "unreadable product price; using zero");
        }
        Decimal::ZERO
    });

    Product {
        id: whole_number(&record, &["id"], "product").unwrap_or_default(),
        name: record.text(&["nombre"]).unwrap_or_default(),
        description: record.text(&["descripcion"]),
        price,
        stock: whole_number(&record, &["stock"], "product").unwrap_or_default(),
        category: record.text(&["categoria"]).unwrap_or_default(),
        active: record.boolean(&["activo"]).unwrap_or(false),
    }
}

/// Builds a canonical customer from one raw record.
#[must_use]
pub fn normalize_customer(raw: &Value) -> Customer {
    let record = checked_record(raw, "customer");

    Customer {
        id: whole_number(&record, &["id"], "customer").unwrap_or_default(),
        name: record.text(&["nombre"]).unwrap_or_default(),
        email: record.text(&["email"]).unwrap_or_default(),
        phone: record.text(&["telefono"]).unwrap_or_default(),
        document: record.text(&["documento"]).unwrap_or_default(),
        city: record.text(&["ciudad"]).unwrap_or_default(),
        address: record.text(&["direccion"]),
        active: record.boolean(&["activo"]).unwrap_or(false),
    }
}

/// Builds a canonical audit record from one raw record.
///
/// Both snapshots go through [`decode_json_value`]; the timestamp text is
/// kept verbatim next to its parsed form.
#[must_use]
pub fn normalize_audit_record(raw: &Value) -> AuditRecord {
    let record = checked_record(raw, "audit");

    let occurred_at_text = record.text(&["fecha_operacion", "fecha"]);
    let occurred_at = occurred_at_text.as_deref().and_then(parse_local_timestamp);
    if occurred_at.is_none()
        && let Some(text) = occurred_at_text.as_deref()
    {
        debug!(timestamp = text, "unparseable audit timestamp");
    }

    let group = record
        .text(&["grupo_responsable", "grupo_estudiantes"])
        .and_then(|label| GroupLabel::new(label).ok())
        .unwrap_or_else(GroupLabel::unassigned);

    AuditRecord {
        id: whole_number(&record, &["id"], "audit"),
        table: record
            .text(&["tabla_afectada", "tabla"])
            .unwrap_or_default(),
        record_id: whole_number(&record, &["id_registro", "registro_id"], "audit"),
        operation: record
            .text(&["operacion"])
            .map(|operation| operation.trim().to_uppercase())
            .unwrap_or_default(),
        group,
        previous: decode_json_value(record.field(&["datos_anteriores"])),
        current: decode_json_value(record.field(&["datos_nuevos"])),
        occurred_at_text,
        occurred_at,
        observations: record.text(&["observaciones"]).unwrap_or_default(),
    }
}

/// Reads an integer field, truncating fractional numbers.
///
/// Both truncation and an unreadable value are logged; the caller picks the
/// default for the unreadable case.
fn whole_number(record: &RawRecord<'_>, names: &[&str], kind: &'static str) -> Option<i64> {
    if let Some(value) = record.integer(names) {
        return Some(value);
    }

    let raw = record.field(names)?;
    let truncated = record.truncated_integer(names);
    match truncated {
        Some(value) => warn!(
            kind,
            field = ?names,
            raw = %raw,
            truncated = value,
            "non-integral number truncated"
        ),
        None => warn!(kind, field = ?names, raw = %raw, "unreadable integer field"),
    }

    truncated
}

fn checked_record<'a>(raw: &'a Value, kind: &'static str) -> RawRecord<'a> {
    let record = RawRecord::new(raw);
    if !record.is_object() {
        warn!(kind, "raw record is not a JSON object; every field defaults");
    }

    record
}
