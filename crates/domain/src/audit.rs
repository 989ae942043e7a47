use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storesync_core::{AppError, GroupLabel};

/// Number of `GRUPO_n` labels always offered by the group filter.
pub const PREDEFINED_GROUP_COUNT: u32 = 13;

/// Kind of write recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOperation {
    /// Record creation.
    Create,
    /// Record update.
    Update,
    /// Soft delete.
    Delete,
}

impl AuditOperation {
    /// Returns the stable upper-case value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Returns all known operations.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditOperation] = &[
            AuditOperation::Create,
            AuditOperation::Update,
            AuditOperation::Delete,
        ];

        ALL
    }
}

impl FromStr for AuditOperation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown audit operation '{value}'"
            ))),
        }
    }
}

/// Canonical audit trail entry as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Audit row identifier, when the backend sent one.
    pub id: Option<i64>,
    /// Name of the affected table (`productos`, `clientes`).
    #[serde(rename = "tabla_afectada")]
    pub table: String,
    /// Identifier of the affected record; it may no longer exist.
    #[serde(rename = "id_registro")]
    pub record_id: Option<i64>,
    /// Upper-cased operation value.
    #[serde(rename = "operacion")]
    pub operation: String,
    /// Group that performed the write.
    #[serde(rename = "grupo_responsable")]
    pub group: GroupLabel,
    /// State before the write; `None` for creations.
    #[serde(rename = "datos_anteriores")]
    pub previous: Option<Value>,
    /// State after the write; `None` for deletions.
    #[serde(rename = "datos_nuevos")]
    pub current: Option<Value>,
    /// Timestamp text exactly as sent by the backend.
    #[serde(rename = "fecha_operacion")]
    pub occurred_at_text: Option<String>,
    /// Parsed timestamp used for date-range filtering.
    #[serde(rename = "fecha_objeto")]
    pub occurred_at: Option<NaiveDateTime>,
    /// Free-text observations.
    #[serde(rename = "observaciones")]
    pub observations: String,
}

impl AuditRecord {
    /// Returns the typed operation when the stored value is a known one.
    #[must_use]
    pub fn operation_kind(&self) -> Option<AuditOperation> {
        AuditOperation::from_str(self.operation.as_str()).ok()
    }

    /// Returns the fields changed between the two snapshots.
    #[must_use]
    pub fn changes(&self) -> Vec<FieldChange> {
        compare_snapshots(self.previous.as_ref(), self.current.as_ref())
    }
}

/// One field whose value differs between audit snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name.
    pub field: String,
    /// Previous value; `None` when the field was absent.
    pub before: Option<Value>,
    /// New value.
    pub after: Value,
}

/// Compares the fields of `current` against `previous`.
///
/// Returns nothing unless both snapshots are JSON objects.
#[must_use]
pub fn compare_snapshots(previous: Option<&Value>, current: Option<&Value>) -> Vec<FieldChange> {
    let (Some(Value::Object(previous)), Some(Value::Object(current))) = (previous, current) else {
        return Vec::new();
    };

    current
        .iter()
        .filter(|(field, value)| previous.get(field.as_str()) != Some(*value))
        .map(|(field, value)| FieldChange {
            field: field.clone(),
            before: previous.get(field.as_str()).cloned(),
            after: value.clone(),
        })
        .collect()
}

/// Builds the options of the responsible-group filter.
///
/// Predefined `GRUPO_1..GRUPO_13` are merged with groups seen in the history.
/// Numbered labels sort by number; other labels follow alphabetically.
#[must_use]
pub fn audit_group_options(records: &[AuditRecord]) -> Vec<GroupLabel> {
    let mut options: Vec<GroupLabel> = (1..=PREDEFINED_GROUP_COUNT)
        .map(GroupLabel::numbered)
        .collect();

    for record in records {
        if !record.group.is_unassigned() && !options.contains(&record.group) {
            options.push(record.group.clone());
        }
    }

    options.sort_by(|left, right| match (left.number(), right.number()) {
        (Some(left_number), Some(right_number)) => left_number.cmp(&right_number),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.as_str().cmp(right.as_str()),
    });

    options
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(group: &str) -> AuditRecord {
        AuditRecord {
            id: Some(1),
            table: "productos".to_owned(),
            record_id: Some(5),
            operation: "UPDATE".to_owned(),
            group: GroupLabel::new(group).unwrap_or_else(|_| panic!("test")),
            previous: Some(json!({"precio": 1000, "stock": 10, "nombre": "Laptop"})),
            current: Some(json!({"precio": 1200, "stock": 8, "nombre": "Laptop"})),
            occurred_at_text: None,
            occurred_at: None,
            observations: String::new(),
        }
    }

    #[test]
    fn operations_parse_in_any_case() {
        assert_eq!(
            AuditOperation::from_str("delete").ok(),
            Some(AuditOperation::Delete)
        );
        assert!(AuditOperation::from_str("INSERT").is_err());
    }

    #[test]
    fn snapshot_comparison_lists_changed_fields() {
        let changes = record("GRUPO_1").changes();

        assert_eq!(
            changes,
            vec![
                FieldChange {
                    field: "precio".to_owned(),
                    before: Some(json!(1000)),
                    after: json!(1200),
                },
                FieldChange {
                    field: "stock".to_owned(),
                    before: Some(json!(10)),
                    after: json!(8),
                },
            ]
        );
    }

    #[test]
    fn snapshot_comparison_needs_two_objects() {
        assert!(compare_snapshots(None, Some(&json!({"a": 1}))).is_empty());
        assert!(compare_snapshots(Some(&json!("texto")), Some(&json!({"a": 1}))).is_empty());
    }

    #[test]
    fn group_options_merge_and_sort_numerically() {
        let records = vec![
            record("GRUPO_20"),
            record("ADMIN"),
            record("GRUPO_2"),
            AuditRecord {
                group: GroupLabel::unassigned(),
                ..record("GRUPO_1")
            },
        ];

        let options: Vec<String> = audit_group_options(&records)
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(options.len(), 15);
        assert_eq!(options[0], "GRUPO_1");
        assert_eq!(options[1], "GRUPO_2");
        assert_eq!(options[12], "GRUPO_13");
        assert_eq!(options[13], "GRUPO_20");
        assert_eq!(options[14], "ADMIN");
    }
}
