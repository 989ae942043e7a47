use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Loosely typed view over one backend record.
///
/// Lookups try each candidate name exactly, then case-insensitively. JSON
/// `null` counts as absent.
pub(super) struct RawRecord<'a> {
    fields: Option<&'a Map<String, Value>>,
}

impl<'a> RawRecord<'a> {
    pub(super) fn new(raw: &'a Value) -> Self {
        Self {
            fields: raw.as_object(),
        }
    }

    pub(super) fn is_object(&self) -> bool {
        self.fields.is_some()
    }

    pub(super) fn field(&self, names: &[&str]) -> Option<&'a Value> {
        let fields = self.fields?;

        names
            .iter()
            .find_map(|name| fields.get(*name))
            .or_else(|| {
                names.iter().find_map(|name| {
                    fields
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(name))
                        .map(|(_, value)| value)
                })
            })
            .filter(|value| !value.is_null())
    }

    pub(super) fn text(&self, names: &[&str]) -> Option<String> {
        match self.field(names)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub(super) fn integer(&self, names: &[&str]) -> Option<i64> {
        match self.field(names)? {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(integral)),
            Value::String(text) => {
                let trimmed = text.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        }
    }

    /// Reads a finite number, dropping any fractional part.
    pub(super) fn truncated_integer(&self, names: &[&str]) -> Option<i64> {
        let value = match self.field(names)? {
            Value::Number(number) => number.as_f64()?,
            Value::String(text) => text.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        integral(value.trunc())
    }

    pub(super) fn decimal(&self, names: &[&str]) -> Option<Decimal> {
        let text = match self.field(names)? {
            Value::Number(number) => number.to_string(),
            Value::String(text) => text.trim().to_owned(),
            _ => return None,
        };

        text.parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(text.as_str()).ok())
    }

    pub(super) fn boolean(&self, names: &[&str]) -> Option<bool> {
        match self.field(names)? {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => number.as_i64().map(|value| value != 0),
            Value::String(text) => match text.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
