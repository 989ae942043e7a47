//! Domain constraints shared by canonical records and write inputs.
//!
//! Canonical records only *report* violations so that bad data already stored
//! on the backend can still be listed and audited. Write inputs turn the same
//! violations into a validation error before anything is sent.

use serde::{Deserialize, Serialize};
use storesync_core::{AppError, AppResult};

/// Maximum product description length once a group signature is appended.
pub const DESCRIPTION_MAX_LENGTH: usize = 250;

/// One broken domain constraint on a record or input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstraintViolation {
    /// Name is empty or whitespace.
    MissingName,
    /// Price is zero or negative.
    NonPositivePrice,
    /// Stock is negative.
    NegativeStock,
    /// Category is not one of the fixed product categories.
    UnknownCategory(String),
    /// Email does not have a `local@domain.tld` shape.
    InvalidEmail,
    /// Phone is not exactly ten digits.
    InvalidPhone,
    /// Identity document is not six to ten digits.
    InvalidDocument,
    /// City is not one of the fixed cities.
    UnknownCity(String),
}

impl ConstraintViolation {
    /// Returns a user-facing description of the violation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingName => "name is required".to_owned(),
            Self::NonPositivePrice => "price must be greater than 0".to_owned(),
            Self::NegativeStock => "stock must not be negative".to_owned(),
            Self::UnknownCategory(category) if category.trim().is_empty() => {
                "a category must be selected".to_owned()
            }
            Self::UnknownCategory(category) => format!("unknown category '{category}'"),
            Self::InvalidEmail => "email must look like user@domain.tld".to_owned(),
            Self::InvalidPhone => "phone must have exactly 10 digits".to_owned(),
            Self::InvalidDocument => "document must have between 6 and 10 digits".to_owned(),
            Self::UnknownCity(city) if city.trim().is_empty() => {
                "a city must be selected".to_owned()
            }
            Self::UnknownCity(city) => format!("unknown city '{city}'"),
        }
    }
}

/// Converts a list of violations into a single validation error.
pub fn ensure_no_violations(violations: &[ConstraintViolation]) -> AppResult<()> {
    if violations.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = violations.iter().map(ConstraintViolation::message).collect();
    Err(AppError::Validation(messages.join("; ")))
}

/// Returns whether the value has a `local@domain.tld` shape without whitespace.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, character)| character == '.' && index > 0 && index + 1 < domain.len())
}

/// Returns whether the value is exactly ten ASCII digits.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    value.len() == 10 && value.chars().all(|character| character.is_ascii_digit())
}

/// Returns whether the value is six to ten ASCII digits.
#[must_use]
pub fn is_valid_document(value: &str) -> bool {
    (6..=10).contains(&value.len()) && value.chars().all(|character| character.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_is_checked() {
        assert!(is_valid_email("juan@gmail.com"));
        assert!(is_valid_email("a.b@sub.domain.co"));
        assert!(!is_valid_email("correo-invalido"));
        assert!(!is_valid_email("juan@gmail"));
        assert!(!is_valid_email("juan @gmail.com"));
        assert!(!is_valid_email("@gmail.com"));
        assert!(!is_valid_email("juan@.com"));
        assert!(!is_valid_email("juan@gmail."));
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("a@b.."));
    }

    #[test]
    fn phone_requires_ten_digits() {
        assert!(is_valid_phone("3001234567"));
        assert!(!is_valid_phone("300123456"));
        assert!(!is_valid_phone("300-123-4567"));
    }

    #[test]
    fn document_requires_six_to_ten_digits() {
        assert!(is_valid_document("123456"));
        assert!(is_valid_document("1234567890"));
        assert!(!is_valid_document("12345"));
        assert!(!is_valid_document("12345678901"));
        assert!(!is_valid_document("12a456"));
    }

    #[test]
    fn violations_join_into_one_validation_error() {
        let result = ensure_no_violations(&[
            ConstraintViolation::MissingName,
            ConstraintViolation::NegativeStock,
        ]);

        match result {
            Err(AppError::Validation(message)) => {
                assert_eq!(message, "name is required; stock must not be negative");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_category_reads_as_missing_selection() {
        assert_eq!(
            ConstraintViolation::UnknownCategory(String::new()).message(),
            "a category must be selected"
        );
    }
}
