use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Label stored on audit rows when the backend did not record a responsible group.
pub const UNASSIGNED_GROUP: &str = "SIN_GRUPO";

/// Label of a client group sharing the backend (for example `GRUPO_7`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupLabel(String);

impl GroupLabel {
    /// Creates a validated group label.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "group label must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the sentinel label used when no group is known.
    #[must_use]
    pub fn unassigned() -> Self {
        Self(UNASSIGNED_GROUP.to_owned())
    }

    /// Returns the predefined `GRUPO_n` label for a group number.
    #[must_use]
    pub fn numbered(number: u32) -> Self {
        Self(format!("GRUPO_{number}"))
    }

    /// Returns whether this is the sentinel label.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.0 == UNASSIGNED_GROUP
    }

    /// Returns the number of a `GRUPO_n` label, matched case-insensitively.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        group_number(self.0.as_str())
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for GroupLabel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl From<GroupLabel> for String {
    fn from(value: GroupLabel) -> Self {
        value.0
    }
}

/// Extracts `n` from the first `GRUPO_n` occurrence in a label.
#[must_use]
pub fn group_number(label: &str) -> Option<u32> {
    let lowered = label.to_ascii_lowercase();
    let mut search_from = 0;

    while let Some(offset) = lowered[search_from..].find("grupo_") {
        let digits_start = search_from + offset + "grupo_".len();
        let digits: String = lowered[digits_start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();

        if !digits.is_empty() {
            return digits.parse::<u32>().ok();
        }

        search_from = digits_start;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{GroupLabel, group_number};

    #[test]
    fn group_label_rejects_blank_values() {
        assert!(GroupLabel::new("  ").is_err());
    }

    #[test]
    fn group_label_is_trimmed() {
        let label = GroupLabel::new(" GRUPO_3 ").unwrap_or_else(|_| panic!("test"));
        assert_eq!(label.as_str(), "GRUPO_3");
    }

    #[test]
    fn group_number_is_case_insensitive() {
        assert_eq!(group_number("grupo_12"), Some(12));
        assert_eq!(group_number("Equipo GRUPO_4 tarde"), Some(4));
        assert_eq!(group_number("GRUPO_"), None);
        assert_eq!(group_number("ADMIN"), None);
    }

    #[test]
    fn unassigned_label_has_no_number() {
        let label = GroupLabel::unassigned();
        assert!(label.is_unassigned());
        assert_eq!(label.number(), None);
    }
}
