//! Filter states for the client-side listings.
//!
//! Each state is plain data. Transport parsers accept the values a list form
//! sends: `""` and `"todos"` leave a predicate unset.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use storesync_core::{AppError, AppResult, GroupLabel};

use crate::{AuditOperation, City, ProductCategory};

const ALL_SENTINELS: &[&str] = &["", "todos", "todas", "all"];

/// Parses an optional choice, treating the "all" sentinels as unset.
pub fn parse_optional_choice<T>(value: &str) -> AppResult<Option<T>>
where
    T: FromStr<Err = AppError>,
{
    if is_all_sentinel(value) {
        return Ok(None);
    }

    T::from_str(value).map(Some)
}

fn is_all_sentinel(value: &str) -> bool {
    ALL_SENTINELS.contains(&value.trim().to_lowercase().as_str())
}

/// Active/inactive status predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No status restriction.
    #[default]
    All,
    /// Only records with `activo == true`.
    Active,
    /// Only records with `activo == false`.
    Inactive,
}

impl StatusFilter {
    /// Parses transport value into a status filter.
    pub fn parse_transport(value: &str) -> AppResult<Self> {
        if is_all_sentinel(value) {
            return Ok(Self::All);
        }

        match value.trim().to_lowercase().as_str() {
            "activos" | "activo" | "active" => Ok(Self::Active),
            "inactivos" | "inactivo" | "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown status filter '{value}'"
            ))),
        }
    }

    /// Returns whether a record with the given flag passes.
    #[must_use]
    pub fn matches(&self, active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => active,
            Self::Inactive => !active,
        }
    }
}

/// Lower-cased free-text search term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Creates a search term; the text is lower-cased as given.
    #[must_use]
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().to_lowercase())
    }

    /// Returns whether the term is empty and therefore matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the lower-cased term.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether any present field contains the term.
    #[must_use]
    pub fn matches_any(&self, fields: &[Option<&str>]) -> bool {
        if self.is_empty() {
            return true;
        }

        fields
            .iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(self.0.as_str()))
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a date range from optional bounds.
    #[must_use]
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Parses `YYYY-MM-DD` bounds; empty strings leave a bound unset.
    pub fn parse_transport(from: &str, to: &str) -> AppResult<Self> {
        Ok(Self {
            from: parse_date_bound(from)?,
            to: parse_date_bound(to)?,
        })
    }

    /// Returns whether neither bound is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns the lower bound at midnight of the start date.
    #[must_use]
    pub fn lower_bound(&self) -> Option<NaiveDateTime> {
        self.from.and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Returns the upper bound at 23:59:59 of the end date.
    #[must_use]
    pub fn upper_bound(&self) -> Option<NaiveDateTime> {
        self.to.and_then(|date| date.and_hms_opt(23, 59, 59))
    }

    /// Returns whether a timestamp falls inside the range.
    ///
    /// A missing timestamp only passes an unbounded range.
    #[must_use]
    pub fn contains(&self, timestamp: Option<NaiveDateTime>) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let Some(timestamp) = timestamp else {
            return false;
        };

        let after_start = self
            .lower_bound()
            .is_none_or(|lower_bound| timestamp >= lower_bound);
        let before_end = self
            .upper_bound()
            .is_none_or(|upper_bound| timestamp <= upper_bound);

        after_start && before_end
    }
}

fn parse_date_bound(value: &str) -> AppResult<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|error| AppError::Validation(format!("invalid date '{value}': {error}")))
}

/// Filter state of the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Matched against name and description.
    pub search: SearchTerm,
    /// Exact category, or every category when unset.
    pub category: Option<ProductCategory>,
    /// Active/inactive restriction.
    pub status: StatusFilter,
}

impl ProductFilter {
    /// Builds a filter from the listing form values.
    pub fn parse_transport(search: &str, category: &str, status: &str) -> AppResult<Self> {
        Ok(Self {
            search: SearchTerm::new(search),
            category: parse_optional_choice(category)?,
            status: StatusFilter::parse_transport(status)?,
        })
    }
}

/// Filter state of the customer listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFilter {
    /// Matched against name and email.
    pub search: SearchTerm,
    /// Exact city, or every city when unset.
    pub city: Option<City>,
    /// Active/inactive restriction.
    pub status: StatusFilter,
}

impl CustomerFilter {
    /// Builds a filter from the listing form values.
    pub fn parse_transport(search: &str, city: &str, status: &str) -> AppResult<Self> {
        Ok(Self {
            search: SearchTerm::new(search),
            city: parse_optional_choice(city)?,
            status: StatusFilter::parse_transport(status)?,
        })
    }
}

/// Filter state of the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Exact responsible group.
    pub group: Option<GroupLabel>,
    /// Affected table, compared case-insensitively.
    pub table: Option<String>,
    /// Exact operation kind.
    pub operation: Option<AuditOperation>,
    /// Inclusive date range on the operation timestamp.
    pub date_range: DateRange,
}

impl AuditFilter {
    /// Builds a filter from the audit form values.
    pub fn parse_transport(
        group: &str,
        table: &str,
        operation: &str,
        date_from: &str,
        date_to: &str,
    ) -> AppResult<Self> {
        let group = if is_all_sentinel(group) {
            None
        } else {
            Some(GroupLabel::new(group)?)
        };
        let table = (!is_all_sentinel(table)).then(|| table.trim().to_owned());

        Ok(Self {
            group,
            table,
            operation: parse_optional_choice(operation)?,
            date_range: DateRange::parse_transport(date_from, date_to)?,
        })
    }
}
