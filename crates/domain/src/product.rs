use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storesync_core::{AppError, AppResult, GroupLabel};

use crate::validation::{ConstraintViolation, DESCRIPTION_MAX_LENGTH, ensure_no_violations};

/// Fixed product categories accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    /// Electronics.
    #[serde(rename = "Electrónica")]
    Electronics,
    /// Clothing.
    #[serde(rename = "Ropa")]
    Clothing,
    /// Food.
    #[serde(rename = "Alimentos")]
    Food,
    /// Home goods.
    #[serde(rename = "Hogar")]
    Home,
    /// Sports.
    #[serde(rename = "Deportes")]
    Sports,
    /// Books.
    #[serde(rename = "Libros")]
    Books,
    /// Toys.
    #[serde(rename = "Juguetes")]
    Toys,
    /// Health.
    #[serde(rename = "Salud")]
    Health,
    /// Anything else.
    #[serde(rename = "Otros")]
    Other,
}

impl ProductCategory {
    /// Returns the backend value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electrónica",
            Self::Clothing => "Ropa",
            Self::Food => "Alimentos",
            Self::Home => "Hogar",
            Self::Sports => "Deportes",
            Self::Books => "Libros",
            Self::Toys => "Juguetes",
            Self::Health => "Salud",
            Self::Other => "Otros",
        }
    }

    /// Returns all known categories in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ProductCategory] = &[
            ProductCategory::Electronics,
            ProductCategory::Clothing,
            ProductCategory::Food,
            ProductCategory::Home,
            ProductCategory::Sports,
            ProductCategory::Books,
            ProductCategory::Toys,
            ProductCategory::Health,
            ProductCategory::Other,
        ];

        ALL
    }
}

impl FromStr for ProductCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown product category '{value}'")))
    }
}

/// Canonical product record as held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: i64,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Optional free-text description.
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    /// Unit price.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units in stock.
    pub stock: i64,
    /// Category as sent by the backend.
    #[serde(rename = "categoria")]
    pub category: String,
    /// `false` once the product has been soft-deleted.
    #[serde(rename = "activo")]
    pub active: bool,
}

impl Product {
    /// Returns the typed category when the stored value is a known one.
    #[must_use]
    pub fn category_kind(&self) -> Option<ProductCategory> {
        ProductCategory::from_str(self.category.as_str()).ok()
    }

    /// Returns `price × stock`, or `None` when the product overflows decimal range.
    #[must_use]
    pub fn inventory_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.stock))
    }

    /// Lists the domain constraints this record breaks.
    #[must_use]
    pub fn constraint_violations(&self) -> Vec<ConstraintViolation> {
        product_violations(
            self.name.as_str(),
            self.price,
            self.stock,
            self.category.as_str(),
        )
    }
}

/// Payload for creating or fully replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Optional free-text description.
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    /// Unit price.
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units in stock.
    pub stock: i64,
    /// Category value.
    #[serde(rename = "categoria")]
    pub category: String,
    /// Active flag sent with the write.
    #[serde(rename = "activo")]
    pub active: bool,
}

impl ProductInput {
    /// Rejects the input when any product constraint is broken.
    pub fn validate(&self) -> AppResult<()> {
        ensure_no_violations(&product_violations(
            self.name.as_str(),
            self.price,
            self.stock,
            self.category.as_str(),
        ))
    }

    /// Returns a copy whose description carries the group signature.
    #[must_use]
    pub fn signed(&self, kind: SignatureKind, group: &GroupLabel) -> Self {
        Self {
            description: Some(sign_description(
                self.description.as_deref(),
                kind,
                group,
            )),
            ..self.clone()
        }
    }
}

/// Which write a description signature records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    /// Product creation.
    Created,
    /// Product replacement.
    Edited,
}

impl SignatureKind {
    fn verb(self) -> &'static str {
        match self {
            Self::Created => "Creado",
            Self::Edited => "Editado",
        }
    }
}

/// Appends `[Creado por G]` or `[Editado por G]` to a description.
///
/// The result is cut to [`DESCRIPTION_MAX_LENGTH`] characters. Earlier
/// signatures are kept so repeated edits accumulate a trail.
#[must_use]
pub fn sign_description(
    description: Option<&str>,
    kind: SignatureKind,
    group: &GroupLabel,
) -> String {
    let signed = format!(
        "{} [{} por {}]",
        description.unwrap_or_default(),
        kind.verb(),
        group
    );

    signed
        .trim_start()
        .chars()
        .take(DESCRIPTION_MAX_LENGTH)
        .collect()
}

fn product_violations(
    name: &str,
    price: Decimal,
    stock: i64,
    category: &str,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if name.trim().is_empty() {
        violations.push(ConstraintViolation::MissingName);
    }
    if price <= Decimal::ZERO {
        violations.push(ConstraintViolation::NonPositivePrice);
    }
    if stock < 0 {
        violations.push(ConstraintViolation::NegativeStock);
    }
    if ProductCategory::from_str(category).is_err() {
        violations.push(ConstraintViolation::UnknownCategory(category.to_owned()));
    }

    violations
}
