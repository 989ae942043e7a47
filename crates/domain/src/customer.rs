use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storesync_core::{AppError, AppResult};

use crate::validation::{
    ConstraintViolation, ensure_no_violations, is_valid_document, is_valid_email, is_valid_phone,
};

/// Fixed cities a customer can be registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    /// Medellín.
    #[serde(rename = "Medellín")]
    Medellin,
    /// Bogotá.
    #[serde(rename = "Bogotá")]
    Bogota,
    /// Cali.
    Cali,
    /// Barranquilla.
    Barranquilla,
    /// Cartagena.
    Cartagena,
    /// Bucaramanga.
    Bucaramanga,
    /// Pereira.
    Pereira,
    /// Manizales.
    Manizales,
    /// Any other city.
    #[serde(rename = "Otra")]
    Other,
}

impl City {
    /// Returns the backend value for this city.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Medellin => "Medellín",
            Self::Bogota => "Bogotá",
            Self::Cali => "Cali",
            Self::Barranquilla => "Barranquilla",
            Self::Cartagena => "Cartagena",
            Self::Bucaramanga => "Bucaramanga",
            Self::Pereira => "Pereira",
            Self::Manizales => "Manizales",
            Self::Other => "Otra",
        }
    }

    /// Returns all known cities in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[City] = &[
            City::Medellin,
            City::Bogota,
            City::Cali,
            City::Barranquilla,
            City::Cartagena,
            City::Bucaramanga,
            City::Pereira,
            City::Manizales,
            City::Other,
        ];

        ALL
    }
}

impl FromStr for City {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|city| city.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown city '{value}'")))
    }
}

/// Canonical customer record as held by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Server-assigned identifier.
    pub id: i64,
    /// Full name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Phone number.
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Identity document number.
    #[serde(rename = "documento")]
    pub document: String,
    /// City as sent by the backend.
    #[serde(rename = "ciudad")]
    pub city: String,
    /// Optional postal address.
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    /// `false` once the customer has been soft-deleted.
    #[serde(rename = "activo")]
    pub active: bool,
}

impl Customer {
    /// Returns the typed city when the stored value is a known one.
    #[must_use]
    pub fn city_kind(&self) -> Option<City> {
        City::from_str(self.city.as_str()).ok()
    }

    /// Lists the domain constraints this record breaks.
    #[must_use]
    pub fn constraint_violations(&self) -> Vec<ConstraintViolation> {
        customer_violations(
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.document.as_str(),
            self.city.as_str(),
        )
    }
}

/// Payload for creating or fully replacing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    /// Full name.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Phone number.
    #[serde(rename = "telefono")]
    pub phone: String,
    /// Identity document number.
    #[serde(rename = "documento")]
    pub document: String,
    /// City value.
    #[serde(rename = "ciudad")]
    pub city: String,
    /// Optional postal address.
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    /// Active flag sent with the write.
    #[serde(rename = "activo")]
    pub active: bool,
}

impl CustomerInput {
    /// Rejects the input when any customer constraint is broken.
    pub fn validate(&self) -> AppResult<()> {
        ensure_no_violations(&customer_violations(
            self.name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.document.as_str(),
            self.city.as_str(),
        ))
    }
}

fn customer_violations(
    name: &str,
    email: &str,
    phone: &str,
    document: &str,
    city: &str,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if name.trim().is_empty() {
        violations.push(ConstraintViolation::MissingName);
    }
    if !is_valid_email(email) {
        violations.push(ConstraintViolation::InvalidEmail);
    }
    if !is_valid_phone(phone) {
        violations.push(ConstraintViolation::InvalidPhone);
    }
    if !is_valid_document(document) {
        violations.push(ConstraintViolation::InvalidDocument);
    }
    if City::from_str(city).is_err() {
        violations.push(ConstraintViolation::UnknownCity(city.to_owned()));
    }

    violations
}
