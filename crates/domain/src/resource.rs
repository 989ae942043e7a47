use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storesync_core::AppError;

/// Backend collections the client synchronizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityResource {
    /// Product catalogue.
    Products,
    /// Customer directory.
    Customers,
    /// Append-only audit trail of writes.
    Audit,
}

impl EntityResource {
    /// Returns the backend path segment for this resource.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "productos",
            Self::Customers => "clientes",
            Self::Audit => "auditoria",
        }
    }

    /// Returns all known resources.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EntityResource] = &[
            EntityResource::Products,
            EntityResource::Customers,
            EntityResource::Audit,
        ];

        ALL
    }

    /// Returns whether the client may only read this resource.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::Audit)
    }
}

impl FromStr for EntityResource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "productos" | "products" => Ok(Self::Products),
            "clientes" | "customers" => Ok(Self::Customers),
            "auditoria" | "auditoría" | "audit" => Ok(Self::Audit),
            _ => Err(AppError::Validation(format!(
                "unknown resource '{value}'"
            ))),
        }
    }
}
