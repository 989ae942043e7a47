use std::collections::HashMap;
use std::str::FromStr;

use storesync_core::{AppError, AppResult};
use storesync_domain::{AuditFilter, CustomerFilter, EntityResource, ProductFilter};

pub const USAGE: &str = "usage: storesync-console <productos|clientes|auditoria> [key=value ...]\n\
  productos: buscar, categoria, estado\n\
  clientes:  buscar, ciudad, estado\n\
  auditoria: grupo, tabla, operacion, desde, hasta";

/// One listing request with its parsed filter.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingCommand {
    Products(ProductFilter),
    Customers(CustomerFilter),
    Audit(AuditFilter),
}

impl ListingCommand {
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let (resource, options) = args
            .split_first()
            .ok_or_else(|| AppError::Validation(USAGE.to_owned()))?;
        let resource = EntityResource::from_str(resource)?;
        let options = ListingOptions::parse(options)?;

        let command = match resource {
            EntityResource::Products => {
                options.ensure_known(&["buscar", "categoria", "estado"])?;
                Self::Products(ProductFilter::parse_transport(
                    options.value("buscar"),
                    options.value("categoria"),
                    options.value("estado"),
                )?)
            }
            EntityResource::Customers => {
                options.ensure_known(&["buscar", "ciudad", "estado"])?;
                Self::Customers(CustomerFilter::parse_transport(
                    options.value("buscar"),
                    options.value("ciudad"),
                    options.value("estado"),
                )?)
            }
            EntityResource::Audit => {
                options.ensure_known(&["grupo", "tabla", "operacion", "desde", "hasta"])?;
                Self::Audit(AuditFilter::parse_transport(
                    options.value("grupo"),
                    options.value("tabla"),
                    options.value("operacion"),
                    options.value("desde"),
                    options.value("hasta"),
                )?)
            }
        };

        Ok(command)
    }
}

struct ListingOptions(HashMap<String, String>);

impl ListingOptions {
    fn parse(args: &[String]) -> AppResult<Self> {
        args.iter()
            .map(|arg| {
                arg.split_once('=')
                    .map(|(key, value)| (key.trim().to_lowercase(), value.to_owned()))
                    .ok_or_else(|| {
                        AppError::Validation(format!("expected key=value, got '{arg}'\n{USAGE}"))
                    })
            })
            .collect::<AppResult<HashMap<_, _>>>()
            .map(Self)
    }

    fn ensure_known(&self, keys: &[&str]) -> AppResult<()> {
        match self.0.keys().find(|key| !keys.contains(&key.as_str())) {
            Some(unknown) => Err(AppError::Validation(format!(
                "unknown option '{unknown}'\n{USAGE}"
            ))),
            None => Ok(()),
        }
    }

    fn value(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }
}
