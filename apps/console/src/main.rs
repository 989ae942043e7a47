//! Storesync console: loads one collection, filters it locally and prints
//! the visible records with their statistics.

#![forbid(unsafe_code)]

mod console_config;
mod listing_command;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use storesync_application::{EntitySync, RecordsGateway, SyncEntity};
use storesync_core::{AppError, AppResult};
use storesync_domain::{AuditRecord, Customer, Product};
use storesync_infrastructure::{HttpRecordsGateway, InMemoryRecordsGateway};
use tracing::{info, warn};

use crate::console_config::{ConsoleConfig, init_tracing};
use crate::listing_command::ListingCommand;

#[derive(Debug, Serialize)]
struct ListingReport<'a, E, S> {
    resource: &'static str,
    state: &'static str,
    total: usize,
    visible: usize,
    records: &'a [E],
    statistics: &'a S,
    visible_statistics: S,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let command = ListingCommand::parse(&args)?;
    let gateway = build_gateway(&config)?;

    info!(
        api_base_url = %config.gateway.base_url,
        group = %config.group,
        offline = config.offline,
        timeout_ms = config.gateway.timeout.as_millis(),
        "storesync-console started"
    );

    if !gateway.check_connection().await {
        warn!(
            api_base_url = %config.gateway.base_url,
            "backend did not answer the connection check"
        );
    }

    let max_wait = config.max_wait();
    let report = match command {
        ListingCommand::Products(filter) => {
            render_listing::<Product>(gateway, max_wait, filter).await?
        }
        ListingCommand::Customers(filter) => {
            render_listing::<Customer>(gateway, max_wait, filter).await?
        }
        ListingCommand::Audit(filter) => {
            render_listing::<AuditRecord>(gateway, max_wait, filter).await?
        }
    };

    println!("{report}");
    Ok(())
}

fn build_gateway(config: &ConsoleConfig) -> AppResult<Arc<dyn RecordsGateway>> {
    if config.offline {
        return Ok(Arc::new(InMemoryRecordsGateway::with_demo_data(
            config.group.clone(),
        )));
    }

    let http_client = reqwest::Client::builder()
        .timeout(config.gateway.timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    Ok(Arc::new(HttpRecordsGateway::new(
        http_client,
        config.gateway.clone(),
    )))
}

async fn render_listing<E>(
    gateway: Arc<dyn RecordsGateway>,
    max_wait: Duration,
    filter: E::Filter,
) -> AppResult<String>
where
    E: SyncEntity + Serialize,
    E::Statistics: Serialize,
{
    let mut sync = EntitySync::<E>::new(gateway, max_wait);
    sync.set_filter(filter);
    sync.reload().await.inspect_err(|error| {
        if error.is_transport_failure() {
            warn!(
                resource = E::RESOURCE.as_str(),
                "backend unreachable; set STORESYNC_OFFLINE=true to use demo data"
            );
        }
    })?;

    let report = ListingReport {
        resource: E::RESOURCE.as_str(),
        state: sync.state().as_str(),
        total: sync.full().len(),
        visible: sync.visible().len(),
        records: sync.visible(),
        statistics: sync.statistics(),
        visible_statistics: sync.visible_statistics(),
    };

    serde_json::to_string_pretty(&report)
        .map_err(|error| AppError::Internal(format!("failed to render listing: {error}")))
}
