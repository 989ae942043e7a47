//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_records_gateway;
mod in_memory_records_gateway;

pub use http_records_gateway::{GatewayConfig, HttpRecordsGateway};
pub use in_memory_records_gateway::InMemoryRecordsGateway;
