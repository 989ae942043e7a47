use std::env;
use std::time::Duration;

use storesync_core::{AppError, AppResult, GroupLabel};
use storesync_infrastructure::GatewayConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_GROUP: &str = "GRUPO_1";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub gateway: GatewayConfig,
    pub group: GroupLabel,
    pub offline: bool,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("STORESYNC_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let group = GroupLabel::new(
            lookup("STORESYNC_GROUP").unwrap_or_else(|| DEFAULT_GROUP.to_owned()),
        )
        .map_err(|_| AppError::Validation("STORESYNC_GROUP must not be blank".to_owned()))?;
        let timeout_ms = parse_u64(&lookup, "STORESYNC_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(AppError::Validation(
                "STORESYNC_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }
        let offline = lookup("STORESYNC_OFFLINE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            gateway: GatewayConfig::new(
                api_base_url.as_str(),
                Duration::from_millis(timeout_ms),
            )?,
            group,
            offline,
        })
    }

    pub fn max_wait(&self) -> Duration {
        self.gateway.timeout
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_u64<F>(lookup: &F, name: &str, default: u64) -> AppResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
