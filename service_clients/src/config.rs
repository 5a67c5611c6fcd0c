use std::time::Duration;

use log::*;
use oms_common::Secret;

const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8371";
const DEFAULT_PAYMENTS_URL: &str = "http://127.0.0.1:8372";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        warn!("🪛️ {name} not set, using {default} as default");
        default.to_string()
    })
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Upper bound on any single HTTP exchange with the catalog
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_CATALOG_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

impl CatalogConfig {
    pub fn new<S: Into<String>>(base_url: S, timeout: Duration) -> Self {
        Self { base_url: base_url.into(), timeout }
    }

    pub fn new_from_env_or_default(timeout: Duration) -> Self {
        let base_url = env_or_default("OMS_CATALOG_URL", DEFAULT_CATALOG_URL);
        Self { base_url, timeout }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub base_url: String,
    /// Sent as a bearer token, if set
    pub api_key: Secret<String>,
    pub timeout: Duration,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_PAYMENTS_URL.to_string(), api_key: Secret::default(), timeout: DEFAULT_TIMEOUT }
    }
}

impl PaymentsConfig {
    pub fn new<S: Into<String>>(base_url: S, api_key: Secret<String>, timeout: Duration) -> Self {
        Self { base_url: base_url.into(), api_key, timeout }
    }

    pub fn new_from_env_or_default(timeout: Duration) -> Self {
        let base_url = env_or_default("OMS_PAYMENTS_URL", DEFAULT_PAYMENTS_URL);
        let api_key = Secret::new(std::env::var("OMS_PAYMENTS_API_KEY").unwrap_or_else(|_| {
            warn!("🪛️ OMS_PAYMENTS_API_KEY not set. Payment session requests will be unauthenticated.");
            String::default()
        }));
        Self { base_url, api_key, timeout }
    }
}
