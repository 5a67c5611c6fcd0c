use std::{env, time::Duration};

use log::*;
use oms_common::{helpers::parse_boolean_flag, DEFAULT_CURRENCY_CODE};
use order_engine::{OrderFlowConfig, DEFAULT_RPC_TIMEOUT};
use service_clients::{CatalogConfig, PaymentsConfig};

const DEFAULT_OMS_HOST: &str = "127.0.0.1";
const DEFAULT_OMS_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/orders.db";
const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The longest a request will wait on the catalog or the payment service
    pub rpc_timeout: Duration,
    /// Currency code sent with payment session requests
    pub currency: String,
    /// When true, `GET /orders/{id}` fails if product names can't be looked up, rather than returning the order
    /// without them.
    pub strict_enrichment: bool,
    /// When true, orders naming products the catalog doesn't know are rejected instead of priced at zero.
    pub reject_unknown_products: bool,
    /// Capacity of the payment confirmation queue. Producers wait when it is full.
    pub event_buffer_size: usize,
    pub catalog: CatalogConfig,
    pub payments: PaymentsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OMS_HOST.to_string(),
            port: DEFAULT_OMS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            strict_enrichment: false,
            reject_unknown_products: false,
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            catalog: CatalogConfig::default(),
            payments: PaymentsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OMS_HOST").ok().unwrap_or_else(|| DEFAULT_OMS_HOST.into());
        let port = env::var("OMS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for OMS_PORT. {e} Using the default, {DEFAULT_OMS_PORT}, instead.");
                    DEFAULT_OMS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OMS_PORT);
        let database_url = env::var("OMS_DATABASE_URL").unwrap_or_else(|_| {
            warn!("🪛️ OMS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let rpc_timeout = env::var("OMS_RPC_TIMEOUT_MS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| {
                        error!("🪛️ Invalid value for OMS_RPC_TIMEOUT_MS: {s}. {e}");
                    })
                    .ok()
            })
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
            .unwrap_or_else(|| {
                info!("🪛️ Using the default remote call timeout of {}ms", DEFAULT_RPC_TIMEOUT.as_millis());
                DEFAULT_RPC_TIMEOUT
            });
        let currency = env::var("OMS_CURRENCY")
            .ok()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let strict_enrichment = parse_boolean_flag(env::var("OMS_STRICT_ENRICHMENT").ok(), false);
        let reject_unknown_products = parse_boolean_flag(env::var("OMS_REJECT_UNKNOWN_PRODUCTS").ok(), false);
        let event_buffer_size = env::var("OMS_EVENT_BUFFER_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<usize>()
                    .map_err(|e| {
                        error!("🪛️ Invalid value for OMS_EVENT_BUFFER_SIZE: {s}. {e}");
                    })
                    .ok()
            })
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let catalog = CatalogConfig::new_from_env_or_default(rpc_timeout);
        let payments = PaymentsConfig::new_from_env_or_default(rpc_timeout);
        Self {
            host,
            port,
            database_url,
            rpc_timeout,
            currency,
            strict_enrichment,
            reject_unknown_products,
            event_buffer_size,
            catalog,
            payments,
        }
    }

    pub fn order_flow_config(&self) -> OrderFlowConfig {
        OrderFlowConfig {
            rpc_timeout: self.rpc_timeout,
            currency: self.currency.clone(),
            strict_enrichment: self.strict_enrichment,
            reject_unknown_products: self.reject_unknown_products,
        }
    }
}
