use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method,
};
use serde_json::Value;

use crate::{config::PaymentsConfig, data_objects::PaymentSessionPayload, RestClient, ServiceClientError};

pub const PAYMENT_SESSION_PATH: &str = "/payments/create-payment-session";

#[derive(Clone)]
pub struct PaymentsClient {
    rest: RestClient,
}

impl PaymentsClient {
    pub fn new(config: PaymentsConfig) -> Result<Self, ServiceClientError> {
        let mut headers = HeaderMap::with_capacity(1);
        if !config.api_key.is_unset() {
            let val = HeaderValue::from_str(&format!("Bearer {}", config.api_key.reveal()))
                .map_err(|e| ServiceClientError::Initialization(e.to_string()))?;
            headers.insert(AUTHORIZATION, val);
        }
        let rest = RestClient::new(&config.base_url, headers, config.timeout)?;
        Ok(Self { rest })
    }

    /// Opens a checkout session for the order. The service's reply is returned as-is.
    pub async fn create_payment_session(&self, payload: &PaymentSessionPayload) -> Result<Value, ServiceClientError> {
        debug!("Requesting payment session for order {}", payload.order_id);
        let session = self.rest.rest_query::<Value, _>(Method::POST, PAYMENT_SESSION_PATH, &[], Some(payload)).await?;
        info!("Payment session created for order {}", payload.order_id);
        Ok(session)
    }
}
