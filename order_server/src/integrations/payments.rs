use order_engine::{payment_objects::PaymentSessionRequest, traits::PaymentSessions, RemoteCallError};
use service_clients::{
    data_objects::{PaymentSessionLine, PaymentSessionPayload},
    PaymentsClient,
    PaymentsConfig,
    ServiceClientError,
};

use super::to_remote_call_error;

/// The payment service, reached over HTTP.
#[derive(Clone)]
pub struct HttpPayments {
    client: PaymentsClient,
}

impl HttpPayments {
    pub fn new(config: PaymentsConfig) -> Result<Self, ServiceClientError> {
        let client = PaymentsClient::new(config)?;
        Ok(Self { client })
    }
}

impl PaymentSessions for HttpPayments {
    async fn create_payment_session(&self, request: PaymentSessionRequest) -> Result<serde_json::Value, RemoteCallError> {
        let payload = into_payload(request);
        self.client.create_payment_session(&payload).await.map_err(to_remote_call_error)
    }
}

fn into_payload(request: PaymentSessionRequest) -> PaymentSessionPayload {
    let items = request
        .items
        .into_iter()
        .map(|i| PaymentSessionLine { name: i.name, price: i.price, quantity: i.quantity })
        .collect();
    PaymentSessionPayload { order_id: request.order_id.to_string(), currency: request.currency, items }
}
