use crate::{oms_api::payment_objects::PaymentSessionRequest, traits::RemoteCallError};

/// The payment provider, as seen by the order engine.
#[allow(async_fn_in_trait)]
pub trait PaymentSessions {
    /// Opens a payment session for an order. The session reference returned by the provider is passed back to the
    /// caller untouched.
    async fn create_payment_session(
        &self,
        request: PaymentSessionRequest,
    ) -> Result<serde_json::Value, RemoteCallError>;
}
