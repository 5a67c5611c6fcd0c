//! Adapters that plug the HTTP service clients into the engine's catalog and payment contracts.
mod catalog;
mod payments;

pub use catalog::HttpCatalog;
pub use payments::HttpPayments;
use order_engine::RemoteCallError;
use service_clients::ServiceClientError;

pub(crate) fn to_remote_call_error(e: ServiceClientError) -> RemoteCallError {
    match e {
        ServiceClientError::Initialization(s) | ServiceClientError::ConnectionError(s) => {
            RemoteCallError::Unreachable(s)
        },
        ServiceClientError::Timeout(_) => RemoteCallError::Timeout,
        ServiceClientError::JsonError(s) => RemoteCallError::InvalidResponse(s),
        ServiceClientError::QueryError { status, message } => {
            RemoteCallError::Rejected(format!("Error {status}. {message}"))
        },
    }
}
