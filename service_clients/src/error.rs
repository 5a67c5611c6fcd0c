use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceClientError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the service: {0}")]
    ConnectionError(String),
    #[error("The service did not respond in time: {0}")]
    Timeout(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl From<reqwest::Error> for ServiceClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceClientError::Timeout(e.to_string())
        } else if e.is_decode() {
            ServiceClientError::JsonError(e.to_string())
        } else {
            ServiceClientError::ConnectionError(e.to_string())
        }
    }
}
