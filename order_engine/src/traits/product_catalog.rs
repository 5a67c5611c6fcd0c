use crate::{db_types::Product, traits::RemoteCallError};

/// The product catalog, as seen by the order engine.
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Looks up the given product ids and returns the products the catalog knows about, with their current prices.
    ///
    /// Unknown ids are simply absent from the result. The order of the result is unspecified.
    async fn validate_products(&self, ids: &[i64]) -> Result<Vec<Product>, RemoteCallError>;
}
