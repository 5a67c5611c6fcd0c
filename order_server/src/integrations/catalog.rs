use order_engine::{db_types::Product, traits::ProductCatalog, RemoteCallError};
use service_clients::{data_objects::CatalogProduct, CatalogClient, CatalogConfig, ServiceClientError};

use super::to_remote_call_error;

/// The product catalog, reached over HTTP.
#[derive(Clone)]
pub struct HttpCatalog {
    client: CatalogClient,
}

impl HttpCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self, ServiceClientError> {
        let client = CatalogClient::new(config)?;
        Ok(Self { client })
    }
}

impl ProductCatalog for HttpCatalog {
    async fn validate_products(&self, ids: &[i64]) -> Result<Vec<Product>, RemoteCallError> {
        let products = self.client.validate_products(ids).await.map_err(to_remote_call_error)?;
        Ok(products.into_iter().map(into_product).collect())
    }
}

fn into_product(p: CatalogProduct) -> Product {
    Product { id: p.id, name: p.name, price: p.price }
}
