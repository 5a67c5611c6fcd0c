use log::*;
use reqwest::{header::HeaderMap, Method};

use crate::{
    config::CatalogConfig,
    data_objects::{CatalogProduct, ValidateProductsRequest},
    RestClient,
    ServiceClientError,
};

pub const VALIDATE_PRODUCTS_PATH: &str = "/products/validate";

#[derive(Clone)]
pub struct CatalogClient {
    rest: RestClient,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, ServiceClientError> {
        let rest = RestClient::new(&config.base_url, HeaderMap::new(), config.timeout)?;
        Ok(Self { rest })
    }

    /// Asks the catalog for the products with the given ids. Ids the catalog does not know are left out of the result.
    pub async fn validate_products(&self, ids: &[i64]) -> Result<Vec<CatalogProduct>, ServiceClientError> {
        debug!("Validating {} product ids with the catalog", ids.len());
        let body = ValidateProductsRequest { ids: ids.to_vec() };
        let products = self
            .rest
            .rest_query::<Vec<CatalogProduct>, _>(Method::POST, VALIDATE_PRODUCTS_PATH, &[], Some(body))
            .await?;
        trace!("Catalog returned {} products", products.len());
        Ok(products)
    }
}
