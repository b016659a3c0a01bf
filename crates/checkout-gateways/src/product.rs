use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use checkout_types::ports::gateways::{GatewayError, Product, ProductGateway};

const SERVICE: &str = "product-service";

#[derive(Clone)]
pub struct HttpProductGateway {
    base: Url,
    client: reqwest::Client,
}

impl HttpProductGateway {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, crate::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(Self { base, client })
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base.join(path).map_err(|e| GatewayError::Unavailable {
            service: SERVICE,
            message: e.to_string(),
        })
    }
}

fn unavailable(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable {
        service: SERVICE,
        message: err.to_string(),
    }
}

#[derive(Serialize)]
struct DecreaseStockRequest {
    quantity: u32,
}

#[async_trait]
impl ProductGateway for HttpProductGateway {
    async fn fetch_product(&self, product_id: &str) -> Result<Product, GatewayError> {
        let res = self
            .client
            .get(self.url(&format!("products/{product_id}"))?)
            .send()
            .await
            .map_err(unavailable)?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::ProductNotFound(product_id.to_string()));
        }
        let res = res.error_for_status().map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }

    async fn decrease_stock(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), GatewayError> {
        self.client
            .post(self.url(&format!("products/{product_id}/stock/decrease"))?)
            .json(&DecreaseStockRequest { quantity })
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_product() -> Product {
        Product {
            id: "SKU-171".into(),
            name: "Mirrorless Camera".into(),
            price: 15_000_000,
            weight: 171,
            stock: 12,
        }
    }

    #[tokio::test]
    async fn fetches_product() {
        let server = MockServer::start();
        let product = sample_product();

        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/products/SKU-171");
            then.status(200).json_body_obj(&product);
        });

        let gateway = HttpProductGateway::new(&server.base_url()).unwrap();
        let fetched = gateway.fetch_product("SKU-171").await.unwrap();
        assert_eq!(fetched.name, "Mirrorless Camera");
        assert_eq!(fetched.stock, 12);

        get_mock.assert();
    }

    #[tokio::test]
    async fn missing_product_is_a_distinct_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/SKU-404");
            then.status(404);
        });

        let gateway = HttpProductGateway::new(&server.base_url()).unwrap();
        let err = gateway.fetch_product("SKU-404").await.unwrap_err();
        assert!(matches!(err, GatewayError::ProductNotFound(id) if id == "SKU-404"));
    }

    #[tokio::test]
    async fn decreases_stock() {
        let server = MockServer::start();
        let decrease_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/products/SKU-171/stock/decrease")
                .json_body_obj(&serde_json::json!({ "quantity": 2 }));
            then.status(200);
        });

        let gateway = HttpProductGateway::new(&server.base_url()).unwrap();
        gateway.decrease_stock("SKU-171", 2).await.unwrap();

        decrease_mock.assert();
    }

    #[tokio::test]
    async fn remote_failure_maps_to_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/products/SKU-171/stock/decrease");
            then.status(500);
        });

        let gateway = HttpProductGateway::new(&server.base_url()).unwrap();
        let err = gateway.decrease_stock("SKU-171", 2).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable { .. }));
    }
}
