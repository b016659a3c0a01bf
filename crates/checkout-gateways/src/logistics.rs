use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::{
    GatewayError, LogisticsGateway, Shipment, ShipmentRequest,
};

const SERVICE: &str = "logistics-service";

#[derive(Clone)]
pub struct HttpLogisticsGateway {
    base: Url,
    client: reqwest::Client,
}

impl HttpLogisticsGateway {
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
struct OptionsQuery<'a> {
    origin: &'a str,
    destination: &'a str,
    weight: u32,
}

/// Body of a 409 response; the service echoes the receipt it already issued.
#[derive(Deserialize)]
struct DuplicateBody {
    #[serde(default)]
    receipt: Option<String>,
}

#[async_trait]
impl LogisticsGateway for HttpLogisticsGateway {
    async fn fetch_shipping_options(
        &self,
        origin_city: &str,
        destination_city: &str,
        weight: u32,
    ) -> Result<Vec<ShippingOption>, GatewayError> {
        let res = self
            .client
            .get(self.url("shipping/options")?)
            .query(&OptionsQuery {
                origin: origin_city,
                destination: destination_city,
                weight,
            })
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }

    async fn request_shipment(
        &self,
        request: ShipmentRequest,
    ) -> Result<Shipment, GatewayError> {
        let res = self
            .client
            .post(self.url("shipments")?)
            .json(&request)
            .send()
            .await
            .map_err(unavailable)?;
        if res.status() == reqwest::StatusCode::CONFLICT {
            let dup: DuplicateBody = res.json().await.map_err(unavailable)?;
            return Err(GatewayError::DuplicateShipment {
                receipt: dup.receipt,
            });
        }
        let res = res.error_for_status().map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }
}
