use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::shipping::ShippingOption;

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("{service} error: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },
    #[error("product not found: {0}")]
    ProductNotFound(String),
    /// The logistics service already holds a shipment for this order; the
    /// receipt it issued the first time is echoed back when it has one.
    #[error("shipment already exists")]
    DuplicateShipment { receipt: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub weight: u32,
    pub stock: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAuthorization {
    pub transaction_id: String,
    pub payment_reference: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub order_id: String,
    pub delivery_address: String,
    pub pickup_address: String,
    pub origin_city: String,
    pub destination_city: String,
    pub weight: u32,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub receipt: String,
    pub status: String,
}

#[async_trait]
pub trait ProductGateway: Send + Sync + 'static {
    async fn fetch_product(&self, product_id: &str) -> Result<Product, GatewayError>;
    async fn decrease_stock(&self, product_id: &str, quantity: u32)
        -> Result<(), GatewayError>;
}

#[async_trait]
pub trait LogisticsGateway: Send + Sync + 'static {
    async fn fetch_shipping_options(
        &self,
        origin_city: &str,
        destination_city: &str,
        weight: u32,
    ) -> Result<Vec<ShippingOption>, GatewayError>;

    async fn request_shipment(
        &self,
        request: ShipmentRequest,
    ) -> Result<Shipment, GatewayError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Opens a virtual-account charge for the given amount. The wallet the
    /// charge is drawn against is gateway configuration, not a call argument.
    async fn request_payment(&self, amount: i64) -> Result<PaymentAuthorization, GatewayError>;
}
