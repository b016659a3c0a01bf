use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(String),
}

#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    /// Writes the order and its line items atomically.
    async fn insert(&self, order: Order) -> Result<Order, StoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    /// Payment references are unique, so at most one order matches.
    async fn get_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, StoreError>;
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Order>, StoreError>;
    /// Sets payment_status=PAID and status=PROCESSED. Idempotent: an already
    /// paid order is returned unchanged.
    async fn mark_paid(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    /// Records the shipment receipt and resulting fulfillment status.
    /// Only effective on a paid order with no receipt yet; a paid order that
    /// already has one is returned unchanged, anything else yields None.
    async fn set_shipping_receipt(
        &self,
        id: Uuid,
        receipt: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError>;
}
