use async_trait::async_trait;
use checkout_types::domain::order::{Order, OrderStatus, PaymentStatus};
use checkout_types::ports::order_store::{OrderStore, StoreError};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryStore {
    pub map: Arc<DashMap<Uuid, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        self.map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.map.get(&id).map(|r| r.clone()))
    }

    async fn get_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, StoreError> {
        Ok(self
            .map
            .iter()
            .find(|kv| kv.value().payment_reference == reference)
            .map(|kv| kv.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.map.iter().map(|kv| kv.value().clone()).collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn mark_paid(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        if let Some(mut v) = self.map.get_mut(&id) {
            if v.payment_status != PaymentStatus::Paid {
                v.payment_status = PaymentStatus::Paid;
                v.status = OrderStatus::Processed;
            }
            return Ok(Some(v.clone()));
        }
        Ok(None)
    }

    async fn set_shipping_receipt(
        &self,
        id: Uuid,
        receipt: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        if let Some(mut v) = self.map.get_mut(&id) {
            if v.payment_status != PaymentStatus::Paid {
                return Ok(None);
            }
            if v.shipping_receipt.is_none() {
                v.shipping_receipt = Some(receipt.to_string());
                v.status = status;
            }
            return Ok(Some(v.clone()));
        }
        Ok(None)
    }
}
