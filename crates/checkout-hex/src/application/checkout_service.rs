use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::WarehouseConfig;
use crate::errors::CheckoutError;
use checkout_types::domain::order::{Order, OrderItem, OrderStatus};
use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::{
    GatewayError, LogisticsGateway, PaymentGateway, ProductGateway, ShipmentRequest,
};
use checkout_types::ports::order_store::OrderStore;

pub struct CheckoutService<S, P, L, Y>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    store: S,
    products: P,
    logistics: L,
    payments: Y,
    warehouse: WarehouseConfig,
}

impl<S, P, L, Y> CheckoutService<S, P, L, Y>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    pub fn new(
        store: S,
        products: P,
        logistics: L,
        payments: Y,
        warehouse: WarehouseConfig,
    ) -> Self {
        Self {
            store,
            products,
            logistics,
            payments,
            warehouse,
        }
    }

    /// One checkout pass: validate stock, price shipping against the quoted
    /// options, charge payment, decrement stock, persist. Persistence is the
    /// only write to the store and happens last.
    pub async fn create_order(
        &self,
        product_id: &str,
        quantity: u32,
        shipping_address: String,
        destination_city: String,
        shipping_method: String,
    ) -> Result<Order, CheckoutError> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidRequest("quantity must be > 0".into()));
        }
        if shipping_address.trim().is_empty() {
            return Err(CheckoutError::InvalidRequest("shipping_address empty".into()));
        }
        if destination_city.trim().is_empty() {
            return Err(CheckoutError::InvalidRequest("destination_city empty".into()));
        }
        if shipping_method.trim().is_empty() {
            return Err(CheckoutError::InvalidRequest("shipping_method empty".into()));
        }

        let product = self.products.fetch_product(product_id).await?;
        if quantity > product.stock {
            return Err(CheckoutError::InsufficientStock {
                available: product.stock,
                requested: quantity,
            });
        }

        let total_weight = product.weight * quantity;
        let options = self
            .logistics
            .fetch_shipping_options(&self.warehouse.origin_city, &destination_city, total_weight)
            .await?;
        // The quoted cost is authoritative; method match is exact and
        // case-sensitive.
        let selected = options
            .into_iter()
            .find(|opt| opt.method == shipping_method)
            .ok_or_else(|| CheckoutError::InvalidShippingMethod(shipping_method.clone()))?;

        let grand_total = product.price * quantity as i64 + selected.cost;
        info!(
            product_id,
            quantity,
            shipping_cost = selected.cost,
            grand_total,
            "checkout priced"
        );

        let (payment_reference, initial_status) =
            match self.payments.request_payment(grand_total).await {
                Ok(auth) if !auth.payment_reference.trim().is_empty() => {
                    info!(reference = %auth.payment_reference, "payment reference issued");
                    (auth.payment_reference, OrderStatus::Pending)
                }
                Ok(_) => {
                    warn!("payment gateway returned a blank reference, using fallback");
                    (fallback_reference(), OrderStatus::ManualCheck)
                }
                Err(err) => {
                    warn!(error = %err, "payment gateway unavailable, using fallback reference");
                    (fallback_reference(), OrderStatus::ManualCheck)
                }
            };

        if let Err(err) = self.products.decrease_stock(product_id, quantity).await {
            // Stock was validated above; drift is reconciled out-of-band.
            warn!(error = %err, product_id, "stock decrement failed");
        }

        let item = OrderItem {
            product_id: product_id.to_string(),
            product_name: product.name,
            quantity,
            price_at_purchase: product.price,
            weight_per_item: product.weight,
        };
        let mut order = Order::new(
            vec![item],
            shipping_address,
            destination_city,
            shipping_method,
            selected.cost,
            payment_reference,
        )
        .map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;
        order.status = initial_status;

        let order = self.store.insert(order).await?;
        info!(order_id = %order.id, total = order.total_amount, "order persisted");
        Ok(order)
    }

    /// Asynchronous notice from the payment collaborator that a charge
    /// cleared. Returns false for a reference this system never issued.
    /// Once the order is marked paid the result is true regardless of the
    /// shipment outcome.
    pub async fn update_payment_status(
        &self,
        payment_reference: &str,
        status: &str,
    ) -> Result<bool, CheckoutError> {
        info!(reference = payment_reference, status, "payment callback received");
        let Some(order) = self
            .store
            .get_by_payment_reference(payment_reference)
            .await?
        else {
            info!(reference = payment_reference, "callback for unknown reference");
            return Ok(false);
        };

        if !order.is_paid() {
            self.store.mark_paid(order.id).await?;
        }

        if order.shipping_receipt.is_none() {
            let (receipt, next_status) = self.arrange_shipment(&order).await;
            if let Err(err) = self
                .store
                .set_shipping_receipt(order.id, &receipt, next_status)
                .await
            {
                warn!(order_id = %order.id, error = %err, "failed to persist shipping receipt");
            }
        }

        Ok(true)
    }

    async fn arrange_shipment(&self, order: &Order) -> (String, OrderStatus) {
        let request = ShipmentRequest {
            order_id: order.id.to_string(),
            delivery_address: order.shipping_address.clone(),
            pickup_address: self.warehouse.pickup_address.clone(),
            origin_city: self.warehouse.origin_city.clone(),
            destination_city: order.destination_city.clone(),
            weight: order.total_weight,
            method: order.shipping_method.clone(),
        };
        match self.logistics.request_shipment(request).await {
            Ok(shipment) if !shipment.receipt.trim().is_empty() => {
                info!(order_id = %order.id, receipt = %shipment.receipt, "shipment scheduled");
                (shipment.receipt, OrderStatus::Shipped)
            }
            Ok(_) => {
                warn!(order_id = %order.id, "logistics returned an empty receipt");
                (placeholder_receipt(), OrderStatus::ManualCheck)
            }
            Err(GatewayError::DuplicateShipment { receipt }) => {
                let receipt =
                    receipt.unwrap_or_else(|| format!("DUP-{}", order.id.simple()));
                info!(order_id = %order.id, receipt = %receipt, "shipment already existed");
                (receipt, OrderStatus::Shipped)
            }
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "shipment request failed");
                (placeholder_receipt(), OrderStatus::ManualCheck)
            }
        }
    }

    pub async fn get_shipping_options(
        &self,
        destination_city: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<Vec<ShippingOption>, CheckoutError> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidRequest("quantity must be > 0".into()));
        }
        let product = self.products.fetch_product(product_id).await?;
        let total_weight = product.weight * quantity;
        Ok(self
            .logistics
            .fetch_shipping_options(&self.warehouse.origin_city, destination_city, total_weight)
            .await?)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, CheckoutError> {
        match self.store.get_by_id(id).await? {
            Some(o) => Ok(o),
            None => Err(CheckoutError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn get_order_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Order, CheckoutError> {
        match self.store.get_by_payment_reference(reference).await? {
            Some(o) => Ok(o),
            None => Err(CheckoutError::NotFound(format!(
                "payment reference {}",
                reference
            ))),
        }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, CheckoutError> {
        Ok(self.store.list_all().await?)
    }
}

/// Locally-unique stand-in issued when the payment gateway is unreachable;
/// reconciled by an operator later.
fn fallback_reference() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("VA-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

fn placeholder_receipt() -> String {
    format!("MANUAL-CHECK-{}", Utc::now().timestamp_millis())
}
