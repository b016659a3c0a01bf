use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processed,
    Shipped,
    ManualCheck,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processed => "PROCESSED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::ManualCheck => "MANUAL_CHECK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "PROCESSED" => Some(OrderStatus::Processed),
            "SHIPPED" => Some(OrderStatus::Shipped),
            "MANUAL_CHECK" => Some(OrderStatus::ManualCheck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "UNPAID",
            PaymentStatus::Paid => "PAID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNPAID" => Some(PaymentStatus::Unpaid),
            "PAID" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// One order line. All fields are snapshots captured at checkout so later
/// catalog changes never alter historical orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price_at_purchase: i64,
    pub weight_per_item: u32,
}

impl OrderItem {
    pub fn subtotal(&self) -> i64 {
        self.quantity as i64 * self.price_at_purchase
    }

    pub fn total_weight(&self) -> u32 {
        self.quantity * self.weight_per_item
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: i64,
    pub shipping_address: String,
    pub shipping_method: String,
    pub shipping_cost: i64,
    /// Virtual-account number; join key for the asynchronous payment callback.
    pub payment_reference: String,
    pub shipping_receipt: Option<String>,
    pub destination_city: String,
    pub total_weight: u32,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        items: Vec<OrderItem>,
        shipping_address: String,
        destination_city: String,
        shipping_method: String,
        shipping_cost: i64,
        payment_reference: String,
    ) -> anyhow::Result<Self> {
        if items.is_empty() {
            anyhow::bail!("items empty");
        }
        for it in &items {
            if it.quantity == 0 {
                anyhow::bail!("item quantity must be > 0");
            }
        }
        if shipping_address.trim().is_empty() {
            anyhow::bail!("shipping_address empty");
        }
        if destination_city.trim().is_empty() {
            anyhow::bail!("destination_city empty");
        }
        if shipping_method.trim().is_empty() {
            anyhow::bail!("shipping_method empty");
        }
        if payment_reference.trim().is_empty() {
            anyhow::bail!("payment_reference empty");
        }
        let total_amount =
            items.iter().map(OrderItem::subtotal).sum::<i64>() + shipping_cost;
        let total_weight = items.iter().map(OrderItem::total_weight).sum();
        Ok(Self {
            id: Uuid::new_v4(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            total_amount,
            shipping_address,
            shipping_method,
            shipping_cost,
            payment_reference,
            shipping_receipt: None,
            destination_city,
            total_weight,
            items,
            created_at: Utc::now(),
        })
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}
