use async_trait::async_trait;
use checkout_types::domain::order::{Order, OrderItem, OrderStatus, PaymentStatus};
use checkout_types::ports::order_store::{OrderStore, StoreError};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, status, payment_status, total_amount, shipping_address, \
     shipping_method, shipping_cost, payment_reference, shipping_receipt, destination_city, \
     total_weight, created_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbOrder {
    id: String,
    status: String,
    payment_status: String,
    total_amount: i64,
    shipping_address: String,
    shipping_method: String,
    shipping_cost: i64,
    payment_reference: String,
    shipping_receipt: Option<String>,
    destination_city: String,
    total_weight: i64,
    created_at: String,
}

#[derive(FromRow)]
struct DbOrderItem {
    product_id: String,
    product_name: String,
    quantity: i64,
    price_at_purchase: i64,
    weight_per_item: i64,
}

impl From<DbOrderItem> for OrderItem {
    fn from(row: DbOrderItem) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity as u32,
            price_at_purchase: row.price_at_purchase,
            weight_per_item: row.weight_per_item as u32,
        }
    }
}

impl DbOrder {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, StoreError> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| StoreError::Db(format!("unknown status: {}", self.status)))?;
        let payment_status = PaymentStatus::parse(&self.payment_status).ok_or_else(|| {
            StoreError::Db(format!("unknown payment status: {}", self.payment_status))
        })?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::Db(e.to_string()))?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(&self.id).map_err(|e| StoreError::Db(e.to_string()))?;
        Ok(Order {
            id,
            status,
            payment_status,
            total_amount: self.total_amount,
            shipping_address: self.shipping_address,
            shipping_method: self.shipping_method,
            shipping_cost: self.shipping_cost,
            payment_reference: self.payment_reference,
            shipping_receipt: self.shipping_receipt,
            destination_city: self.destination_city,
            total_weight: self.total_weight as u32,
            items,
            created_at,
        })
    }
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file, one statement at a time.
        let ddl = include_str!("../migrations/0001_create_orders.sql");
        for stmt in ddl.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    async fn load_items(&self, order_id: &str) -> Result<Vec<OrderItem>, StoreError> {
        let rows: Vec<DbOrderItem> = sqlx::query_as(
            "SELECT product_id, product_name, quantity, price_at_purchase, weight_per_item \
             FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn hydrate(&self, row: DbOrder) -> Result<Order, StoreError> {
        let items = self.load_items(&row.id).await?;
        row.into_order(items)
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;

        sqlx::query(
            "INSERT INTO orders (id, status, payment_status, total_amount, shipping_address, \
             shipping_method, shipping_cost, payment_reference, shipping_receipt, \
             destination_city, total_weight, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id.to_string())
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(order.total_amount)
        .bind(&order.shipping_address)
        .bind(&order.shipping_method)
        .bind(order.shipping_cost)
        .bind(&order.payment_reference)
        .bind(&order.shipping_receipt)
        .bind(&order.destination_city)
        .bind(order.total_weight as i64)
        .bind(order.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, product_name, quantity, \
                 price_at_purchase, weight_per_item) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(order.id.to_string())
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity as i64)
            .bind(item.price_at_purchase)
            .bind(item.weight_per_item as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Db(e.to_string()))?;
        Ok(order)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let row: Option<DbOrder> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::Db(e.to_string()))?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn get_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, StoreError> {
        let row: Option<DbOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_reference = ?"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<DbOrder> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn mark_paid(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        // The guarded UPDATE is a no-op on an already paid order; the re-read
        // below returns the unchanged row in that case.
        sqlx::query(
            "UPDATE orders SET payment_status = 'PAID', status = 'PROCESSED' \
             WHERE id = ? AND payment_status = 'UNPAID'",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn set_shipping_receipt(
        &self,
        id: Uuid,
        receipt: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let updated = sqlx::query(
            "UPDATE orders SET shipping_receipt = ?, status = ? \
             WHERE id = ? AND payment_status = 'PAID' AND shipping_receipt IS NULL",
        )
        .bind(receipt)
        .bind(status.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Db(e.to_string()))?;

        if updated.rows_affected() == 0 {
            // Distinguish a no-op on an already receipted order from an
            // unpaid or missing one.
            return match self.get_by_id(id).await? {
                Some(order) if order.is_paid() => Ok(Some(order)),
                _ => Ok(None),
            };
        }
        self.get_by_id(id).await
    }
}
