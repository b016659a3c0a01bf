#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a store feature: `memory` or `sqlite`.");

use checkout_types::domain::order::{Order, OrderStatus};
use checkout_types::ports::order_store::{OrderStore, StoreError};
use uuid::Uuid;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Feature-selected store handle; SQLite wins when both adapters are built.
pub struct Store {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    memory: memory::InMemoryStore,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteStore,
}

pub async fn build_store(url: Option<&str>) -> anyhow::Result<Store> {
    Store::build(url).await
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self {
            memory: memory::InMemoryStore::new(),
        })
    }

    #[cfg(feature = "sqlite")]
    pub async fn build(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://orders.db");
        let sqlite = sqlite::SqliteStore::new(url).await?;
        Ok(Self { sqlite })
    }
}

#[cfg(all(feature = "memory", not(feature = "sqlite")))]
#[async_trait::async_trait]
impl OrderStore for Store {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        self.memory.insert(order).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.memory.get_by_id(id).await
    }

    async fn get_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, StoreError> {
        self.memory.get_by_payment_reference(reference).await
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        self.memory.list_all().await
    }

    async fn mark_paid(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.memory.mark_paid(id).await
    }

    async fn set_shipping_receipt(
        &self,
        id: Uuid,
        receipt: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        self.memory.set_shipping_receipt(id, receipt, status).await
    }
}

#[cfg(feature = "sqlite")]
#[async_trait::async_trait]
impl OrderStore for Store {
    async fn insert(&self, order: Order) -> Result<Order, StoreError> {
        self.sqlite.insert(order).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.sqlite.get_by_id(id).await
    }

    async fn get_by_payment_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, StoreError> {
        self.sqlite.get_by_payment_reference(reference).await
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        self.sqlite.list_all().await
    }

    async fn mark_paid(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.sqlite.mark_paid(id).await
    }

    async fn set_shipping_receipt(
        &self,
        id: Uuid,
        receipt: &str,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        self.sqlite.set_shipping_receipt(id, receipt, status).await
    }
}
