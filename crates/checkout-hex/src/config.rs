use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub product_service_url: String,
    pub logistics_service_url: String,
    pub payment_service_url: String,
    pub wallet_id: String,
    pub warehouse: WarehouseConfig,
    pub gateway_timeout_secs: u64,
}

/// Where shipments originate; every quote and pickup uses these.
#[derive(Debug, Deserialize, Clone)]
pub struct WarehouseConfig {
    pub origin_city: String,
    pub pickup_address: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "7003".into());
        let database_url = env::var("DATABASE_URL").ok();
        let product_service_url = env::var("PRODUCT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:7002".into());
        let logistics_service_url = env::var("LOGISTIC_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:4000".into());
        let payment_service_url = env::var("PAYMENT_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let wallet_id =
            env::var("PAYMENT_WALLET_ID").unwrap_or_else(|_| "wallet-user-1".into());
        let warehouse = WarehouseConfig {
            origin_city: env::var("WAREHOUSE_CITY_ID").unwrap_or_else(|_| "1".into()),
            pickup_address: env::var("WAREHOUSE_PICKUP_ADDRESS")
                .unwrap_or_else(|_| "Central Warehouse, Jakarta".into()),
        };
        let gateway_timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        Ok(Self {
            server_port,
            database_url,
            product_service_url,
            logistics_service_url,
            payment_service_url,
            wallet_id,
            warehouse,
            gateway_timeout_secs,
        })
    }
}
