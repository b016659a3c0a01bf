use std::time::Duration;

use checkout_gateways::{HttpLogisticsGateway, HttpPaymentGateway, HttpProductGateway};
use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::config::Config;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_store::{build_store, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / collaborator URLs when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let store: Store = build_store(config.database_url.as_deref()).await?;

    let timeout = Duration::from_secs(config.gateway_timeout_secs);
    let products = HttpProductGateway::with_timeout(&config.product_service_url, timeout)?;
    let logistics = HttpLogisticsGateway::with_timeout(&config.logistics_service_url, timeout)?;
    let payments = HttpPaymentGateway::with_timeout(
        &config.payment_service_url,
        config.wallet_id.clone(),
        timeout,
    )?;

    let service = CheckoutService::new(
        store,
        products,
        logistics,
        payments,
        config.warehouse.clone(),
    );

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
