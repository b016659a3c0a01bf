///  To run :
///  cargo r --example checkout_demo
use checkout_gateways::mock::{MockLogisticsGateway, MockPaymentGateway, MockProductGateway};
use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::config::WarehouseConfig;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_store::build_store;
use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::Product;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on an ephemeral port, mock collaborators, file-backed DB.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}");

    let tmp = tempdir()?;
    let db_path = tmp.path().join("orders.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let store = build_store(Some(&db_url)).await?;
    let products = MockProductGateway::new(Product {
        id: "SKU-171".into(),
        name: "Mirrorless Camera".into(),
        price: 15_000_000,
        weight: 171,
        stock: 10,
    });
    let logistics = MockLogisticsGateway::new(vec![ShippingOption {
        method: "REGULER".into(),
        cost: 10_855,
        eta_days: "2-3".into(),
    }]);
    let payments = MockPaymentGateway::new();
    let service = CheckoutService::new(
        store,
        products,
        logistics,
        payments,
        WarehouseConfig {
            origin_city: "1".into(),
            pickup_address: "Central Warehouse, Jakarta".into(),
        },
    );
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::new();

    // Checkout one camera with the REGULER service.
    let created: serde_json::Value = client
        .post(format!("{addr}/orders"))
        .json(&serde_json::json!({
            "product_id": "SKU-171",
            "quantity": 1,
            "shipping_address": "Jl. Merdeka 1",
            "destination_city": "2",
            "shipping_method": "REGULER"
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let reference = created["payment_reference"].as_str().unwrap().to_string();
    println!(
        "Created order id={} total={} reference={}",
        created["id"], created["total_amount"], reference
    );
    assert_eq!(created["total_amount"], 15_010_855);

    // The payment collaborator reports the charge as cleared.
    let callback: serde_json::Value = client
        .post(format!("{addr}/payments/callback"))
        .json(&serde_json::json!({
            "payment_reference": reference,
            "status": "PAID"
        }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("Callback updated={}", callback["updated"]);
    assert_eq!(callback["updated"], true);

    // The order is now paid and carries a shipment receipt.
    let settled: serde_json::Value = client
        .get(format!("{addr}/orders/by-reference/{reference}"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!(
        "Settled status={} payment_status={} receipt={}",
        settled["status"], settled["payment_status"], settled["shipping_receipt"]
    );
    assert_eq!(settled["payment_status"], "PAID");
    assert_eq!(settled["status"], "SHIPPED");

    handle.abort();
    Ok(())
}
