use checkout_gateways::mock::{MockLogisticsGateway, MockPaymentGateway, MockProductGateway};
use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::config::WarehouseConfig;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_store::memory::InMemoryStore;
use checkout_types::domain::order::{Order, OrderStatus, PaymentStatus};
use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::Product;
use serde::{Deserialize, Serialize};

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[derive(Serialize)]
struct OrderInput {
    product_id: String,
    quantity: u32,
    shipping_address: String,
    destination_city: String,
    shipping_method: String,
}

fn order_input(quantity: u32, shipping_method: &str) -> OrderInput {
    OrderInput {
        product_id: "SKU-171".into(),
        quantity,
        shipping_address: "Jl. Merdeka 1".into(),
        destination_city: "2".into(),
        shipping_method: shipping_method.into(),
    }
}

#[derive(Serialize)]
struct CallbackInput {
    payment_reference: String,
    status: String,
}

#[derive(Deserialize)]
struct Created {
    id: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total_amount: i64,
    payment_reference: String,
}

#[derive(Deserialize)]
struct CallbackResult {
    updated: bool,
}

async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };

    let store = InMemoryStore::new();
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
    let server = HttpServer::new(service, config).await.unwrap();

    let addr = format!("http://127.0.0.1:{}", port);
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (addr, handle)
}

#[tokio::test]
async fn checkout_and_callback_over_http() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_input(1, "REGULER"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let created: Created = res.json().await.unwrap();
    assert_eq!(created.status, OrderStatus::Pending);
    assert_eq!(created.payment_status, PaymentStatus::Unpaid);
    assert_eq!(created.total_amount, 15_010_855);

    let list: Vec<Order> = client
        .get(format!("{}/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id.to_string(), created.id);

    let fetched: Order = client
        .get(format!("{}/orders/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.payment_reference, created.payment_reference);

    let res = client
        .post(format!("{}/payments/callback", addr))
        .json(&CallbackInput {
            payment_reference: created.payment_reference.clone(),
            status: "PAID".into(),
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let result: CallbackResult = res.json().await.unwrap();
    assert!(result.updated);

    let settled: Order = client
        .get(format!(
            "{}/orders/by-reference/{}",
            addr, created.payment_reference
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.status, OrderStatus::Shipped);
    assert!(settled.shipping_receipt.is_some());

    handle.abort();
}

#[tokio::test]
async fn shipping_options_endpoint() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let options: Vec<ShippingOption> = client
        .get(format!(
            "{}/shipping/options?destination_city=2&product_id=SKU-171&quantity=2",
            addr
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].method, "REGULER");
    assert_eq!(options[0].cost, 10_855);

    handle.abort();
}

#[tokio::test]
async fn error_paths_over_http() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    // More than the 10 in stock.
    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_input(99, "REGULER"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);

    // Method absent from the quote list.
    let res = client
        .post(format!("{}/orders", addr))
        .json(&order_input(1, "KARGO"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let missing_id = uuid::Uuid::new_v4();
    let res = client
        .get(format!("{}/orders/{}", addr, missing_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    // Unknown reference is a negative ack, not an error.
    let res = client
        .post(format!("{}/payments/callback", addr))
        .json(&CallbackInput {
            payment_reference: "VA-never-issued".into(),
            status: "PAID".into(),
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let result: CallbackResult = res.json().await.unwrap();
    assert!(!result.updated);

    // Nothing was written by any of the failed checkouts.
    let list: Vec<Order> = client
        .get(format!("{}/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    handle.abort();
}
