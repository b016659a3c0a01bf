use checkout_gateways::mock::{MockLogisticsGateway, MockPaymentGateway, MockProductGateway};
use checkout_hex::application::checkout_service::CheckoutService;
use checkout_hex::config::WarehouseConfig;
use checkout_store::memory::InMemoryStore;
use checkout_types::domain::order::{OrderStatus, PaymentStatus};
use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::Product;

fn service() -> CheckoutService<
    InMemoryStore,
    MockProductGateway,
    MockLogisticsGateway,
    MockPaymentGateway,
> {
    let store = InMemoryStore::new();
    let products = MockProductGateway::new(Product {
        id: "SKU-171".into(),
        name: "Mirrorless Camera".into(),
        price: 15_000_000,
        weight: 171,
        stock: 10,
    });
    let logistics = MockLogisticsGateway::new(vec![
        ShippingOption {
            method: "REGULER".into(),
            cost: 10_855,
            eta_days: "2-3".into(),
        },
        ShippingOption {
            method: "EXPRESS".into(),
            cost: 24_000,
            eta_days: "1".into(),
        },
    ]);
    let payments = MockPaymentGateway::new();
    CheckoutService::new(
        store,
        products,
        logistics,
        payments,
        WarehouseConfig {
            origin_city: "1".into(),
            pickup_address: "Central Warehouse, Jakarta".into(),
        },
    )
}

// End-to-end checkout and payment-callback flow against the in-memory store.
#[tokio::test]
async fn checkout_then_callback_flow() {
    let svc = service();

    let order = svc
        .create_order(
            "SKU-171",
            2,
            "Jl. Merdeka 1".into(),
            "2".into(),
            "EXPRESS".into(),
        )
        .await
        .unwrap();
    assert_eq!(order.total_amount, 2 * 15_000_000 + 24_000);
    assert_eq!(order.total_weight, 342);
    assert_eq!(order.status, OrderStatus::Pending);

    let list = svc.list_orders().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, order.id);

    let updated = svc
        .update_payment_status(&order.payment_reference, "PAID")
        .await
        .unwrap();
    assert!(updated);

    let settled = svc.get_order(order.id).await.unwrap();
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.status, OrderStatus::Shipped);
    assert!(settled.shipping_receipt.is_some());
}

#[tokio::test]
async fn orders_list_newest_first() {
    let svc = service();

    let first = svc
        .create_order(
            "SKU-171",
            1,
            "Jl. Merdeka 1".into(),
            "2".into(),
            "REGULER".into(),
        )
        .await
        .unwrap();
    let second = svc
        .create_order(
            "SKU-171",
            1,
            "Jl. Pahlawan 9".into(),
            "3".into(),
            "EXPRESS".into(),
        )
        .await
        .unwrap();

    let list = svc.list_orders().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, second.id);
    assert_eq!(list[1].id, first.id);
}
