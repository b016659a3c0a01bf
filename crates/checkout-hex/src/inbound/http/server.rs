use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    serve, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::checkout_service::CheckoutService;
use crate::errors::CheckoutError;
use checkout_types::domain::order::{Order, OrderStatus, PaymentStatus};
use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::{LogisticsGateway, PaymentGateway, ProductGateway};
use checkout_types::ports::order_store::OrderStore;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<S, P, L, Y>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    pub service: Arc<CheckoutService<S, P, L, Y>>,
    pub config: HttpServerConfig,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub quantity: u32,
    pub shipping_address: String,
    pub destination_city: String,
    pub shipping_method: String,
}

#[derive(Deserialize)]
pub struct PaymentCallbackRequest {
    pub payment_reference: String,
    pub status: String,
}

#[derive(Serialize)]
struct PaymentCallbackResponse {
    updated: bool,
}

#[derive(Deserialize)]
pub struct ShippingOptionsQuery {
    pub destination_city: String,
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Serialize)]
struct CreateOrderResponse {
    id: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total_amount: i64,
    shipping_cost: i64,
    payment_reference: String,
}

impl From<Order> for CreateOrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id.to_string(),
            status: o.status,
            payment_status: o.payment_status,
            total_amount: o.total_amount,
            shipping_cost: o.shipping_cost,
            payment_reference: o.payment_reference,
        }
    }
}

impl<S, P, L, Y> HttpServer<S, P, L, Y>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    pub async fn new(
        service: CheckoutService<S, P, L, Y>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let svc = self.service.clone();
        let app = Router::new()
            .route("/health", get(health))
            .route("/orders", post(create_order::<S, P, L, Y>))
            .route("/orders", get(list_orders::<S, P, L, Y>))
            .route("/orders/{id}", get(get_order::<S, P, L, Y>))
            .route(
                "/orders/by-reference/{reference}",
                get(get_order_by_reference::<S, P, L, Y>),
            )
            .route("/shipping/options", get(shipping_options::<S, P, L, Y>))
            .route("/payments/callback", post(payment_callback::<S, P, L, Y>))
            .layer(trace_layer)
            .with_state(svc);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

async fn create_order<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<CreateOrderResponse>), CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let order = service
        .create_order(
            &payload.product_id,
            payload.quantity,
            payload.shipping_address,
            payload.destination_city,
            payload.shipping_method,
        )
        .await?;
    let body: CreateOrderResponse = order.into();
    Ok((axum::http::StatusCode::CREATED, Json(body)))
}

async fn get_order<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let uuid = Uuid::parse_str(&id).map_err(|e| CheckoutError::InvalidRequest(e.to_string()))?;
    let order = service.get_order(uuid).await?;
    Ok(Json(order))
}

async fn get_order_by_reference<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
    Path(reference): Path<String>,
) -> Result<Json<Order>, CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let order = service.get_order_by_payment_reference(&reference).await?;
    Ok(Json(order))
}

async fn list_orders<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
) -> Result<Json<Vec<Order>>, CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let list = service.list_orders().await?;
    Ok(Json(list))
}

async fn shipping_options<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
    Query(query): Query<ShippingOptionsQuery>,
) -> Result<Json<Vec<ShippingOption>>, CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let options = service
        .get_shipping_options(&query.destination_city, &query.product_id, query.quantity)
        .await?;
    Ok(Json(options))
}

async fn payment_callback<S, P, L, Y>(
    State(service): State<Arc<CheckoutService<S, P, L, Y>>>,
    Json(payload): Json<PaymentCallbackRequest>,
) -> Result<Json<PaymentCallbackResponse>, CheckoutError>
where
    S: OrderStore,
    P: ProductGateway,
    L: LogisticsGateway,
    Y: PaymentGateway,
{
    let updated = service
        .update_payment_status(&payload.payment_reference, &payload.status)
        .await?;
    Ok(Json(PaymentCallbackResponse { updated }))
}
