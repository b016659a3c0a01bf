use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use checkout_types::ports::gateways::GatewayError;
use checkout_types::ports::order_store::StoreError;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Bad request: {0}")]
    InvalidRequest(String),

    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },

    #[error("Shipping method not available: {0}")]
    InvalidShippingMethod(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] GatewayError),

    #[error("Storage failure: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for CheckoutError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            CheckoutError::InvalidRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            CheckoutError::InsufficientStock { .. } => {
                (StatusCode::CONFLICT, self.to_string())
            }
            CheckoutError::InvalidShippingMethod(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            CheckoutError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            CheckoutError::Upstream(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            CheckoutError::Persistence(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage failure".into())
            }
        };

        let body = serde_json::to_string(&ErrorBody { error: msg })
            .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
