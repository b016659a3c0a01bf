mod server;

pub use server::{
    CreateOrderRequest, HttpServer, HttpServerConfig, PaymentCallbackRequest,
    ShippingOptionsQuery,
};
