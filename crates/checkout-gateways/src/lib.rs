//! Outbound clients for the product, logistics, and payment collaborators,
//! plus in-process mock adapters for tests and demos.

use std::time::Duration;

pub mod logistics;
pub mod mock;
pub mod payment;
pub mod product;

pub use logistics::HttpLogisticsGateway;
pub use payment::HttpPaymentGateway;
pub use product::HttpProductGateway;

/// Applied to every client unless overridden; a hung collaborator must not
/// hang a checkout with it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
