use serde::{Deserialize, Serialize};

/// One quoted delivery service for a (origin, destination, weight) triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingOption {
    pub method: String,
    pub cost: i64,
    pub eta_days: String,
}
