//! checkout-types: domain model and ports for the checkout orchestrator.

pub mod domain;
pub mod ports;
