//! In-process gateway doubles with switchable failure modes. Clones share
//! state, so a test can keep a handle and flip switches after wiring the
//! service.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use checkout_types::domain::shipping::ShippingOption;
use checkout_types::ports::gateways::{
    GatewayError, LogisticsGateway, PaymentAuthorization, PaymentGateway, Product,
    ProductGateway, Shipment, ShipmentRequest,
};

fn unavailable(service: &'static str) -> GatewayError {
    GatewayError::Unavailable {
        service,
        message: "simulated outage".into(),
    }
}

#[derive(Clone)]
pub struct MockProductGateway {
    product: Product,
    pub fail_fetch: Arc<AtomicBool>,
    pub fail_decrease: Arc<AtomicBool>,
    pub decrease_calls: Arc<AtomicU64>,
}

impl MockProductGateway {
    pub fn new(product: Product) -> Self {
        Self {
            product,
            fail_fetch: Arc::new(AtomicBool::new(false)),
            fail_decrease: Arc::new(AtomicBool::new(false)),
            decrease_calls: Arc::new(AtomicU64::new(0)),
        }
    }
}

#[async_trait]
impl ProductGateway for MockProductGateway {
    async fn fetch_product(&self, product_id: &str) -> Result<Product, GatewayError> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable("product-service"));
        }
        if product_id != self.product.id {
            return Err(GatewayError::ProductNotFound(product_id.to_string()));
        }
        Ok(self.product.clone())
    }

    async fn decrease_stock(
        &self,
        _product_id: &str,
        _quantity: u32,
    ) -> Result<(), GatewayError> {
        self.decrease_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_decrease.load(Ordering::SeqCst) {
            return Err(unavailable("product-service"));
        }
        Ok(())
    }
}

/// What the mock logistics service does with the next shipment request.
#[derive(Debug, Clone)]
pub enum ShipmentOutcome {
    Deliver,
    Duplicate(Option<String>),
    Unavailable,
}

#[derive(Clone)]
pub struct MockLogisticsGateway {
    options: Vec<ShippingOption>,
    pub fail_options: Arc<AtomicBool>,
    shipment_outcome: Arc<Mutex<ShipmentOutcome>>,
    pub shipment_calls: Arc<AtomicU64>,
    counter: Arc<AtomicU64>,
}

impl MockLogisticsGateway {
    pub fn new(options: Vec<ShippingOption>) -> Self {
        Self {
            options,
            fail_options: Arc::new(AtomicBool::new(false)),
            shipment_outcome: Arc::new(Mutex::new(ShipmentOutcome::Deliver)),
            shipment_calls: Arc::new(AtomicU64::new(0)),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn set_shipment_outcome(&self, outcome: ShipmentOutcome) {
        *self.shipment_outcome.lock().unwrap() = outcome;
    }
}

#[async_trait]
impl LogisticsGateway for MockLogisticsGateway {
    async fn fetch_shipping_options(
        &self,
        _origin_city: &str,
        _destination_city: &str,
        _weight: u32,
    ) -> Result<Vec<ShippingOption>, GatewayError> {
        if self.fail_options.load(Ordering::SeqCst) {
            return Err(unavailable("logistics-service"));
        }
        Ok(self.options.clone())
    }

    async fn request_shipment(
        &self,
        _request: ShipmentRequest,
    ) -> Result<Shipment, GatewayError> {
        self.shipment_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.shipment_outcome.lock().unwrap().clone();
        match outcome {
            ShipmentOutcome::Deliver => {
                let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Shipment {
                    receipt: format!("RESI-{n:06}"),
                    status: "PICKUP_SCHEDULED".into(),
                })
            }
            ShipmentOutcome::Duplicate(receipt) => {
                Err(GatewayError::DuplicateShipment { receipt })
            }
            ShipmentOutcome::Unavailable => Err(unavailable("logistics-service")),
        }
    }
}

#[derive(Clone)]
pub struct MockPaymentGateway {
    pub fail: Arc<AtomicBool>,
    counter: Arc<AtomicU64>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            fail: Arc::new(AtomicBool::new(false)),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn request_payment(&self, _amount: i64) -> Result<PaymentAuthorization, GatewayError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable("payment-service"));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PaymentAuthorization {
            transaction_id: format!("TRX-{n:06}"),
            payment_reference: format!("VA-88{n:08}"),
            status: "PENDING".into(),
        })
    }
}
