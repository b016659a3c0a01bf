use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;

use checkout_types::ports::gateways::{GatewayError, PaymentAuthorization, PaymentGateway};

const SERVICE: &str = "payment-service";

#[derive(Clone)]
pub struct HttpPaymentGateway {
    base: Url,
    client: reqwest::Client,
    wallet_id: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: &str, wallet_id: String) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, wallet_id, crate::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        wallet_id: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, wallet_id, client)
    }

    pub fn with_client(
        base_url: &str,
        wallet_id: String,
        client: reqwest::Client,
    ) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(Self {
            base,
            client,
            wallet_id,
        })
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.base.join(path).map_err(|e| GatewayError::Unavailable {
            service: SERVICE,
            message: e.to_string(),
        })
    }
}

fn unavailable(err: reqwest::Error) -> GatewayError {
    GatewayError::Unavailable {
        service: SERVICE,
        message: err.to_string(),
    }
}

#[derive(Serialize)]
struct CreateTransactionRequest<'a> {
    wallet_id: &'a str,
    amount: i64,
    kind: &'a str,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn request_payment(&self, amount: i64) -> Result<PaymentAuthorization, GatewayError> {
        let res = self
            .client
            .post(self.url("transactions")?)
            .json(&CreateTransactionRequest {
                wallet_id: &self.wallet_id,
                amount,
                kind: "PAYMENT",
            })
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        res.json().await.map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn opens_a_virtual_account_charge() {
        let server = MockServer::start();
        let create_mock = server.mock(|when, then| {
            when.method(POST).path("/transactions").json_body_obj(
                &serde_json::json!({
                    "wallet_id": "wallet-user-1",
                    "amount": 15_010_855_i64,
                    "kind": "PAYMENT"
                }),
            );
            then.status(201).json_body_obj(&PaymentAuthorization {
                transaction_id: "TRX-000007".into(),
                payment_reference: "VA-8800000007".into(),
                status: "PENDING".into(),
            });
        });

        let gateway =
            HttpPaymentGateway::new(&server.base_url(), "wallet-user-1".into()).unwrap();
        let auth = gateway.request_payment(15_010_855).await.unwrap();
        assert_eq!(auth.payment_reference, "VA-8800000007");

        create_mock.assert();
    }

    #[tokio::test]
    async fn outage_maps_to_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/transactions");
            then.status(500);
        });

        let gateway =
            HttpPaymentGateway::new(&server.base_url(), "wallet-user-1".into()).unwrap();
        let err = gateway.request_payment(15_010_855).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable { .. }));
    }
}
