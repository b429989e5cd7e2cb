use crate::config::BankConfig;
use crate::domain::bank::{
    InitPaymentRequest, InitPaymentResponse, PaymentDetails, PaymentDetailsRequest, PaymentInit,
};
use crate::gateways::BankGateway;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub struct AmeriaGateway {
    pub base_url: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

impl AmeriaGateway {
    pub fn new(cfg: &BankConfig, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            client_id: cfg.client_id.clone(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            timeout,
            client,
        }
    }

    pub fn init_body(&self, init: &PaymentInit) -> InitPaymentRequest {
        InitPaymentRequest {
            client_id: self.client_id.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            order_id: init.order_id.clone(),
            amount: init.amount,
            currency: init.currency.clone(),
            description: init.description.clone(),
            back_url: init.back_url.clone(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, operation: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, operation);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("bank {operation} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            tracing::error!(operation, status = status.as_u16(), body = %snippet, "bank returned error status");
            anyhow::bail!("bank {operation} returned HTTP {}", status.as_u16());
        }

        resp.json::<T>()
            .await
            .with_context(|| format!("bank {operation} returned an unreadable body"))
    }
}

#[async_trait::async_trait]
impl BankGateway for AmeriaGateway {
    fn name(&self) -> &'static str {
        "ameriabank"
    }

    async fn init_payment(&self, init: &PaymentInit) -> Result<InitPaymentResponse> {
        self.post("InitPayment", &self.init_body(init)).await
    }

    async fn payment_details(&self, payment_id: &str) -> Result<PaymentDetails> {
        let body = PaymentDetailsRequest {
            payment_id: payment_id.to_string(),
            username: self.username.clone(),
            password: self.password.clone(),
        };
        self.post("GetPaymentDetails", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn init_body_attaches_credentials() {
        let gw = AmeriaGateway {
            base_url: "https://bank.test/api".to_string(),
            client_id: "client".to_string(),
            username: "user".to_string(),
            password: "secret".to_string(),
            timeout: Duration::from_secs(1),
            client: reqwest::Client::new(),
        };
        let body = gw.init_body(&PaymentInit {
            order_id: "1001".to_string(),
            amount: Decimal::new(500, 0),
            currency: "051".to_string(),
            description: "Order #1001".to_string(),
            back_url: "https://host/api/callback?shopify_order_id=1001".to_string(),
        });
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v["ClientID"], "client");
        assert_eq!(v["Username"], "user");
        assert_eq!(v["Password"], "secret");
        assert_eq!(v["Amount"], "500");
    }
}
