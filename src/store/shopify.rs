use crate::config::StoreConfig;
use crate::store::{StoreClient, TransactionEnvelope};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::time::Duration;

pub struct ShopifyClient {
    pub api_base: String,
    pub access_token: String,
    pub timeout: Duration,
    pub client: reqwest::Client,
}

impl ShopifyClient {
    pub fn new(cfg: &StoreConfig, timeout: Duration, client: reqwest::Client) -> Self {
        Self {
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            access_token: cfg.access_token.clone(),
            timeout,
            client,
        }
    }

    pub fn transactions_url(&self, order_id: &str) -> String {
        format!("{}/orders/{}/transactions.json", self.api_base, order_id)
    }
}

#[async_trait::async_trait]
impl StoreClient for ShopifyClient {
    fn name(&self) -> &'static str {
        "shopify"
    }

    async fn capture(&self, order_id: &str, amount: Option<Decimal>) -> Result<()> {
        let resp = self
            .client
            .post(self.transactions_url(order_id))
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&TransactionEnvelope::capture(amount))
            .timeout(self.timeout)
            .send()
            .await
            .context("store capture request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            anyhow::bail!("store capture returned HTTP {}: {}", status.as_u16(), snippet);
        }
        Ok(())
    }
}
