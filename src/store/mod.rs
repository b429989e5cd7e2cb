use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

pub mod mock;
pub mod shopify;

#[derive(Debug, Clone, Serialize)]
pub struct TransactionEnvelope {
    pub transaction: CaptureTransaction,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptureTransaction {
    pub kind: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
}

impl TransactionEnvelope {
    pub fn capture(amount: Option<Decimal>) -> Self {
        Self {
            transaction: CaptureTransaction {
                kind: "capture",
                status: "success",
                amount,
            },
        }
    }
}

#[async_trait::async_trait]
pub trait StoreClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn capture(&self, order_id: &str, amount: Option<Decimal>) -> Result<()>;
}
