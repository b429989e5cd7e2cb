use crate::domain::settlement::{ClaimOutcome, NewSettlement, SettlementRecord, SettlementStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

#[async_trait::async_trait]
pub trait SettlementLedger: Send + Sync {
    async fn claim(&self, settlement: &NewSettlement, lease_until: DateTime<Utc>) -> Result<ClaimOutcome>;

    async fn mark_settled(&self, payment_id: &str) -> Result<()>;

    async fn mark_failed(
        &self,
        payment_id: &str,
        error: &str,
        next_attempt_at: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<SettlementStatus>;

    async fn lease_due(
        &self,
        now: DateTime<Utc>,
        lease_until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SettlementRecord>>;

    async fn get(&self, payment_id: &str) -> Result<Option<SettlementRecord>>;

    async fn requeue(&self, payment_id: &str, now: DateTime<Utc>) -> Result<Option<SettlementRecord>>;

    async fn ping(&self) -> Result<()>;
}
