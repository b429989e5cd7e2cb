use crate::domain::settlement::{
    status_after_failure, ClaimOutcome, NewSettlement, SettlementRecord, SettlementStatus,
};
use crate::ledger::SettlementLedger;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

// Single-instance ledger. Lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<Mutex<HashMap<String, SettlementRecord>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SettlementLedger for InMemoryLedger {
    async fn claim(&self, settlement: &NewSettlement, lease_until: DateTime<Utc>) -> Result<ClaimOutcome> {
        let mut map = self.inner.lock().await;
        if let Some(existing) = map.get(settlement.payment_id()) {
            return Ok(match existing.status {
                SettlementStatus::Settled => ClaimOutcome::AlreadySettled,
                other => ClaimOutcome::InProgress(other),
            });
        }

        map.insert(
            settlement.payment_id().to_string(),
            SettlementRecord {
                payment_id: settlement.payment_id().to_string(),
                order_id: settlement.order_id().to_string(),
                amount: settlement.amount(),
                status: SettlementStatus::Pending,
                attempts: 0,
                last_error: None,
                next_attempt_at: lease_until,
                updated_at: Utc::now(),
            },
        );
        Ok(ClaimOutcome::Acquired)
    }

    async fn mark_settled(&self, payment_id: &str) -> Result<()> {
        let mut map = self.inner.lock().await;
        if let Some(rec) = map.get_mut(payment_id) {
            rec.status = SettlementStatus::Settled;
            rec.last_error = None;
            rec.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        payment_id: &str,
        error: &str,
        next_attempt_at: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<SettlementStatus> {
        let mut map = self.inner.lock().await;
        let Some(rec) = map.get_mut(payment_id) else {
            anyhow::bail!("no settlement record for payment {payment_id}");
        };
        if rec.status == SettlementStatus::Settled {
            return Ok(rec.status);
        }
        rec.attempts += 1;
        rec.status = status_after_failure(rec.attempts, max_attempts);
        rec.last_error = Some(error.to_string());
        rec.next_attempt_at = next_attempt_at;
        rec.updated_at = Utc::now();
        Ok(rec.status)
    }

    async fn lease_due(
        &self,
        now: DateTime<Utc>,
        lease_until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SettlementRecord>> {
        let mut map = self.inner.lock().await;
        let mut due: Vec<&mut SettlementRecord> = map
            .values_mut()
            .filter(|r| r.status == SettlementStatus::Pending && r.next_attempt_at <= now)
            .collect();
        due.sort_by_key(|r| r.next_attempt_at);

        Ok(due
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| {
                r.next_attempt_at = lease_until;
                r.updated_at = now;
                r.clone()
            })
            .collect())
    }

    async fn get(&self, payment_id: &str) -> Result<Option<SettlementRecord>> {
        Ok(self.inner.lock().await.get(payment_id).cloned())
    }

    async fn requeue(&self, payment_id: &str, now: DateTime<Utc>) -> Result<Option<SettlementRecord>> {
        let mut map = self.inner.lock().await;
        Ok(map.get_mut(payment_id).map(|rec| {
            if rec.status != SettlementStatus::Settled {
                rec.status = SettlementStatus::Pending;
                rec.attempts = 0;
                rec.next_attempt_at = now;
                rec.updated_at = now;
            }
            rec.clone()
        }))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
