use crate::config::SettlementConfig;
use crate::domain::settlement::{ClaimOutcome, NewSettlement, SettlementRecord, SettlementStatus};
use crate::domain::verification::VerifiedPayment;
use crate::ledger::SettlementLedger;
use crate::store::StoreClient;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Captured,
    AlreadySettled,
    InProgress,
    Deferred { status: SettlementStatus, reason: String },
    Unrecorded,
}

impl SettlementOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self,
            SettlementOutcome::Captured | SettlementOutcome::AlreadySettled
        )
    }
}

#[derive(Clone)]
pub struct Settler {
    pub store: Arc<dyn StoreClient>,
    pub ledger: Arc<dyn SettlementLedger>,
    pub cfg: SettlementConfig,
}

impl Settler {
    pub async fn settle(&self, payment: &VerifiedPayment) -> Result<SettlementOutcome> {
        let settlement = NewSettlement::from(payment);
        let now = Utc::now();

        match self
            .ledger
            .claim(&settlement, after(now, self.cfg.lease))
            .await?
        {
            ClaimOutcome::Acquired => {
                self.capture(
                    settlement.payment_id(),
                    settlement.order_id(),
                    settlement.amount(),
                    now,
                )
                .await
            }
            ClaimOutcome::AlreadySettled => {
                info!(payment_id = settlement.payment_id(), "settlement already recorded");
                Ok(SettlementOutcome::AlreadySettled)
            }
            ClaimOutcome::InProgress(status) => {
                info!(payment_id = settlement.payment_id(), status = status.as_str(), "settlement in progress elsewhere");
                Ok(SettlementOutcome::InProgress)
            }
        }
    }

    /// Re-runs the capture for a record leased through [`SettlementLedger::lease_due`].
    /// Only the retrier calls this; records built by hand never reach the store.
    ///
    /// ```compile_fail
    /// use payment_bridge::domain::settlement::SettlementRecord;
    /// use payment_bridge::service::settlement::Settler;
    ///
    /// async fn capture_anything(settler: &Settler, record: &SettlementRecord) {
    ///     let _ = settler.retry(record).await;
    /// }
    /// ```
    pub(crate) async fn retry(&self, leased: &SettlementRecord) -> Result<SettlementOutcome> {
        if leased.status != SettlementStatus::Pending {
            return Ok(SettlementOutcome::InProgress);
        }
        self.capture(&leased.payment_id, &leased.order_id, leased.amount, Utc::now())
            .await
    }

    async fn capture(
        &self,
        payment_id: &str,
        order_id: &str,
        amount: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> Result<SettlementOutcome> {
        match self.store.capture(order_id, amount).await {
            Ok(()) => {
                info!(payment_id, order_id, amount = ?amount, store = self.store.name(), "order marked paid");
                // The store already holds the capture; an error here must not surface as a failed payment.
                if let Err(e) = self.ledger.mark_settled(payment_id).await {
                    error!(
                        payment_id,
                        order_id,
                        error = %e,
                        "capture succeeded but ledger not updated; reconcile before the lease expires"
                    );
                }
                Ok(SettlementOutcome::Captured)
            }
            Err(e) => {
                let reason = e.to_string();
                let status = self
                    .ledger
                    .mark_failed(
                        payment_id,
                        &reason,
                        after(now, self.cfg.retry_interval),
                        self.cfg.max_attempts,
                    )
                    .await?;
                match status {
                    SettlementStatus::Exhausted => error!(
                        payment_id,
                        order_id,
                        error = %reason,
                        "store capture exhausted; manual reconciliation required"
                    ),
                    _ => warn!(payment_id, order_id, error = %reason, "store capture failed; queued for retry"),
                }
                Ok(SettlementOutcome::Deferred { status, reason })
            }
        }
    }
}

fn after(now: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    now + chrono::Duration::from_std(d).unwrap_or_else(|_| chrono::Duration::seconds(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bank::PaymentDetails;
    use crate::domain::settlement::ClaimOutcome;
    use crate::domain::verification::{assess, Verification};
    use crate::ledger::memory::InMemoryLedger;
    use crate::store::mock::MockStore;
    use serde_json::json;

    struct StuckLedger(InMemoryLedger);

    #[async_trait::async_trait]
    impl SettlementLedger for StuckLedger {
        async fn claim(&self, s: &NewSettlement, lease_until: DateTime<Utc>) -> Result<ClaimOutcome> {
            self.0.claim(s, lease_until).await
        }
        async fn mark_settled(&self, _payment_id: &str) -> Result<()> {
            anyhow::bail!("ledger connection reset")
        }
        async fn mark_failed(
            &self,
            payment_id: &str,
            error: &str,
            next_attempt_at: DateTime<Utc>,
            max_attempts: i32,
        ) -> Result<SettlementStatus> {
            self.0
                .mark_failed(payment_id, error, next_attempt_at, max_attempts)
                .await
        }
        async fn lease_due(
            &self,
            now: DateTime<Utc>,
            lease_until: DateTime<Utc>,
            limit: i64,
        ) -> Result<Vec<SettlementRecord>> {
            self.0.lease_due(now, lease_until, limit).await
        }
        async fn get(&self, payment_id: &str) -> Result<Option<SettlementRecord>> {
            self.0.get(payment_id).await
        }
        async fn requeue(&self, payment_id: &str, now: DateTime<Utc>) -> Result<Option<SettlementRecord>> {
            self.0.requeue(payment_id, now).await
        }
        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    fn config() -> SettlementConfig {
        SettlementConfig {
            max_attempts: 3,
            retry_interval: Duration::ZERO,
            lease: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
        }
    }

    fn verified() -> VerifiedPayment {
        let details: PaymentDetails = serde_json::from_value(
            json!({"ResponseCode": "00", "OrderStatus": "2", "Amount": 500}),
        )
        .unwrap();
        match assess(&details, "p1", "1001") {
            Verification::Verified(v) => v,
            Verification::Rejected { reason } => panic!("not verified: {reason}"),
        }
    }

    #[tokio::test]
    async fn capture_stands_when_ledger_update_fails() {
        let store = MockStore::new();
        let ledger = InMemoryLedger::new();
        let settler = Settler {
            store: Arc::new(store.clone()),
            ledger: Arc::new(StuckLedger(ledger.clone())),
            cfg: config(),
        };

        let outcome = settler.settle(&verified()).await.unwrap();
        assert_eq!(outcome, SettlementOutcome::Captured);
        assert_eq!(store.captures().len(), 1);

        // Still leased, so the retrier leaves it alone.
        let due = ledger
            .lease_due(Utc::now(), Utc::now(), 10)
            .await
            .unwrap();
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn retry_skips_records_no_longer_pending() {
        let store = MockStore::new();
        let ledger = InMemoryLedger::new();
        let settler = Settler {
            store: Arc::new(store.clone()),
            ledger: Arc::new(ledger.clone()),
            cfg: config(),
        };
        settler.settle(&verified()).await.unwrap();

        let settled = ledger.get("p1").await.unwrap().unwrap();
        assert_eq!(settled.status, SettlementStatus::Settled);
        assert_eq!(
            settler.retry(&settled).await.unwrap(),
            SettlementOutcome::InProgress
        );
        assert_eq!(store.attempts(), 1);
    }
}
