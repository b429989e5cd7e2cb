use crate::service::settlement::{SettlementOutcome, Settler};
use anyhow::Result;
use chrono::Utc;
use std::time::Duration;

pub struct SettlementRetrier {
    pub settler: Settler,
    pub batch_size: i64,
    pub poll_interval: Duration,
}

impl SettlementRetrier {
    pub async fn run_once(&self) -> Result<usize> {
        let now = Utc::now();
        let lease_until = now
            + chrono::Duration::from_std(self.settler.cfg.lease)
                .unwrap_or_else(|_| chrono::Duration::seconds(120));
        let due = self
            .settler
            .ledger
            .lease_due(now, lease_until, self.batch_size)
            .await?;

        let mut captured = 0;
        for record in &due {
            match self.settler.retry(record).await {
                Ok(SettlementOutcome::Captured) => captured += 1,
                Ok(_) => {}
                Err(e) => tracing::error!(
                    payment_id = %record.payment_id,
                    error = %e,
                    "settlement retry could not update ledger"
                ),
            }
        }

        if !due.is_empty() {
            tracing::info!(due = due.len(), captured, "settlement retry pass");
        }
        Ok(captured)
    }

    pub async fn run(self) {
        loop {
            if let Err(e) = self.run_once().await {
                tracing::error!("settlement retry pass failed: {}", e);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
