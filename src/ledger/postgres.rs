use crate::domain::settlement::{ClaimOutcome, NewSettlement, SettlementRecord, SettlementStatus};
use crate::ledger::SettlementLedger;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

// Multi-instance ledger; the `payment_id` primary key is the idempotency guard.
#[derive(Clone)]
pub struct PgSettlementLedger {
    pub pool: PgPool,
}

const COLUMNS: &str =
    "payment_id, order_id, amount, status, attempts, last_error, next_attempt_at, updated_at";

fn to_record(row: PgRow) -> SettlementRecord {
    let status: String = row.get("status");
    SettlementRecord {
        payment_id: row.get("payment_id"),
        order_id: row.get("order_id"),
        amount: row.get("amount"),
        status: SettlementStatus::parse(&status),
        attempts: row.get("attempts"),
        last_error: row.get("last_error"),
        next_attempt_at: row.get("next_attempt_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait::async_trait]
impl SettlementLedger for PgSettlementLedger {
    async fn claim(&self, settlement: &NewSettlement, lease_until: DateTime<Utc>) -> Result<ClaimOutcome> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO settlements (payment_id, order_id, amount, status, attempts, next_attempt_at, created_at, updated_at)
            VALUES ($1,$2,$3,'PENDING',0,$4,now(),now())
            ON CONFLICT (payment_id) DO NOTHING
            "#,
        )
        .bind(settlement.payment_id())
        .bind(settlement.order_id())
        .bind(settlement.amount())
        .bind(lease_until)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() == 1 {
            return Ok(ClaimOutcome::Acquired);
        }

        let status: String = sqlx::query("SELECT status FROM settlements WHERE payment_id=$1")
            .bind(settlement.payment_id())
            .fetch_one(&self.pool)
            .await?
            .get("status");

        Ok(match SettlementStatus::parse(&status) {
            SettlementStatus::Settled => ClaimOutcome::AlreadySettled,
            other => ClaimOutcome::InProgress(other),
        })
    }

    async fn mark_settled(&self, payment_id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE settlements SET status='SETTLED', last_error=NULL, updated_at=now() WHERE payment_id=$1",
        )
        .bind(payment_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_failed(
        &self,
        payment_id: &str,
        error: &str,
        next_attempt_at: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<SettlementStatus> {
        let row = sqlx::query(
            r#"
            UPDATE settlements
            SET attempts = attempts + 1,
                status = CASE WHEN attempts + 1 >= $4 THEN 'EXHAUSTED' ELSE 'PENDING' END,
                last_error = $2,
                next_attempt_at = $3,
                updated_at = now()
            WHERE payment_id = $1 AND status <> 'SETTLED'
            RETURNING status
            "#,
        )
        .bind(payment_id)
        .bind(error)
        .bind(next_attempt_at)
        .bind(max_attempts)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => SettlementStatus::parse(&row.get::<String, _>("status")),
            None => SettlementStatus::Settled,
        })
    }

    async fn lease_due(
        &self,
        now: DateTime<Utc>,
        lease_until: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<SettlementRecord>> {
        let rows = sqlx::query(&format!(
            r#"
            UPDATE settlements SET next_attempt_at = $2, updated_at = now()
            WHERE payment_id IN (
                SELECT payment_id FROM settlements
                WHERE status='PENDING' AND next_attempt_at <= $1
                ORDER BY next_attempt_at ASC
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {COLUMNS}
            "#
        ))
        .bind(now)
        .bind(lease_until)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(to_record).collect())
    }

    async fn get(&self, payment_id: &str) -> Result<Option<SettlementRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM settlements WHERE payment_id=$1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(to_record))
    }

    async fn requeue(&self, payment_id: &str, now: DateTime<Utc>) -> Result<Option<SettlementRecord>> {
        sqlx::query(
            r#"
            UPDATE settlements
            SET status='PENDING', attempts=0, next_attempt_at=$2, updated_at=now()
            WHERE payment_id=$1 AND status <> 'SETTLED'
            "#,
        )
        .bind(payment_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(payment_id).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
