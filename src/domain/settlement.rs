use crate::domain::verification::VerifiedPayment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Pending,
    Settled,
    Exhausted,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "PENDING",
            SettlementStatus::Settled => "SETTLED",
            SettlementStatus::Exhausted => "EXHAUSTED",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "SETTLED" => SettlementStatus::Settled,
            "EXHAUSTED" => SettlementStatus::Exhausted,
            _ => SettlementStatus::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSettlement {
    payment_id: String,
    order_id: String,
    amount: Option<Decimal>,
}

impl NewSettlement {
    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }
}

impl From<&VerifiedPayment> for NewSettlement {
    fn from(v: &VerifiedPayment) -> Self {
        Self {
            payment_id: v.payment_id().to_string(),
            order_id: v.order_id().to_string(),
            amount: v.amount(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SettlementRecord {
    pub payment_id: String,
    pub order_id: String,
    pub amount: Option<Decimal>,
    pub status: SettlementStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Acquired,
    AlreadySettled,
    InProgress(SettlementStatus),
}

pub fn status_after_failure(attempts: i32, max_attempts: i32) -> SettlementStatus {
    if attempts >= max_attempts {
        SettlementStatus::Exhausted
    } else {
        SettlementStatus::Pending
    }
}
