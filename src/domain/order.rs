use rust_decimal::Decimal;
use crate::domain::serde_util::{opt_string_or_number, string_or_number};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct OrderEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub order_number: Option<String>,
    pub total_price: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub payment_gateway_names: Vec<String>,
    #[serde(default)]
    pub financial_status: FinancialStatus,
}

impl OrderEvent {
    pub fn gateway_label(&self) -> &str {
        self.payment_gateway_names
            .first()
            .map(String::as_str)
            .or(self.gateway.as_deref())
            .unwrap_or("")
    }

    pub fn description(&self) -> String {
        let number = self.order_number.as_deref().unwrap_or(&self.id);
        format!("Order #{}", number.trim_start_matches('#'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    #[default]
    Pending,
    Authorized,
    PartiallyPaid,
    Paid,
    PartiallyRefunded,
    Refunded,
    Voided,
    #[serde(other)]
    Unknown,
}

impl FinancialStatus {
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            FinancialStatus::Paid | FinancialStatus::PartiallyRefunded | FinancialStatus::Refunded
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub order_id: String,
    pub payment_id: String,
    pub payment_url: String,
}

pub fn resolve_currency(raw: Option<&str>, default_code: &str) -> Option<String> {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() || raw.eq_ignore_ascii_case("AMD") {
        return Some(default_code.to_string());
    }
    if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_digit()) {
        return Some(raw.to_string());
    }
    None
}
