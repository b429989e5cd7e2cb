use rust_decimal::Decimal;
use crate::domain::serde_util::{opt_string_or_number, string_or_number};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInit {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub back_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitPaymentRequest {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "OrderID")]
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    #[serde(rename = "BackURL")]
    pub back_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitPaymentResponse {
    pub response_code: InitResponseCode,
    #[serde(rename = "PaymentID", default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub response_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum InitResponseCode {
    Success,
    Other(i64),
}

impl From<i64> for InitResponseCode {
    fn from(code: i64) -> Self {
        if code == 1 {
            InitResponseCode::Success
        } else {
            InitResponseCode::Other(code)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetailsRequest {
    #[serde(rename = "PaymentID")]
    pub payment_id: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentDetails {
    #[serde(deserialize_with = "details_code")]
    pub(crate) response_code: DetailsResponseCode,
    #[serde(default, deserialize_with = "order_status")]
    pub(crate) order_status: BankOrderStatus,
    #[serde(default)]
    pub(crate) response_message: Option<String>,
    #[serde(default)]
    pub(crate) amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) approved_amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) deposited_amount: Option<Decimal>,
    #[serde(default)]
    pub(crate) currency: Option<String>,
    #[serde(rename = "OrderID", default, deserialize_with = "opt_string_or_number")]
    pub(crate) order_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsResponseCode {
    Success,
    Other(String),
}

impl From<String> for DetailsResponseCode {
    fn from(code: String) -> Self {
        if code == "00" {
            DetailsResponseCode::Success
        } else {
            DetailsResponseCode::Other(code)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BankOrderStatus {
    Approved,
    Deposited,
    #[default]
    Unknown,
    Other(String),
}

impl BankOrderStatus {
    pub fn funds_secured(&self) -> bool {
        matches!(self, BankOrderStatus::Approved | BankOrderStatus::Deposited)
    }
}

impl From<String> for BankOrderStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "1" => BankOrderStatus::Approved,
            "2" => BankOrderStatus::Deposited,
            _ => BankOrderStatus::Other(code),
        }
    }
}

// The bank documents "00" but numeric 0 would collapse to "0", which must not read as success.
fn details_code<'de, D>(deserializer: D) -> Result<DetailsResponseCode, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(DetailsResponseCode::from)
}

fn order_status<'de, D>(deserializer: D) -> Result<BankOrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?
        .map(BankOrderStatus::from)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn init_request_uses_bank_field_names() {
        let req = InitPaymentRequest {
            client_id: "cid".to_string(),
            username: "u".to_string(),
            password: "p".to_string(),
            order_id: "1001".to_string(),
            amount: Decimal::new(500, 0),
            currency: "051".to_string(),
            description: "Order #1001".to_string(),
            back_url: "https://host/api/callback?shopify_order_id=1001".to_string(),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["ClientID"], "cid");
        assert_eq!(v["OrderID"], "1001");
        assert_eq!(v["Amount"], "500");
        assert_eq!(v["Currency"], "051");
        assert_eq!(v["BackURL"], "https://host/api/callback?shopify_order_id=1001");
    }

    #[test]
    fn init_response_code_one_is_success() {
        let ok: InitPaymentResponse =
            serde_json::from_value(json!({"ResponseCode": 1, "PaymentID": "abc123"})).unwrap();
        assert_eq!(ok.response_code, InitResponseCode::Success);

        let bad: InitPaymentResponse = serde_json::from_value(
            json!({"ResponseCode": 2, "PaymentID": null, "ResponseMessage": "Invalid amount"}),
        )
        .unwrap();
        assert_eq!(bad.response_code, InitResponseCode::Other(2));
        assert_eq!(bad.payment_id, None);
    }

    #[test]
    fn details_sentinels_map_to_variants() {
        let d: PaymentDetails = serde_json::from_value(json!({
            "ResponseCode": "00",
            "OrderStatus": "2",
            "Amount": 500.0,
            "OrderID": 1001
        }))
        .unwrap();
        assert_eq!(d.response_code, DetailsResponseCode::Success);
        assert_eq!(d.order_status, BankOrderStatus::Deposited);
        assert_eq!(d.order_id.as_deref(), Some("1001"));

        let numeric: PaymentDetails =
            serde_json::from_value(json!({"ResponseCode": 0, "OrderStatus": 1})).unwrap();
        assert_eq!(numeric.response_code, DetailsResponseCode::Other("0".to_string()));
        assert_eq!(numeric.order_status, BankOrderStatus::Approved);
    }

    #[test]
    fn only_approved_and_deposited_secure_funds() {
        assert!(BankOrderStatus::from("1".to_string()).funds_secured());
        assert!(BankOrderStatus::from("2".to_string()).funds_secured());
        assert!(!BankOrderStatus::from("0".to_string()).funds_secured());
        assert!(!BankOrderStatus::Unknown.funds_secured());
    }
}
