use crate::domain::bank::{BankOrderStatus, DetailsResponseCode, PaymentDetails};
use rust_decimal::Decimal;

/// A payment the bank confirmed server-to-server. Fields are private and the only
/// constructor is the crate-internal `assess`, so nothing outside the bank adapter's
/// answer can produce one, and settlement takes nothing else.
///
/// ```compile_fail
/// use payment_bridge::domain::bank::PaymentDetails;
/// use payment_bridge::domain::verification::assess;
///
/// let details: PaymentDetails =
///     serde_json::from_str(r#"{"ResponseCode":"00","OrderStatus":"2"}"#).unwrap();
/// let _ = assess(&details, "p1", "1001");
/// ```
///
/// ```compile_fail
/// use payment_bridge::domain::bank::{BankOrderStatus, DetailsResponseCode, PaymentDetails};
///
/// let _ = PaymentDetails {
///     response_code: DetailsResponseCode::Success,
///     order_status: BankOrderStatus::Deposited,
///     response_message: None,
///     amount: None,
///     approved_amount: None,
///     deposited_amount: None,
///     currency: None,
///     order_id: None,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    payment_id: String,
    order_id: String,
    amount: Option<Decimal>,
    status: BankOrderStatus,
}

impl VerifiedPayment {
    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn status(&self) -> &BankOrderStatus {
        &self.status
    }
}

#[derive(Debug, Clone)]
pub enum Verification {
    Verified(VerifiedPayment),
    Rejected { reason: String },
}

pub(crate) fn assess(details: &PaymentDetails, payment_id: &str, order_id: &str) -> Verification {
    let reason = || {
        details
            .response_message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "payment was not completed".to_string())
    };

    if details.response_code != DetailsResponseCode::Success {
        return Verification::Rejected { reason: reason() };
    }
    if !details.order_status.funds_secured() {
        return Verification::Rejected { reason: reason() };
    }
    if let Some(bank_order) = details.order_id.as_deref() {
        if bank_order != order_id {
            return Verification::Rejected {
                reason: "payment does not belong to this order".to_string(),
            };
        }
    }

    Verification::Verified(VerifiedPayment {
        payment_id: payment_id.to_string(),
        order_id: order_id.to_string(),
        amount: collected_amount(details),
        status: details.order_status.clone(),
    })
}

fn collected_amount(details: &PaymentDetails) -> Option<Decimal> {
    let positive = |v: Option<Decimal>| v.filter(|a| *a > Decimal::ZERO);
    match details.order_status {
        BankOrderStatus::Deposited => positive(details.deposited_amount),
        _ => positive(details.approved_amount),
    }
    .or(positive(details.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(v: serde_json::Value) -> PaymentDetails {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn approved_and_deposited_verify() {
        for status in ["1", "2"] {
            let d = details(json!({"ResponseCode": "00", "OrderStatus": status, "Amount": 500}));
            assert!(matches!(assess(&d, "p1", "1001"), Verification::Verified(_)));
        }
    }

    #[test]
    fn other_combinations_are_rejected_with_bank_message() {
        let cases = [
            json!({"ResponseCode": "00", "OrderStatus": "0", "ResponseMessage": "Pending"}),
            json!({"ResponseCode": "00", "OrderStatus": "3", "ResponseMessage": "Declined"}),
            json!({"ResponseCode": "01", "OrderStatus": "1", "ResponseMessage": "Declined"}),
            json!({"ResponseCode": "0116", "OrderStatus": "2", "ResponseMessage": "Declined"}),
        ];
        for c in cases {
            match assess(&details(c), "p1", "1001") {
                Verification::Rejected { reason } => assert!(!reason.is_empty()),
                Verification::Verified(_) => panic!("must not verify"),
            }
        }
    }

    #[test]
    fn mismatched_bank_order_is_rejected() {
        let d = details(json!({"ResponseCode": "00", "OrderStatus": "2", "OrderID": 9999}));
        assert!(matches!(
            assess(&d, "p1", "1001"),
            Verification::Rejected { .. }
        ));
    }

    #[test]
    fn deposited_amount_wins_over_requested_amount() {
        let d = details(json!({
            "ResponseCode": "00",
            "OrderStatus": "2",
            "Amount": 500,
            "DepositedAmount": 450
        }));
        let Verification::Verified(v) = assess(&d, "p1", "1001") else {
            panic!("expected verified");
        };
        assert_eq!(v.amount(), Some(Decimal::new(450, 0)));
        assert_eq!(v.order_id(), "1001");
    }

    #[test]
    fn zero_collected_amount_falls_back_to_amount() {
        let d = details(json!({
            "ResponseCode": "00",
            "OrderStatus": "1",
            "Amount": 500,
            "ApprovedAmount": 0
        }));
        let Verification::Verified(v) = assess(&d, "p1", "1001") else {
            panic!("expected verified");
        };
        assert_eq!(v.amount(), Some(Decimal::new(500, 0)));
    }
}
