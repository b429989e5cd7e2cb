use crate::domain::bank::{InitPaymentResponse, PaymentDetails, PaymentInit};
use crate::gateways::BankGateway;
use anyhow::Result;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    AlwaysSuccess,
    AlwaysDecline,
    TransportError,
}

impl MockBehavior {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ALWAYS_DECLINE" => MockBehavior::AlwaysDecline,
            "TRANSPORT_ERROR" => MockBehavior::TransportError,
            _ => MockBehavior::AlwaysSuccess,
        }
    }
}

#[derive(Default)]
struct MockBankState {
    init_calls: Vec<PaymentInit>,
    details_calls: Vec<String>,
    sessions: HashMap<String, PaymentInit>,
    init_override: Option<serde_json::Value>,
    details_override: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct MockBank {
    pub behavior: MockBehavior,
    state: Arc<Mutex<MockBankState>>,
}

impl MockBank {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            state: Arc::new(Mutex::new(MockBankState::default())),
        }
    }

    pub fn with_init_response(self, body: serde_json::Value) -> Self {
        self.lock().init_override = Some(body);
        self
    }

    pub fn with_details_response(self, body: serde_json::Value) -> Self {
        self.lock().details_override = Some(body);
        self
    }

    pub fn init_calls(&self) -> Vec<PaymentInit> {
        self.lock().init_calls.clone()
    }

    pub fn details_calls(&self) -> Vec<String> {
        self.lock().details_calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockBankState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl BankGateway for MockBank {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn init_payment(&self, init: &PaymentInit) -> Result<InitPaymentResponse> {
        let mut state = self.lock();
        state.init_calls.push(init.clone());

        if self.behavior == MockBehavior::TransportError {
            anyhow::bail!("mock bank unreachable");
        }
        if let Some(body) = state.init_override.clone() {
            return Ok(serde_json::from_value(body)?);
        }

        let body = match self.behavior {
            MockBehavior::AlwaysDecline => json!({
                "ResponseCode": 2,
                "PaymentID": null,
                "ResponseMessage": "mock decline"
            }),
            _ => {
                let payment_id = format!("mock-{}", init.order_id);
                state.sessions.insert(payment_id.clone(), init.clone());
                json!({"ResponseCode": 1, "PaymentID": payment_id, "ResponseMessage": "OK"})
            }
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn payment_details(&self, payment_id: &str) -> Result<PaymentDetails> {
        let mut state = self.lock();
        state.details_calls.push(payment_id.to_string());

        if self.behavior == MockBehavior::TransportError {
            anyhow::bail!("mock bank unreachable");
        }
        if let Some(body) = state.details_override.clone() {
            return Ok(serde_json::from_value(body)?);
        }

        let body = match (self.behavior, state.sessions.get(payment_id)) {
            (MockBehavior::AlwaysSuccess, Some(init)) => json!({
                "ResponseCode": "00",
                "OrderStatus": "2",
                "ResponseMessage": "Approved",
                "Amount": init.amount,
                "DepositedAmount": init.amount,
                "Currency": init.currency,
                "OrderID": init.order_id
            }),
            _ => json!({
                "ResponseCode": "01",
                "OrderStatus": "6",
                "ResponseMessage": "mock decline"
            }),
        };
        Ok(serde_json::from_value(body)?)
    }
}
