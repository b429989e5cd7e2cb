use crate::config::AppConfig;
use crate::domain::bank::{InitResponseCode, PaymentInit};
use crate::domain::callback::CallbackQuery;
use crate::domain::order::{resolve_currency, OrderEvent, PayRequest};
use crate::domain::verification::{assess, Verification};
use crate::gateways::BankGateway;
use crate::service::settlement::{SettlementOutcome, Settler};
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    GatewayNotAllowed(String),
    AlreadySettled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedPayment {
    pub order_id: String,
    pub payment_id: String,
    pub pay_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initiation {
    Initiated(InitiatedPayment),
    Rejected { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    Ignored(IgnoreReason),
    Processed(Initiation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    MissingParams,
    Paid {
        order_id: String,
        settlement: SettlementOutcome,
    },
    Failed {
        reason: String,
    },
}

#[derive(Clone)]
pub struct BridgeService {
    pub cfg: Arc<AppConfig>,
    pub bank: Arc<dyn BankGateway>,
    pub settler: Settler,
}

impl BridgeService {
    pub async fn intake_order(&self, order: &OrderEvent) -> Result<IntakeOutcome> {
        info!(order_id = %order.id, "order received");

        let gateway = order.gateway_label();
        if !self.cfg.gateway_allowed(gateway) {
            info!(order_id = %order.id, gateway, "ignored: gateway not handled by this bridge");
            return Ok(IntakeOutcome::Ignored(IgnoreReason::GatewayNotAllowed(
                gateway.to_string(),
            )));
        }
        if order.financial_status.is_settled() {
            info!(order_id = %order.id, "ignored: already paid");
            return Ok(IntakeOutcome::Ignored(IgnoreReason::AlreadySettled));
        }

        let initiation = self
            .initiate(
                &order.id,
                order.total_price,
                order.currency.as_deref(),
                order.description(),
            )
            .await?;
        Ok(IntakeOutcome::Processed(initiation))
    }

    pub async fn direct_pay(&self, req: &PayRequest) -> Result<Initiation> {
        let description = req
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Order #{}", req.order_id.trim_start_matches('#')));
        self.initiate(&req.order_id, req.amount, req.currency.as_deref(), description)
            .await
    }

    async fn initiate(
        &self,
        order_id: &str,
        amount: Decimal,
        currency: Option<&str>,
        description: String,
    ) -> Result<Initiation> {
        if order_id.trim().is_empty() {
            return Ok(rejected(order_id, "order id is required".to_string()));
        }
        if amount <= Decimal::ZERO {
            return Ok(rejected(order_id, "amount must be > 0".to_string()));
        }
        let Some(currency) = resolve_currency(currency, &self.cfg.default_currency) else {
            return Ok(rejected(
                order_id,
                format!("unsupported currency {}", currency.unwrap_or_default()),
            ));
        };

        let init = PaymentInit {
            order_id: order_id.to_string(),
            amount,
            currency,
            description,
            back_url: self.cfg.callback_url(order_id)?,
        };
        let resp = self.bank.init_payment(&init).await?;

        let message = resp
            .response_message
            .clone()
            .unwrap_or_else(|| "payment initialization failed".to_string());
        match (resp.response_code, resp.payment_id) {
            (InitResponseCode::Success, Some(payment_id)) if !payment_id.trim().is_empty() => {
                let pay_url = self.cfg.pay_url(&payment_id)?;
                info!(order_id, payment_id = %payment_id, pay_url = %pay_url, "payment link ready");
                Ok(Initiation::Initiated(InitiatedPayment {
                    order_id: order_id.to_string(),
                    payment_id,
                    pay_url,
                }))
            }
            (InitResponseCode::Success, _) => {
                Ok(rejected(order_id, "bank returned no payment id".to_string()))
            }
            (InitResponseCode::Other(code), _) => {
                error!(order_id, code, message = %message, "bank init failed");
                Ok(Initiation::Rejected { message })
            }
        }
    }

    pub async fn handle_callback(&self, query: &CallbackQuery) -> Result<CallbackOutcome> {
        let (Some(payment_id), Some(order_id)) = (query.payment_id(), query.correlation_id())
        else {
            warn!("callback without paymentID or order id");
            return Ok(CallbackOutcome::MissingParams);
        };
        info!(
            payment_id,
            order_id,
            claimed_code = query.response_code.as_deref().unwrap_or(""),
            "callback received"
        );

        let details = self.bank.payment_details(payment_id).await?;
        let verified = match assess(&details, payment_id, order_id) {
            Verification::Verified(v) => v,
            Verification::Rejected { reason } => {
                warn!(payment_id, order_id, reason = %reason, "payment not verified");
                return Ok(CallbackOutcome::Failed { reason });
            }
        };

        info!(
            payment_id,
            order_id,
            amount = ?verified.amount(),
            currency = details.currency.as_deref().unwrap_or(""),
            "payment verified by bank"
        );

        let settlement = match self.settler.settle(&verified).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    payment_id,
                    order_id,
                    error = %e,
                    "verified payment could not be recorded; manual reconciliation required"
                );
                SettlementOutcome::Unrecorded
            }
        };

        Ok(CallbackOutcome::Paid {
            order_id: order_id.to_string(),
            settlement,
        })
    }
}

fn rejected(order_id: &str, message: String) -> Initiation {
    warn!(order_id, message = %message, "payment not initiated");
    Initiation::Rejected { message }
}
