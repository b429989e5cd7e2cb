use crate::domain::bank::{InitPaymentResponse, PaymentDetails, PaymentInit};
use anyhow::Result;

pub mod ameria;
pub mod mock;

// `Err` means the call itself failed; a bank-side rejection is an `Ok` with a non-success code.
#[async_trait::async_trait]
pub trait BankGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn init_payment(&self, init: &PaymentInit) -> Result<InitPaymentResponse>;

    async fn payment_details(&self, payment_id: &str) -> Result<PaymentDetails>;
}
