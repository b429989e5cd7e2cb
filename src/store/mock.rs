use crate::store::StoreClient;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCapture {
    pub order_id: String,
    pub amount: Option<Decimal>,
}

#[derive(Clone, Default)]
pub struct MockStore {
    captures: Arc<Mutex<Vec<RecordedCapture>>>,
    attempts: Arc<AtomicUsize>,
    fail_first: usize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(fail_first: usize) -> Self {
        Self {
            fail_first,
            ..Self::default()
        }
    }

    pub fn captures(&self) -> Vec<RecordedCapture> {
        self.captures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StoreClient for MockStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn capture(&self, order_id: &str, amount: Option<Decimal>) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first {
            anyhow::bail!("mock store rejected capture for order {order_id}");
        }
        self.captures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCapture {
                order_id: order_id.to_string(),
                amount,
            });
        Ok(())
    }
}
