#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use payment_bridge::config::{AdapterMode, AppConfig, BankConfig, SettlementConfig, StoreConfig};
use payment_bridge::gateways::mock::{MockBank, MockBehavior};
use payment_bridge::http::router::build_router;
use payment_bridge::ledger::memory::InMemoryLedger;
use payment_bridge::service::bridge_service::BridgeService;
use payment_bridge::service::settlement::Settler;
use payment_bridge::store::mock::MockStore;
use payment_bridge::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const PAY_PAGE: &str = "https://servicestest.ameriabank.am/VPOS/Payments/Pay";
pub const ADMIN_KEY: &str = "test-admin-key";

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        bank: BankConfig {
            client_id: "client-id".to_string(),
            username: "bank-user".to_string(),
            password: "bank-pass".to_string(),
            api_url: "http://bank.invalid/VPOS/api/VPOS".to_string(),
            pay_page: PAY_PAGE.to_string(),
            pay_page_lang: "en".to_string(),
        },
        store: StoreConfig {
            api_base: "http://store.invalid/admin/api/2024-01".to_string(),
            access_token: "shpat_test".to_string(),
        },
        host_url: "https://bridge.example.com".to_string(),
        default_currency: "051".to_string(),
        allowed_gateways: vec![
            "manual".to_string(),
            "Credit Card (Ameriabank)".to_string(),
        ],
        outbound_timeout_ms: 1_000,
        database_url: None,
        redis_url: None,
        rate_limit_per_minute: 120,
        internal_api_key: Some(ADMIN_KEY.to_string()),
        settlement: SettlementConfig {
            max_attempts: 3,
            retry_interval: Duration::ZERO,
            lease: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
        },
        bank_mode: AdapterMode::Mock,
        store_mode: AdapterMode::Mock,
    }
}

pub struct Harness {
    pub cfg: Arc<AppConfig>,
    pub bank: MockBank,
    pub store: MockStore,
    pub ledger: InMemoryLedger,
    pub state: AppState,
}

impl Harness {
    pub fn new(bank: MockBank, store: MockStore) -> Self {
        Self::with_config(test_config(), bank, store)
    }

    pub fn approving() -> Self {
        Self::new(
            MockBank::new(MockBehavior::AlwaysSuccess),
            MockStore::new(),
        )
    }

    pub fn with_config(
        cfg: AppConfig,
        bank: MockBank,
        store: MockStore,
    ) -> Self {
        let cfg = Arc::new(cfg);
        let ledger = InMemoryLedger::new();
        let settler = Settler {
            store: Arc::new(store.clone()),
            ledger: Arc::new(ledger.clone()),
            cfg: cfg.settlement.clone(),
        };
        let state = AppState {
            bridge: BridgeService {
                cfg: cfg.clone(),
                bank: Arc::new(bank.clone()),
                settler,
            },
            ledger: Arc::new(ledger.clone()),
            redis_client: None,
        };
        Self {
            cfg,
            bank,
            store,
            ledger,
            state,
        }
    }

    pub fn app(&self) -> Router {
        build_router(self.state.clone(), &self.cfg)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, String) {
        let resp = self.app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }
}
