pub mod config;
pub mod domain {
    pub mod bank;
    pub mod callback;
    pub mod error;
    pub mod order;
    pub(crate) mod serde_util;
    pub mod settlement;
    pub mod verification;
}
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod callback;
        pub mod ops;
        pub mod orders;
        pub mod settlements;
    }
    pub mod middleware {
        pub mod admin_auth;
        pub mod rate_limit;
    }
    pub mod router;
}
pub mod ledger;
pub mod service {
    pub mod bridge_service;
    pub mod settlement;
    pub mod settlement_retrier;
}
pub mod store;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub bridge: service::bridge_service::BridgeService,
    pub ledger: Arc<dyn ledger::SettlementLedger>,
    pub redis_client: Option<redis::Client>,
}
