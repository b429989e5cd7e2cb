use payment_bridge::config::{AdapterMode, AppConfig};
use payment_bridge::gateways::ameria::AmeriaGateway;
use payment_bridge::gateways::mock::{MockBank, MockBehavior};
use payment_bridge::gateways::BankGateway;
use payment_bridge::http::router::build_router;
use payment_bridge::ledger::memory::InMemoryLedger;
use payment_bridge::ledger::postgres::PgSettlementLedger;
use payment_bridge::ledger::SettlementLedger;
use payment_bridge::service::bridge_service::BridgeService;
use payment_bridge::service::settlement::Settler;
use payment_bridge::service::settlement_retrier::SettlementRetrier;
use payment_bridge::store::mock::MockStore;
use payment_bridge::store::shopify::ShopifyClient;
use payment_bridge::store::StoreClient;
use payment_bridge::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = Arc::new(AppConfig::from_env());
    let client = reqwest::Client::new();

    let bank: Arc<dyn BankGateway> = match cfg.bank_mode {
        AdapterMode::Live => Arc::new(AmeriaGateway::new(
            &cfg.bank,
            cfg.outbound_timeout(),
            client.clone(),
        )),
        AdapterMode::Mock => Arc::new(MockBank::new(MockBehavior::parse(
            &std::env::var("MOCK_BANK_BEHAVIOR").unwrap_or_default(),
        ))),
    };
    let store: Arc<dyn StoreClient> = match cfg.store_mode {
        AdapterMode::Live => Arc::new(ShopifyClient::new(
            &cfg.store,
            cfg.outbound_timeout(),
            client.clone(),
        )),
        AdapterMode::Mock => Arc::new(MockStore::new()),
    };

    let ledger: Arc<dyn SettlementLedger> = match &cfg.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgSettlementLedger { pool })
        }
        None => {
            tracing::warn!("DATABASE_URL not set; settlement ledger is in-memory (single instance only)");
            Arc::new(InMemoryLedger::new())
        }
    };

    let redis_client = match &cfg.redis_url {
        Some(url) => Some(redis::Client::open(url.as_str())?),
        None => None,
    };

    let settler = Settler {
        store,
        ledger: ledger.clone(),
        cfg: cfg.settlement.clone(),
    };

    let retrier = SettlementRetrier {
        settler: settler.clone(),
        batch_size: 50,
        poll_interval: cfg.settlement.poll_interval,
    };
    tokio::spawn(retrier.run());

    let state = AppState {
        bridge: BridgeService {
            cfg: cfg.clone(),
            bank,
            settler,
        },
        ledger,
        redis_client,
    };

    let app = build_router(state, &cfg);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
