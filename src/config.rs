use reqwest::Url;
use std::time::Duration;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub bank: BankConfig,
    pub store: StoreConfig,
    pub host_url: String,
    pub default_currency: String,
    pub allowed_gateways: Vec<String>,
    pub outbound_timeout_ms: u64,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub rate_limit_per_minute: i64,
    pub internal_api_key: Option<String>,
    pub settlement: SettlementConfig,
    pub bank_mode: AdapterMode,
    pub store_mode: AdapterMode,
}

#[derive(Clone)]
pub struct BankConfig {
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub api_url: String,
    pub pay_page: String,
    pub pay_page_lang: String,
}

#[derive(Clone)]
pub struct StoreConfig {
    pub api_base: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct SettlementConfig {
    pub max_attempts: i32,
    pub retry_interval: Duration,
    pub lease: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterMode {
    Live,
    Mock,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
            format!("0.0.0.0:{port}")
        });

        let store_api_base = std::env::var("STORE_API_BASE").unwrap_or_else(|_| {
            let domain = std::env::var("SHOP_DOMAIN").unwrap_or_default();
            let version =
                std::env::var("SHOPIFY_API_VERSION").unwrap_or_else(|_| "2024-01".to_string());
            format!("https://{domain}/admin/api/{version}")
        });

        Self {
            bind_addr,
            bank: BankConfig {
                client_id: std::env::var("AMERIA_CLIENT_ID").unwrap_or_default(),
                username: std::env::var("AMERIA_USERNAME").unwrap_or_default(),
                password: std::env::var("AMERIA_PASSWORD").unwrap_or_default(),
                api_url: std::env::var("AMERIA_API_URL").unwrap_or_else(|_| {
                    "https://servicestest.ameriabank.am/VPOS/api/VPOS".to_string()
                }),
                pay_page: std::env::var("AMERIA_PAY_PAGE").unwrap_or_else(|_| {
                    "https://servicestest.ameriabank.am/VPOS/Payments/Pay".to_string()
                }),
                pay_page_lang: std::env::var("PAY_PAGE_LANG").unwrap_or_else(|_| "en".to_string()),
            },
            store: StoreConfig {
                api_base: store_api_base,
                access_token: std::env::var("SHOPIFY_ACCESS_TOKEN").unwrap_or_default(),
            },
            host_url: std::env::var("HOST_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            default_currency: std::env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "051".to_string()),
            allowed_gateways: parse_list(
                &std::env::var("ALLOWED_GATEWAYS")
                    .unwrap_or_else(|_| "manual,Credit Card (Ameriabank)".to_string()),
            ),
            outbound_timeout_ms: env_parse("OUTBOUND_TIMEOUT_MS", 10_000),
            database_url: non_empty_env("DATABASE_URL"),
            redis_url: non_empty_env("REDIS_URL"),
            rate_limit_per_minute: env_parse("RATE_LIMIT_PER_MINUTE", 120),
            internal_api_key: non_empty_env("INTERNAL_API_KEY"),
            settlement: SettlementConfig {
                max_attempts: env_parse("SETTLEMENT_MAX_ATTEMPTS", 5),
                retry_interval: Duration::from_secs(env_parse("SETTLEMENT_RETRY_SECS", 60)),
                lease: Duration::from_secs(env_parse("SETTLEMENT_LEASE_SECS", 120)),
                poll_interval: Duration::from_secs(env_parse("SETTLEMENT_POLL_SECS", 10)),
            },
            bank_mode: AdapterMode::parse(&std::env::var("BANK_MODE").unwrap_or_default()),
            store_mode: AdapterMode::parse(&std::env::var("STORE_MODE").unwrap_or_default()),
        }
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_millis(self.outbound_timeout_ms)
    }

    // The bank appends its own parameters to BackURL, so the order id must stay one encoded pair.
    pub fn callback_url(&self, order_id: &str) -> anyhow::Result<String> {
        let base = format!("{}/api/callback", self.host_url.trim_end_matches('/'));
        let url = Url::parse_with_params(&base, &[("shopify_order_id", order_id)])?;
        Ok(url.into())
    }

    pub fn pay_url(&self, payment_id: &str) -> anyhow::Result<String> {
        let url = Url::parse_with_params(
            &self.bank.pay_page,
            &[("id", payment_id), ("lang", self.bank.pay_page_lang.as_str())],
        )?;
        Ok(url.into())
    }

    pub fn gateway_allowed(&self, gateway: &str) -> bool {
        self.allowed_gateways.iter().any(|g| g == gateway)
    }
}

impl AdapterMode {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("mock") {
            AdapterMode::Mock
        } else {
            AdapterMode::Live
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}
