use crate::config::AppConfig;
use crate::http::handlers::{callback, ops, orders, settlements};
use crate::http::middleware::{admin_auth, rate_limit};
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

pub fn build_router(state: AppState, cfg: &AppConfig) -> Router {
    // Store webhooks stay outside the limiter; a 429 there only triggers redelivery.
    let mut customer_facing = Router::new()
        .route("/api/pay", post(orders::pay))
        .route("/api/callback", get(callback::callback));

    if let Some(redis_client) = state.redis_client.clone() {
        customer_facing = customer_facing.layer(from_fn_with_state(
            rate_limit::RateLimitState {
                redis_client,
                max_per_minute: cfg.rate_limit_per_minute,
            },
            rate_limit::enforce,
        ));
    }

    let mut app = Router::new()
        .route("/health", get(ops::health))
        .route("/ops/liveness", get(ops::liveness))
        .route("/ops/readiness", get(ops::readiness))
        .route("/api/order-created", post(orders::order_created))
        .merge(customer_facing);

    if let Some(admin_key) = cfg.internal_api_key.clone() {
        let admin_routes = Router::new()
            .route(
                "/admin/settlements/:payment_id",
                get(settlements::get_settlement),
            )
            .route(
                "/admin/settlements/:payment_id/retry",
                post(settlements::retry_settlement),
            )
            .layer(from_fn_with_state(
                admin_key,
                admin_auth::require_internal_api_key,
            ));
        app = app.merge(admin_routes);
    }

    app.with_state(state)
}
