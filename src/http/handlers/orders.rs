use crate::domain::error::err;
use crate::domain::order::{OrderEvent, PayRequest, PayResponse};
use crate::service::bridge_service::{IgnoreReason, Initiation, IntakeOutcome};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

// Store `orders/create` webhook. Anything short of a transport failure is acknowledged
// with 200 so the store does not redeliver.
pub async fn order_created(
    State(state): State<AppState>,
    body: Result<Json<OrderEvent>, JsonRejection>,
) -> impl IntoResponse {
    let Json(order) = match body {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("unreadable order webhook: {}", e.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(err("INVALID_ORDER", &e.body_text())),
            )
                .into_response();
        }
    };

    match state.bridge.intake_order(&order).await {
        Ok(IntakeOutcome::Ignored(IgnoreReason::GatewayNotAllowed(_))) => {
            (StatusCode::OK, "Ignored: Not an Ameria order").into_response()
        }
        Ok(IntakeOutcome::Ignored(IgnoreReason::AlreadySettled)) => {
            (StatusCode::OK, "Ignored: Already paid").into_response()
        }
        Ok(IntakeOutcome::Processed(_)) => (StatusCode::OK, "Webhook received").into_response(),
        Err(e) => {
            tracing::error!(order_id = %order.id, "error processing order: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
        }
    }
}

pub async fn pay(
    State(state): State<AppState>,
    body: Result<Json<PayRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match body {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(err("INVALID_REQUEST", &e.body_text())),
            )
                .into_response()
        }
    };

    match state.bridge.direct_pay(&req).await {
        Ok(Initiation::Initiated(p)) => (
            StatusCode::OK,
            Json(PayResponse {
                order_id: p.order_id,
                payment_id: p.payment_id,
                payment_url: p.pay_url,
            }),
        )
            .into_response(),
        Ok(Initiation::Rejected { message }) => (
            StatusCode::BAD_REQUEST,
            Json(err("PAYMENT_INIT_REJECTED", &message)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(order_id = %req.order_id, "direct pay failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(err("UPSTREAM_UNAVAILABLE", "payment gateway unavailable")),
            )
                .into_response()
        }
    }
}
