use crate::domain::callback::CallbackQuery;
use crate::service::bridge_service::CallbackOutcome;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};

pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> impl IntoResponse {
    match state.bridge.handle_callback(&query).await {
        Ok(CallbackOutcome::MissingParams) => {
            (StatusCode::BAD_REQUEST, "Missing paymentID or order id").into_response()
        }
        Ok(CallbackOutcome::Paid { settlement, .. }) if settlement.is_confirmed() => (
            StatusCode::OK,
            page("Payment Successful! Your order is confirmed."),
        )
            .into_response(),
        Ok(CallbackOutcome::Paid { .. }) => (
            StatusCode::OK,
            page("Payment received. Your order confirmation is being processed."),
        )
            .into_response(),
        Ok(CallbackOutcome::Failed { reason }) => {
            (StatusCode::OK, failure_page(&reason)).into_response()
        }
        Err(e) => {
            tracing::error!("callback failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error verifying payment").into_response()
        }
    }
}

fn failure_page(reason: &str) -> Html<String> {
    page(&format!(
        "Payment Failed or Pending. Message: {}",
        html_escape::encode_text(reason)
    ))
}

fn page(headline: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Payment</title></head><body><h1>{headline}</h1></body></html>"
    ))
}
