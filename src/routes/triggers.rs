use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::Instrument;

use crate::error::AppError;
use crate::services::notifications::DispatchOutcome;
use crate::services::triggers::{TriggerHeaders, TriggerVerifier};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/friend-requests", post(handle_friend_request_created))
        .route("/debt-records", post(handle_debt_record_created))
}

/// Verify the trigger and decode its body. A body that is not JSON becomes
/// `Null` and is reported by the dispatcher as a malformed event.
fn verified_document(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(TriggerHeaders, Value), AppError> {
    let trigger = TriggerVerifier::extract_headers(headers)?;
    TriggerVerifier::verify_signature(
        &state.config.trigger,
        &trigger,
        body,
        chrono::Utc::now(),
    )?;

    let doc = serde_json::from_slice(body).unwrap_or_else(|e| {
        tracing::info!("Trigger {} body is not JSON: {}", trigger.event_id, e);
        Value::Null
    });
    Ok((trigger, doc))
}

async fn handle_friend_request_created(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<DispatchOutcome>), AppError> {
    let (trigger, doc) = verified_document(&state, &headers, &body)?;

    let span = tracing::info_span!("friend_request_trigger", event_id = %trigger.event_id);
    let outcome = state
        .dispatcher
        .handle_friend_request_document(&doc)
        .instrument(span)
        .await;

    Ok((StatusCode::OK, Json(outcome)))
}

async fn handle_debt_record_created(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<DispatchOutcome>), AppError> {
    let (trigger, doc) = verified_document(&state, &headers, &body)?;

    let span = tracing::info_span!("debt_record_trigger", event_id = %trigger.event_id);
    let outcome = state
        .dispatcher
        .handle_debt_record_document(&doc)
        .instrument(span)
        .await;

    Ok((StatusCode::OK, Json(outcome)))
}
