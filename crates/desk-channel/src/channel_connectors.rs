//! Connector entrypoints feeding inbound signals into the dialogue runtime.
//!
//! Supports Bot API long-polling with in-memory offset tracking, or an axum
//! webhook listener with an optional secret-token check. The tracker's
//! comment webhook is accepted on a separate route in either mode.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc::Sender;

use crate::channel_contract::ChannelInboundEvent;
use crate::channel_ingress::parse_channel_update_value;
use crate::channel_outbound::ChannelClient;

pub const TELEGRAM_SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";
pub const TRACKER_COMMENT_WEBHOOK_EVENT: &str = "comment_created";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `ChannelConnectorMode` values.
pub enum ChannelConnectorMode {
    Polling,
    Webhook,
}

impl ChannelConnectorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Polling => "polling",
            Self::Webhook => "webhook",
        }
    }

    pub fn is_webhook(self) -> bool {
        matches!(self, Self::Webhook)
    }
}

#[derive(Debug, Clone)]
/// Connector settings shared by the polling loop and the webhook listener.
pub struct ChannelConnectorConfig {
    pub mode: ChannelConnectorMode,
    pub webhook_bind: String,
    pub webhook_secret: Option<String>,
    pub poll_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ChannelConnectorConfig {
    fn default() -> Self {
        Self {
            mode: ChannelConnectorMode::Polling,
            webhook_bind: "127.0.0.1:8085".to_string(),
            webhook_secret: None,
            poll_timeout_secs: 25,
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A new-comment notification pushed by the issue tracker.
pub struct TrackerCommentEvent {
    pub ticket_id: String,
    pub comment_body: String,
}

#[derive(Debug, Clone, PartialEq)]
/// Inbound work item for the runtime loop.
pub enum InboundSignal {
    Chat(ChannelInboundEvent),
    TrackerComment(TrackerCommentEvent),
}

/// Fetches one poll batch and normalizes it, returning events plus the next
/// update offset. Malformed updates are logged and skipped so one bad payload
/// cannot stall the cycle.
pub async fn poll_channel_updates(
    client: &ChannelClient,
    offset: u64,
    poll_timeout_secs: u64,
) -> Result<(Vec<ChannelInboundEvent>, u64)> {
    let updates = client.get_updates(offset, poll_timeout_secs).await?;
    let mut events = Vec::with_capacity(updates.len());
    let mut next_offset = offset;
    for update in &updates {
        let update_id = update.get("update_id").and_then(Value::as_u64).unwrap_or(0);
        if update_id > 0 {
            next_offset = next_offset.max(update_id.saturating_add(1));
        }
        match parse_channel_update_value(update) {
            Ok(event) => events.push(event),
            Err(error) => {
                tracing::warn!(
                    reason_code = error.code.as_str(),
                    update_id,
                    "skipping malformed update: {}",
                    error.message
                );
            }
        }
    }
    Ok((events, next_offset))
}

/// Extracts a tracker comment event from a webhook payload, returning `None`
/// for event types this bot does not relay.
pub fn parse_tracker_comment_webhook(payload: &Value) -> Option<TrackerCommentEvent> {
    let event_name = payload
        .get("webhookEvent")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if event_name != TRACKER_COMMENT_WEBHOOK_EVENT {
        return None;
    }
    let ticket_id = payload
        .get("issue")
        .and_then(|issue| issue.get("key"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())?
        .to_string();
    let comment_body = payload
        .get("comment")
        .and_then(|comment| comment.get("body"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(TrackerCommentEvent {
        ticket_id,
        comment_body,
    })
}

#[derive(Debug, Clone)]
/// Shared state for the webhook routes. The Telegram route stays mounted in
/// polling mode but answers 404, so the tracker route can be served alone.
pub struct ChannelWebhookState {
    pub telegram_enabled: bool,
    pub telegram_secret: Option<String>,
    pub sender: Sender<InboundSignal>,
}

pub fn build_channel_webhook_router(state: Arc<ChannelWebhookState>) -> Router {
    Router::new()
        .route("/webhooks/telegram", post(handle_telegram_webhook))
        .route("/webhooks/tracker", post(handle_tracker_webhook))
        .route("/healthz", get(handle_webhook_health))
        .with_state(state)
}

pub async fn run_webhook_listener(bind: &str, state: Arc<ChannelWebhookState>) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve webhook bound address")?;
    tracing::info!(addr = %local_addr, "channel webhook listener started");
    let app = build_channel_webhook_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("channel webhook listener exited unexpectedly")?;
    Ok(())
}

async fn handle_webhook_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status":"ok"})))
}

async fn handle_telegram_webhook(
    State(state): State<Arc<ChannelWebhookState>>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    if !state.telegram_enabled {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error":{"code":"connector_disabled","message":"telegram webhook connector mode is disabled"}})),
        );
    }
    if let Some(expected_secret) = state.telegram_secret.as_deref() {
        let observed = headers
            .get(TELEGRAM_SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .unwrap_or("");
        if observed != expected_secret.trim() {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error":{"code":"auth_failed","message":"invalid webhook secret"}})),
            );
        }
    }
    let payload = match serde_json::from_str::<Value>(body.as_str()) {
        Ok(payload) => payload,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error":{"code":"invalid_json","message":error.to_string()}})),
            );
        }
    };
    match crate::channel_ingress::parse_channel_update_value(&payload) {
        Ok(event) => {
            if state.sender.send(InboundSignal::Chat(event)).await.is_err() {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error":{"code":"runtime_closed","message":"runtime loop is not accepting events"}})),
                );
            }
            (StatusCode::OK, Json(json!({"status":"accepted"})))
        }
        Err(error) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error":{"code":error.code.as_str(),"message":error.message}})),
        ),
    }
}

async fn handle_tracker_webhook(
    State(state): State<Arc<ChannelWebhookState>>,
    body: String,
) -> impl IntoResponse {
    let payload = match serde_json::from_str::<Value>(body.as_str()) {
        Ok(payload) => payload,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error":{"code":"invalid_json","message":error.to_string()}})),
            );
        }
    };
    match parse_tracker_comment_webhook(&payload) {
        Some(event) => {
            if state
                .sender
                .send(InboundSignal::TrackerComment(event))
                .await
                .is_err()
            {
                return (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error":{"code":"runtime_closed","message":"runtime loop is not accepting events"}})),
                );
            }
            (StatusCode::OK, Json(json!({"status":"accepted"})))
        }
        None => (
            StatusCode::OK,
            Json(json!({"status":"ignored"})),
        ),
    }
}
