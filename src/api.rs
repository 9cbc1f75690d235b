//! HTTP server: the LINE webhook endpoint plus a health check.

use crate::gateway::Gateway;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use mbot_channels::line::{parse_webhook, verify_signature, SIGNATURE_HEADER};
use mbot_core::config::ApiConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    gateway: Arc<Gateway>,
    /// Channel secret for signature checks. `None` = accept unsigned requests.
    channel_secret: Option<String>,
    uptime: Instant,
}

impl ApiState {
    pub fn new(gateway: Arc<Gateway>, channel_secret: &str) -> Self {
        Self {
            gateway,
            channel_secret: (!channel_secret.is_empty()).then(|| channel_secret.to_string()),
            uptime: Instant::now(),
        }
    }
}

/// Check the LINE signature. Returns `None` if valid, `Some(response)` if rejected.
fn check_signature(
    headers: &HeaderMap,
    body: &[u8],
    secret: &Option<String>,
) -> Option<(StatusCode, Json<Value>)> {
    let secret = secret.as_ref()?;

    let Some(header) = headers.get(SIGNATURE_HEADER) else {
        return Some((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": format!("missing {SIGNATURE_HEADER} header")})),
        ));
    };

    match header.to_str() {
        Ok(signature) if verify_signature(secret, body, signature) => None,
        _ => Some((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid signature"})),
        )),
    }
}

/// `GET /api/health`: health check with uptime.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "channels": state.gateway.channel_names(),
    }))
}

/// `POST /webhook`: receive a batch of LINE events.
///
/// Events are handled concurrently and independently; the response reports
/// an error if any of them could not be stored or answered.
async fn webhook(
    headers: HeaderMap,
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    if let Some(err) = check_signature(&headers, &body, &state.channel_secret) {
        warn!("webhook rejected: bad or missing signature");
        return Err(err);
    }

    let events = parse_webhook(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("invalid request: {e}")})),
        )
    })?;

    let report = state.gateway.handle_batch(events).await;

    if report.failed > 0 {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "handled": report.handled,
                "failed": report.failed,
            })),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "handled": report.handled,
        })),
    ))
}

/// Build the axum router with shared state.
fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/webhook", post(webhook))
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Run the server until Ctrl-C.
pub async fn serve(config: &ApiConfig, state: ApiState) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!("Webhook server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
