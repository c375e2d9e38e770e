//! Gateway HTTP server (single port): health probe plus the Messenger webhook.

use crate::channels::{ChannelHandle, MessengerChannel, WebhookPayload, PAGE_OBJECT};
use crate::config::{self, Config};
use crate::gateway::protocol::{StatusBody, VerifyParams};
use crate::gateway::webhook::{dispatch_payload, verify_subscription};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway (config, verify token, outbound channel).
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<Config>,
    /// Expected `hub.verify_token`. None refuses every handshake.
    pub verify_token: Option<String>,
    /// Connector that delivers replies (the Send API in production).
    pub channel: Arc<dyn ChannelHandle>,
}

impl GatewayState {
    pub fn new(config: Config, channel: Arc<dyn ChannelHandle>) -> Self {
        let verify_token = config::resolve_verify_token(&config);
        Self {
            config: Arc::new(config),
            verify_token,
            channel,
        }
    }
}

/// Routes: `GET /` health, `GET /webhook` handshake, `POST /webhook` events.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .with_state(state)
}

/// Run the gateway server; binds to config.server.bind:config.server.port.
/// Fails when no page access token is configured (PAGE_ACCESS_TOKEN or messenger.pageAccessToken).
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_gateway(config: Config) -> Result<()> {
    let Some(access_token) = config::resolve_page_access_token(&config) else {
        anyhow::bail!(
            "page access token not configured (set PAGE_ACCESS_TOKEN or messenger.pageAccessToken)"
        );
    };
    let messenger = Arc::new(MessengerChannel::new(&config.messenger, access_token));
    log::info!("messenger send api: {}", messenger.send_api_url());

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let state = GatewayState::new(config, messenger);
    if state.verify_token.is_none() {
        log::warn!(
            "no verify token configured (MESSENGER_VERIFY_TOKEN or messenger.verifyToken); webhook handshakes will be refused"
        );
    }
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET /webhook — subscription handshake; echoes `hub.challenge` or 403.
/// An unparseable query (e.g. a repeated `hub.*` key) is refused like any other mismatch.
async fn verify_webhook(
    State(state): State<GatewayState>,
    params: Result<Query<VerifyParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            log::debug!("webhook verification query rejected: {}", e);
            return StatusCode::FORBIDDEN.into_response();
        }
    };
    match verify_subscription(&params, state.verify_token.as_deref()) {
        Ok(challenge) => {
            log::info!("webhook verified");
            (StatusCode::OK, challenge).into_response()
        }
        Err(e) => {
            log::debug!("{} (mode {:?})", e, params.mode);
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST /webhook — page events. 404 for non-page objects, 400 for malformed bodies.
/// Replies are sent before the acknowledgement is returned.
async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> Response {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            log::debug!("webhook: body is not json: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    if value.get("object").and_then(|o| o.as_str()) != Some(PAGE_OBJECT) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let payload: WebhookPayload = match serde_json::from_value(value) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("webhook: malformed page payload: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let sent = dispatch_payload(&payload, state.channel.as_ref()).await;
    log::debug!(
        "webhook: {} entr(y/ies), {} repl(y/ies) sent",
        payload.entry.len(),
        sent
    );
    Json(StatusBody::ok()).into_response()
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.config.server.port,
    }))
}
