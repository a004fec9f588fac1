//! Axum-based HTTP channel: the web face of the chat core.
//!
//! Implements [`Component`] so it slots into the comms lifecycle: `run()`
//! drives the axum event loop and the shared [`CancellationToken`] is wired
//! to axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET  /health                  → "OK"
//! GET  /api/health              → corpus counters
//! POST /api/message             → chat turn with session id
//! POST /api/ask                 → one-shot question/answer
//! GET  /api/knowledge           → basic-knowledge questions
//! GET  /api/hadith/random
//! GET  /api/hadith/{number}
//! ```

mod api;

use std::sync::Arc;

use axum::{Router, routing::{get, post}};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::subsystems::runtime::{Component, ComponentFuture};

use super::state::CommsState;

/// Router state injected into every handler. Cheap to clone.
#[derive(Clone)]
pub struct AxumState {
    /// Channel identifier used in log fields and bus requests.
    pub channel_id: Arc<str>,
    pub comms: Arc<CommsState>,
}

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    state: Arc<CommsState>,
}

impl AxumChannel {
    pub fn new(
        channel_id: impl Into<String>,
        bind_addr: impl Into<String>,
        state: Arc<CommsState>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            state,
        }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(self.channel_id, self.bind_addr, self.state, shutdown))
    }
}

async fn run_axum(
    channel_id: String,
    bind_addr: String,
    comms: Arc<CommsState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(AxumState {
        channel_id: Arc::from(channel_id.as_str()),
        comms: comms.clone(),
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("axum bind failed on {bind_addr}: {e}")))?;

    info!(%channel_id, %bind_addr, "axum channel listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

    info!(%channel_id, "axum channel shut down");
    comms.report_event(super::CommsEvent::ChannelShutdown { channel_id });
    Ok(())
}

pub fn build_router(state: AxumState) -> Router {
    Router::new()
        .route("/health",               get(|| async { "OK" }))
        .route("/api/health",           get(api::health))
        .route("/api/message",          post(api::message))
        .route("/api/ask",              post(api::ask))
        .route("/api/knowledge",        get(api::knowledge))
        .route("/api/hadith/random",    get(api::random_hadith))
        .route("/api/hadith/{number}",  get(api::hadith_by_number))
        .with_state(state)
}
