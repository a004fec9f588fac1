//! Comms subsystem: manages the external I/O channels.
//!
//! Each channel (PTY console, axum HTTP) implements [`Component`] and is
//! spawned as an independent task by [`start`]. Channels capture their
//! shared [`Arc<CommsState>`] at construction time.
//!
//! An intra-subsystem [`mpsc`] channel carries lifecycle events from the
//! channels to a short-lived drain task that dies once every channel has
//! dropped its sender.

#[cfg(feature = "channel-axum")]
pub mod axum_channel;
#[cfg(feature = "channel-pty")]
pub mod pty;
mod state;

pub use state::{CommsEvent, CommsState, CorpusStats};

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::subsystems::runtime::{Component, SubsystemHandle, spawn_components};
use crate::supervisor::bus::BusHandle;

/// Spawn all configured comms channels and return a [`SubsystemHandle`].
///
/// Synchronous: returns as soon as the tasks are spawned. The handle
/// resolves when all channels have exited.
pub fn start(config: &Config, bus: BusHandle, shutdown: CancellationToken) -> SubsystemHandle {
    let (event_tx, event_rx) = mpsc::channel::<CommsEvent>(32);
    let state = Arc::new(CommsState::new(bus, event_tx));

    let mut components: Vec<Box<dyn Component>> = Vec::new();

    #[cfg(feature = "channel-pty")]
    {
        if config.comms_pty_should_load() {
            info!("loading pty channel");
            components.push(Box::new(pty::PtyChannel::new("pty0", &config.bot_name, state.clone())));
        }
    }

    #[cfg(feature = "channel-axum")]
    {
        if config.comms_http_should_load() {
            info!(bind = %config.comms.http.bind, "loading axum channel");
            components.push(Box::new(axum_channel::AxumChannel::new(
                "http0",
                config.comms.http.bind.clone(),
                state.clone(),
            )));
        }
    }

    if components.is_empty() {
        info!("no comms channels configured");
    }

    // Monitoring only; does not affect lifecycle.
    tokio::spawn(async move {
        let mut rx = event_rx;
        while let Some(event) = rx.recv().await {
            match event {
                CommsEvent::ChannelShutdown { ref channel_id } => {
                    debug!(channel_id, "channel reported shutdown");
                }
                CommsEvent::SessionStarted { ref channel_id, ref session_id } => {
                    debug!(channel_id, session_id, "chat session started");
                }
            }
        }
    });

    drop(state);
    spawn_components(components, shutdown)
}
