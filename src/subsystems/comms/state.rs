//! Shared state for the Comms subsystem: capability boundary for channels.
//!
//! Channels receive an `Arc<CommsState>` and are restricted to the typed
//! methods below. The raw [`BusHandle`] is private.
//!
//! # Intra-subsystem events
//!
//! [`CommsState::report_event`] lets a running channel signal the comms
//! manager ("I shut down", "new session started") without going through the
//! supervisor bus.

use tokio::sync::mpsc;
use tracing::warn;

use crate::corpus::Hadith;
use crate::error::AppError;
use crate::supervisor::bus::{BusHandle, BusReply, BusRequest};

/// Events a channel sends back to the comms subsystem manager.
#[derive(Debug)]
pub enum CommsEvent {
    /// Channel has stopped (clean exit or EOF).
    ChannelShutdown { channel_id: String },
    /// A new chat session was established on the channel.
    SessionStarted { channel_id: String, session_id: String },
}

/// Corpus counters for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    pub hadiths: usize,
    pub knowledge_entries: usize,
}

/// Shared state passed as `Arc<CommsState>` to every channel task.
pub struct CommsState {
    bus: BusHandle,
    event_tx: mpsc::Sender<CommsEvent>,
}

impl CommsState {
    pub fn new(bus: BusHandle, event_tx: mpsc::Sender<CommsEvent>) -> Self {
        Self { bus, event_tx }
    }

    /// Send a line of user text and await the resolved reply.
    ///
    /// `Ok(None)` means nothing matched; the channel decides how to present
    /// the fallback.
    pub async fn send_message(
        &self,
        channel_id: &str,
        session_id: Option<String>,
        content: String,
    ) -> Result<Option<String>, AppError> {
        let request = BusRequest::Message {
            channel_id: channel_id.to_string(),
            session_id,
            content,
        };
        match self.request(request).await? {
            BusReply::Message { reply } => Ok(reply),
            _ => Err(AppError::Comms("unexpected reply payload".to_string())),
        }
    }

    pub async fn random_hadith(&self) -> Result<Option<Hadith>, AppError> {
        match self.request(BusRequest::RandomHadith).await? {
            BusReply::Hadith { hadith } => Ok(hadith),
            _ => Err(AppError::Comms("unexpected reply payload".to_string())),
        }
    }

    pub async fn hadith_by_number(&self, number: u64) -> Result<Option<Hadith>, AppError> {
        match self.request(BusRequest::HadithByNumber { number }).await? {
            BusReply::Hadith { hadith } => Ok(hadith),
            _ => Err(AppError::Comms("unexpected reply payload".to_string())),
        }
    }

    pub async fn stats(&self) -> Result<CorpusStats, AppError> {
        match self.request(BusRequest::Stats).await? {
            BusReply::Stats { hadiths, knowledge_entries } => {
                Ok(CorpusStats { hadiths, knowledge_entries })
            }
            _ => Err(AppError::Comms("unexpected reply payload".to_string())),
        }
    }

    async fn request(&self, request: BusRequest) -> Result<BusReply, AppError> {
        self.bus
            .request(request)
            .await
            .map_err(|e| AppError::Comms(format!("bus error: {e}")))
    }

    /// Report an event to the comms subsystem manager.
    ///
    /// Non-blocking: drops the event and logs a warning if the manager is not
    /// keeping up or has already exited.
    pub fn report_event(&self, event: CommsEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("comms event dropped: {e}");
        }
    }
}
