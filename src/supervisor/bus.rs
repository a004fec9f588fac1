//! Supervisor event bus: request/reply between comms channels and the
//! supervisor task.
//!
//! Channels hold a cloneable [`BusHandle`]; each request carries a oneshot
//! reply slot that the supervisor resolves exactly once.

use std::{error::Error, fmt};

use tokio::sync::{mpsc, oneshot};

use crate::corpus::Hadith;

/// Requests a channel can make of the supervisor.
#[derive(Debug, Clone)]
pub enum BusRequest {
    /// A line of user text to resolve (and log).
    Message {
        channel_id: String,
        session_id: Option<String>,
        content: String,
    },
    RandomHadith,
    HadithByNumber { number: u64 },
    Stats,
}

/// Supervisor answers, one variant per request kind.
#[derive(Debug, Clone)]
pub enum BusReply {
    /// `None` when no matcher answered.
    Message { reply: Option<String> },
    Hadith { hadith: Option<Hadith> },
    Stats { hadiths: usize, knowledge_entries: usize },
}

#[derive(Debug)]
pub struct BusMessage {
    pub request: BusRequest,
    pub reply_tx: oneshot::Sender<BusReply>,
}

/// Client-facing handle for the bus.
#[derive(Clone)]
pub struct BusHandle {
    tx: mpsc::Sender<BusMessage>,
}

impl BusHandle {
    pub fn new(tx: mpsc::Sender<BusMessage>) -> Self {
        Self { tx }
    }

    pub async fn request(&self, request: BusRequest) -> Result<BusReply, BusCallError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(BusMessage { request, reply_tx })
            .await
            .map_err(|_| BusCallError::Send)?;

        reply_rx.await.map_err(|_| BusCallError::Recv)
    }
}

/// Owns the supervisor-side receiver.
pub struct SupervisorBus {
    pub rx: mpsc::Receiver<BusMessage>,
    pub handle: BusHandle,
}

impl SupervisorBus {
    pub fn new(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer);
        Self {
            rx,
            handle: BusHandle::new(tx),
        }
    }
}

/// Call-level transport errors.
#[derive(Debug)]
pub enum BusCallError {
    Send,
    Recv,
}

impl fmt::Display for BusCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusCallError::Send => write!(f, "bus send failed: supervisor is not running"),
            BusCallError::Recv => write!(f, "bus recv failed: supervisor dropped reply sender"),
        }
    }
}

impl Error for BusCallError {}
