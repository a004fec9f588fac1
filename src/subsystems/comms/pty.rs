//! PTY (console) comms channel: the interactive Tawfiq session.
//!
//! Asks for the user's name, then reads lines from stdin, sends each to the
//! supervisor and prints the reply. Typing `exit`, `quit` or `leave` asks for
//! confirmation; `yes` ends the session and cancels the shared shutdown
//! token so the whole process stops. Also ends on Ctrl-C or stdin EOF.

use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::subsystems::agents::FALLBACK_REPLY;
use crate::subsystems::runtime::{Component, ComponentFuture};
use super::state::{CommsEvent, CommsState};

const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "leave"];
const AFFIRMATIVE: &[&str] = &["yes", "y"];

pub const CONFIRM_EXIT_PROMPT: &str = "Are you sure you want to exit? (yes/no): ";

// ── Console state machine ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleState {
    #[default]
    AwaitingInput,
    ConfirmExit,
    /// Terminal: the user confirmed the exit.
    Closed,
}

/// What the console loop should do with a line.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleAction<'a> {
    /// Blank line, or input after the session closed.
    Ignore,
    /// Log and answer this text.
    Resolve(&'a str),
    AskConfirmation,
    Exit,
    /// Exit declined; back to normal input without a reply.
    Resume,
}

impl ConsoleState {
    pub fn step<'a>(&mut self, line: &'a str) -> ConsoleAction<'a> {
        let line = line.trim();
        match *self {
            ConsoleState::AwaitingInput => {
                if line.is_empty() {
                    return ConsoleAction::Ignore;
                }
                if EXIT_KEYWORDS.contains(&line.to_lowercase().as_str()) {
                    *self = ConsoleState::ConfirmExit;
                    ConsoleAction::AskConfirmation
                } else {
                    ConsoleAction::Resolve(line)
                }
            }
            ConsoleState::ConfirmExit => {
                if AFFIRMATIVE.contains(&line.to_lowercase().as_str()) {
                    *self = ConsoleState::Closed;
                    ConsoleAction::Exit
                } else {
                    *self = ConsoleState::AwaitingInput;
                    ConsoleAction::Resume
                }
            }
            ConsoleState::Closed => ConsoleAction::Ignore,
        }
    }
}

// ── PtyChannel ───────────────────────────────────────────────────────────────

pub struct PtyChannel {
    channel_id: String,
    bot_name: String,
    state: Arc<CommsState>,
}

impl PtyChannel {
    pub fn new(channel_id: impl Into<String>, bot_name: impl Into<String>, state: Arc<CommsState>) -> Self {
        Self {
            channel_id: channel_id.into(),
            bot_name: bot_name.into(),
            state,
        }
    }
}

impl Component for PtyChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_pty(self.channel_id, self.bot_name, self.state, shutdown))
    }
}

// ── run_pty ──────────────────────────────────────────────────────────────────

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

/// Next stdin line, or `None` on shutdown, EOF or read error.
async fn next_input(
    lines: &mut Lines<BufReader<Stdin>>,
    shutdown: &CancellationToken,
) -> Option<String> {
    tokio::select! {
        biased;

        _ = shutdown.cancelled() => {
            println!();
            info!("pty channel shutting down");
            None
        }

        line = lines.next_line() => {
            match line {
                Err(e) => {
                    warn!("pty read error: {e}");
                    None
                }
                Ok(None) => {
                    info!("pty stdin closed");
                    None
                }
                Ok(Some(input)) => Some(input),
            }
        }
    }
}

async fn run_pty(
    channel_id: String,
    bot_name: String,
    state: Arc<CommsState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    info!(%channel_id, "pty channel started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("✨ Welcome to Tawfiq - Your Smart Islamic Companion! ✨");
    prompt("🤔 May I know your name? ");
    let Some(name) = next_input(&mut lines, &shutdown).await else {
        state.report_event(CommsEvent::ChannelShutdown { channel_id });
        return Ok(());
    };
    let name = match name.trim() {
        "" => "friend".to_string(),
        n => n.to_string(),
    };

    let session_id = uuid::Uuid::new_v4().to_string();
    state.report_event(CommsEvent::SessionStarted {
        channel_id: channel_id.clone(),
        session_id: session_id.clone(),
    });

    println!("Awesome to meet you, {name}!");
    println!("You can ask for Hadiths, basic Islamic questions, or just chat!");
    println!("👉 Type 'exit' whenever you're ready to end our conversation.");

    let mut console = ConsoleState::default();

    loop {
        match console {
            ConsoleState::ConfirmExit => prompt(CONFIRM_EXIT_PROMPT),
            _ => prompt(&format!("{name}: ")),
        }

        let Some(line) = next_input(&mut lines, &shutdown).await else {
            break;
        };

        match console.step(&line) {
            ConsoleAction::Ignore | ConsoleAction::AskConfirmation => {}
            ConsoleAction::Resume => debug!("exit declined"),
            ConsoleAction::Exit => {
                println!(
                    "{bot_name}: Thank you for spending time with me, {name}! Have a wonderful day filled with blessings!"
                );
                info!(%channel_id, "console session ended by user");
                shutdown.cancel();
                break;
            }
            ConsoleAction::Resolve(text) => {
                debug!(input = %text, "pty received line");
                match state.send_message(&channel_id, Some(session_id.clone()), text.to_string()).await {
                    Ok(reply) => {
                        println!("{bot_name}: {}", reply.as_deref().unwrap_or(FALLBACK_REPLY));
                    }
                    Err(e) => {
                        warn!("send_message error: {e}, pty exiting");
                        break;
                    }
                }
            }
        }
    }

    state.report_event(CommsEvent::ChannelShutdown { channel_id });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_input_resolves() {
        let mut s = ConsoleState::default();
        assert_eq!(s.step("  who is allah  "), ConsoleAction::Resolve("who is allah"));
        assert_eq!(s, ConsoleState::AwaitingInput);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut s = ConsoleState::default();
        assert_eq!(s.step("   "), ConsoleAction::Ignore);
        assert_eq!(s, ConsoleState::AwaitingInput);
    }

    #[test]
    fn exit_keywords_ask_for_confirmation() {
        for kw in ["exit", "QUIT", " Leave "] {
            let mut s = ConsoleState::default();
            assert_eq!(s.step(kw), ConsoleAction::AskConfirmation);
            assert_eq!(s, ConsoleState::ConfirmExit);
        }
    }

    #[test]
    fn exit_keyword_inside_sentence_is_a_query() {
        let mut s = ConsoleState::default();
        assert_eq!(s.step("how do i leave bad habits"), ConsoleAction::Resolve("how do i leave bad habits"));
    }

    #[test]
    fn affirmative_closes() {
        let mut s = ConsoleState::default();
        s.step("exit");
        assert_eq!(s.step("Yes"), ConsoleAction::Exit);
        assert_eq!(s, ConsoleState::Closed);
        assert_eq!(s.step("hello"), ConsoleAction::Ignore);
    }

    #[test]
    fn anything_else_resumes_without_reply() {
        let mut s = ConsoleState::default();
        s.step("quit");
        assert_eq!(s.step("no"), ConsoleAction::Resume);
        assert_eq!(s, ConsoleState::AwaitingInput);
        // The next line is handled as ordinary input again.
        assert_eq!(s.step("thanks"), ConsoleAction::Resolve("thanks"));
    }

    #[test]
    fn short_yes_is_affirmative() {
        let mut s = ConsoleState::ConfirmExit;
        assert_eq!(s.step("y"), ConsoleAction::Exit);
    }
}
