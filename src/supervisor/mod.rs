//! Supervisor: owns the Tawfiq agent and the query log, and answers bus
//! requests one at a time.
//!
//! Every reply is resolved on this single task, so matcher evaluation and
//! query logging are strictly sequential regardless of how many channels
//! are running.

pub mod bus;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::subsystems::agents::{KNOWLEDGE_TABLE, Tawfiq};
use crate::subsystems::memory::QueryLog;
use bus::{BusReply, BusRequest, SupervisorBus};

pub struct Supervisor {
    agent: Tawfiq,
    query_log: QueryLog,
    rng: StdRng,
}

impl Supervisor {
    pub fn new(agent: Tawfiq, query_log: QueryLog) -> Self {
        Self::with_rng(agent, query_log, StdRng::from_entropy())
    }

    /// Fixed RNG, for reproducible picks in tests.
    pub fn with_rng(agent: Tawfiq, query_log: QueryLog, rng: StdRng) -> Self {
        Self { agent, query_log, rng }
    }

    /// Log `text`, then run the matcher chain over it.
    ///
    /// `None` means no matcher answered; callers substitute
    /// [`crate::subsystems::agents::FALLBACK_REPLY`]. A failed log write is
    /// reported and does not block the reply.
    pub fn resolve_reply(&mut self, session_id: Option<&str>, text: &str) -> Option<String> {
        if let Err(e) = self.query_log.append(text) {
            warn!(session_id = session_id.unwrap_or("-"), "query not logged: {e}");
        }
        let reply = self.agent.resolve(text, &mut self.rng);
        debug!(
            session_id = session_id.unwrap_or("-"),
            matched = reply.is_some(),
            "reply resolved"
        );
        reply
    }

    fn handle(&mut self, request: BusRequest) -> BusReply {
        match request {
            BusRequest::Message { channel_id, session_id, content } => {
                debug!(%channel_id, "message received");
                BusReply::Message {
                    reply: self.resolve_reply(session_id.as_deref(), &content),
                }
            }
            BusRequest::RandomHadith => {
                BusReply::Hadith {
                    hadith: self.agent.hadiths().iter().choose(&mut self.rng).cloned(),
                }
            }
            BusRequest::HadithByNumber { number } => BusReply::Hadith {
                hadith: self.agent.hadiths().find_by_number(number).cloned(),
            },
            BusRequest::Stats => BusReply::Stats {
                hadiths: self.agent.hadiths().len(),
                knowledge_entries: KNOWLEDGE_TABLE.len(),
            },
        }
    }

    /// Run the supervisor message loop until `shutdown` is cancelled or every
    /// bus handle has been dropped.
    pub async fn run(mut self, mut bus: SupervisorBus, shutdown: CancellationToken) {
        info!(
            hadiths = self.agent.hadiths().len(),
            query_log = %self.query_log.path().display(),
            "supervisor ready"
        );

        // Drop our own sender so the loop ends once all channels are gone.
        drop(bus.handle);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("supervisor shutting down");
                    break;
                }

                msg = bus.rx.recv() => {
                    match msg {
                        Some(msg) => {
                            let reply = self.handle(msg.request);
                            if msg.reply_tx.send(reply).is_err() {
                                debug!("requester went away before the reply");
                            }
                        }
                        None => {
                            info!("bus closed, supervisor exiting");
                            break;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Book, Corpus, FriendlyResponseBank, Hadith, HadithCorpus, Volume};
    use crate::subsystems::agents::FALLBACK_REPLY;
    use tempfile::TempDir;

    fn corpus() -> Corpus {
        Corpus {
            hadiths: HadithCorpus {
                volumes: vec![Volume {
                    name: None,
                    books: vec![Book {
                        name: None,
                        hadiths: vec![Hadith {
                            info: "Volume 1, Book 2, Number 8".into(),
                            by: "Narrated Ibn 'Umar:".into(),
                            text: "Islam is based on five principles.".into(),
                            hadith_number: Some(8),
                        }],
                    }],
                }],
            },
            friendly: FriendlyResponseBank {
                greetings: vec!["Wa alaikum assalam!".into()],
                farewells: vec!["Fi amanillah!".into()],
                gratitudes: vec!["You're welcome!".into()],
            },
        }
    }

    fn supervisor(tmp: &TempDir) -> Supervisor {
        let log = QueryLog::open(tmp.path().join("user_queries.txt")).unwrap();
        Supervisor::with_rng(Tawfiq::new(corpus()), log, StdRng::seed_from_u64(11))
    }

    #[test]
    fn resolve_reply_logs_every_query() {
        let tmp = TempDir::new().unwrap();
        let mut sup = supervisor(&tmp);

        assert_eq!(sup.resolve_reply(Some("s1"), "Assalamu Alaikum").as_deref(), Some("Wa alaikum assalam!"));
        assert_eq!(sup.resolve_reply(None, "xyzabc nonsense"), None);

        let log = std::fs::read_to_string(tmp.path().join("user_queries.txt")).unwrap();
        assert_eq!(log, "Assalamu Alaikum\nxyzabc nonsense\n");
    }

    #[tokio::test]
    async fn run_answers_bus_requests() {
        let tmp = TempDir::new().unwrap();
        let sup = supervisor(&tmp);
        let bus = SupervisorBus::new(8);
        let handle = bus.handle.clone();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(sup.run(bus, shutdown.clone()));

        let reply = handle
            .request(BusRequest::Message {
                channel_id: "test".into(),
                session_id: None,
                content: "hadith 8".into(),
            })
            .await
            .unwrap();
        match reply {
            BusReply::Message { reply: Some(text) } => assert!(text.ends_with("five principles.")),
            other => panic!("unexpected reply: {other:?}"),
        }

        match handle.request(BusRequest::HadithByNumber { number: 9 }).await.unwrap() {
            BusReply::Hadith { hadith } => assert!(hadith.is_none()),
            other => panic!("unexpected reply: {other:?}"),
        }

        match handle.request(BusRequest::RandomHadith).await.unwrap() {
            BusReply::Hadith { hadith } => assert_eq!(hadith.unwrap().hadith_number, Some(8)),
            other => panic!("unexpected reply: {other:?}"),
        }

        match handle.request(BusRequest::Stats).await.unwrap() {
            BusReply::Stats { hadiths, knowledge_entries } => {
                assert_eq!(hadiths, 1);
                assert_eq!(knowledge_entries, KNOWLEDGE_TABLE.len());
            }
            other => panic!("unexpected reply: {other:?}"),
        }

        shutdown.cancel();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn run_exits_when_handles_dropped() {
        let tmp = TempDir::new().unwrap();
        let bus = SupervisorBus::new(1);
        let task = tokio::spawn(supervisor(&tmp).run(bus, CancellationToken::new()));
        task.await.unwrap();
    }

    #[test]
    fn fallback_is_not_logged_twice() {
        let tmp = TempDir::new().unwrap();
        let mut sup = supervisor(&tmp);
        let reply = sup.resolve_reply(None, "qwerty").unwrap_or_else(|| FALLBACK_REPLY.to_string());
        assert_eq!(reply, FALLBACK_REPLY);
        let log = std::fs::read_to_string(tmp.path().join("user_queries.txt")).unwrap();
        assert_eq!(log.lines().count(), 1);
    }
}
