//! Agents subsystem: the Tawfiq reply-resolution chain.
//!
//! A reply is resolved by running an ordered list of [`Matcher`]s over the
//! normalised input and taking the first one that answers:
//!
//! ```text
//! FriendlyMatcher → KnowledgeMatcher → HadithMatcher → (None: fallback)
//! ```
//!
//! Matchers are pure over immutable data; randomness is injected by the
//! caller so tests can seed it.

pub mod friendly;
pub mod hadith;
pub mod knowledge;

use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::corpus::{Corpus, HadithCorpus};

pub use friendly::FriendlyMatcher;
pub use hadith::HadithMatcher;
pub use knowledge::{KnowledgeEntry, KnowledgeMatcher, KNOWLEDGE_TABLE};

/// Printed when no matcher produced a reply.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn’t understand. Can you rephrase or ask in a different way?";

/// One link of the reply chain.
///
/// `input` is already normalised (see [`normalize`]). Returning `None` hands
/// the input to the next matcher.
pub trait Matcher: Send + Sync {
    /// Stable identifier used in log messages.
    fn id(&self) -> &str;

    fn reply(&self, input: &str, rng: &mut dyn RngCore) -> Option<String>;
}

/// Trim surrounding whitespace and lowercase.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// The Tawfiq agent: an ordered matcher chain plus the hadith corpus it was
/// built from.
pub struct Tawfiq {
    matchers: Vec<Box<dyn Matcher>>,
    hadiths: Arc<HadithCorpus>,
}

impl Tawfiq {
    /// Standard chain in priority order: friendly, knowledge, hadith.
    pub fn new(corpus: Corpus) -> Self {
        let hadiths = Arc::new(corpus.hadiths);
        let matchers: Vec<Box<dyn Matcher>> = vec![
            Box::new(FriendlyMatcher::new(corpus.friendly)),
            Box::new(KnowledgeMatcher::new(KNOWLEDGE_TABLE)),
            Box::new(HadithMatcher::new(hadiths.clone())),
        ];
        Self { matchers, hadiths }
    }

    /// Append a matcher after the standard chain.
    pub fn with_matcher(mut self, matcher: Box<dyn Matcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn hadiths(&self) -> &HadithCorpus {
        &self.hadiths
    }

    /// First reply produced by the chain, or `None` if nothing matched.
    pub fn resolve(&self, text: &str, rng: &mut dyn RngCore) -> Option<String> {
        let input = normalize(text);
        for matcher in &self.matchers {
            if let Some(reply) = matcher.reply(&input, rng) {
                debug!(matcher = matcher.id(), "reply resolved");
                return Some(reply);
            }
        }
        debug!("no matcher answered");
        None
    }

    /// Like [`Tawfiq::resolve`] but substitutes [`FALLBACK_REPLY`].
    pub fn reply(&self, text: &str, rng: &mut dyn RngCore) -> String {
        self.resolve(text, rng)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }
}
