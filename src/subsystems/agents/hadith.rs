//! Hadith matcher: random pick, lookup by number, or free-text search.
//!
//! Exactly one branch runs per call, in this order:
//!
//! 1. the input asks for any hadith → random hadith from the whole corpus
//! 2. the input has an all-digit token → exact `hadith_number` lookup
//!    (ASCII, Arabic-Indic and Extended Arabic-Indic digits all count)
//! 3. otherwise → keyword search over hadith texts
//!
//! Branch 2 never falls through to branch 3, even when the number sits
//! inside an unrelated phrase ("surah 2 verse 5").

use std::sync::Arc;

use rand::RngCore;
use rand::seq::IteratorRandom;
use tracing::debug;

use crate::corpus::HadithCorpus;
use super::Matcher;

pub const TOPIC_NOT_FOUND_REPLY: &str =
    "Sorry, I couldn't find a Hadith on that topic. Try different keywords.";

const RANDOM_TRIGGERS: &[&str] = &["tell me a hadith", "any hadith"];

/// Removed before keyword search, in this order.
const FILLER_PHRASES: &[&str] = &["hadith about", "hadith on", "any hadith about", "tell me a hadith on"];

pub fn not_found_reply(number: impl std::fmt::Display) -> String {
    format!("Hadith {number} not found. Please try another number.")
}

pub struct HadithMatcher {
    corpus: Arc<HadithCorpus>,
}

impl HadithMatcher {
    pub fn new(corpus: Arc<HadithCorpus>) -> Self {
        Self { corpus }
    }

    fn random(&self, rng: &mut dyn RngCore) -> Option<String> {
        self.corpus.iter().choose(rng).map(|h| h.formatted())
    }

    fn lookup(&self, token: &str) -> String {
        match parse_number(token) {
            Some(number) => match self.corpus.find_by_number(number) {
                Some(hadith) => hadith.formatted(),
                None => not_found_reply(number),
            },
            // Too many digits for any stored number.
            None => not_found_reply(token),
        }
    }

    fn search(&self, input: &str, rng: &mut dyn RngCore) -> Option<String> {
        let remainder = FILLER_PHRASES
            .iter()
            .fold(input.to_string(), |acc, filler| acc.replace(filler, ""));
        let keywords: Vec<&str> = remainder.split_whitespace().collect();
        if keywords.is_empty() {
            return None;
        }

        let found = self
            .corpus
            .iter()
            .filter(|h| {
                let text = h.text.to_lowercase();
                keywords.iter().any(|kw| text.contains(kw))
            })
            .choose(rng);

        match found {
            Some(hadith) => Some(hadith.formatted()),
            // Only answer "not found" when a hadith was actually asked for;
            // other input goes on to the generic fallback.
            None if input.contains("hadith") => Some(TOPIC_NOT_FOUND_REPLY.to_string()),
            None => None,
        }
    }
}

/// Value of an ASCII or (Extended) Arabic-Indic decimal digit.
fn digit_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        '\u{0660}'..='\u{0669}' => Some(c as u64 - 0x0660),
        '\u{06F0}'..='\u{06F9}' => Some(c as u64 - 0x06F0),
        _ => None,
    }
}

/// First whitespace token made only of decimal digits.
fn first_numeric_token(input: &str) -> Option<&str> {
    input
        .split_whitespace()
        .find(|word| word.chars().all(|c| digit_value(c).is_some()))
}

/// `None` on overflow.
fn parse_number(token: &str) -> Option<u64> {
    token.chars().try_fold(0u64, |acc, c| {
        acc.checked_mul(10)?.checked_add(digit_value(c)?)
    })
}

impl Matcher for HadithMatcher {
    fn id(&self) -> &str { "hadith" }

    fn reply(&self, input: &str, rng: &mut dyn RngCore) -> Option<String> {
        if RANDOM_TRIGGERS.iter().any(|t| input.contains(t)) {
            if let Some(reply) = self.random(rng) {
                return Some(reply);
            }
        }

        if let Some(token) = first_numeric_token(input) {
            debug!(token, "hadith lookup by number");
            return Some(self.lookup(token));
        }

        self.search(input, rng)
    }
}
