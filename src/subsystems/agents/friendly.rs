//! Canned conversational replies: greetings, farewells, thanks.

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::corpus::FriendlyResponseBank;
use super::Matcher;

pub const HOW_ARE_YOU_REPLY: &str = "I'm doing great, thank you! Just here to assist you!";

const GREETINGS: &[&str] = &["hi", "hello", "assalamu alaikum", "as-salam alaykum", "hey", "what's up"];
const FAREWELLS: &[&str] = &["bye", "goodbye", "see you", "take care"];
const GRATITUDES: &[&str] = &["thank you", "thanks", "jazakallah", "thank you very much"];
const HOW_ARE_YOU: &[&str] = &["how are you"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseClass {
    Greeting,
    Farewell,
    Gratitude,
    HowAreYou,
}

/// Checked in this order; the first class with a contained phrase wins.
const CLASSES: &[(PhraseClass, &[&str])] = &[
    (PhraseClass::Greeting, GREETINGS),
    (PhraseClass::Farewell, FAREWELLS),
    (PhraseClass::Gratitude, GRATITUDES),
    (PhraseClass::HowAreYou, HOW_ARE_YOU),
];

/// Plain substring containment, so "hi" also fires inside "this".
pub fn classify(input: &str) -> Option<PhraseClass> {
    CLASSES
        .iter()
        .find(|(_, phrases)| phrases.iter().any(|p| input.contains(p)))
        .map(|(class, _)| *class)
}

pub struct FriendlyMatcher {
    bank: FriendlyResponseBank,
}

impl FriendlyMatcher {
    pub fn new(bank: FriendlyResponseBank) -> Self {
        Self { bank }
    }
}

impl Matcher for FriendlyMatcher {
    fn id(&self) -> &str { "friendly" }

    fn reply(&self, input: &str, rng: &mut dyn RngCore) -> Option<String> {
        let candidates = match classify(input)? {
            PhraseClass::Greeting => &self.bank.greetings,
            PhraseClass::Farewell => &self.bank.farewells,
            PhraseClass::Gratitude => &self.bank.gratitudes,
            PhraseClass::HowAreYou => return Some(HOW_ARE_YOU_REPLY.to_string()),
        };
        // An empty class stays silent and lets the next matcher try.
        candidates.choose(rng).cloned()
    }
}
