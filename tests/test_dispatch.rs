//! End-to-end reply resolution over the JSON fixtures in `tests/fixtures/`.
//!
//! Run with:
//!   cargo test --test test_dispatch

use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use tawfiq::corpus::{Corpus, FriendlyResponseBank, load_friendly_responses};
use tawfiq::subsystems::agents::{FALLBACK_REPLY, Tawfiq};
use tawfiq::subsystems::memory::QueryLog;
use tawfiq::supervisor::Supervisor;

// ── helpers ──────────────────────────────────────────────────────────────────

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn corpus() -> Corpus {
    Corpus::load(
        &fixture("sahih_bukhari_coded.json"),
        &fixture("friendly_responses.json"),
    )
    .expect("fixtures must load")
}

fn friendly() -> FriendlyResponseBank {
    load_friendly_responses(&fixture("friendly_responses.json")).unwrap()
}

fn supervisor(tmp: &TempDir, seed: u64) -> Supervisor {
    let log = QueryLog::open(tmp.path().join("user_queries.txt")).unwrap();
    Supervisor::with_rng(Tawfiq::new(corpus()), log, StdRng::seed_from_u64(seed))
}

/// What the console prints for a line.
fn reply(sup: &mut Supervisor, text: &str) -> String {
    sup.resolve_reply(Some("test-session"), text)
        .unwrap_or_else(|| FALLBACK_REPLY.to_string())
}

fn is_hadith_block(text: &str) -> bool {
    let parts: Vec<&str> = text.split("\n\n").collect();
    parts.len() == 3
        && parts[0].starts_with("Volume ")
        && parts[1].starts_with("Narrated ")
        && !parts[2].is_empty()
}

// ── scenarios ────────────────────────────────────────────────────────────────

#[test]
fn assalamu_alaikum_gets_a_greeting() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 1);
    let greetings = friendly().greetings;
    for _ in 0..20 {
        let r = reply(&mut sup, "Assalamu Alaikum");
        assert!(greetings.contains(&r), "{r:?}");
    }
}

#[test]
fn greeting_substring_never_yields_other_classes() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 2);
    let bank = friendly();
    for input in ["hello, who is allah", "Hey! thanks", "hi bye", "what's up with zakat"] {
        let r = reply(&mut sup, input);
        assert!(bank.greetings.contains(&r), "{input:?} -> {r:?}");
        assert!(!bank.farewells.contains(&r));
        assert!(!bank.gratitudes.contains(&r));
    }
}

#[test]
fn who_is_allah_exact() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 3);
    assert_eq!(
        reply(&mut sup, "who is allah"),
        "Allah is the one God in Islam, the Creator of the universe, who is unique and without partners."
    );
}

#[test]
fn knowledge_beats_hadith_keyword() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 4);
    // "zakat" appears in hadith 486 as well as in the knowledge table.
    let r = reply(&mut sup, "hadith about zakat");
    assert_eq!(
        r,
        "Zakat is an obligatory form of charity in Islam, usually calculated as 2.5% of savings."
    );
}

#[test]
fn specific_knowledge_entries_are_not_shadowed() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 13);
    assert_eq!(
        reply(&mut sup, "la ilaha illallah"),
        "The meaning of 'La ilaha illallah' is 'There is no god but Allah'."
    );
    assert_eq!(
        reply(&mut sup, "islam means what"),
        "Islam means 'submission' or 'surrender' to the will of Allah."
    );
    assert!(reply(&mut sup, "who are the angels in islam").starts_with("Angels in Islam are beings"));
}

#[test]
fn hadith_about_allah_searches_the_corpus() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 14);
    for _ in 0..10 {
        let r = reply(&mut sup, "hadith about allah");
        assert!(is_hadith_block(&r), "{r:?}");
        assert!(r.to_lowercase().contains("allah"));
    }
}

#[test]
fn arabic_indic_number_lookup() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 15);
    assert_eq!(reply(&mut sup, "hadith ٥٥"), reply(&mut sup, "hadith 55"));
}

#[test]
fn tell_me_a_hadith_repeatedly() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 5);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        let r = reply(&mut sup, "tell me a hadith");
        assert!(is_hadith_block(&r), "{r:?}");
        seen.insert(r);
    }
    assert!(seen.len() > 1, "random picks should vary across 50 calls");
}

#[test]
fn missing_hadith_number() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 6);
    assert_eq!(
        reply(&mut sup, "hadith 99999"),
        "Hadith 99999 not found. Please try another number."
    );
}

#[test]
fn numeric_lookup_is_exact() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 7);
    let r = reply(&mut sup, "hadith 55");
    assert!(r.starts_with("Volume 1, Book 2, Number 55\n\n"), "{r:?}");
    assert!(!r.contains("Number 550"));
}

#[test]
fn every_hadith_reachable_by_number() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 8);
    let corpus = corpus();
    assert!(!corpus.hadiths.is_empty());
    for h in corpus.hadiths.iter() {
        let n = h.hadith_number.expect("fixture hadiths are numbered");
        assert_eq!(reply(&mut sup, &format!("hadith {n}")), h.formatted());
    }
}

#[test]
fn filler_only_falls_back() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 9);
    assert_eq!(sup.resolve_reply(None, "hadith about"), None);
}

#[test]
fn nonsense_falls_back() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 10);
    assert_eq!(reply(&mut sup, "xyzabc nonsense"), FALLBACK_REPLY);
}

#[test]
fn topic_search_finds_matching_text() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 11);
    let r = reply(&mut sup, "hadith on patience");
    assert!(r.starts_with("Volume 2, Book 23, Number 372\n\n"), "{r:?}");

    let r = reply(&mut sup, "hadith about xyzzy");
    assert_eq!(r, "Sorry, I couldn't find a Hadith on that topic. Try different keywords.");
}

#[test]
fn every_query_is_logged_verbatim() {
    let tmp = TempDir::new().unwrap();
    let mut sup = supervisor(&tmp, 12);
    let inputs = ["Assalamu Alaikum", "who is allah", "hadith 99999", "xyzabc nonsense"];
    for input in inputs {
        reply(&mut sup, input);
    }
    let log = fs::read_to_string(tmp.path().join("user_queries.txt")).unwrap();
    assert_eq!(log.lines().collect::<Vec<_>>(), inputs);
}
