//! Corpus loading: the hadith collection and the friendly-response bank.
//!
//! Both documents are read whole into memory once at startup and never
//! mutated afterwards. Any missing or malformed file is a fatal
//! [`AppError::Corpus`]; there is no partial load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::AppError;

// ── Hadith corpus ────────────────────────────────────────────────────────────

/// A single narration with its citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hadith {
    #[serde(default)]
    pub info: String,
    /// Attribution line, e.g. `Narrated 'Umar bin Al-Khattab:`.
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub text: String,
    /// Unique within the corpus by convention; not enforced.
    #[serde(default)]
    pub hadith_number: Option<u64>,
}

impl Hadith {
    /// Citation and text as shown to the user: `info\n\nby\n\ntext`.
    pub fn formatted(&self) -> String {
        format!("{}\n\n{}\n\n{}", self.info, self.by, self.text)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hadiths: Vec<Hadith>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub books: Vec<Book>,
}

/// Volumes → books → hadiths, in file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HadithCorpus {
    pub volumes: Vec<Volume>,
}

impl HadithCorpus {
    /// Every hadith across all volumes and books, in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = &Hadith> {
        self.volumes
            .iter()
            .flat_map(|v| v.books.iter())
            .flat_map(|b| b.hadiths.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// First hadith whose `hadith_number` equals `number` exactly.
    pub fn find_by_number(&self, number: u64) -> Option<&Hadith> {
        self.iter().find(|h| h.hadith_number == Some(number))
    }
}

// ── Friendly responses ───────────────────────────────────────────────────────

/// Canned replies per phrase class. All three lists are required in the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendlyResponseBank {
    pub greetings: Vec<String>,
    pub farewells: Vec<String>,
    pub gratitudes: Vec<String>,
}

// ── Loading ──────────────────────────────────────────────────────────────────

/// Both corpora, loaded together at startup.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub hadiths: HadithCorpus,
    pub friendly: FriendlyResponseBank,
}

impl Corpus {
    pub fn load(hadiths_path: &Path, friendly_path: &Path) -> Result<Self, AppError> {
        let hadiths = load_hadiths(hadiths_path)?;
        let friendly = load_friendly_responses(friendly_path)?;
        Ok(Self { hadiths, friendly })
    }
}

pub fn load_hadiths(path: &Path) -> Result<HadithCorpus, AppError> {
    let corpus: HadithCorpus = read_json(path)?;
    info!(
        path = %path.display(),
        volumes = corpus.volumes.len(),
        hadiths = corpus.len(),
        "hadith corpus loaded"
    );
    Ok(corpus)
}

pub fn load_friendly_responses(path: &Path) -> Result<FriendlyResponseBank, AppError> {
    let bank: FriendlyResponseBank = read_json(path)?;
    info!(
        path = %path.display(),
        greetings = bank.greetings.len(),
        farewells = bank.farewells.len(),
        gratitudes = bank.gratitudes.len(),
        "friendly responses loaded"
    );
    Ok(bank)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let data = fs::read_to_string(path)
        .map_err(|e| AppError::Corpus(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&data)
        .map_err(|e| AppError::Corpus(format!("malformed {}: {e}", path.display())))
}
