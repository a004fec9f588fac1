//! Basic-knowledge table and its keyword matcher.

use rand::RngCore;

use super::Matcher;

/// A fixed question/answer pair with the phrases that select it.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeEntry {
    pub key: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    /// Lowercase phrases; any one contained in the input selects the entry.
    pub keywords: &'static [&'static str],
}

/// Table order is the tie-break: the first entry with a matching keyword wins.
/// No keyword is a bare name like "allah" or "islam"; those would claim every
/// later entry's phrases and most hadith requests.
pub static KNOWLEDGE_TABLE: &[KnowledgeEntry] = &[
    KnowledgeEntry {
        key: "who_is_allah",
        question: "Who is Allah?",
        answer: "Allah is the one God in Islam, the Creator of the universe, who is unique and without partners.",
        keywords: &["who is allah", "who allah", "what is allah"],
    },
    KnowledgeEntry {
        key: "who_is_final_prophet",
        question: "Who is the final Prophet of Islam?",
        answer: "The final Prophet of Islam is Prophet Muhammad (Peace Be Upon Him).",
        keywords: &["final prophet", "who is the final prophet", "who is muhammad"],
    },
    KnowledgeEntry {
        key: "name_of_religion",
        question: "What is the name of the religion revealed to Prophet Muhammad?",
        answer: "The name of the religion revealed to Prophet Muhammad (Peace Be Upon Him) is Islam.",
        keywords: &["name of the religion", "what is the name of the religion"],
    },
    KnowledgeEntry {
        key: "meaning_la_ilaha_illallah",
        question: "What is the meaning of 'La ilaha illallah'?",
        answer: "The meaning of 'La ilaha illallah' is 'There is no god but Allah'.",
        keywords: &["la ilaha illallah", "meaning of la ilaha illallah"],
    },
    KnowledgeEntry {
        key: "meaning_of_islam",
        question: "What does 'Islam' mean?",
        answer: "Islam means 'submission' or 'surrender' to the will of Allah.",
        keywords: &["meaning of islam", "islam means"],
    },
    KnowledgeEntry {
        key: "who_are_the_angels",
        question: "Who are the angels in Islam?",
        answer: "Angels in Islam are beings created by Allah from light, who perform various tasks including delivering messages to prophets.",
        keywords: &["who are the angels", "angels in islam"],
    },
    KnowledgeEntry {
        key: "what_is_zakat",
        question: "What is Zakat?",
        answer: "Zakat is an obligatory form of charity in Islam, usually calculated as 2.5% of savings.",
        keywords: &["what is zakat", "zakat"],
    },
    KnowledgeEntry {
        key: "who_is_prophet_muhammad",
        question: "Who is the last prophet?",
        answer: "The final Prophet of Islam is Prophet Muhammad (Peace Be Upon Him).",
        keywords: &["who is muhammad", "last prophet"],
    },
];

pub struct KnowledgeMatcher {
    entries: &'static [KnowledgeEntry],
}

impl KnowledgeMatcher {
    pub fn new(entries: &'static [KnowledgeEntry]) -> Self {
        Self { entries }
    }

    /// First entry in table order with a keyword contained in `input`.
    pub fn lookup(&self, input: &str) -> Option<&'static KnowledgeEntry> {
        self.entries
            .iter()
            .find(|entry| entry.keywords.iter().any(|kw| input.contains(kw)))
    }
}

impl Matcher for KnowledgeMatcher {
    fn id(&self) -> &str { "knowledge" }

    fn reply(&self, input: &str, _rng: &mut dyn RngCore) -> Option<String> {
        self.lookup(input).map(|entry| entry.answer.to_string())
    }
}
