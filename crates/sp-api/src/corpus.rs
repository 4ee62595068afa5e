//! Prompt corpus builder.
//!
//! Deterministically generates labeled natural-language phrasings for every
//! current staff member and product. The dispatcher embeds this corpus and
//! matches free-text queries against it; the entity each phrase refers to is
//! carried as a tagged [`EntityRef`] fixed at build time, so dispatch is a
//! direct `match` rather than a membership scan.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sp_protocol::{Product, StaffMember};

/// What a corpus phrase refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRef {
    Staff(StaffMember),
    Product(Product),
}

/// One labeled phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptEntry {
    /// Normalized (trimmed, lowercased) phrase; unique key in the corpus.
    pub phrase: String,
    pub entity: EntityRef,
}

/// The full phrase → entity mapping at a point in time.
///
/// Insertion order is preserved; a phrase collision overwrites the earlier
/// entity in place (last-write-wins). Collisions are an accepted ambiguity,
/// not an error.
#[derive(Debug, Default)]
pub struct PromptCorpus {
    entries: Vec<PromptEntry>,
    by_phrase: HashMap<String, usize>,
}

impl PromptCorpus {
    pub fn insert(&mut self, phrase: &str, entity: EntityRef) {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return;
        }
        match self.by_phrase.get(&phrase) {
            Some(&i) => self.entries[i].entity = entity,
            None => {
                self.by_phrase.insert(phrase.clone(), self.entries.len());
                self.entries.push(PromptEntry { phrase, entity });
            }
        }
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content hash used to decide whether a persisted embedding snapshot is
    /// still valid. Covers phrases and entity identity (not product stock —
    /// matched entities are re-resolved against fresh lists at dispatch).
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for entry in &self.entries {
            hasher.update(entry.phrase.as_bytes());
            hasher.update(b"\x1f");
            hasher.update(entity_key(&entry.entity).as_bytes());
            hasher.update(b"\x1e");
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn entity_key(entity: &EntityRef) -> String {
    match entity {
        EntityRef::Staff(s) => format!("staff:{}:{}:{}", s.id, s.owner_ref, s.name),
        EntityRef::Product(p) => format!("product:{}", p.name),
    }
}

/// Build the corpus for the current staff and product lists.
///
/// Pure and deterministic: the same inputs always produce the same mapping.
pub fn build_corpus(staff: &[StaffMember], products: &[Product]) -> PromptCorpus {
    let mut corpus = PromptCorpus::default();

    for (position, member) in staff.iter().enumerate() {
        let name = member.name.to_lowercase();
        for variant in typo_variants(&name) {
            for phrase in staff_phrases(&variant) {
                corpus.insert(&phrase, EntityRef::Staff(member.clone()));
            }
        }
        // Positional phrasing, 1-based.
        corpus.insert(
            &format!("how did staffid {} perform?", position + 1),
            EntityRef::Staff(member.clone()),
        );
    }

    for product in products {
        let name = product.name.to_lowercase();
        for variant in typo_variants(&name) {
            for phrase in product_phrases(&variant) {
                corpus.insert(&phrase, EntityRef::Product(product.clone()));
            }
        }
    }

    corpus
}

/// Naive spelling variants for fuzzy recall against leetspeak-style typos.
/// Each substitution is applied independently over the whole name, never
/// combined with another.
fn typo_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];
    for (from, to) in [('a', '@'), ('e', '3'), ('i', '1'), ('o', '0')] {
        if name.contains(from) {
            variants.push(name.replace(from, &to.to_string()));
        }
    }
    variants
}

fn staff_phrases(name: &str) -> Vec<String> {
    vec![
        format!("tell me the performance of {name}"),
        format!("how did staff {name} perform?"),
        format!("how is {name} doing?"),
        format!("show me the performance report of {name}"),
        format!("{name}'s score report"),
        format!("evaluate {name}'s performance"),
        format!("{name} performance report"),
        format!("score of staff {name}"),
        format!("report card of {name}"),
        format!("sales report for {name}"),
        format!("how many bills handled by {name}?"),
        format!("{name} staff performance"),
        format!("what is {name} staff score?"),
        format!("{name} performence"), // common misspelling
        format!("{name} sales"),
    ]
}

fn product_phrases(name: &str) -> Vec<String> {
    vec![
        format!("what is the forecast for {name}"),
        format!("how many days will {name} last?"),
        format!("tell me about inventory of {name}"),
        format!("{name} stock details"),
        format!("inventory forecast for {name}"),
        format!("do we have enough {name}?"),
        format!("how much {name} is left?"),
        format!("current stock of {name}"),
        format!("{name} inventory info"),
        format!("availability of {name}"),
        format!("{name} stock?"),
        format!("{name} invantory"), // common misspelling
        format!("{name} available?"),
    ]
}
