//! Persisted prompt-embedding index.
//!
//! One atomic snapshot artifact holds the corpus fingerprint plus parallel
//! arrays of phrases, vectors, and entity references. Queries are answered
//! by scoring the query vector against every stored vector; vectors are
//! L2-normalized, so the dot product is the cosine similarity.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::corpus::{EntityRef, PromptCorpus};
use crate::embedding::provider::{EmbedError, TextEmbedder};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Best match for a query.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub phrase: String,
    /// Cosine similarity of query and matched phrase.
    pub score: f32,
    pub entity: EntityRef,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    fingerprint: String,
    model: String,
    phrases: Vec<String>,
    vectors: Vec<Vec<f32>>,
    entities: Vec<EntityRef>,
}

/// In-memory index over a snapshot.
pub struct PromptIndex {
    snapshot: Snapshot,
}

impl PromptIndex {
    /// Embed every corpus phrase and assemble a snapshot.
    pub fn build(corpus: &PromptCorpus, embedder: &dyn TextEmbedder) -> Result<Self, IndexError> {
        let phrases: Vec<String> = corpus.entries().iter().map(|e| e.phrase.clone()).collect();
        let entities: Vec<EntityRef> = corpus.entries().iter().map(|e| e.entity.clone()).collect();
        let vectors = embedder.embed_batch(&phrases)?;

        tracing::debug!(phrases = phrases.len(), model = embedder.model_name(), "index built");

        Ok(Self {
            snapshot: Snapshot {
                fingerprint: corpus.fingerprint(),
                model: embedder.model_name().to_string(),
                phrases,
                vectors,
                entities,
            },
        })
    }

    /// Load a snapshot from disk. Absent and unreadable files both come back
    /// as `None`: a concurrent rebuild may have left a transient gap, and a
    /// corrupt artifact is simply rebuilt.
    pub fn load(path: &Path) -> Result<Option<Self>, IndexError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IndexError::Io(e)),
        };
        match serde_json::from_slice::<Snapshot>(&bytes) {
            Ok(snapshot) => Ok(Some(Self { snapshot })),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable snapshot");
                Ok(None)
            }
        }
    }

    /// Persist the snapshot with an atomic replace: write a sibling temp
    /// file, then rename over the target. Concurrent writers race benignly;
    /// the last rename wins.
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&self.snapshot)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Fingerprint of the corpus this index was built from.
    pub fn fingerprint(&self) -> &str {
        &self.snapshot.fingerprint
    }

    pub fn len(&self) -> usize {
        self.snapshot.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.phrases.is_empty()
    }

    /// Find the single best phrase for `text`. Ties keep the
    /// first-encountered entry. `None` only when the index is empty.
    pub fn query(
        &self,
        text: &str,
        embedder: &dyn TextEmbedder,
    ) -> Result<Option<MatchResult>, IndexError> {
        if self.is_empty() {
            return Ok(None);
        }

        let query = embedder.embed(text)?;

        let mut best: Option<(usize, f32)> = None;
        for (i, vector) in self.snapshot.vectors.iter().enumerate() {
            let score = dot(&query, vector);
            if best.is_none_or(|(_, b)| score > b) {
                best = Some((i, score));
            }
        }

        Ok(best.map(|(i, score)| MatchResult {
            phrase: self.snapshot.phrases[i].clone(),
            score,
            entity: self.snapshot.entities[i].clone(),
        }))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::build_corpus;
    use crate::embedding::provider::testing::HashEmbedder;
    use sp_protocol::{Product, StaffMember};

    fn sample_corpus() -> PromptCorpus {
        let staff = vec![StaffMember {
            id: "st-1".into(),
            owner_ref: "acct-priya".into(),
            name: "Priya Shah".into(),
        }];
        let products = vec![Product {
            name: "Widget".into(),
            stock: 100,
        }];
        build_corpus(&staff, &products)
    }

    #[test]
    fn verbatim_phrases_recall_their_entity() {
        let corpus = sample_corpus();
        let index = PromptIndex::build(&corpus, &HashEmbedder).unwrap();

        for entry in corpus.entries() {
            let m = index.query(&entry.phrase, &HashEmbedder).unwrap().unwrap();
            assert_eq!(m.phrase, entry.phrase);
            assert!(m.score >= 0.45, "phrase {:?} scored {}", entry.phrase, m.score);
        }
    }

    #[test]
    fn gibberish_scores_below_the_gate() {
        let index = PromptIndex::build(&sample_corpus(), &HashEmbedder).unwrap();
        let m = index
            .query("xyz123 random gibberish", &HashEmbedder)
            .unwrap()
            .unwrap();
        assert!(m.score < 0.45, "scored {}", m.score);
    }

    #[test]
    fn empty_index_yields_no_match() {
        let index = PromptIndex::build(&PromptCorpus::default(), &HashEmbedder).unwrap();
        assert!(index.query("anything", &HashEmbedder).unwrap().is_none());
    }

    #[test]
    fn ties_resolve_to_first_encountered() {
        // An embedder that maps everything to the same vector forces a
        // perfect tie across the whole corpus.
        struct ConstEmbedder;
        impl TextEmbedder for ConstEmbedder {
            fn embed(&self, _: &str) -> Result<Vec<f32>, EmbedError> {
                Ok(vec![1.0, 0.0])
            }
            fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
                Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
            }
            fn dimension(&self) -> usize {
                2
            }
            fn model_name(&self) -> &str {
                "const"
            }
        }

        let corpus = sample_corpus();
        let index = PromptIndex::build(&corpus, &ConstEmbedder).unwrap();
        let m = index.query("whatever", &ConstEmbedder).unwrap().unwrap();
        assert_eq!(m.phrase, corpus.entries()[0].phrase);
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt_index.json");

        let corpus = sample_corpus();
        let built = PromptIndex::build(&corpus, &HashEmbedder).unwrap();
        built.save(&path).unwrap();

        let loaded = PromptIndex::load(&path).unwrap().unwrap();
        assert_eq!(loaded.fingerprint(), built.fingerprint());
        assert_eq!(loaded.len(), built.len());

        let m = loaded
            .query("widget stock details", &HashEmbedder)
            .unwrap()
            .unwrap();
        assert_eq!(m.phrase, "widget stock details");
        assert!(m.score > 0.99);
    }

    #[test]
    fn load_tolerates_absent_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(PromptIndex::load(&path).unwrap().is_none());

        std::fs::write(&path, b"not json").unwrap();
        assert!(PromptIndex::load(&path).unwrap().is_none());
    }

    #[test]
    fn save_replaces_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt_index.json");

        let small = PromptIndex::build(&sample_corpus(), &HashEmbedder).unwrap();
        small.save(&path).unwrap();

        let staff = vec![
            StaffMember {
                id: "st-1".into(),
                owner_ref: "a".into(),
                name: "Priya Shah".into(),
            },
            StaffMember {
                id: "st-2".into(),
                owner_ref: "b".into(),
                name: "Rahul Mehta".into(),
            },
        ];
        let bigger = PromptIndex::build(&build_corpus(&staff, &[]), &HashEmbedder).unwrap();
        bigger.save(&path).unwrap();

        let loaded = PromptIndex::load(&path).unwrap().unwrap();
        assert_eq!(loaded.fingerprint(), bigger.fingerprint());
        assert!(!dir.path().join("prompt_index.tmp").exists());
    }
}
