//! Sentence embeddings and the persisted prompt index.
//!
//! `provider` wraps the embedding model behind a trait seam; `index` holds
//! the phrase/vector/entity snapshot and answers nearest-neighbor queries.

pub mod index;
pub mod provider;

pub use index::{IndexError, MatchResult, PromptIndex};
pub use provider::{EmbedError, FastEmbedder, TextEmbedder};
