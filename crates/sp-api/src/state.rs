//! Shared application state for the Axum server.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::Authenticator;
use crate::corpus::PromptCorpus;
use crate::embedding::{IndexError, PromptIndex, TextEmbedder};
use crate::provider::EntityProvider;

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// Source of staff, products, and the bill log.
    pub provider: Arc<dyn EntityProvider>,
    /// Sentence-embedding model, loaded once per process.
    pub embedder: Arc<dyn TextEmbedder>,
    /// Bearer-credential resolver.
    pub auth: Arc<dyn Authenticator>,
    /// Cached prompt index; lazily (re)built when the corpus changes.
    index: Arc<RwLock<Option<PromptIndex>>>,
    /// Where the index snapshot is persisted across restarts.
    pub index_path: PathBuf,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn EntityProvider>,
        embedder: Arc<dyn TextEmbedder>,
        auth: Arc<dyn Authenticator>,
        index_path: PathBuf,
    ) -> Self {
        Self {
            provider,
            embedder,
            auth,
            index: Arc::new(RwLock::new(None)),
            index_path,
        }
    }

    /// Make sure the cached index matches `corpus`, loading the persisted
    /// snapshot when its fingerprint still fits and rebuilding otherwise.
    ///
    /// Two callers racing past the read check serialize on the write lock;
    /// the loser re-checks and finds the winner's index already in place.
    pub async fn ensure_index(&self, corpus: &PromptCorpus) -> Result<(), IndexError> {
        let fingerprint = corpus.fingerprint();

        {
            let cached = self.index.read().await;
            if let Some(index) = cached.as_ref()
                && index.fingerprint() == fingerprint
            {
                return Ok(());
            }
        }

        let mut cached = self.index.write().await;
        if let Some(index) = cached.as_ref()
            && index.fingerprint() == fingerprint
        {
            return Ok(());
        }

        if let Some(index) = PromptIndex::load(&self.index_path)?
            && index.fingerprint() == fingerprint
        {
            tracing::debug!(phrases = index.len(), "loaded prompt index snapshot");
            *cached = Some(index);
            return Ok(());
        }

        tracing::info!(phrases = corpus.len(), "rebuilding prompt index");
        let index = PromptIndex::build(corpus, self.embedder.as_ref())?;
        index.save(&self.index_path)?;
        *cached = Some(index);
        Ok(())
    }

    /// Run `f` against the cached index. Returns `None` when no index has
    /// been built yet.
    pub async fn with_index<T>(&self, f: impl FnOnce(&PromptIndex) -> T) -> Option<T> {
        let cached = self.index.read().await;
        cached.as_ref().map(f)
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Arc;

    use super::AppState;
    use crate::auth::TokenAuthenticator;
    use crate::embedding::provider::testing::HashEmbedder;
    use crate::provider::MemoryProvider;

    /// State over the sample entities, the deterministic hash embedder, and
    /// the sample token table. Keeps the tempdir alive alongside the state
    /// so the snapshot path stays valid.
    pub fn sample_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            Arc::new(MemoryProvider::with_sample_data()),
            Arc::new(HashEmbedder),
            Arc::new(TokenAuthenticator::with_sample_tokens()),
            dir.path().join("prompt_index.json"),
        );
        (state, dir)
    }
}
