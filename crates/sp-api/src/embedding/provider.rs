//! Embedding provider trait and the FastEmbed implementation.

use std::sync::Arc;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("model initialization failed: {0}")]
    Init(String),

    #[error("embedding generation failed: {0}")]
    Generation(String),

    #[error("empty input text")]
    EmptyInput,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Converts text into fixed-size dense vectors.
///
/// Implementations must be deterministic for identical input and return
/// L2-normalized vectors, so that dot product equals cosine similarity.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Local embedding generation via FastEmbed (ONNX, no API calls).
///
/// Models are downloaded to the Hugging Face cache on first use; the default
/// all-MiniLM-L6-v2 is ~90MB and produces 384-d normalized vectors.
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl FastEmbedder {
    pub fn new(model_name: &str) -> Result<Self, EmbedError> {
        let embedding_model = match model_name {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
            "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            "bge-base-en-v1.5" => EmbeddingModel::BGEBaseENV15,
            _ => {
                return Err(EmbedError::Init(format!(
                    "unsupported model: {model_name}. Supported: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5"
                )));
            }
        };

        let dimension = match embedding_model {
            EmbeddingModel::BGEBaseENV15 => 768,
            _ => 384,
        };

        tracing::info!(model = model_name, dimension, "initializing embedding model");

        let init_options = InitOptions::new(embedding_model).with_show_download_progress(true);
        let model =
            TextEmbedding::try_new(init_options).map_err(|e| EmbedError::Init(e.to_string()))?;

        Ok(Self {
            model: Arc::new(model),
            model_name: model_name.to_string(),
            dimension,
        })
    }

    pub fn with_default_model() -> Result<Self, EmbedError> {
        Self::new("all-MiniLM-L6-v2")
    }
}

impl TextEmbedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        if text.is_empty() {
            return Err(EmbedError::EmptyInput);
        }

        let mut embeddings = self
            .model
            .embed(vec![text.to_string()], None)
            .map_err(|e| EmbedError::Generation(e.to_string()))?;

        let embedding = embeddings
            .pop()
            .ok_or_else(|| EmbedError::Generation("no embeddings generated".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.iter().any(String::is_empty) {
            return Err(EmbedError::EmptyInput);
        }

        let embeddings = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbedError::Generation(e.to_string()))?;

        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbedError::DimensionMismatch {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}


#[cfg(test)]
mod tests {
    use super::testing::HashEmbedder;
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn hash_embedder_is_deterministic_and_normalized() {
        let embedder = HashEmbedder;
        let a = embedder.embed("widget stock details").unwrap();
        let b = embedder.embed("widget stock details").unwrap();
        assert_eq!(a, b);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn hash_embedder_separates_unrelated_texts() {
        let embedder = HashEmbedder;
        let a = embedder.embed("widget stock details").unwrap();
        let b = embedder.embed("xyz123 random gibberish").unwrap();
        assert!(dot(&a, &b).abs() < 0.45);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let err = FastEmbedder::new("word2vec").unwrap_err();
        assert!(matches!(err, EmbedError::Init(_)));
    }

    #[test]
    #[ignore] // requires model download (~90MB): cargo test -- --ignored
    fn fastembed_verbatim_similarity() {
        let embedder = FastEmbedder::with_default_model().unwrap();
        assert_eq!(embedder.dimension(), 384);

        let a = embedder.embed("what is the forecast for widget").unwrap();
        let b = embedder.embed("what is the forecast for widget").unwrap();
        assert!(dot(&a, &b) > 0.99);
    }
}
