// Bio Embedding Providers
//
// Primary: all-MiniLM-L6-v2 sentence embeddings through fastembed (ONNX),
// compiled in with the `sentence-model` feature.
// Fallback: hashed term-frequency vectors, used when the model is not compiled
// in, cannot be loaded, or `hashed` is configured.

use super::bio::{EmbeddingError, HashedEmbedder, TextEmbedder};
use footprint_common::config::IdentityConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Sentence-embedding model name
pub const SENTENCE_MODEL: &str = "all-MiniLM-L6-v2";

/// Model name selecting the hashed embedder directly
pub const HASHED_MODEL: &str = "hashed";

/// Output dimension of all-MiniLM-L6-v2
pub const SENTENCE_DIMENSIONS: usize = 384;

/// Build the bio embedder selected by configuration
///
/// Never fails: a model that cannot be loaded degrades to [`HashedEmbedder`].
pub fn load_embedder(config: &IdentityConfig) -> Arc<dyn TextEmbedder> {
    let model = config.embedding_model.trim();
    let fallback = || -> Arc<dyn TextEmbedder> {
        Arc::new(HashedEmbedder::new(config.embedding_dimensions))
    };

    if model.eq_ignore_ascii_case(HASHED_MODEL) {
        info!(
            "Bio embeddings: hashed ({} dimensions)",
            config.embedding_dimensions
        );
        return fallback();
    }

    match load_sentence_model(model) {
        Ok(embedder) => {
            info!(
                "Bio embeddings: {} ({} dimensions)",
                embedder.name(),
                embedder.dimensions()
            );
            embedder
        }
        Err(e) => {
            warn!(
                model = model,
                error = %e,
                "Sentence model unavailable, degrading to hashed embeddings"
            );
            fallback()
        }
    }
}

#[cfg(feature = "sentence-model")]
fn load_sentence_model(model: &str) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
    if !model.eq_ignore_ascii_case(SENTENCE_MODEL) {
        return Err(EmbeddingError::Unavailable(format!(
            "Unknown embedding model: {}",
            model
        )));
    }
    Ok(Arc::new(sentence::SentenceEmbedder::load()?))
}

#[cfg(not(feature = "sentence-model"))]
fn load_sentence_model(model: &str) -> Result<Arc<dyn TextEmbedder>, EmbeddingError> {
    Err(EmbeddingError::Unavailable(format!(
        "{} requires the sentence-model feature",
        model
    )))
}

#[cfg(feature = "sentence-model")]
pub mod sentence {
    use super::{SENTENCE_DIMENSIONS, SENTENCE_MODEL};
    use crate::fusion::extractors::bio::{EmbeddingError, TextEmbedder};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::sync::Mutex;

    /// all-MiniLM-L6-v2 sentence embedder
    ///
    /// The ONNX session needs exclusive access per inference.
    pub struct SentenceEmbedder {
        model: Mutex<TextEmbedding>,
    }

    impl SentenceEmbedder {
        /// Load the model, downloading it to the fastembed cache on first use
        pub fn load() -> Result<Self, EmbeddingError> {
            let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(false);
            let model = TextEmbedding::try_new(options)
                .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl TextEmbedder for SentenceEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut model = self
                .model
                .lock()
                .map_err(|_| EmbeddingError::Unavailable("Model lock poisoned".to_string()))?;

            let mut vectors = model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

            let vector = vectors
                .pop()
                .ok_or_else(|| EmbeddingError::Unavailable("Empty embedding batch".to_string()))?;

            if vector.len() != SENTENCE_DIMENSIONS {
                return Err(EmbeddingError::DimensionMismatch(
                    vector.len(),
                    SENTENCE_DIMENSIONS,
                ));
            }
            Ok(vector)
        }

        fn dimensions(&self) -> usize {
            SENTENCE_DIMENSIONS
        }

        fn name(&self) -> &str {
            SENTENCE_MODEL
        }
    }
}
