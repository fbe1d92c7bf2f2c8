// Bio Signal
//
// Dense-embedding cosine similarity of two profile bios.
// Identical strings short-circuit to 1.0 without embedding.

use crate::fusion::Confidence;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Embedding failure (degrades the bio signal to 0.0)
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding provider unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding dimension mismatch: {0} vs {1}")]
    DimensionMismatch(usize, usize),
}

/// Sentence embedding provider
///
/// Implementations map text to a fixed-size dense vector. The bio signal only
/// relies on cosine similarity, so vectors need not be normalized.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}

/// Hashed term-frequency embedder
///
/// Hashes terms into fixed-dimension buckets weighted by frequency and a
/// length-based IDF approximation. Deterministic and always available, so it
/// backs the sentence model when that cannot be loaded.
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket index
    fn bucket(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }
}

impl TextEmbedder for HashedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let tokens = Self::tokenize(text);
        let mut vector = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return Ok(vector);
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for token in &tokens {
            *tf.entry(token.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in tf {
            let idf = 1.0 + (term.len() as f32).ln();
            vector[Self::bucket(term, self.dimensions)] += (count / total) * idf;
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-tf"
    }
}

/// Similarity of two bios (0.0-1.0)
///
/// Missing or empty bio on either side → 0.0. Any embedding failure → 0.0.
pub fn bio_similarity(
    embedder: &dyn TextEmbedder,
    bio1: Option<&str>,
    bio2: Option<&str>,
) -> Confidence {
    let (Some(bio1), Some(bio2)) = (
        bio1.filter(|b| !b.is_empty()),
        bio2.filter(|b| !b.is_empty()),
    ) else {
        return 0.0;
    };

    if bio1 == bio2 {
        return 1.0;
    }

    let embedded = embedder
        .embed(bio1)
        .and_then(|v1| embedder.embed(bio2).map(|v2| (v1, v2)));

    match embedded.and_then(|(v1, v2)| cosine_similarity(&v1, &v2)) {
        Ok(similarity) => similarity.clamp(0.0, 1.0),
        Err(e) => {
            debug!("Bio embedding via {} failed: {}", embedder.name(), e);
            0.0
        }
    }
}

/// Cosine similarity; zero vectors compare as 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch(a.len(), b.len()));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}
