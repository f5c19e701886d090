//! Semantic similarity between resume and job text.
//!
//! `SimilarityScorer` owns one `Embedder` built at startup and shared
//! read-only across analyses. Two backends are available:
//! - `HashEmbedder`: FNV-1a feature hashing, deterministic, no model files.
//! - `MiniLmEmbedder` (feature `fastembed`): pretrained all-MiniLM-L6-v2.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::text::clean_text;

/// Default embedding dimension (matches all-MiniLM-L6-v2).
pub const DEFAULT_DIM: usize = 384;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding model failed: {0}")]
    Model(String),

    #[error("Embedding produced an empty vector")]
    Empty,

    #[error("Unknown embedding backend '{0}' (expected 'hash' or 'minilm')")]
    UnknownBackend(String),
}

/// Maps text to a fixed-length dense vector. Implementations must be
/// reentrant: one instance serves concurrent analyses.
pub trait Embedder: Send + Sync {
    fn name(&self) -> &'static str;

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Cosine similarity
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity in -1..1. Mismatched lengths or zero vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scales a cosine similarity to a 0–100 percentage with two decimals.
pub fn to_percentage(similarity: f32) -> f64 {
    let pct = (f64::from(similarity) * 100.0).clamp(0.0, 100.0);
    (pct * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// SimilarityScorer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn backend(&self) -> &'static str {
        self.embedder.name()
    }

    /// Returns the semantic match score in [0, 100].
    ///
    /// Empty (or whitespace-only) input on either side scores 0 without
    /// reaching the model. Embedding failures are logged and also score 0.
    pub fn score(&self, resume_text: &str, job_text: &str) -> f64 {
        let resume = clean_text(resume_text);
        let job = clean_text(job_text);

        if resume.is_empty() || job.is_empty() {
            return 0.0;
        }

        let vectors = self
            .embedder
            .embed(&resume)
            .and_then(|r| self.embedder.embed(&job).map(|j| (r, j)));

        match vectors {
            Ok((resume_vec, job_vec)) => to_percentage(cosine_similarity(&resume_vec, &job_vec)),
            Err(e) => {
                warn!("Similarity scoring failed ({}): {e}", self.embedder.name());
                0.0
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HashEmbedder
// ────────────────────────────────────────────────────────────────────────────

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Weight of a character trigram relative to a whole word.
const TRIGRAM_WEIGHT: f32 = 0.5;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// Feature-hashing embedder. Words and their character trigrams are hashed
/// into `dim` buckets, counts are dampened with `ln(1 + n)`, and the vector is
/// L2-normalised. All components are non-negative, so similarity is in 0..1.
pub struct HashEmbedder {
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: DEFAULT_DIM }
    }
}

impl HashEmbedder {
    fn bucket(&self, feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % self.dim as u64) as usize
    }
}

impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut counts = vec![0.0_f32; self.dim];

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            counts[self.bucket(&word)] += 1.0;

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                counts[self.bucket(&gram)] += TRIGRAM_WEIGHT;
            }
        }

        let mut vector: Vec<f32> = counts.into_iter().map(f32::ln_1p).collect();
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Err(EmbeddingError::Empty);
        }
        vector.iter_mut().for_each(|x| *x /= norm);

        Ok(vector)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MiniLmEmbedder
// ────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "fastembed")]
pub use minilm::MiniLmEmbedder;

#[cfg(feature = "fastembed")]
mod minilm {
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

    use super::{Embedder, EmbeddingError};

    /// Pretrained all-MiniLM-L6-v2 via fastembed (ONNX runtime).
    /// Weights are fetched into the fastembed cache on first construction.
    pub struct MiniLmEmbedder {
        model: TextEmbedding,
    }

    impl MiniLmEmbedder {
        pub fn load() -> Result<Self, EmbeddingError> {
            let model = TextEmbedding::try_new(
                InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
            )
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

            Ok(Self { model })
        }
    }

    impl Embedder for MiniLmEmbedder {
        fn name(&self) -> &'static str {
            "minilm"
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Model(e.to_string()))?
                .into_iter()
                .next()
                .ok_or(EmbeddingError::Empty)
        }
    }
}

/// Builds the embedder named by `EMBEDDING_BACKEND`.
pub fn build_embedder(backend: &str) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match backend.trim().to_lowercase().as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::default())),
        #[cfg(feature = "fastembed")]
        "minilm" => Ok(Arc::new(MiniLmEmbedder::load()?)),
        #[cfg(not(feature = "fastembed"))]
        "minilm" => Err(EmbeddingError::Model(
            "the 'minilm' backend requires building with --features fastembed".to_string(),
        )),
        other => Err(EmbeddingError::UnknownBackend(other.to_string())),
    }
}
