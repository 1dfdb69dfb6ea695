use super::ollama_client::OllamaClient;
use domain::providers::EmbeddingProvider;
use shared::types::{GeneratorError, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const DEFAULT_DIMENSIONS: usize = 256;

/// Offline embedder: signed feature hashing of lowercase word tokens,
/// L2-normalised. Same input always yields the same vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }
}

/// Embeddings from an Ollama model (e.g. `all-minilm`).
#[derive(Clone)]
pub struct OllamaEmbedder {
    client: OllamaClient,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.generate_embedding(text).await.map_err(|e| {
            GeneratorError::Embedding(format!("ollama model {}: {e}", self.client.model()))
        })
    }
}

/// The embedder selected by configuration.
#[derive(Clone)]
pub enum Embedder {
    Hashing(HashingEmbedder),
    Ollama(OllamaEmbedder),
}

impl EmbeddingProvider for Embedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Self::Hashing(e) => e.embed(text).await,
            Self::Ollama(e) => e.embed(text).await,
        }
    }
}
