use crate::search::SearchEngine;
use domain::models::Passage;
use domain::providers::EmbeddingProvider;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::types::{GeneratorError, Result};
use tracing::{debug, info};

/// In-memory vector index over the reference corpus. Built once, read-only
/// afterwards.
pub struct ContextStore<E> {
    embedder: E,
    passages: Vec<Passage>,
    dimensions: usize,
}

impl<E: EmbeddingProvider> ContextStore<E> {
    /// Embeds every passage, one at a time, in insertion order.
    pub async fn index(texts: Vec<String>, embedder: E) -> Result<Self> {
        info!(passages = texts.len(), "indexing reference corpus");
        let passages: Vec<Passage> = stream::iter(texts.into_iter().enumerate())
            .then(|(position, text)| {
                let embedder = &embedder;
                async move {
                    let vector = embedder.embed(&text).await?;
                    Ok::<_, GeneratorError>(Passage {
                        position,
                        text,
                        vector,
                    })
                }
            })
            .try_collect::<Vec<Passage>>()
            .await?;

        let dimensions = passages.first().map(|p| p.vector.len()).unwrap_or(0);
        for passage in &passages {
            if passage.vector.is_empty() {
                return Err(GeneratorError::Embedding(format!(
                    "empty embedding for passage {}",
                    passage.position
                )));
            }
            if passage.vector.len() != dimensions {
                return Err(GeneratorError::Embedding(format!(
                    "passage {} has {} dimensions, expected {dimensions}",
                    passage.position,
                    passage.vector.len()
                )));
            }
        }
        debug!(dimensions, "corpus indexed");

        Ok(Self {
            embedder,
            passages,
            dimensions,
        })
    }

    /// Returns the `k` passages most similar to `query`, best first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        let query_embedding = self.embedder.embed(query).await?;
        if !self.passages.is_empty() && query_embedding.len() != self.dimensions {
            return Err(GeneratorError::Embedding(format!(
                "query embedding has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }
        Ok(SearchEngine::find_relevant_chunks(
            &query_embedding,
            &self.passages,
            k,
        ))
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}
