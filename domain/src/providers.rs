use crate::models::{GenerationOptions, GenerationResult, PromptRequest};
use shared::types::Result;

/// Maps text to a fixed-length vector.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> impl std::future::Future<Output = Result<Vec<f32>>> + Send;
}

/// Turns a composed prompt into generated text.
pub trait TextGenerator {
    fn generate(
        &self,
        request: &PromptRequest,
        options: &GenerationOptions,
    ) -> impl std::future::Future<Output = Result<GenerationResult>> + Send;
}
