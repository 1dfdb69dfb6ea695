use domain::models::{GenerationOptions, GenerationResult, PromptRequest};
use domain::prompt::PromptTemplate;
use domain::providers::{EmbeddingProvider, TextGenerator};
use infrastructure::context_store::ContextStore;
use shared::types::Result;
use tracing::debug;

/// Retrieve, compose and generate for a single test case.
pub struct RagService<E, G> {
    store: ContextStore<E>,
    generator: G,
    template: PromptTemplate,
    options: GenerationOptions,
    top_k: usize,
}

impl<E, G> RagService<E, G>
where
    E: EmbeddingProvider,
    G: TextGenerator,
{
    /// Fails with a format error up front if the template cannot be filled.
    pub fn new(
        store: ContextStore<E>,
        generator: G,
        template: PromptTemplate,
        options: GenerationOptions,
        top_k: usize,
    ) -> Result<Self> {
        template.validate()?;
        Ok(Self {
            store,
            generator,
            template,
            options,
            top_k,
        })
    }

    pub async fn retrieve_context(&self, query: &str) -> Result<String> {
        let passages = self.store.retrieve(query, self.top_k).await?;
        debug!(retrieved = passages.len(), "context retrieved");
        Ok(passages.join("\n"))
    }

    pub fn compose(&self, context: &str, query: &str) -> Result<PromptRequest> {
        self.template.compose(context, query)
    }

    pub async fn generate_test(&self, query: &str) -> Result<GenerationResult> {
        let context = self.retrieve_context(query).await?;
        let request = self.compose(&context, query)?;
        self.generator.generate(&request, &self.options).await
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &ContextStore<E> {
        &self.store
    }
}
