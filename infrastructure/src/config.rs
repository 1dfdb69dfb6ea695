use crate::embedder::{Embedder, HashingEmbedder, OllamaEmbedder, DEFAULT_DIMENSIONS};
use crate::groq_client::GroqClient;
use crate::ollama_client::OllamaClient;
use domain::corpus::default_passages;
use domain::models::GenerationOptions;
use dotenvy::dotenv;
use shared::types::{GeneratorError, Result};
use shared::utils::paragraphs;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_EMBED_MODEL: &str = "all-minilm";
pub const DEFAULT_INPUT_PATH: &str = "test_cases.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    Hashing,
    Ollama,
}

impl FromStr for EmbeddingBackend {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashing" => Ok(Self::Hashing),
            "ollama" => Ok(Self::Ollama),
            other => Err(GeneratorError::Config(format!(
                "unknown embedding backend {other:?} (expected hashing or ollama)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub groq_model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_dimensions: usize,
    pub ollama_base_url: String,
    pub ollama_embed_model: String,
    pub input_path: PathBuf,
    pub context_file: Option<PathBuf>,
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            temperature: 0.0,
            request_timeout: Duration::from_secs(60),
            embedding_backend: EmbeddingBackend::Hashing,
            embedding_dimensions: DEFAULT_DIMENSIONS,
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            ollama_embed_model: DEFAULT_OLLAMA_EMBED_MODEL.to_string(),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            context_file: None,
            top_k: 1,
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| GeneratorError::Config(format!("{key}={value:?} is not valid")))
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.groq_api_key = get("GROQ_API_KEY");
        if let Some(v) = get("GROQ_BASE_URL") {
            config.groq_base_url = v;
        }
        if let Some(v) = get("GROQ_MODEL") {
            config.groq_model = v;
        }
        if let Some(v) = get("GROQ_TEMPERATURE") {
            config.temperature = parse("GROQ_TEMPERATURE", &v)?;
        }
        if let Some(v) = get("GROQ_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse("GROQ_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("EMBEDDING_BACKEND") {
            config.embedding_backend = v.parse()?;
        }
        if let Some(v) = get("EMBEDDING_DIMENSIONS") {
            config.embedding_dimensions = parse("EMBEDDING_DIMENSIONS", &v)?;
        }
        if let Some(v) = get("OLLAMA_BASE_URL") {
            config.ollama_base_url = v;
        }
        if let Some(v) = get("OLLAMA_EMBED_MODEL") {
            config.ollama_embed_model = v;
        }
        if let Some(v) = get("INPUT_PATH") {
            config.input_path = PathBuf::from(v);
        }
        config.context_file = get("CONTEXT_FILE").map(PathBuf::from);
        if let Some(v) = get("TOP_K") {
            config.top_k = parse("TOP_K", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(GeneratorError::Config("top_k must be at least 1".into()));
        }
        if self.embedding_dimensions == 0 {
            return Err(GeneratorError::Config(
                "embedding dimensions must be at least 1".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(GeneratorError::Config(
                "request timeout must be at least 1 second".into(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(GeneratorError::Config(format!(
                "temperature {} must be a non-negative number",
                self.temperature
            )));
        }
        Ok(())
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            model: self.groq_model.clone(),
            temperature: self.temperature,
        }
    }

    pub fn build_embedder(&self) -> Embedder {
        match self.embedding_backend {
            EmbeddingBackend::Hashing => {
                Embedder::Hashing(HashingEmbedder::new(self.embedding_dimensions))
            }
            EmbeddingBackend::Ollama => Embedder::Ollama(OllamaEmbedder::new(OllamaClient::new(
                &self.ollama_base_url,
                &self.ollama_embed_model,
            ))),
        }
    }

    pub fn build_generator(&self) -> Result<GroqClient> {
        GroqClient::new(
            self.groq_api_key.clone(),
            &self.groq_base_url,
            self.request_timeout,
        )
    }

    /// The built-in passage, or the blank-line separated passages of the
    /// configured context file.
    pub fn load_passages(&self) -> Result<Vec<String>> {
        let Some(path) = &self.context_file else {
            return Ok(default_passages());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("cannot read context file {}: {e}", path.display()))
        })?;
        let passages = paragraphs(&text);
        if passages.is_empty() {
            return Err(GeneratorError::Config(format!(
                "context file {} has no passages",
                path.display()
            )));
        }
        Ok(passages)
    }
}
