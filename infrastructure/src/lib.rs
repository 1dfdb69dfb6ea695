pub mod config;
pub mod context_store;
pub mod embedder;
pub mod groq_client;
pub mod ollama_client;
pub mod search;
