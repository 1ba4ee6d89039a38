//! Embeddings generation module
//!
//! This module provides functionality for generating text embeddings using
//! the providers the feedback index was built with:
//! - OpenAI-compatible embedding endpoints
//! - Ollama (local models)
//!
//! The embedding space must match the stored index end-to-end: one model is
//! pinned in configuration, recorded in the vector artifact, and checked when
//! the retriever is constructed. Mixing models would silently produce
//! meaningless similarity scores.
//!
//! # Examples
//!
//! ```rust,no_run
//! use blinkrag::embeddings::EmbeddingService;
//! use blinkrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("deliveries late in Indiranagar").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod generator;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use generator::EmbeddingService;

/// Maximum batch size for embedding generation
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub dimension: usize,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl EmbeddingConfig {
    pub fn from_app_config(config: &crate::config::AppConfig) -> Self {
        // Hosted OpenAI-compatible endpoints need a key; anything local is
        // assumed to be Ollama
        let endpoint = config.embedding_endpoint();
        let provider = if config.embeddings.api_key.is_some() || endpoint.contains("api.openai.com")
        {
            EmbeddingProvider::OpenAI
        } else {
            EmbeddingProvider::Ollama
        };

        Self {
            provider,
            model: config.embedding_model().to_string(),
            dimension: config.embedding_dimension(),
            endpoint: endpoint.to_string(),
            api_key: config.embeddings.api_key.clone(),
        }
    }
}

/// Normalize whitespace before embedding
///
/// Empty or whitespace-only input is passed through unchanged - questions are
/// embedded and scored normally, the threshold filter decides what survives.
#[must_use]
pub fn preprocess_text_for_embedding(text: &str) -> String {
    let normalized = text
        .replace("\r\n", " ")
        .replace(['\n', '\r', '\t'], " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    if normalized.is_empty() {
        text.to_string()
    } else {
        normalized
    }
}
