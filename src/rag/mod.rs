//! RAG (Retrieval-Augmented Generation) module
//!
//! End-to-end pipeline for answering business questions over customer
//! feedback:
//! - Semantic retrieval against the in-memory embedding index
//! - Similarity floor and top-K ranking
//! - Analyst prompt assembly from the retrieved comments
//! - LLM-based answer generation, with a fixed refusal when no feedback
//!   clears the floor
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use blinkrag::config::AppConfig;
//! use blinkrag::conversation::ConversationState;
//! use blinkrag::index::EmbeddingIndex;
//! use blinkrag::rag::AssistantService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let index = Arc::new(EmbeddingIndex::load(
//!         config.vectors_path(),
//!         config.metadata_path(),
//!     )?);
//!     let assistant = AssistantService::from_config(&config, index)?;
//!
//!     let mut conversation = ConversationState::new();
//!     let outcome = assistant
//!         .answer_turn(&mut conversation, "Why are orders late in HSR Layout?")
//!         .await;
//!     println!("{}", outcome.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod pipeline;
pub mod prompts;
pub mod retriever;

pub use pipeline::AssistantOptions;
pub use pipeline::AssistantService;
pub use pipeline::TurnKind;
pub use pipeline::TurnOutcome;
pub use prompts::build_feedback_analysis_prompt;
pub use prompts::NO_EVIDENCE_REPLY;
pub use prompts::SERVICE_ERROR_REPLY;
pub use retriever::FeedbackRetriever;
pub use retriever::QueryEmbedder;

/// Default number of feedback comments retrieved per question
pub const DEFAULT_TOP_K: usize = 5;

/// Default similarity floor below which feedback is treated as unrelated
pub const DEFAULT_MIN_SCORE: f32 = 0.35;
