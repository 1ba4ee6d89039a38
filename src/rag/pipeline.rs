//! Complete assistant pipeline: Retrieve -> Synthesize -> Record
//!
//! Every user question becomes exactly one retrieval call and at most one
//! generation call, strictly in that order. Per-question failures are caught
//! at the turn boundary and converted to a user-visible message appended to
//! the conversation like any other answer; only load-time errors are fatal.

use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::config::AppConfig;
use crate::conversation::ConversationState;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::index::EmbeddingIndex;
use crate::llm::LlmService;
use crate::llm::TextGenerator;
use crate::models::RetrievedFeedback;
use crate::rag::build_feedback_analysis_prompt;
use crate::rag::FeedbackRetriever;
use crate::rag::QueryEmbedder;
use crate::rag::NO_EVIDENCE_REPLY;
use crate::rag::SERVICE_ERROR_REPLY;

/// Tunable parameters for one assistant instance
#[derive(Debug, Clone, Copy)]
pub struct AssistantOptions {
    pub top_k: usize,
    pub min_score: f32,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl AssistantOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            top_k: config.top_k(),
            min_score: config.min_score(),
            temperature: config.temperature(),
            max_tokens: config.max_tokens(),
        }
    }
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            top_k: crate::rag::DEFAULT_TOP_K,
            min_score: crate::rag::DEFAULT_MIN_SCORE,
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

/// How a turn was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// Answer synthesized from retrieved feedback
    Answered,
    /// No stored feedback cleared the similarity floor
    NoEvidence,
    /// Retrieval or generation failed after retries
    ServiceError,
}

/// Result of one question/answer cycle
#[derive(Debug)]
pub struct TurnOutcome {
    pub answer: String,
    pub sources: Vec<RetrievedFeedback>,
    pub kind: TurnKind,
}

/// Assistant over the feedback index with an injectable generation client
pub struct AssistantService<E = EmbeddingService, G = LlmService> {
    retriever: FeedbackRetriever<E>,
    generator: G,
    options: AssistantOptions,
}

impl AssistantService {
    /// Create the production assistant from configuration and a loaded index
    ///
    /// # Errors
    /// - Embedding service configuration errors
    /// - Embedder/index model or dimension mismatch
    /// - LLM service configuration errors (missing credential)
    pub fn from_config(config: &AppConfig, index: Arc<EmbeddingIndex>) -> Result<Self> {
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        let retriever = FeedbackRetriever::new(index, embedding_service)?;
        let llm_service = LlmService::new(config)?;

        Ok(Self {
            retriever,
            generator: llm_service,
            options: AssistantOptions::from_config(config),
        })
    }
}

impl<E: QueryEmbedder, G: TextGenerator> AssistantService<E, G> {
    /// Create from existing services
    pub fn new(retriever: FeedbackRetriever<E>, generator: G, options: AssistantOptions) -> Self {
        Self {
            retriever,
            generator,
            options,
        }
    }

    /// Handle one full question/answer cycle against a session's conversation
    ///
    /// Appends the user turn, resolves the answer, appends the assistant
    /// turn. Never fails: per-question errors become the assistant turn's
    /// text.
    pub async fn answer_turn(
        &self,
        conversation: &mut ConversationState,
        question: &str,
    ) -> TurnOutcome {
        conversation.push_user(question);
        let outcome = self.answer(question).await;
        conversation.push_assistant(outcome.answer.clone());
        outcome
    }

    /// Resolve one question, catching per-question errors
    pub async fn answer(&self, question: &str) -> TurnOutcome {
        match self.try_answer(question).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Turn failed: {e}");
                TurnOutcome {
                    answer: SERVICE_ERROR_REPLY.to_string(),
                    sources: Vec::new(),
                    kind: TurnKind::ServiceError,
                }
            }
        }
    }

    async fn try_answer(&self, question: &str) -> Result<TurnOutcome> {
        info!("Processing question: {}", question);

        debug!("Step 1: Retrieving feedback");
        let retrieved = self
            .retriever
            .retrieve(question, self.options.top_k, self.options.min_score)
            .await?;

        // Refuse rather than let the model answer from nothing
        if retrieved.is_empty() {
            info!("No feedback cleared the similarity floor, refusing");
            return Ok(TurnOutcome {
                answer: NO_EVIDENCE_REPLY.to_string(),
                sources: Vec::new(),
                kind: TurnKind::NoEvidence,
            });
        }

        debug!("Step 2: Generating answer from {} comments", retrieved.len());
        let texts: Vec<&str> = retrieved.iter().map(|r| r.record.text()).collect();
        let prompt = build_feedback_analysis_prompt(question, &texts);
        let answer = self
            .generator
            .generate(&prompt, self.options.temperature, self.options.max_tokens)
            .await?;

        info!("Question answered from {} feedback comments", retrieved.len());

        Ok(TurnOutcome {
            answer,
            sources: retrieved,
            kind: TurnKind::Answered,
        })
    }

    /// Retrieval without generation, for inspection tooling
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievedFeedback>> {
        self.retriever.retrieve(query, limit, min_score).await
    }

    /// Get retriever reference
    #[must_use]
    pub fn retriever(&self) -> &FeedbackRetriever<E> {
        &self.retriever
    }

    /// Get the options in effect
    #[must_use]
    pub const fn options(&self) -> &AssistantOptions {
        &self.options
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted embedder and generator for exercising the pipeline offline

    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::errors::BlinkRagError;
    use crate::index::VectorArtifact;
    use crate::models::FeedbackRecord;

    /// Embedder returning a fixed unit vector for every query
    pub struct FixedEmbedder {
        pub vector: Vec<f32>,
    }

    impl QueryEmbedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        fn model(&self) -> &str {
            "fixed-test-model"
        }

        fn dimension(&self) -> usize {
            self.vector.len()
        }
    }

    /// Generator that counts calls and replies with a script
    pub struct ScriptedGenerator {
        pub reply: Result<String>,
        pub calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        pub fn answering(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(BlinkRagError::GenerationError(message.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl TextGenerator for &ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _temperature: f32,
            _max_tokens: usize,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(BlinkRagError::GenerationError(e.to_string())),
            }
        }
    }

    /// Index whose stored vectors have the given cosine similarities against
    /// the unit query vector [1, 0]
    pub fn index_with_similarities(similarities: &[f32]) -> Arc<EmbeddingIndex> {
        let vectors = similarities
            .iter()
            .map(|&s| vec![s, (1.0 - s * s).max(0.0).sqrt()])
            .collect();

        let records = similarities
            .iter()
            .enumerate()
            .map(|(i, _)| FeedbackRecord {
                id: i as i64 + 1,
                raw_text: format!("feedback {}", i + 1),
                clean_text: format!("feedback {}", i + 1),
            })
            .collect();

        Arc::new(
            EmbeddingIndex::from_parts(
                VectorArtifact {
                    model: "fixed-test-model".to_string(),
                    dimension: 2,
                    vectors,
                },
                records,
            )
            .unwrap(),
        )
    }

    pub fn assistant<'a>(
        similarities: &[f32],
        generator: &'a ScriptedGenerator,
    ) -> AssistantService<FixedEmbedder, &'a ScriptedGenerator> {
        let retriever = FeedbackRetriever::new(
            index_with_similarities(similarities),
            Arc::new(FixedEmbedder {
                vector: vec![1.0, 0.0],
            }),
        )
        .unwrap();

        AssistantService::new(retriever, generator, AssistantOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn test_retriever_rejects_mismatched_embedder() {
        let index = index_with_similarities(&[0.9]);
        let embedder = Arc::new(FixedEmbedder {
            vector: vec![1.0, 0.0, 0.0],
        });
        assert!(FeedbackRetriever::new(index, embedder).is_err());
    }

    #[tokio::test]
    async fn test_answer_uses_top_matches_in_order() {
        let generator = ScriptedGenerator::answering("riders are overloaded at peak hours");
        let assistant = assistant(&[0.9, 0.5, 0.2], &generator);

        let outcome = assistant.answer("why are deliveries late?").await;

        assert_eq!(outcome.kind, TurnKind::Answered);
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(outcome.sources[0].record.id, 1);
        assert_eq!(outcome.sources[1].record.id, 2);
        assert!(outcome.sources[0].score >= outcome.sources[1].score);
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_evidence_refuses_without_calling_generator() {
        let generator = ScriptedGenerator::answering("should never be used");
        let assistant = assistant(&[0.3, 0.1, 0.2], &generator);

        let mut conversation = ConversationState::new();
        let outcome = assistant
            .answer_turn(&mut conversation, "what about drone deliveries?")
            .await;

        assert_eq!(outcome.kind, TurnKind::NoEvidence);
        assert_eq!(outcome.answer, NO_EVIDENCE_REPLY);
        assert!(outcome.sources.is_empty());
        assert_eq!(generator.call_count(), 0);
        assert_eq!(conversation.turns()[1].text, NO_EVIDENCE_REPLY);
    }

    #[tokio::test]
    async fn test_generation_failure_is_distinct_from_refusal() {
        let generator = ScriptedGenerator::failing("rate limited");
        let assistant = assistant(&[0.9], &generator);

        let mut conversation = ConversationState::new();
        let outcome = assistant
            .answer_turn(&mut conversation, "why churn in May?")
            .await;

        assert_eq!(outcome.kind, TurnKind::ServiceError);
        assert_eq!(outcome.answer, SERVICE_ERROR_REPLY);
        assert_ne!(outcome.answer, NO_EVIDENCE_REPLY);
        // session survives the failure
        assert_eq!(conversation.len(), 2);
    }

    #[tokio::test]
    async fn test_conversation_shape_after_n_cycles() {
        let generator = ScriptedGenerator::answering("packaging complaints dominate");
        let assistant = assistant(&[0.9, 0.6], &generator);

        let mut conversation = ConversationState::new();
        for i in 0..4 {
            assistant
                .answer_turn(&mut conversation, &format!("question {i}"))
                .await;
        }

        assert_eq!(conversation.len(), 8);
        for (idx, turn) in conversation.turns().iter().enumerate() {
            let expected = if idx % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            assert_eq!(turn.role, expected);
        }
    }

    #[tokio::test]
    async fn test_tied_scores_keep_original_index_order() {
        let generator = ScriptedGenerator::answering("ok");
        let assistant = assistant(&[0.6, 0.9, 0.6], &generator);

        let sources = assistant.search("q", 5, 0.35).await.unwrap();
        let ids: Vec<i64> = sources.iter().map(|s| s.record.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
