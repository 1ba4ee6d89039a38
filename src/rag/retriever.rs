//! Retrieval over the feedback embedding index

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingService;
use crate::errors::BlinkRagError;
use crate::errors::Result;
use crate::index::EmbeddingIndex;
use crate::models::RetrievedFeedback;

/// Seam for query embedding so tests can substitute fixed vectors
#[allow(async_fn_in_trait)]
pub trait QueryEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn model(&self) -> &str;
    fn dimension(&self) -> usize;
}

impl QueryEmbedder for EmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.generate(text).await
    }

    fn model(&self) -> &str {
        EmbeddingService::model(self)
    }

    fn dimension(&self) -> usize {
        EmbeddingService::dimension(self)
    }
}

/// Retriever for semantically similar feedback comments
pub struct FeedbackRetriever<E = EmbeddingService> {
    index: Arc<EmbeddingIndex>,
    embedder: Arc<E>,
}

impl<E: QueryEmbedder> FeedbackRetriever<E> {
    /// Create a new retriever
    ///
    /// # Errors
    /// - `ModelMismatch`/`DimensionMismatch` when the embedder does not
    ///   produce vectors in the index's embedding space
    pub fn new(index: Arc<EmbeddingIndex>, embedder: Arc<E>) -> Result<Self> {
        if embedder.model() != index.model() {
            return Err(BlinkRagError::ModelMismatch {
                expected: index.model().to_string(),
                actual: embedder.model().to_string(),
            });
        }
        if embedder.dimension() != index.dimension() {
            return Err(BlinkRagError::DimensionMismatch {
                expected: index.dimension(),
                actual: embedder.dimension(),
            });
        }

        Ok(Self { index, embedder })
    }

    /// Retrieve the `top_k` most similar feedback comments scoring at least
    /// `min_score`, sorted descending by similarity
    ///
    /// An empty result means no stored feedback is close enough to the
    /// question; callers must not synthesize an answer from it.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        min_score: f32,
    ) -> Result<Vec<RetrievedFeedback>> {
        debug!("Retrieving feedback for query: {}", query);

        let query_vector = self.embedder.embed(query).await?;
        let scores = self.index.similarities(&query_vector)?;
        let ranked = rank_by_score(&scores, top_k, min_score);

        debug!(
            "Retrieved {} of {} feedback comments (top_k={}, min_score={})",
            ranked.len(),
            self.index.len(),
            top_k,
            min_score
        );

        Ok(ranked
            .into_iter()
            .map(|(position, score)| RetrievedFeedback {
                record: self.index.record(position).clone(),
                score,
            })
            .collect())
    }

    /// Get the underlying index
    #[must_use]
    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }
}

/// Rank index positions by score: apply the floor, sort descending, cap at
/// `top_k`. The sort is stable, so equal scores keep original index order.
fn rank_by_score(scores: &[f32], top_k: usize, min_score: f32) -> Vec<(usize, f32)> {
    let mut survivors: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, score)| score >= min_score)
        .collect();

    survivors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    survivors.truncate(top_k);
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VectorArtifact;
    use crate::models::FeedbackRecord;

    struct StubEmbedder {
        model: &'static str,
        dimension: usize,
    }

    impl QueryEmbedder for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; self.dimension])
        }

        fn model(&self) -> &str {
            self.model
        }

        fn dimension(&self) -> usize {
            self.dimension
        }
    }

    fn two_dim_index(model: &str) -> Arc<EmbeddingIndex> {
        Arc::new(
            EmbeddingIndex::from_parts(
                VectorArtifact {
                    model: model.to_string(),
                    dimension: 2,
                    vectors: vec![vec![1.0, 0.0]],
                },
                vec![FeedbackRecord {
                    id: 1,
                    raw_text: "late order".to_string(),
                    clean_text: "late order".to_string(),
                }],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_rejects_model_mismatch() {
        let result = FeedbackRetriever::new(
            two_dim_index("all-minilm"),
            Arc::new(StubEmbedder {
                model: "nomic-embed-text",
                dimension: 2,
            }),
        );
        assert!(matches!(result, Err(BlinkRagError::ModelMismatch { .. })));
    }

    #[test]
    fn test_new_rejects_dimension_mismatch() {
        let result = FeedbackRetriever::new(
            two_dim_index("all-minilm"),
            Arc::new(StubEmbedder {
                model: "all-minilm",
                dimension: 384,
            }),
        );
        assert!(matches!(
            result,
            Err(BlinkRagError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rank_filters_below_floor_and_sorts_descending() {
        let scores = [0.2, 0.9, 0.5];
        let ranked = rank_by_score(&scores, 5, 0.35);
        assert_eq!(ranked, vec![(1, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_rank_caps_at_top_k() {
        let scores = [0.4, 0.5, 0.6, 0.7];
        let ranked = rank_by_score(&scores, 2, 0.35);
        assert_eq!(ranked, vec![(3, 0.7), (2, 0.6)]);
    }

    #[test]
    fn test_rank_top_k_zero_returns_empty() {
        let scores = [0.9, 0.8];
        assert!(rank_by_score(&scores, 0, 0.35).is_empty());
    }

    #[test]
    fn test_rank_all_below_floor_returns_empty() {
        let scores = [0.1, 0.2, 0.3];
        assert!(rank_by_score(&scores, 5, 0.35).is_empty());
    }

    #[test]
    fn test_rank_ties_keep_original_index_order() {
        let scores = [0.3, 0.6, 0.9, 0.6];
        let ranked = rank_by_score(&scores, 5, 0.35);
        assert_eq!(ranked, vec![(2, 0.9), (1, 0.6), (3, 0.6)]);
    }

    #[test]
    fn test_rank_raising_floor_never_adds_matches() {
        let scores = [0.1, 0.36, 0.5, 0.7, 0.34, 0.9];
        let mut previous = rank_by_score(&scores, 10, 0.0).len();
        for floor in [0.2, 0.35, 0.5, 0.8, 1.0] {
            let count = rank_by_score(&scores, 10, floor).len();
            assert!(count <= previous, "floor {floor} increased match count");
            previous = count;
        }
    }
}
