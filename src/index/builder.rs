//! Offline construction of the embedding index artifacts
//!
//! Takes a JSON export of feedback records, embeds each comment through the
//! configured embedding provider, and writes the matched vector/metadata
//! pair that `EmbeddingIndex::load` expects. Records with no usable text are
//! skipped so the written pair stays index-aligned.

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing::warn;

use super::VectorArtifact;
use crate::embeddings::EmbeddingService;
use crate::errors::BlinkRagError;
use crate::errors::Result;
use crate::models::FeedbackRecord;

/// Builder that turns feedback records into the on-disk artifact pair
pub struct IndexBuilder {
    embedding_service: Arc<EmbeddingService>,
}

impl IndexBuilder {
    pub fn new(embedding_service: Arc<EmbeddingService>) -> Self {
        Self { embedding_service }
    }

    /// Embed every record and assemble the artifact pair in memory
    ///
    /// # Errors
    /// - Embedding API failures (network, auth, rate limits)
    /// - A returned vector whose width disagrees with the configured dimension
    pub async fn build(
        &self,
        records: Vec<FeedbackRecord>,
    ) -> Result<(VectorArtifact, Vec<FeedbackRecord>)> {
        let mut kept = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for record in records {
            if record.text().trim().is_empty() {
                warn!("Skipping feedback {} (no text)", record.id);
                skipped += 1;
                continue;
            }
            kept.push(record);
        }

        info!(
            "Embedding {} feedback records ({} skipped)",
            kept.len(),
            skipped
        );

        let texts: Vec<&str> = kept.iter().map(FeedbackRecord::text).collect();
        let vectors = self.embedding_service.generate_batch(texts).await?;

        let dimension = self.embedding_service.dimension();
        for (record, vector) in kept.iter().zip(&vectors) {
            if vector.len() != dimension {
                return Err(BlinkRagError::EmbeddingError(format!(
                    "embedding for feedback {} has dimension {}, expected {}",
                    record.id,
                    vector.len(),
                    dimension
                )));
            }
        }

        let artifact = VectorArtifact {
            model: self.embedding_service.model().to_string(),
            dimension,
            vectors,
        };

        Ok((artifact, kept))
    }
}

/// Read a JSON export of feedback records
pub fn read_seed_records<P: AsRef<Path>>(path: P) -> Result<Vec<FeedbackRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        BlinkRagError::IndexData(format!("cannot read feedback export {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        BlinkRagError::IndexData(format!(
            "cannot parse feedback export {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_seed_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "raw_text": "Driver was late", "clean_text": "driver was late"}]"#,
        )
        .unwrap();

        let records = read_seed_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].text(), "driver was late");
    }

    #[test]
    fn test_read_seed_records_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            read_seed_records(&path),
            Err(BlinkRagError::IndexData(_))
        ));
    }
}
