//! Immutable embedding index over historical feedback
//!
//! Two artifacts form a matched pair on disk: a vector collection tagged with
//! the embedding model that produced it, and a metadata table of feedback
//! records. The vector at position `i` corresponds to the record at position
//! `i`; that alignment is checked once at load and preserved by construction
//! (the collections are never re-sorted independently). The loaded index is a
//! read-only snapshot for the process lifetime, shared by `Arc`.

pub mod builder;

pub use builder::IndexBuilder;

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::errors::BlinkRagError;
use crate::errors::Result;
use crate::models::FeedbackRecord;

/// On-disk vector collection, tagged with the model that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorArtifact {
    pub model: String,
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

/// In-memory snapshot of feedback vectors and aligned metadata
pub struct EmbeddingIndex {
    model: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    norms: Vec<f32>,
    records: Vec<FeedbackRecord>,
}

impl EmbeddingIndex {
    /// Load the artifact pair from disk
    ///
    /// Fails if either artifact is absent or malformed, if the collections'
    /// lengths disagree, or if any vector has the wrong width. There is no
    /// partial or degraded mode.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        vectors_path: P,
        metadata_path: Q,
    ) -> Result<Self> {
        let artifact = read_vector_artifact(vectors_path.as_ref())?;
        let records = read_feedback_records(metadata_path.as_ref())?;
        let index = Self::from_parts(artifact, records)?;

        info!(
            "Loaded embedding index: {} vectors, dimension {}, model '{}'",
            index.len(),
            index.dimension(),
            index.model()
        );

        Ok(index)
    }

    /// Build an index from already-loaded parts, enforcing the invariants
    pub fn from_parts(artifact: VectorArtifact, records: Vec<FeedbackRecord>) -> Result<Self> {
        if artifact.dimension == 0 {
            return Err(BlinkRagError::IndexData(
                "vector artifact declares dimension 0".to_string(),
            ));
        }

        if artifact.vectors.len() != records.len() {
            return Err(BlinkRagError::IndexData(format!(
                "vector/metadata misalignment: {} vectors, {} records",
                artifact.vectors.len(),
                records.len()
            )));
        }

        for (i, vector) in artifact.vectors.iter().enumerate() {
            if vector.len() != artifact.dimension {
                return Err(BlinkRagError::IndexData(format!(
                    "vector {} has dimension {}, artifact declares {}",
                    i,
                    vector.len(),
                    artifact.dimension
                )));
            }
        }

        let norms = artifact.vectors.iter().map(|v| l2_norm(v)).collect();

        Ok(Self {
            model: artifact.model,
            dimension: artifact.dimension,
            vectors: artifact.vectors,
            norms,
            records,
        })
    }

    /// Cosine similarity of the query against every stored vector, one score
    /// per index position
    ///
    /// # Errors
    /// `DimensionMismatch` when the query vector's width disagrees with the
    /// index - scoring vectors from different embedding spaces would produce
    /// meaningless numbers, so this fails fast instead.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<f32>> {
        if query.len() != self.dimension {
            return Err(BlinkRagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        let scores = self
            .vectors
            .iter()
            .zip(&self.norms)
            .map(|(vector, &norm)| {
                let denom = query_norm * norm;
                if denom <= f32::EPSILON {
                    0.0
                } else {
                    dot(query, vector) / denom
                }
            })
            .collect();

        Ok(scores)
    }

    #[must_use]
    pub fn record(&self, position: usize) -> &FeedbackRecord {
        &self.records[position]
    }

    #[must_use]
    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn read_vector_artifact(path: &Path) -> Result<VectorArtifact> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BlinkRagError::IndexData(format!("cannot read vectors artifact {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        BlinkRagError::IndexData(format!(
            "cannot parse vectors artifact {}: {e}",
            path.display()
        ))
    })
}

fn read_feedback_records(path: &Path) -> Result<Vec<FeedbackRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BlinkRagError::IndexData(format!(
            "cannot read metadata artifact {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        BlinkRagError::IndexData(format!(
            "cannot parse metadata artifact {}: {e}",
            path.display()
        ))
    })
}

/// Write the artifact pair to disk as a matched pair
pub fn write_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
    artifact: &VectorArtifact,
    records: &[FeedbackRecord],
    vectors_path: P,
    metadata_path: Q,
) -> Result<()> {
    if artifact.vectors.len() != records.len() {
        return Err(BlinkRagError::IndexData(format!(
            "refusing to write misaligned artifacts: {} vectors, {} records",
            artifact.vectors.len(),
            records.len()
        )));
    }

    if let Some(parent) = vectors_path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = metadata_path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(vectors_path, serde_json::to_string(artifact)?)?;
    std::fs::write(metadata_path, serde_json::to_string(records)?)?;
    Ok(())
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}
