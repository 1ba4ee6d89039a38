//! Index command handlers - building and inspecting the artifact pair

use std::sync::Arc;

use crate::cli::output::*;
use crate::embeddings::EmbeddingService;
use crate::index;
use crate::index::EmbeddingIndex;
use crate::index::IndexBuilder;
use crate::AppConfig;
use crate::Result;

/// Embed a JSON export of feedback records and write the artifact pair
pub async fn handle_index_build(config: &AppConfig, input: String) -> Result<()> {
    println!("🔨 Building feedback embedding index");
    println!("====================================\n");

    let records = index::builder::read_seed_records(&input)?;
    print_info(&format!("Read {} feedback records from {input}", records.len()));

    let embedding_service = Arc::new(EmbeddingService::new(config)?);
    print_info(&format!(
        "Embedding with '{}' ({} dimensions)",
        embedding_service.model(),
        embedding_service.dimension()
    ));

    let builder = IndexBuilder::new(embedding_service);
    let (artifact, kept) = builder.build(records).await?;

    index::write_artifacts(
        &artifact,
        &kept,
        config.vectors_path(),
        config.metadata_path(),
    )?;

    print_success(&format!(
        "Wrote {} vectors to {} and metadata to {}",
        artifact.vectors.len(),
        config.vectors_path(),
        config.metadata_path()
    ));

    Ok(())
}

/// Show the loaded index's shape and model
pub fn handle_index_info(config: &AppConfig) -> Result<()> {
    let index = EmbeddingIndex::load(config.vectors_path(), config.metadata_path())?;

    println!("📦 Feedback Embedding Index");
    println!("===========================\n");
    println!("  Vectors: {}", index.len());
    println!("  Dimension: {}", index.dimension());
    println!("  Model: {}", index.model());

    if let Some(record) = index.records().first() {
        println!();
        println!("  First record: [id: {}] {}", record.id, truncate_str(record.text(), 80));
    }

    Ok(())
}
