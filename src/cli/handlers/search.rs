//! Search command handler - retrieval without generation

use std::sync::Arc;

use crate::cli::output::*;
use crate::embeddings::EmbeddingService;
use crate::index::EmbeddingIndex;
use crate::rag::FeedbackRetriever;
use crate::AppConfig;
use crate::Result;

/// Retrieve the closest feedback comments for a query and print them with scores
pub async fn handle_search(
    config: &AppConfig,
    query: String,
    limit: usize,
    min_score: f32,
) -> Result<()> {
    println!("🔍 Feedback Search");
    println!("==================\n");
    println!("Query: {query}\n");

    let index = Arc::new(EmbeddingIndex::load(
        config.vectors_path(),
        config.metadata_path(),
    )?);
    let embedding_service = Arc::new(EmbeddingService::new(config)?);
    let retriever = FeedbackRetriever::new(index, embedding_service)?;

    let results = retriever.retrieve(&query, limit, min_score).await?;

    if results.is_empty() {
        print_warning(&format!(
            "No feedback scored at or above {min_score} for this query"
        ));
        return Ok(());
    }

    println!("✅ Found {} feedback comments:\n", results.len());
    for (idx, result) in results.iter().enumerate() {
        println!(
            "{}. [id: {}] Score: {:.3}",
            idx + 1,
            result.record.id,
            result.score
        );
        println!("   {}", truncate_str(result.record.text(), 150));
        println!();
    }

    Ok(())
}
