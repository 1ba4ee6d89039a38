//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the blinkrag CLI

use crate::conversation::ConversationState;
use crate::conversation::Role;
use crate::models::RetrievedFeedback;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// This prevents panics when truncating strings with multi-byte UTF-8 characters
///
/// # Arguments
/// * `s` - The string to truncate
/// * `max_chars` - Maximum number of characters (not bytes)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Word wrap text to specified width
pub fn print_wrapped(text: &str, max_width: usize) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut current_line = String::new();

    for word in words {
        if current_line.len() + word.len() + 1 > max_width {
            println!("{current_line}");
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }
    if !current_line.is_empty() {
        println!("{current_line}");
    }
}

/// Print retrieved feedback with scores
pub fn print_sources(sources: &[RetrievedFeedback]) {
    println!("📚 Sources ({} feedback comments):", sources.len());
    for (idx, source) in sources.iter().enumerate() {
        println!(
            "  {}. [id: {}, score: {:.3}] {}",
            idx + 1,
            source.record.id,
            source.score,
            truncate_str(source.record.text(), 100)
        );
    }
}

/// Render the full conversation history, oldest first
pub fn print_history(conversation: &ConversationState) {
    if conversation.is_empty() {
        println!("(no conversation yet)");
        return;
    }

    for turn in conversation.turns() {
        let speaker = match turn.role {
            Role::User => "🧑 You",
            Role::Assistant => "🤖 Assistant",
        };
        println!("{speaker}:");
        print_wrapped(&turn.text, 80);
        println!();
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 blinkrag Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("📦 Index:");
    println!("  Vectors: {}", config.vectors_path());
    println!("  Metadata: {}", config.metadata_path());
    println!();

    println!("🧠 Embeddings:");
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Endpoint: {}", mask_endpoint(config.embedding_endpoint()));
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", mask_endpoint(config.llm_endpoint()));
    println!("  Model: {}", config.llm_model());
    println!("  Temperature: {}", config.temperature());
    println!("  Max tokens: {}", config.max_tokens());
    println!(
        "  API key: {}",
        if config.llm_key().is_ok() {
            "***configured***"
        } else {
            "not set"
        }
    );
    println!();

    println!("🔍 Retrieval:");
    println!("  Top K: {}", config.top_k());
    println!("  Min score: {}", config.min_score());
}

/// Mask an endpoint for display (never echo embedded credentials or params)
fn mask_endpoint(endpoint: &str) -> String {
    if let Ok(parsed) = url::Url::parse(endpoint) {
        if let Some(host) = parsed.host_str() {
            match parsed.port() {
                Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
                None => format!("{}://{host}", parsed.scheme()),
            }
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    std::io::Write::flush(&mut std::io::stdout()).ok();
}
