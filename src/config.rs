use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Serialized feedback vectors, one per metadata row
    pub vectors_path: String,
    /// Serialized feedback metadata, index-aligned with the vectors
    pub metadata_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub dimension: usize,
    pub model: String,
    pub endpoint: String,
    /// API key for hosted embedding providers; local providers leave this unset
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    /// Falls back to the GROQ_API_KEY environment variable when unset
    #[serde(default)]
    pub llm_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> usize {
    1024
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_top_k() -> usize {
    5
}

fn default_min_score() -> f32 {
    0.35
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub index: IndexConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::BlinkRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Get vectors artifact path
    pub fn vectors_path(&self) -> &str {
        &self.index.vectors_path
    }

    /// Get metadata artifact path
    pub fn metadata_path(&self) -> &str {
        &self.index.metadata_path
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get embedding endpoint
    pub fn embedding_endpoint(&self) -> &str {
        &self.embeddings.endpoint
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Resolve the LLM API key from config or the GROQ_API_KEY environment variable
    pub fn llm_key(&self) -> crate::Result<String> {
        if let Some(key) = &self.llm.llm_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }
        std::env::var("GROQ_API_KEY").map_err(|_| {
            crate::BlinkRagError::ConfigError(
                "LLM API key not found: set llm.llm_key in config.toml or the GROQ_API_KEY \
                 environment variable"
                    .to_string(),
            )
        })
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }

    /// Get generation temperature
    pub fn temperature(&self) -> f32 {
        self.llm.temperature
    }

    /// Get generation token limit
    pub fn max_tokens(&self) -> usize {
        self.llm.max_tokens
    }

    /// Get retrieval result limit
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Get minimum similarity score
    pub fn min_score(&self) -> f32 {
        self.retrieval.min_score
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            index: IndexConfig {
                vectors_path: "data/feedback_vectors.json".to_string(),
                metadata_path: "data/feedback_metadata.json".to_string(),
            },
            embeddings: EmbeddingsConfig {
                dimension: 384,
                model: "all-minilm".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
            },
            llm: LlmConfig {
                llm_endpoint: "https://api.groq.com/openai/v1".to_string(),
                llm_key: None,
                llm_model: default_llm_model(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
                timeout_secs: default_timeout_secs(),
                max_retries: default_max_retries(),
            },
            retrieval: RetrievalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml_str = r#"
            [logging]
            level = "debug"
            backtrace = false

            [index]
            vectors_path = "data/feedback_vectors.json"
            metadata_path = "data/feedback_metadata.json"

            [embeddings]
            dimension = 384
            model = "all-minilm"
            endpoint = "http://localhost:11434"

            [llm]
            llm_endpoint = "https://api.groq.com/openai/v1"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.embedding_dimension(), 384);
        assert_eq!(config.llm_model(), "llama-3.1-8b-instant");
        assert!((config.temperature() - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.top_k(), 5);
        assert!((config.min_score() - 0.35).abs() < f32::EPSILON);
    }

    #[test]
    fn test_retrieval_overrides() {
        let toml_str = r#"
            [logging]
            level = "info"
            backtrace = true

            [index]
            vectors_path = "v.json"
            metadata_path = "m.json"

            [embeddings]
            dimension = 1536
            model = "text-embedding-3-small"
            endpoint = "https://api.openai.com/v1"
            api_key = "sk-test"

            [llm]
            llm_endpoint = "https://api.groq.com/openai/v1"
            llm_model = "llama-3.3-70b-versatile"
            temperature = 0.0

            [retrieval]
            top_k = 10
            min_score = 0.5
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.top_k(), 10);
        assert!((config.min_score() - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.llm_model(), "llama-3.3-70b-versatile");
        assert_eq!(config.embeddings.api_key.as_deref(), Some("sk-test"));
    }
}
