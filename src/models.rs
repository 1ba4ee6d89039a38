//! Core data models for feedback retrieval

use serde::Deserialize;
use serde::Serialize;

/// One historical customer feedback entry. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub raw_text: String,
    pub clean_text: String,
}

impl FeedbackRecord {
    /// Text used for embedding and prompt assembly
    #[must_use]
    pub fn text(&self) -> &str {
        if self.clean_text.trim().is_empty() {
            &self.raw_text
        } else {
            &self.clean_text
        }
    }
}

/// A feedback record paired with its similarity score against a query
#[derive(Debug, Clone)]
pub struct RetrievedFeedback {
    pub record: FeedbackRecord,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_prefers_clean_text() {
        let record = FeedbackRecord {
            id: 1,
            raw_text: "Delivery was LATE!!!".to_string(),
            clean_text: "delivery was late".to_string(),
        };
        assert_eq!(record.text(), "delivery was late");
    }

    #[test]
    fn test_text_falls_back_to_raw_text() {
        let record = FeedbackRecord {
            id: 2,
            raw_text: "cold food".to_string(),
            clean_text: "   ".to_string(),
        };
        assert_eq!(record.text(), "cold food");
    }
}
