//! Prompt templates for the feedback assistant

/// Fixed reply when no stored feedback clears the similarity floor.
///
/// The generation service is never called in that case - answering without
/// supporting evidence is exactly the failure mode the floor exists to stop.
pub const NO_EVIDENCE_REPLY: &str =
    "I don't have enough customer feedback data to answer this question.";

/// Fixed reply when the generation service fails after retries.
///
/// Deliberately distinct from [`NO_EVIDENCE_REPLY`] so operators can tell
/// "we have no data" apart from "the assistant is down".
pub const SERVICE_ERROR_REPLY: &str =
    "The analysis service is currently unavailable. Please try again in a moment.";

/// Build the analyst prompt from retrieved feedback and the manager question
pub fn build_feedback_analysis_prompt(question: &str, feedback: &[&str]) -> String {
    let context = feedback
        .iter()
        .map(|text| format!("- {text}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r"You are an internal Business Intelligence Analyst at Blinkit.

You support Operations and Management teams.
You do NOT answer like customer support.
You do NOT guess beyond the data provided.

Below are real customer feedback comments from Blinkit users.
Analyze them strictly as operational signals.

Customer Feedback:
{context}

Manager Question:
{question}

Instructions:
- Identify the primary operational root causes
- Explain the impact on business metrics (delay, churn, satisfaction, revenue)
- Keep the explanation concise and decision-oriented
- If the data is insufficient, clearly say so

Respond in clear business terms suitable for leadership review."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_question_and_bulleted_feedback() {
        let prompt = build_feedback_analysis_prompt(
            "Why are deliveries late?",
            &["rider took 2 hours", "order arrived cold"],
        );

        assert!(prompt.contains("Manager Question:\nWhy are deliveries late?"));
        assert!(prompt.contains("- rider took 2 hours\n- order arrived cold"));
    }

    #[test]
    fn test_prompt_preserves_feedback_order() {
        let prompt = build_feedback_analysis_prompt("q", &["first", "second", "third"]);
        let first = prompt.find("- first").unwrap();
        let second = prompt.find("- second").unwrap();
        let third = prompt.find("- third").unwrap();
        assert!(first < second && second < third);
    }
}
