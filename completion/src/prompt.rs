//! Prompt construction for context-grounded answers.

/// System prompt sent with every grounded completion.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers based on the provided context.";

/// A (system, user) prompt pair that restricts the model to one context text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedPrompt {
    pub system: String,
    pub user: String,
}

impl GroundedPrompt {
    /// Build the prompt for `question`, answerable only from `context`.
    pub fn new(context: &str, question: &str) -> Self {
        let user = format!(
            "You are a helpful assistant. Answer the question using ONLY the provided context:\n\
             Context: {context}\n\
             Question: {question}\n\
             Answer:"
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grounded_prompt_layout() {
        let prompt = GroundedPrompt::new(
            "Paris is the capital of France",
            "What is the capital of France?",
        );

        assert_eq!(prompt.system, SYSTEM_PROMPT);
        assert_eq!(
            prompt.user,
            "You are a helpful assistant. Answer the question using ONLY the provided context:\n\
             Context: Paris is the capital of France\n\
             Question: What is the capital of France?\n\
             Answer:"
        );
    }

    #[test]
    fn test_context_is_embedded_verbatim() {
        let context = "line one\n  line two {braces}";
        let prompt = GroundedPrompt::new(context, "q");
        assert!(prompt.user.contains(context));
    }
}
