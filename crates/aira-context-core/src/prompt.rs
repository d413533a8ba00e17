//! Prompt composition for the downstream language model.

/// Wrap a user question with retrieved context.
///
/// Empty context passes the question through unchanged so the model answers
/// from general knowledge.
pub fn compose_prompt(context: &str, question: &str) -> String {
    if context.is_empty() {
        question.to_string()
    } else {
        format!("Knowledge context:\n{}\n\nUser question: {}", context, question)
    }
}
