//! Grounded question answering over retrieved textbook context
//!
//! The prompt forbids outside knowledge so answers come from the material
//! or not at all.

use crate::openai::{ChatModel, ChatRequest, Message};
use crate::retrieval::{join_context, RetrievedChunk};

/// Temperature for Q&A (low, focused)
pub const ANSWER_TEMPERATURE: f32 = 0.3;
/// Response length cap for answers
pub const ANSWER_MAX_TOKENS: u32 = 500;

const QA_SYSTEM_PROMPT: &str = r#"You are a helpful tutor teaching from a specific textbook.
CRITICAL RULES:
1. Answer only using the provided context
2. If the answer is not in the context, say "I cannot find this answer in the material provided"
3. Quote relevant parts from the context while explaining
4. Be concise but thorough
5. Never use outside knowledge - only the context below."#;

/// Build a chat request that answers a question from retrieved context
pub fn answer_request(
    model: ChatModel,
    question: &str,
    context_chunks: &[RetrievedChunk],
) -> ChatRequest {
    let context = join_context(context_chunks);

    let messages = vec![
        Message::system(QA_SYSTEM_PROMPT),
        Message::user(format!(
            "Context from textbook:\n{}\n\nQuestion: {}\n\nPlease answer solely based on the context above.",
            context, question
        )),
    ];

    ChatRequest::new(model, messages)
        .with_temperature(ANSWER_TEMPERATURE)
        .with_max_tokens(ANSWER_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunks() -> Vec<RetrievedChunk> {
        vec![
            RetrievedChunk { text: "Self-supervision trains without labels.".into(), score: 0.9 },
            RetrievedChunk { text: "Labels are expensive to collect.".into(), score: 0.7 },
        ]
    }

    #[test]
    fn request_carries_question_and_context() {
        let request = answer_request(ChatModel::Gpt4oMini, "What is self-supervision?", &chunks());

        assert_eq!(request.temperature, ANSWER_TEMPERATURE);
        assert_eq!(request.max_tokens, Some(ANSWER_MAX_TOKENS));
        assert!(request.response_format.is_none());

        let user = &request.messages[1].content;
        assert!(user.contains("What is self-supervision?"));
        assert!(user.contains("Self-supervision trains without labels."));
        assert!(user.contains("Labels are expensive to collect."));
    }

    #[test]
    fn system_prompt_forbids_outside_knowledge() {
        let request = answer_request(ChatModel::Gpt4oMini, "q", &chunks());
        assert!(request.messages[0].content.contains("Never use outside knowledge"));
    }
}
