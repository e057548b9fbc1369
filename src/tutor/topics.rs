//! Topic extraction from textbook text
//!
//! The model reads the full text and produces a topic map: a document
//! summary plus a handful of topics, each with a beginner summary, key
//! points, and the concepts a student should master.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::openai::{ChatModel, ChatRequest, Message, OpenAiClient};

/// Temperature for topic extraction (low, for deterministic output)
const TOPIC_TEMPERATURE: f32 = 0.3;

/// Character budget for the analyzed text, roughly 100k tokens at the
/// usual ~4 chars/token for English prose
const MAX_ANALYSIS_CHARS: usize = 400_000;

/// A single extracted topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Beginner-friendly explanation, 2-3 sentences
    pub summary: String,
    /// Most important takeaways
    #[serde(default)]
    pub key_points: Vec<String>,
    /// Concepts the student should master
    #[serde(default)]
    pub concepts: Vec<String>,
}

/// Topic map for a whole textbook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicMap {
    /// Short summary of the whole document
    #[serde(default)]
    pub document_summary: String,
    /// Topics keyed by their short hyphenated name
    #[serde(default)]
    pub topics: BTreeMap<String, TopicEntry>,
}

impl TopicMap {
    /// Topic names in stable order
    pub fn topic_names(&self) -> Vec<&str> {
        self.topics.keys().map(String::as_str).collect()
    }

    /// All concepts listed for a topic, if the topic exists
    pub fn concepts_for(&self, topic: &str) -> Option<&[String]> {
        self.topics.get(topic).map(|t| t.concepts.as_slice())
    }
}

const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a college professor who excels at teaching students complex topics simply and effectively. Your task is to analyze the given text and extract topics and concepts for students to learn.

For each topic, provide:
1. A short beginner-friendly summary of 2-3 sentences
2. A bullet list of 3-5 key points
3. A bullet list of 3-5 specific concepts to learn to master this topic

GUIDELINES:
1. Topic names should be short (1-3 words), lowercase with hyphens, e.g. self-supervision, tokens
2. Limit to extracting 3-7 main topics. Don't go too granular
3. Summary: explain like teaching a beginner
4. Key points: most important takeaways from the topic
5. Concepts: specific learning objectives or what the student should understand

Return JSON with exactly this structure:
{
    "document_summary": "Short summary of the whole document, 2-3 sentences",
    "topics": {
        "topic-name": {
            "summary": "2-3 sentence beginner-friendly explanation",
            "key_points": ["key point 1", "key point 2", "key point 3"],
            "concepts": ["concept 1", "concept 2", "concept 3"]
        }
    }
}"#;

/// Build the extraction request for a (possibly truncated) text
pub fn extraction_request(model: ChatModel, text: &str) -> ChatRequest {
    let messages = vec![
        Message::system(EXTRACTION_SYSTEM_PROMPT),
        Message::user(format!(
            "Extract topics and concepts from this text.\n\n{}\n\nReturn ONLY valid JSON, nothing else.",
            text
        )),
    ];

    ChatRequest::new(model, messages).with_temperature(TOPIC_TEMPERATURE).with_json_output()
}

/// Truncate text to the analysis budget, respecting char boundaries
pub fn truncate_for_analysis(text: &str) -> &str {
    match text.char_indices().nth(MAX_ANALYSIS_CHARS) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Extract a topic map from a textbook's full text
pub async fn extract_topics(
    client: &OpenAiClient,
    model: ChatModel,
    full_text: &str,
    name: &str,
) -> Result<TopicMap> {
    let text = truncate_for_analysis(full_text);
    if text.len() < full_text.len() {
        tracing::warn!(
            "'{}' exceeds the analysis budget; analyzing the first {} of {} chars",
            name,
            text.len(),
            full_text.len()
        );
    }

    tracing::info!("Extracting topics from '{}'", name);
    let topic_map: TopicMap = client.chat_json(extraction_request(model, text)).await?;
    tracing::info!("Extracted {} topics", topic_map.topics.len());

    Ok(topic_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extraction_request_is_json_mode() {
        let request = extraction_request(ChatModel::Gpt4oMini, "some textbook text");
        assert_eq!(request.temperature, TOPIC_TEMPERATURE);
        assert!(request.response_format.is_some());
        assert!(request.messages[1].content.contains("some textbook text"));
    }

    #[test]
    fn short_text_is_not_truncated() {
        let text = "short document";
        assert_eq!(truncate_for_analysis(text), text);
    }

    #[test]
    fn topic_map_parses_model_output() {
        let json = r#"{
            "document_summary": "Intro to AI engineering.",
            "topics": {
                "tokens": {
                    "summary": "Tokens are the basic units of text.",
                    "key_points": ["Models read tokens"],
                    "concepts": ["definition of a token", "token limits"]
                }
            }
        }"#;
        let map: TopicMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.topic_names(), vec!["tokens"]);
        assert_eq!(map.concepts_for("tokens").unwrap().len(), 2);
        assert!(map.concepts_for("missing").is_none());
    }
}
