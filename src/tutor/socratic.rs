//! Socratic teaching engine
//!
//! Generates discovery-guiding questions from textbook material, evaluates
//! the student's answers, and produces feedback with follow-up questions.
//! A session runs several question/answer rounds and records a transcript.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::openai::{ChatModel, ChatRequest, Message, OpenAiClient};
use crate::retrieval::{join_context, RetrievedChunk, Retriever};

/// Temperature for teaching (more creative than Q&A)
pub const TEACHING_TEMPERATURE: f32 = 0.7;

/// Difficulty level for generated questions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Intuition-building questions
    #[default]
    Beginner,
    /// Connections and analysis
    Intermediate,
    /// Design trade-offs and predictions
    Advanced,
}

impl Difficulty {
    /// Name used in prompts and display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!(
                "Unknown difficulty: {}. Options: beginner, intermediate, advanced",
                s
            )),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated Socratic question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeachingQuestion {
    /// The question to ask the student
    pub question: String,
    /// What the question is trying to get the student to understand
    pub teaching_goal: String,
    /// Gentle hint if the student is completely stuck
    pub hint_if_stuck: String,
}

/// How correct the student's answer was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Correct,
    Partial,
    Incorrect,
}

/// Structured evaluation of a student answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Is the core understanding right?
    pub correctness: Correctness,
    /// Good points in the answer
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Missing concepts
    #[serde(default)]
    pub gaps: Vec<String>,
    /// Misunderstandings to correct
    #[serde(default)]
    pub misconceptions: Vec<String>,
}

/// Evaluation plus the feedback shown to the student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerFeedback {
    /// Structured evaluation
    pub evaluation: Evaluation,
    /// Encouraging, guiding response to the student
    pub feedback: String,
    /// Follow-up question to deepen understanding, null once mastered
    #[serde(default)]
    pub next_question: Option<String>,
}

/// One question/answer/feedback round in a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTurn {
    /// Question asked this turn
    pub question: String,
    /// Teaching goal behind the question
    pub teaching_goal: String,
    /// What the student answered
    pub student_answer: String,
    /// Evaluation and feedback
    pub feedback: AnswerFeedback,
}

/// Transcript of a Socratic teaching session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTranscript {
    /// Topic taught
    pub topic: String,
    /// Textbook the material came from
    pub textbook: String,
    /// Difficulty level used
    pub difficulty: Difficulty,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// Completed turns
    pub turns: Vec<SessionTurn>,
}

impl SessionTranscript {
    /// Start an empty transcript
    pub fn new(topic: &str, textbook: &str, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.to_string(),
            textbook: textbook.to_string(),
            difficulty,
            started_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    /// Persist the transcript to the sessions directory
    ///
    /// Returns the path of the written file.
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Config::sessions_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create sessions directory {:?}", dir))?;

        let timestamp = self.started_at.format("%Y%m%d-%H%M%S");
        let topic_slug = self.topic.replace(' ', "_");
        let path = dir.join(format!("session-{}-{}.json", topic_slug, timestamp));

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize transcript")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write transcript to {:?}", path))?;

        Ok(path)
    }
}

const QUESTION_SYSTEM_PROMPT: &str = r#"You are a Socratic tutor. Your role is to help students learn by guided questioning, not by directly telling them.

PRINCIPLES:
1. Ask questions that guide discovery
2. Start with the student's intuition before technical details
3. Build from simple to complex
4. Encourage thinking, not just recall

QUESTION TYPES (use variety):
- Intuition: "What do you think X might mean based on the words?"
- Connection: "How might X relate to Y that we discussed?"
- Analysis: "Why do you think they designed it this way?"
- Prediction: "What might happen if we changed X?"

Return your response as JSON with this structure:
{
    "question": "Your Socratic question here",
    "teaching_goal": "What you want the student to understand",
    "hint_if_stuck": "Gentle hint if the student is completely stuck"
}"#;

const EVALUATION_SYSTEM_PROMPT: &str = r#"You are a Socratic tutor evaluating a student's answer.

EVALUATION CRITERIA:
1. Correctness: Is the core understanding right?
2. Completeness: Did they cover the key concepts?
3. Misconceptions: Are there any misunderstandings?

FEEDBACK PRINCIPLES:
1. Always start with what's good (even if wrong, find something!)
2. Be encouraging and supportive
3. Guide toward gaps with questions, not lectures
4. If completely wrong, ask a simpler question to build foundation

Return JSON with:
{
    "evaluation": {
        "correctness": "correct" | "partial" | "incorrect",
        "strengths": ["list", "of", "good", "points"],
        "gaps": ["list", "of", "missing", "concepts"],
        "misconceptions": ["list", "of", "misunderstandings"]
    },
    "feedback": "Your encouraging guiding response to the student",
    "next_question": "Follow-up question to deepen understanding (or null if they have mastered it)"
}"#;

/// Build the question-generation request for a topic
pub fn question_request(
    model: ChatModel,
    topic: &str,
    difficulty: Difficulty,
    context_chunks: &[RetrievedChunk],
) -> ChatRequest {
    let context = join_context(context_chunks);

    let messages = vec![
        Message::system(QUESTION_SYSTEM_PROMPT),
        Message::user(format!(
            "Topic to teach: {}\n\nDifficulty level: {}\n\nContext from textbook:\n{}\n\n\
             Generate a question to help the student discover and understand this concept. \
             The question should guide their thinking, not just test if they memorized the \
             definition.\n\nRemember: Return ONLY valid JSON, nothing else.",
            topic, difficulty, context
        )),
    ];

    ChatRequest::new(model, messages).with_temperature(TEACHING_TEMPERATURE).with_json_output()
}

/// Build the answer-evaluation request
pub fn evaluation_request(
    model: ChatModel,
    question: &str,
    student_answer: &str,
    context_chunks: &[RetrievedChunk],
    teaching_goal: &str,
) -> ChatRequest {
    let context = join_context(context_chunks);

    let messages = vec![
        Message::system(EVALUATION_SYSTEM_PROMPT),
        Message::user(format!(
            "Question asked: {}\nTeaching goal: {}\nStudent's answer: {}\n\
             Context from textbook:\n{}\n\n\
             Evaluate the student's answer and provide Socratic feedback. \
             Remember: guide, don't tell.\n\nReturn ONLY valid JSON.",
            question, teaching_goal, student_answer, context
        )),
    ];

    ChatRequest::new(model, messages).with_temperature(TEACHING_TEMPERATURE).with_json_output()
}

/// Generate a Socratic question about a topic
///
/// Retrieves material for the topic first; the retrieved chunks are
/// returned so the same context can ground the answer evaluation.
pub async fn generate_question(
    client: &OpenAiClient,
    model: ChatModel,
    retriever: &Retriever<'_>,
    textbook: &str,
    topic: &str,
    difficulty: Difficulty,
) -> Result<(TeachingQuestion, Vec<RetrievedChunk>)> {
    tracing::info!("Generating {} teaching question about '{}'", difficulty, topic);

    let (context_chunks, _stats) =
        retriever.retrieve(&format!("Explain {} in detail", topic), textbook, 3).await?;

    let question: TeachingQuestion =
        client.chat_json(question_request(model, topic, difficulty, &context_chunks)).await?;

    Ok((question, context_chunks))
}

/// Evaluate a student's answer and produce feedback
pub async fn evaluate_answer(
    client: &OpenAiClient,
    model: ChatModel,
    question: &str,
    student_answer: &str,
    context_chunks: &[RetrievedChunk],
    teaching_goal: &str,
) -> Result<AnswerFeedback> {
    let feedback: AnswerFeedback = client
        .chat_json(evaluation_request(model, question, student_answer, context_chunks, teaching_goal))
        .await?;

    tracing::debug!("Evaluation: {:?}", feedback.evaluation.correctness);
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunks() -> Vec<RetrievedChunk> {
        vec![RetrievedChunk { text: "Tokens are the smallest text units.".into(), score: 0.85 }]
    }

    #[test]
    fn difficulty_parses() {
        assert_eq!("beginner".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert_eq!("INTERMEDIATE".parse::<Difficulty>(), Ok(Difficulty::Intermediate));
        assert_eq!("advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_request_includes_topic_and_context() {
        let request = question_request(ChatModel::Gpt4oMini, "tokens", Difficulty::Beginner, &chunks());

        assert_eq!(request.temperature, TEACHING_TEMPERATURE);
        assert!(request.response_format.is_some());
        let user = &request.messages[1].content;
        assert!(user.contains("Topic to teach: tokens"));
        assert!(user.contains("beginner"));
        assert!(user.contains("Tokens are the smallest text units."));
    }

    #[test]
    fn evaluation_request_carries_all_parts(){
        let request = evaluation_request(
            ChatModel::Gpt4oMini,
            "What might a token be?",
            "Maybe a word piece?",
            &chunks(),
            "Understand tokens",
        );

        let user = &request.messages[1].content;
        assert!(user.contains("What might a token be?"));
        assert!(user.contains("Maybe a word piece?"));
        assert!(user.contains("Understand tokens"));
    }

    #[test]
    fn feedback_parses_model_output() {
        let json = r#"{
            "evaluation": {
                "correctness": "partial",
                "strengths": ["intuition about word pieces"],
                "gaps": ["subword units"],
                "misconceptions": []
            },
            "feedback": "Great thinking! You're right that tokens relate to words.",
            "next_question": "What happens to a rare word the model has never seen?"
        }"#;
        let feedback: AnswerFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.evaluation.correctness, Correctness::Partial);
        assert_eq!(feedback.evaluation.strengths.len(), 1);
        assert!(feedback.next_question.is_some());
    }

    #[test]
    fn feedback_next_question_may_be_null() {
        let json = r#"{
            "evaluation": {"correctness": "correct"},
            "feedback": "Excellent!",
            "next_question": null
        }"#;
        let feedback: AnswerFeedback = serde_json::from_str(json).unwrap();
        assert_eq!(feedback.evaluation.correctness, Correctness::Correct);
        assert!(feedback.evaluation.gaps.is_empty());
        assert!(feedback.next_question.is_none());
    }

    #[test]
    fn transcript_records_turns() {
        let mut transcript = SessionTranscript::new("tokens", "ai_book", Difficulty::Beginner);
        transcript.turns.push(SessionTurn {
            question: "q".into(),
            teaching_goal: "g".into(),
            student_answer: "a".into(),
            feedback: AnswerFeedback {
                evaluation: Evaluation {
                    correctness: Correctness::Correct,
                    strengths: vec![],
                    gaps: vec![],
                    misconceptions: vec![],
                },
                feedback: "well done".into(),
                next_question: None,
            },
        });

        let json = serde_json::to_string(&transcript).unwrap();
        assert!(json.contains("\"topic\":\"tokens\""));
        assert!(json.contains("\"correctness\":\"correct\""));
    }
}
