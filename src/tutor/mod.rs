//! Tutoring engines: grounded Q&A, Socratic teaching, topic extraction

pub mod qa;
pub mod socratic;
pub mod topics;

pub use socratic::{AnswerFeedback, Correctness, Difficulty, SessionTranscript, TeachingQuestion};
pub use topics::{TopicEntry, TopicMap};
