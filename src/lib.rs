//! Mentor - a CLI tutor that teaches from your PDF textbooks
//!
//! Mentor ingests PDFs into a local chunk store with embeddings, answers
//! questions strictly from the material, and runs Socratic teaching
//! sessions that track which concepts you've mastered, all powered by
//! the OpenAI API.

pub mod commands;
pub mod config;
pub mod openai;
pub mod profile;
pub mod retrieval;
pub mod runlog;
pub mod store;
pub mod textbook;
pub mod tutor;

pub use config::Config;
pub use openai::OpenAiClient;
