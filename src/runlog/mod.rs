//! Run logging for ingest and retrieval pipelines
//!
//! Each run appends one JSONL record per stage under the logs directory,
//! capturing chunking stats, token usage, estimated cost, similarity
//! scores, and timing for later comparison across runs.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::retrieval::RetrievalStats;
use crate::textbook::ChunkingStats;

/// Cost of the embedding model in USD per million tokens
const EMBEDDING_COST_PER_MTOK: f64 = 0.02;

/// Pipeline stage a record belongs to; also names the log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Retrieval,
}

impl Stage {
    fn file_name(&self) -> &'static str {
        match self {
            Self::Ingest => "ingest.jsonl",
            Self::Retrieval => "retrieval.jsonl",
        }
    }
}

/// A single run log record
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    /// Run identifier
    pub run_id: String,
    /// When the record was written
    pub timestamp: DateTime<Utc>,
    /// Pipeline stage
    pub stage: Stage,
    /// Textbook involved
    pub textbook: String,

    /// Chunking statistics (ingest only)
    #[serde(flatten)]
    pub chunking: Option<ChunkingStats>,
    /// Number of embeddings created (ingest only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_embeddings: Option<usize>,
    /// Embedding tokens consumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_tokens: Option<u64>,
    /// Estimated embedding cost in USD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_cost_usd: Option<f64>,

    /// Query text (retrieval only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Number of chunks requested (retrieval only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    /// Similarity statistics (retrieval only)
    #[serde(flatten)]
    pub retrieval: Option<RetrievalStats>,

    /// Wall-clock duration of the run in seconds
    pub duration_secs: f64,
}

impl RunRecord {
    /// Record for a completed ingest run
    pub fn ingest(
        run_id: String,
        textbook: &str,
        chunking: ChunkingStats,
        embedding_tokens: u64,
        duration_secs: f64,
    ) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            stage: Stage::Ingest,
            textbook: textbook.to_string(),
            num_embeddings: Some(chunking.num_chunks),
            chunking: Some(chunking),
            embedding_tokens: Some(embedding_tokens),
            embedding_cost_usd: Some(embedding_cost(embedding_tokens)),
            query: None,
            top_k: None,
            retrieval: None,
            duration_secs,
        }
    }

    /// Record for a completed retrieval run
    pub fn retrieval(
        run_id: String,
        textbook: &str,
        query: &str,
        top_k: usize,
        stats: RetrievalStats,
        duration_secs: f64,
    ) -> Self {
        Self {
            run_id,
            timestamp: Utc::now(),
            stage: Stage::Retrieval,
            textbook: textbook.to_string(),
            chunking: None,
            num_embeddings: None,
            embedding_tokens: None,
            embedding_cost_usd: None,
            query: Some(query.to_string()),
            top_k: Some(top_k),
            retrieval: Some(stats),
            duration_secs,
        }
    }

    /// Append this record to the stage's JSONL log
    pub fn append(&self) -> Result<PathBuf> {
        self.append_in(Config::logs_dir()?)
    }

    /// Append to a specific logs directory (used by tests)
    pub fn append_in(&self, dir: PathBuf) -> Result<PathBuf> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create logs directory {:?}", dir))?;
        let path = dir.join(self.stage.file_name());

        let line = serde_json::to_string(self).with_context(|| "Failed to serialize run record")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open run log {:?}", path))?;
        writeln!(file, "{}", line).with_context(|| format!("Failed to append to {:?}", path))?;

        Ok(path)
    }
}

/// Create a new run id: timestamp plus a short random suffix
pub fn new_run_id() -> String {
    let suffix = &uuid::Uuid::new_v4().simple().to_string()[..6];
    format!("{}-{}", Utc::now().format("%Y%m%d-%H%M%S"), suffix)
}

/// Estimated embedding cost in USD for a token count
pub fn embedding_cost(tokens: u64) -> f64 {
    tokens as f64 * EMBEDDING_COST_PER_MTOK / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn run_ids_are_unique_and_shaped() {
        let a = new_run_id();
        let b = new_run_id();
        assert_ne!(a, b);
        // YYYYMMDD-HHMMSS-xxxxxx
        assert_eq!(a.len(), 8 + 1 + 6 + 1 + 6);
    }

    #[test]
    fn embedding_cost_scales_linearly() {
        assert_eq!(embedding_cost(0), 0.0);
        assert!((embedding_cost(1_000_000) - 0.02).abs() < 1e-9);
    }

    #[test]
    fn records_append_as_jsonl() {
        let temp = TempDir::new().unwrap();

        let chunking =
            ChunkingStats { num_chunks: 12, avg_chunk_len: 900, chunk_size: 1000, overlap: 100 };
        let record = RunRecord::ingest(new_run_id(), "ai_book", chunking, 4800, 3.2);
        let path = record.append_in(temp.path().to_path_buf()).unwrap();
        record.append_in(temp.path().to_path_buf()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["stage"], "ingest");
        assert_eq!(parsed["num_chunks"], 12);
        assert_eq!(parsed["embedding_tokens"], 4800);
    }

    #[test]
    fn retrieval_records_carry_scores() {
        let temp = TempDir::new().unwrap();

        let stats = RetrievalStats {
            max_similarity: 0.89,
            avg_similarity: 0.41,
            top_scores: vec![0.89, 0.80, 0.65],
        };
        let record = RunRecord::retrieval(new_run_id(), "ai_book", "what is a token?", 3, stats, 0.8);
        let path = record.append_in(temp.path().to_path_buf()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["stage"], "retrieval");
        assert_eq!(parsed["query"], "what is a token?");
        assert_eq!(parsed["top_scores"].as_array().unwrap().len(), 3);
    }
}
