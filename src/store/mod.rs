//! Chunk store: persisting textbook chunks and their embeddings
//!
//! Each ingested textbook is one JSON document holding its chunks and their
//! embedding vectors, plus an optional topic map saved alongside. Simple,
//! inspectable, and plenty fast for single-textbook retrieval.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::tutor::topics::TopicMap;

/// A stored chunk with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Position of the chunk within the textbook
    pub id: usize,
    /// Chunk text
    pub text: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// A complete stored textbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTextbook {
    /// Textbook identifier (derived from the PDF name)
    pub name: String,
    /// When this textbook was ingested
    pub created_at: DateTime<Utc>,
    /// Number of chunks
    pub num_chunks: usize,
    /// The chunks with embeddings
    pub chunks: Vec<ChunkRecord>,
}

/// Lightweight listing entry (embeddings are not loaded)
#[derive(Debug, Clone, Deserialize)]
pub struct TextbookSummary {
    /// Textbook identifier
    pub name: String,
    /// When this textbook was ingested
    pub created_at: DateTime<Utc>,
    /// Number of chunks
    pub num_chunks: usize,
}

/// File-backed store for textbook chunks, embeddings, and topic maps
pub struct ChunkStore {
    /// Directory holding one JSON file per textbook
    dir: PathBuf,
}

impl ChunkStore {
    /// Open the store in the application data directory
    pub fn open() -> Result<Self> {
        Self::with_dir(Config::store_dir()?)
    }

    /// Open the store in a specific directory (used by tests)
    pub fn with_dir(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory {:?}", dir))?;
        Ok(Self { dir })
    }

    /// Save chunks and their embeddings for a textbook
    pub fn save(&self, name: &str, chunks: Vec<String>, embeddings: Vec<Vec<f32>>) -> Result<()> {
        if chunks.len() != embeddings.len() {
            bail!(
                "Chunk/embedding count mismatch: {} chunks, {} embeddings",
                chunks.len(),
                embeddings.len()
            );
        }

        let records: Vec<ChunkRecord> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(id, (text, embedding))| ChunkRecord { id, text, embedding })
            .collect();

        let textbook = StoredTextbook {
            name: name.to_string(),
            created_at: Utc::now(),
            num_chunks: records.len(),
            chunks: records,
        };

        let path = self.chunks_path(name);
        let contents = serde_json::to_string_pretty(&textbook)
            .with_context(|| "Failed to serialize textbook")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write textbook to {:?}", path))?;

        tracing::info!("Saved {} chunks to {:?}", textbook.num_chunks, path);
        Ok(())
    }

    /// Load a textbook's chunks and embeddings
    pub fn load(&self, name: &str) -> Result<StoredTextbook> {
        let path = self.chunks_path(name);
        if !path.exists() {
            bail!("No data found for '{}'. Run `mentor ingest` first.", name);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read textbook from {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse stored textbook {:?}", path))
    }

    /// Save a topic map alongside a textbook
    pub fn save_topics(&self, name: &str, topics: &TopicMap) -> Result<()> {
        let path = self.topics_path(name);
        let contents = serde_json::to_string_pretty(topics)
            .with_context(|| "Failed to serialize topic map")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write topic map to {:?}", path))?;
        Ok(())
    }

    /// Load a textbook's topic map, if one was extracted
    pub fn load_topics(&self, name: &str) -> Result<Option<TopicMap>> {
        let path = self.topics_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read topic map from {:?}", path))?;
        let topics = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse topic map {:?}", path))?;
        Ok(Some(topics))
    }

    /// Check whether a textbook has been ingested
    pub fn exists(&self, name: &str) -> bool {
        self.chunks_path(name).exists()
    }

    /// List all ingested textbooks
    pub fn list(&self) -> Result<Vec<TextbookSummary>> {
        let mut summaries = Vec::new();

        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read store directory {:?}", self.dir))?
        {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.ends_with(".json") || file_name.ends_with(".topics.json") {
                continue;
            }

            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let summary: TextbookSummary = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {:?}", path))?;
            summaries.push(summary);
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Remove a textbook and its topic map. Returns false if it did not exist.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.chunks_path(name);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        let topics = self.topics_path(name);
        if topics.exists() {
            let _ = fs::remove_file(topics);
        }
        Ok(true)
    }

    fn chunks_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    fn topics_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.topics.json", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, ChunkStore) {
        let temp = TempDir::new().unwrap();
        let store = ChunkStore::with_dir(temp.path().to_path_buf()).unwrap();
        (temp, store)
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_temp, store) = test_store();

        let chunks = vec!["first chunk".to_string(), "second chunk".to_string()];
        let embeddings = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        store.save("algebra", chunks, embeddings).unwrap();

        let loaded = store.load("algebra").unwrap();
        assert_eq!(loaded.name, "algebra");
        assert_eq!(loaded.num_chunks, 2);
        assert_eq!(loaded.chunks[0].id, 0);
        assert_eq!(loaded.chunks[0].text, "first chunk");
        assert_eq!(loaded.chunks[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn load_missing_textbook_names_ingest() {
        let (_temp, store) = test_store();
        let err = store.load("ghost").unwrap_err();
        assert!(err.to_string().contains("mentor ingest"));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let (_temp, store) = test_store();
        let result = store.save("bad", vec!["one".into()], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn list_excludes_topic_maps() {
        let (_temp, store) = test_store();
        store.save("calc", vec!["c".into()], vec![vec![1.0]]).unwrap();
        store.save("bio", vec!["b".into()], vec![vec![1.0]]).unwrap();

        let topics = TopicMap::default();
        store.save_topics("calc", &topics).unwrap();

        let listing = store.list().unwrap();
        let names: Vec<&str> = listing.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["bio", "calc"]);
    }

    #[test]
    fn remove_deletes_chunks_and_topics() {
        let (_temp, store) = test_store();
        store.save("physics", vec!["p".into()], vec![vec![1.0]]).unwrap();
        store.save_topics("physics", &TopicMap::default()).unwrap();

        assert!(store.exists("physics"));
        assert!(store.remove("physics").unwrap());
        assert!(!store.exists("physics"));
        assert!(store.load_topics("physics").unwrap().is_none());
        assert!(!store.remove("physics").unwrap());
    }
}
