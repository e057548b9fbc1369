//! Semantic search over stored textbook chunks
//!
//! A query is embedded with the same model as the chunks, scored against
//! every stored embedding by cosine similarity, and the top-k chunks are
//! returned in descending score order.

use anyhow::Result;
use serde::Serialize;

use crate::openai::OpenAiClient;
use crate::store::ChunkStore;

/// A chunk returned by retrieval, with its similarity score
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Chunk text
    pub text: String,
    /// Cosine similarity to the query (higher is closer)
    pub score: f32,
}

/// Similarity statistics for a retrieval run, for the run log
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalStats {
    /// Highest similarity across all chunks
    pub max_similarity: f32,
    /// Mean similarity across all chunks
    pub avg_similarity: f32,
    /// Scores of the returned chunks, best first
    pub top_scores: Vec<f32>,
}

/// Calculate the cosine similarity of two vectors
///
/// Returns a value in [-1, 1]; 1.0 means identical direction. Zero-magnitude
/// inputs score 0.0 rather than dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Retrieves relevant chunks for queries against a single textbook
pub struct Retriever<'a> {
    client: &'a OpenAiClient,
    store: &'a ChunkStore,
}

impl<'a> Retriever<'a> {
    /// Create a retriever over a client and store
    pub fn new(client: &'a OpenAiClient, store: &'a ChunkStore) -> Self {
        Self { client, store }
    }

    /// Find the most relevant chunks for a query
    ///
    /// Loads the textbook, embeds the query, scores every chunk, and returns
    /// the `top_k` best matches. A `top_k` larger than the chunk count
    /// returns everything.
    pub async fn retrieve(
        &self,
        query: &str,
        textbook: &str,
        top_k: usize,
    ) -> Result<(Vec<RetrievedChunk>, RetrievalStats)> {
        let stored = self.store.load(textbook)?;

        tracing::debug!("Searching '{}' across {} chunks", query, stored.num_chunks);
        let (query_embedding, _usage) = self.client.embed(query).await?;

        let mut scored: Vec<(usize, f32)> = stored
            .chunks
            .iter()
            .map(|chunk| (chunk.id, cosine_similarity(&query_embedding, &chunk.embedding)))
            .collect();

        // Sort by highest similarity; NaN cannot occur with finite embeddings
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let max_similarity = scored.first().map(|(_, s)| *s).unwrap_or(0.0);
        let avg_similarity = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|(_, s)| *s).sum::<f32>() / scored.len() as f32
        };

        let results: Vec<RetrievedChunk> = scored
            .iter()
            .take(top_k)
            .map(|(id, score)| RetrievedChunk { text: stored.chunks[*id].text.clone(), score: *score })
            .collect();

        let stats = RetrievalStats {
            max_similarity,
            avg_similarity,
            top_scores: results.iter().map(|r| r.score).collect(),
        };

        tracing::debug!("Found {} relevant chunks (max {:.3})", results.len(), max_similarity);
        Ok((results, stats))
    }
}

/// Join retrieved chunk texts into a single prompt context block
pub fn join_context(chunks: &[RetrievedChunk]) -> String {
    chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.5, 0.3, 0.2];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn join_context_uses_separators() {
        let chunks = vec![
            RetrievedChunk { text: "alpha".into(), score: 0.9 },
            RetrievedChunk { text: "beta".into(), score: 0.8 },
        ];
        assert_eq!(join_context(&chunks), "alpha\n\n---\n\nbeta");
    }

    proptest! {
        #[test]
        fn similarity_stays_in_range(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8)
        ) {
            let score = cosine_similarity(&a, &b);
            prop_assert!(score >= -1.0001 && score <= 1.0001);
        }

        #[test]
        fn similarity_is_symmetric(
            a in proptest::collection::vec(-10.0f32..10.0, 8),
            b in proptest::collection::vec(-10.0f32..10.0, 8)
        ) {
            prop_assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
        }
    }
}
