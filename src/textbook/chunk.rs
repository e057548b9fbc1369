//! Splitting extracted text into overlapping chunks
//!
//! Strategy: split on newlines (paragraph markers are inconsistent across
//! PDFs), accumulate lines until a chunk reaches the target size, and seed
//! each new chunk with the tail of the previous one so context carries over
//! the boundary.

/// Default target chunk size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default overlap carried into the next chunk, in characters
pub const DEFAULT_OVERLAP: usize = 100;

/// Statistics about a chunking run, for the run log
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ChunkingStats {
    /// Number of chunks produced
    pub num_chunks: usize,
    /// Average chunk length in characters
    pub avg_chunk_len: usize,
    /// Target chunk size used
    pub chunk_size: usize,
    /// Overlap used
    pub overlap: usize,
}

/// Split text into overlapping chunks of roughly `chunk_size` characters
///
/// Page markers inserted during extraction are normalized first. Empty
/// lines and surrounding whitespace are dropped. The final partial chunk
/// is kept.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    // Normalize the extraction page headers into a single marker token
    let text = text.replace("--- Page", "PAGE_MARKER").replace("---", "");

    let lines: Vec<&str> =
        text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in lines {
        if current.chars().count() + line.chars().count() < chunk_size {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        } else {
            let tail = char_tail(&current, overlap);
            chunks.push(std::mem::take(&mut current));
            current = tail;
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

/// Chunk with stats, for pipeline logging
pub fn chunk_text_with_stats(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> (Vec<String>, ChunkingStats) {
    let chunks = chunk_text(text, chunk_size, overlap);
    let total_len: usize = chunks.iter().map(|c| c.chars().count()).sum();
    let avg = if chunks.is_empty() { 0 } else { total_len / chunks.len() };

    let stats =
        ChunkingStats { num_chunks: chunks.len(), avg_chunk_len: avg, chunk_size, overlap };

    (chunks, stats)
}

/// Last `n` characters of a string, respecting char boundaries
fn char_tail(s: &str, n: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= n {
        return s.to_string();
    }
    s.chars().skip(char_count - n).collect()
}
