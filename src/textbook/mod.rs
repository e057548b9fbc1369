//! Textbook handling: PDF text extraction and chunking

pub mod chunk;
pub mod pdf;

pub use chunk::{chunk_text, chunk_text_with_stats, ChunkingStats, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use pdf::{extract_text, ExtractedText, ExtractionError};
