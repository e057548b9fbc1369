//! The `ingest` command: PDF to searchable, teachable textbook
//!
//! Pipeline: extract text, chunk it, embed every chunk, save chunks and
//! embeddings, extract a topic map, save that too, and log the run.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::runlog::{new_run_id, RunRecord};
use crate::store::ChunkStore;
use crate::textbook::{chunk_text_with_stats, extract_text};
use crate::tutor::topics::extract_topics;

/// Run the full ingest pipeline for a PDF
pub async fn run(
    pdf: PathBuf,
    name: Option<String>,
    chunk_size: Option<usize>,
    overlap: Option<usize>,
) -> Result<()> {
    let start = Instant::now();
    let run_id = new_run_id();

    let mut config = Config::load()?;
    let chunk_size = chunk_size.unwrap_or(config.chunk_size);
    let overlap = overlap.unwrap_or(config.overlap);

    let name = match name {
        Some(name) => name,
        None => pdf
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .with_context(|| format!("Cannot derive a textbook name from {:?}", pdf))?,
    };

    println!("Processing {}", style(&name).bold());

    // Step 1: Extract text
    println!("\n[1/4] Extracting text from {:?} ...", pdf);
    let extracted = extract_text(&pdf)?;
    println!(
        "  {} Extracted {} chars from {} pages",
        style("✓").green(),
        extracted.text.len(),
        extracted.page_count
    );

    // Step 2: Chunk
    println!("\n[2/4] Chunking text ...");
    let (chunks, stats) = chunk_text_with_stats(&extracted.text, chunk_size, overlap);
    if chunks.is_empty() {
        bail!("No text extracted from {:?}. Is this a scanned PDF without a text layer?", pdf);
    }
    println!("  {} Created {} chunks (avg {} chars)", style("✓").green(), stats.num_chunks, stats.avg_chunk_len);

    // Step 3: Embed
    println!("\n[3/4] Creating embeddings ...");
    let client = super::client()?;

    let bar = ProgressBar::new(chunks.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  [{bar:30}] {pos}/{len} chunks")
            .expect("valid progress template")
            .progress_chars("=> "),
    );

    let mut embeddings = Vec::with_capacity(chunks.len());
    let mut embedding_tokens: u64 = 0;
    for chunk in &chunks {
        let (embedding, usage) = client.embed(chunk).await?;
        embedding_tokens += usage.total_tokens as u64;
        embeddings.push(embedding);
        bar.inc(1);
    }
    bar.finish();
    println!(
        "  {} Created {} embeddings ({} tokens, ~${:.4})",
        style("✓").green(),
        embeddings.len(),
        embedding_tokens,
        crate::runlog::embedding_cost(embedding_tokens)
    );

    // Step 4: Persist chunks and topic map
    println!("\n[4/4] Saving to the chunk store ...");
    let store = ChunkStore::open()?;
    store.save(&name, chunks, embeddings)?;

    let topic_map = extract_topics(&client, config.model, &extracted.text, &name).await?;
    store.save_topics(&name, &topic_map)?;
    println!("  {} Saved chunks and {} topics", style("✓").green(), topic_map.topics.len());

    for (i, topic) in topic_map.topic_names().iter().enumerate() {
        println!("    {}. {}", i + 1, topic);
    }

    // First ingested textbook becomes the default
    if config.default_textbook.is_none() {
        config.default_textbook = Some(name.clone());
        config.save()?;
        println!("\n  {} Set '{}' as the default textbook", style("✓").green(), name);
    }

    let duration = start.elapsed().as_secs_f64();
    RunRecord::ingest(run_id, &name, stats, embedding_tokens, duration).append()?;

    println!("\n{} Processing complete in {:.1}s", style("✓").green().bold(), duration);
    Ok(())
}
