//! The `topics` command: show a textbook's topic map

use anyhow::{bail, Result};
use console::style;

use crate::config::Config;
use crate::store::ChunkStore;

/// Print the topic map for a textbook
pub fn run(textbook: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let textbook = super::resolve_textbook(textbook, &config)?;

    let store = ChunkStore::open()?;
    let Some(topic_map) = store.load_topics(&textbook)? else {
        bail!("No topic map for '{}'. Re-run `mentor ingest` to extract one.", textbook);
    };

    println!("{}", style(&textbook).bold());
    if !topic_map.document_summary.is_empty() {
        println!("{}\n", super::wrap(&topic_map.document_summary));
    }

    for (name, topic) in &topic_map.topics {
        println!("{}", style(name).cyan().bold());
        println!("{}", super::wrap(&topic.summary));

        if !topic.key_points.is_empty() {
            println!("  {}", style("Key points:").dim());
            for point in &topic.key_points {
                println!("    - {}", point);
            }
        }
        if !topic.concepts.is_empty() {
            println!("  {}", style("Concepts to master:").dim());
            for concept in &topic.concepts {
                println!("    - {}", concept);
            }
        }
        println!();
    }

    Ok(())
}
