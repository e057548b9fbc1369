//! The `list` and `remove` commands: managing ingested textbooks

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::store::ChunkStore;

/// List all ingested textbooks
pub fn list() -> Result<()> {
    let store = ChunkStore::open()?;
    let textbooks = store.list()?;

    if textbooks.is_empty() {
        println!("No textbooks ingested yet. Start with `mentor ingest <pdf>`.");
        return Ok(());
    }

    let config = Config::load()?;
    for textbook in textbooks {
        let marker = if config.default_textbook.as_deref() == Some(&textbook.name) {
            style("*").green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            "{} {}  ({} chunks, ingested {})",
            marker,
            style(&textbook.name).bold(),
            textbook.num_chunks,
            textbook.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

/// Remove an ingested textbook and its topic map
pub fn remove(name: String) -> Result<()> {
    let store = ChunkStore::open()?;

    if store.remove(&name)? {
        println!("{} Removed '{}'", style("✓").green(), name);

        // Clear the default if it pointed at the removed textbook
        let mut config = Config::load()?;
        if config.default_textbook.as_deref() == Some(&name) {
            config.default_textbook = None;
            config.save()?;
        }
    } else {
        println!("No textbook named '{}'", name);
    }

    Ok(())
}
