//! The `progress` command: show what's learned and what needs review

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::profile::StudentProfile;
use crate::store::ChunkStore;

/// Display progress for a topic or across all topics
pub fn run(topic: Option<String>, student: String) -> Result<()> {
    let profile = StudentProfile::open(&student)?;

    match topic {
        Some(topic) => {
            println!("{}", profile.render_topic(&topic));
        }
        None => {
            // Totals come from the default textbook's topic map when present
            let config = Config::load()?;
            let topic_map = match &config.default_textbook {
                Some(name) => ChunkStore::open()?.load_topics(name)?,
                None => None,
            };

            println!("{}", style("YOUR OVERALL PROGRESS").bold());
            println!("{}", profile.render_all(topic_map.as_ref()));

            let weak = profile.weak_concepts();
            if !weak.is_empty() {
                println!("{}", style("Worth reviewing:").yellow());
                for (topic, concept) in weak {
                    println!("  - {} ({})", concept, topic);
                }
            }
        }
    }

    Ok(())
}
