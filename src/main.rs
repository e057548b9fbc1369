use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mentor::commands;
use mentor::tutor::Difficulty;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mentor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a PDF textbook: extract, chunk, embed, and index it
    Ingest {
        /// Path to the PDF file
        pdf: PathBuf,
        /// Name for the textbook (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
        /// Target chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Chunk overlap in characters
        #[arg(long)]
        overlap: Option<usize>,
    },
    /// Ask questions about the material (interactive)
    Ask {
        /// Textbook to search (defaults to the configured default)
        #[arg(short, long)]
        textbook: Option<String>,
        /// Number of chunks to retrieve per question
        #[arg(long)]
        top_k: Option<usize>,
        /// Show the retrieved context above each answer
        #[arg(long)]
        show_context: bool,
    },
    /// Start a Socratic teaching session on a topic
    Teach {
        /// Topic to learn (see `mentor topics`)
        topic: String,
        /// Textbook to teach from
        #[arg(short, long)]
        textbook: Option<String>,
        /// Question difficulty
        #[arg(short, long, default_value = "beginner")]
        difficulty: Difficulty,
        /// Maximum question/answer rounds
        #[arg(long, default_value_t = 5)]
        max_turns: usize,
        /// Save the session transcript without asking
        #[arg(long)]
        save: bool,
        /// Student profile to record progress under
        #[arg(long, default_value = "default")]
        student: String,
    },
    /// Show the topic map extracted from a textbook
    Topics {
        /// Textbook to show
        #[arg(short, long)]
        textbook: Option<String>,
    },
    /// Show learning progress
    Progress {
        /// Show a single topic instead of the overview
        #[arg(short, long)]
        topic: Option<String>,
        /// Student profile to show
        #[arg(long, default_value = "default")]
        student: String,
    },
    /// List ingested textbooks
    List,
    /// Remove an ingested textbook
    Remove {
        /// Name of the textbook to remove
        name: String,
    },
    /// Manage the OpenAI API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store an API key in the system keyring
    Set {
        /// The key (prompted for if omitted)
        key: Option<String>,
    },
    /// Show the currently resolved key, masked
    Show,
    /// Remove the keyring entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OPENAI_API_KEY from a .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { pdf, name, chunk_size, overlap } => {
            commands::ingest::run(pdf, name, chunk_size, overlap).await?;
        }
        Commands::Ask { textbook, top_k, show_context } => {
            commands::ask::run(textbook, top_k, show_context).await?;
        }
        Commands::Teach { topic, textbook, difficulty, max_turns, save, student } => {
            commands::teach::run(topic, textbook, difficulty, max_turns, save, student).await?;
        }
        Commands::Topics { textbook } => {
            commands::topics::run(textbook)?;
        }
        Commands::Progress { topic, student } => {
            commands::progress::run(topic, student)?;
        }
        Commands::List => {
            commands::library::list()?;
        }
        Commands::Remove { name } => {
            commands::library::remove(name)?;
        }
        Commands::Key { action } => match action {
            KeyAction::Set { key } => commands::key::set(key)?,
            KeyAction::Show => commands::key::show()?,
            KeyAction::Clear => commands::key::clear()?,
        },
    }

    Ok(())
}
