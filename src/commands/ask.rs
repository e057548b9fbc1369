//! The `ask` command: interactive Q&A grounded in the textbook

use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use console::style;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::openai::{OpenAiError, StreamEvent};
use crate::retrieval::Retriever;
use crate::runlog::{new_run_id, RunRecord};
use crate::store::ChunkStore;
use crate::tutor::qa;

/// Run the interactive question-answering loop
pub async fn run(textbook: Option<String>, top_k: Option<usize>, show_context: bool) -> Result<()> {
    let config = Config::load()?;
    let textbook = super::resolve_textbook(textbook, &config)?;
    let top_k = top_k.unwrap_or(config.top_k);

    let client = super::client()?;
    let store = ChunkStore::open()?;
    let retriever = Retriever::new(&client, &store);

    println!("{}", style("TEXTBOOK Q&A").bold());
    println!("Loaded: {}", style(&textbook).cyan());
    println!("Ask questions about the material. Type quit or exit to stop.\n");

    loop {
        let question = super::read_line(&format!("{} ", style("Your question:").bold()))?;

        if matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("\nGoodbye!");
            break;
        }
        if question.is_empty() {
            continue;
        }

        let start = Instant::now();
        let run_id = new_run_id();

        let (chunks, stats) = match retriever.retrieve(&question, &textbook, top_k).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("{} {:#}", style("Error:").red(), e);
                continue;
            }
        };

        if show_context {
            println!("\n{}", style("Retrieved context:").dim());
            for (i, chunk) in chunks.iter().enumerate() {
                let preview: String = chunk.text.chars().take(200).collect();
                println!(
                    "{}",
                    style(format!("--- Chunk {} (score {:.3}) ---\n{}...", i + 1, chunk.score, preview))
                        .dim()
                );
            }
        }

        println!("\n{}", style("Answer:").bold());
        let request = qa::answer_request(config.model, &question, &chunks);

        match stream_answer(&client, request).await {
            Ok(()) => {}
            Err(OpenAiError::Cancelled) => {
                println!("\n{}", style("(interrupted)").dim());
            }
            Err(e) => {
                eprintln!("\n{} {}", style("Error:").red(), e);
                continue;
            }
        }

        let duration = start.elapsed().as_secs_f64();
        // A logging failure shouldn't end the session after a good answer
        if let Err(e) = RunRecord::retrieval(run_id, &textbook, &question, top_k, stats, duration).append() {
            tracing::warn!("Failed to write run log: {:#}", e);
        }
        println!();
    }

    Ok(())
}

/// Stream a completion to stdout; Ctrl-C interrupts the answer
async fn stream_answer(
    client: &crate::openai::OpenAiClient,
    request: crate::openai::ChatRequest,
) -> Result<(), OpenAiError> {
    let (tx, mut rx) = mpsc::channel::<StreamEvent>(32);
    let cancel = CancellationToken::new();

    let printer = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::ContentDelta { text } => {
                    let _ = write!(stdout, "{}", text);
                    let _ = stdout.flush();
                }
                StreamEvent::Done => break,
                StreamEvent::Error { message } => {
                    let _ = write!(stdout, "\n[stream error: {}]", message);
                    break;
                }
            }
        }
        let _ = writeln!(stdout);
    });

    let result = tokio::select! {
        res = client.chat_streaming(request, tx, cancel.clone()) => res,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            Err(OpenAiError::Cancelled)
        }
    };

    let _ = printer.await;
    result
}
