//! The `teach` command: an interactive Socratic session on one topic

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::profile::{ConceptStatus, StudentProfile};
use crate::retrieval::Retriever;
use crate::store::ChunkStore;
use crate::tutor::socratic::{
    evaluate_answer, generate_question, Correctness, Difficulty, SessionTranscript, SessionTurn,
};

/// Run a Socratic teaching session
pub async fn run(
    topic: String,
    textbook: Option<String>,
    difficulty: Difficulty,
    max_turns: usize,
    save: bool,
    student: String,
) -> Result<()> {
    let config = Config::load()?;
    let textbook = super::resolve_textbook(textbook, &config)?;

    let client = super::client()?;
    let store = ChunkStore::open()?;
    let retriever = Retriever::new(&client, &store);
    let mut profile = StudentProfile::open(&student)?;

    println!("{}", style("SOCRATIC TEACHING SESSION").bold());
    println!("Topic: {}  ({}, up to {} turns)", style(&topic).cyan(), difficulty, max_turns);
    println!("Answer in your own words. Type 'hint' for a hint, 'quit' to stop.\n");

    let mut transcript = SessionTranscript::new(&topic, &textbook, difficulty);

    let (generated, context) =
        generate_question(&client, config.model, &retriever, &textbook, &topic, difficulty).await?;
    let teaching_goal = generated.teaching_goal.clone();
    let hint = generated.hint_if_stuck.clone();
    let mut current_question = generated.question;

    'session: for turn in 1..=max_turns {
        println!("{}", style(format!("Question {}:", turn)).bold());
        println!("{}\n", super::wrap(&current_question));

        let student_answer = loop {
            let input = super::read_line("> ")?;
            match input.to_lowercase().as_str() {
                "" => continue,
                "quit" | "exit" | "q" => break 'session,
                "hint" => {
                    println!("\n{} {}\n", style("Hint:").yellow(), super::wrap(&hint));
                    continue;
                }
                _ => break input,
            }
        };

        println!("\n{}", style("Evaluating your answer ...").dim());
        let feedback = evaluate_answer(
            &client,
            config.model,
            &current_question,
            &student_answer,
            &context,
            &teaching_goal,
        )
        .await?;

        let verdict = match feedback.evaluation.correctness {
            Correctness::Correct => style("correct").green(),
            Correctness::Partial => style("partially correct").yellow(),
            Correctness::Incorrect => style("not quite").red(),
        };
        println!("\n[{}]", verdict);
        println!("{}\n", super::wrap(&feedback.feedback));

        // Record progress against the question's teaching goal
        let status = match feedback.evaluation.correctness {
            Correctness::Correct => ConceptStatus::Learned,
            _ => ConceptStatus::Weak,
        };
        profile.update_concept(&topic, &teaching_goal, status)?;

        transcript.turns.push(SessionTurn {
            question: current_question.clone(),
            teaching_goal: teaching_goal.clone(),
            student_answer,
            feedback: feedback.clone(),
        });

        match feedback.next_question {
            Some(next) if turn < max_turns => current_question = next,
            Some(_) => {
                println!("{}", style("That's all the turns for this session.").dim());
                break;
            }
            None => {
                println!("{}", style("You've mastered this one. Well done!").green().bold());
                break;
            }
        }
    }

    if transcript.turns.is_empty() {
        println!("\nNo answers this session. Nothing to record.");
        return Ok(());
    }

    let should_save = save
        || super::read_line("\nSave this session? (y/n) ")?.eq_ignore_ascii_case("y");
    if should_save {
        let path = transcript.save()?;
        println!("{} Session saved to {:?}", style("✓").green(), path);
    }

    println!("\nThank you for learning with me!");
    Ok(())
}
