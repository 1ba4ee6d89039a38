//! Ask command handlers - one-shot questions and the interactive chat session

use std::io::Write;
use std::io::{
    self,
};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::output::*;
use crate::conversation::ConversationState;
use crate::index::EmbeddingIndex;
use crate::rag::AssistantService;
use crate::rag::TurnKind;
use crate::AppConfig;
use crate::Result;

/// Simple spinner for showing progress
struct Spinner {
    message: String,
    running: Arc<AtomicBool>,
}

impl Spinner {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn start(&self) {
        let message = self.message.clone();
        let running = self.running.clone();
        running.store(true, Ordering::Relaxed);

        std::thread::spawn(move || {
            let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            let mut idx = 0;

            while running.load(Ordering::Relaxed) {
                print!("\r   {} {}...", frames[idx], message);
                io::stdout().flush().ok();
                idx = (idx + 1) % frames.len();
                std::thread::sleep(Duration::from_millis(80));
            }

            // Clear the line
            print!("\r{}\r", " ".repeat(80));
            io::stdout().flush().ok();
        });
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        std::thread::sleep(Duration::from_millis(100)); // Give time to clear
    }
}

/// Load the index and build the assistant; load failures are fatal here
fn build_assistant(config: &AppConfig) -> Result<AssistantService> {
    let index = Arc::new(EmbeddingIndex::load(
        config.vectors_path(),
        config.metadata_path(),
    )?);
    AssistantService::from_config(config, index)
}

/// Answer a single question and print the result
pub async fn handle_ask(config: &AppConfig, question: String, verbose: bool) -> Result<()> {
    let assistant = build_assistant(config)?;
    let mut conversation = ConversationState::new();

    println!("🧠 Blinkit AI Business Assistant");
    println!("================================\n");
    println!("Question: {question}\n");

    let spinner = Spinner::new("Analyzing feedback");
    spinner.start();
    let outcome = assistant.answer_turn(&mut conversation, &question).await;
    spinner.stop();

    println!("📝 Answer:");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_wrapped(&outcome.answer, 80);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    match outcome.kind {
        TurnKind::Answered => {
            if verbose {
                print_sources(&outcome.sources);
            } else {
                println!(
                    "💡 Based on {} feedback comments. Use --verbose to see them.",
                    outcome.sources.len()
                );
            }
        }
        TurnKind::NoEvidence => {
            print_warning("No stored feedback was close enough to this question");
        }
        TurnKind::ServiceError => {
            print_error("The generation service failed; see logs for details");
        }
    }

    Ok(())
}

/// Run an interactive chat session over one conversation
pub async fn handle_chat(config: &AppConfig, verbose: bool) -> Result<()> {
    let assistant = build_assistant(config)?;
    let mut conversation = ConversationState::new();

    println!("🧠 Blinkit AI Business Assistant");
    println!("================================");
    println!(
        "Index: {} feedback comments | session {}",
        assistant.retriever().index().len(),
        conversation.session_id()
    );
    println!("Ask a business question. Type 'history' to re-render the session,");
    println!("'exit' or 'quit' to leave.\n");

    loop {
        print_prompt("You: ");

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let question = input.trim();
        if question.is_empty() {
            continue;
        }
        match question {
            "exit" | "quit" => break,
            "history" => {
                println!();
                print_history(&conversation);
                continue;
            }
            _ => {}
        }

        let spinner = Spinner::new("Analyzing feedback");
        spinner.start();
        let outcome = assistant.answer_turn(&mut conversation, question).await;
        spinner.stop();

        println!("\n🤖 Assistant:");
        print_wrapped(&outcome.answer, 80);

        if verbose && outcome.kind == TurnKind::Answered {
            println!();
            print_sources(&outcome.sources);
        }
        println!();
    }

    if !conversation.is_empty() {
        println!();
        print_info(&format!(
            "Session ended after {} turns",
            conversation.len()
        ));
    }

    Ok(())
}
