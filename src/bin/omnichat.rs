//! Interactive chat application for Anthropic and OpenAI models.
//!
//! This binary provides a REPL for chatting with a hosted LLM provider,
//! reporting token usage and estimated cost after every exchange.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the default Anthropic model
//! omnichat
//!
//! # Chat with OpenAI instead
//! omnichat --provider openai --model gpt-4
//!
//! # Coding-assistant mode: fold a project folder into the opening prompt
//! omnichat --project ./my-project
//! ```
//!
//! Credentials and model lists come from the environment:
//! `ANTHROPIC_API_KEY` / `AVAILABLE_ANTHROPIC_MODELS` or `OPENAI_API_KEY` /
//! `AVAILABLE_OPENAI_MODELS`.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/model <name>` - Change the model
//! - `/models` - List available models
//! - `/stats` - Show session statistics
//! - `/save [dir]` - Save the transcript now
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use omnichat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use omnichat::project::ProjectContext;
use omnichat::{PricingTable, ProviderClient, ProviderConfig, Role, history};

/// Main entry point for the omnichat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("omnichat [OPTIONS]");
    let config = ChatConfig::from_args(args)?;
    let use_color = config.use_color;

    let provider_config = ProviderConfig::from_env(config.provider)?;
    let mut client = ProviderClient::new(config.provider, &provider_config)?
        .with_max_tokens(config.max_tokens);
    if let Some(model) = &config.model {
        client.model = model.clone();
    }

    let mut session = ChatSession::new(client, PricingTable::new());
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for aborting an in-flight request
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "omnichat ({} / {})",
        session.provider_kind(),
        session.model()
    );
    println!("Type /help for commands, /quit or exit to leave\n");

    if let Some(project_dir) = &config.project {
        let context = ProjectContext::load(project_dir)?;
        renderer.print_info(&format!(
            "Loaded {} project file(s) from {}",
            context.files().len(),
            context.root().display()
        ));
        let prompt = context.initial_prompt();
        run_turn(&mut session, &prompt, &mut renderer, &interrupted).await;
    }

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        match rl.readline("You: ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => break,
                        ChatCommand::Model(model_name) => {
                            session.set_model(model_name.clone());
                            renderer.print_info(&format!("Model changed to: {model_name}"));
                        }
                        ChatCommand::Models => {
                            renderer.print_info(&format!(
                                "Available models for {}:",
                                session.provider_kind()
                            ));
                            for model in &provider_config.models {
                                renderer.print_info(&format!("  - {model}"));
                            }
                        }
                        ChatCommand::Stats => print_stats(&session),
                        ChatCommand::History => print_history(&session),
                        ChatCommand::Save(dir) => {
                            let dir = dir
                                .map(std::path::PathBuf::from)
                                .unwrap_or_else(|| config.history_dir.clone());
                            match history::save_transcript(session.history(), &dir) {
                                Ok(base) => renderer.print_info(&format!(
                                    "Transcript saved to {}.{{json,md}}",
                                    base.display()
                                )),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {line}");
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                run_turn(&mut session, line, &mut renderer, &interrupted).await;
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                // Ctrl+C or Ctrl+D at the prompt both end the session
                println!();
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    offer_save(&session, &config, &mut rl, &mut renderer);
    println!("Goodbye!");

    Ok(())
}

/// Dispatches one turn, racing the request against the interrupt flag.
///
/// Cancellation drops the in-flight request before any history mutation, so
/// an aborted turn leaves the session exactly as it was.
async fn run_turn(
    session: &mut ChatSession,
    input: &str,
    renderer: &mut PlainTextRenderer,
    interrupted: &Arc<AtomicBool>,
) {
    tokio::select! {
        outcome = session.send(input) => match outcome {
            Ok(report) => {
                renderer.print_text(&format!("\nAI: {}\n", report.text));
                let turn_cost = describe_cost(report.cost);
                renderer.print_usage(&format!(
                    "turn:  {turn_cost} | {} in / {} out",
                    report.usage.input_tokens, report.usage.output_tokens
                ));
                let totals = session.totals();
                let mut line = format!(
                    "total: ${:.4} | {} in / {} out",
                    totals.total_cost, totals.total_input_tokens, totals.total_output_tokens
                );
                if totals.unpriced_turns > 0 {
                    line.push_str(&format!(
                        " | {} turn(s) with unknown cost",
                        totals.unpriced_turns
                    ));
                }
                renderer.print_usage(&line);
            }
            Err(err) => renderer.print_error(&err.to_string()),
        },
        _ = wait_for_interrupt(interrupted) => {
            renderer.print_info("\n[interrupted]");
        }
    }
}

async fn wait_for_interrupt(interrupted: &Arc<AtomicBool>) {
    while !interrupted.swap(false, Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn describe_cost(cost: Option<f64>) -> String {
    match cost {
        Some(cost) => format!("${cost:.4}"),
        None => "cost unknown".to_string(),
    }
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Provider: {}", stats.provider);
    println!("      Model: {}", stats.model);
    println!("      Turns: {}", stats.turns);
    println!("      History entries: {}", stats.history_len);
    println!(
        "      Total tokens: {} in / {} out",
        stats.totals.total_input_tokens, stats.totals.total_output_tokens
    );
    println!("      Total cost: ${:.4}", stats.totals.total_cost);
    if stats.totals.unpriced_turns > 0 {
        println!(
            "      Unpriced turns: {} (model not in pricing table)",
            stats.totals.unpriced_turns
        );
    }
}

fn print_history(session: &ChatSession) {
    if session.history().is_empty() {
        println!("    (no conversation yet)");
        return;
    }
    for turn in session.history() {
        let label = match turn.role {
            Role::User => "You",
            Role::Assistant => "AI",
        };
        println!("    {label}: {}", turn.content);
    }
}

fn offer_save(
    session: &ChatSession,
    config: &ChatConfig,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) {
    if session.history().is_empty() {
        return;
    }
    match rl.readline("Save the chat history? [y/N] ") {
        Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
            match history::save_transcript(session.history(), &config.history_dir) {
                Ok(base) => println!("Chat history saved to {}.{{json,md}}", base.display()),
                Err(err) => renderer.print_error(&err.to_string()),
            }
        }
        _ => println!("Chat history not saved."),
    }
}
