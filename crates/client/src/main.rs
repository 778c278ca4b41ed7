//! Agent console binary.
//!
//! Composition root: loads configuration, sets up logging, builds the
//! runtime over the simulated world, then reads commands from stdin until
//! `:quit` or end of input. Actions run on their own tasks so `:interrupt`
//! can be issued while one is in flight.
//!
//! # Examples
//!
//! ```bash
//! AGENT_LOG_STDERR=1 cargo run -p agent-client
//! > chat {"message": "hello"}
//! > go_to {"x": 40, "y": 64, "z": 10}
//! > :interrupt changed my mind
//! ```

mod repl;

use std::sync::Arc;

use anyhow::Result;
use client_bootstrap::{AgentBuilder, AgentConfig, AgentSetup, default_log_dir, setup_logging};
use runtime::{ActionResult, Event, Runtime, Topic, WorldEvent};
use tokio::io::{AsyncBufReadExt, BufReader};

use repl::Command;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let mut config = AgentConfig::from_env();
    let session_id = config.resolved_session_id();
    config.session_id = Some(session_id.clone());

    let _logging = setup_logging(&default_log_dir(), &session_id, config.log_stderr)?;
    tracing::info!("Starting agent console");
    tracing::info!("Data directory: {}", config.resolved_data_dir().display());

    let setup = AgentBuilder::new(config).build().await?;
    tracing::info!(
        actions = setup.runtime.executor().registered_actions().len(),
        "Runtime built successfully"
    );

    let AgentSetup { world, runtime, .. } = setup;
    let result = run_console(&runtime).await;

    world.disconnect("console closed");
    runtime.shutdown();
    tracing::info!("Agent shutdown complete");
    result
}

async fn run_console(runtime: &Runtime) -> Result<()> {
    let _chat = runtime.events().on(Topic::Chat, |event| {
        if let Event::World(WorldEvent::Chat { username, message }) = event {
            println!("<{username}> {message}");
        }
        Ok(())
    });

    println!("{}", repl::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match repl::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("error: {message}");
                continue;
            }
        };

        match command {
            Command::Empty => {}
            Command::Help => println!("{}", repl::HELP),
            Command::Quit => break,
            Command::Prompt => match runtime.context() {
                Ok(ctx) => {
                    println!("{}", runtime.prompts().generate_categorized_prompt(Some(&ctx)));
                }
                Err(e) => println!("error: {e}"),
            },
            Command::Actions => {
                for action in runtime.executor().registered_actions() {
                    println!("{:<16} {}", action.id(), action.description());
                }
            }
            Command::Interrupt(reason) => match runtime.executor().interrupt_all(&reason) {
                Ok(true) => println!("interrupted: {reason}"),
                Ok(false) => println!("already interrupted, use :resume"),
                Err(e) => println!("error: {e}"),
            },
            Command::Resume => match runtime.executor().resume() {
                Ok(()) => println!("resumed"),
                Err(e) => println!("error: {e}"),
            },
            Command::Execute { id, params } => {
                let executor = Arc::clone(runtime.executor());
                tokio::spawn(async move {
                    let result = executor.execute(&id, params).await;
                    print_result(&id, &result);
                });
            }
        }
    }

    Ok(())
}

fn print_result(id: &str, result: &ActionResult) {
    let status = if result.success { "ok" } else { "failed" };
    println!("[{id}] {status}: {}", result.message);
    if let Some(data) = &result.data {
        match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::warn!(error = %e, "Cannot render result data"),
        }
    }
}
