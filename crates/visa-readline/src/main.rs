use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;

use visa_application::ConversationStore;
use visa_core::config::ClientConfig;
use visa_core::conversation::Attachment;
use visa_interaction::HttpAnalyzer;

mod helper;
mod input;
mod logging;
mod render;

use helper::CliHelper;
use input::{Input, can_submit};
use render::Renderer;

#[derive(Parser)]
#[command(name = "visa")]
#[command(about = "Visa Assistant - ask which visa you need for your trip", long_about = None)]
struct Cli {
    /// Analyzer URL (overrides VISA_ANALYZER_URL and the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Path to a config file (default: ~/.config/visa-assistant/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log requests and state changes to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn client_config(&self) -> Result<ClientConfig> {
        let config = match &self.config {
            Some(path) => ClientConfig::load_from(path)
                .map(|config| config.with_env_overrides(|key| std::env::var(key).ok())),
            None => ClientConfig::load(),
        }
        .context("Failed to load configuration")?;

        Ok(match &self.endpoint {
            Some(endpoint) => config.with_endpoint(endpoint.clone()),
            None => config,
        })
    }
}

/// The main entry point for the Visa Assistant REPL.
///
/// Reads turns from the prompt, submits them to the conversation store and
/// renders every state change the store publishes. Input is not read while
/// an exchange is in flight.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // ===== Backend Initialization =====
    let config = cli.client_config()?;
    let analyzer = HttpAnalyzer::new(&config).context("Failed to create analyzer client")?;
    tracing::info!("Using analyzer at {}", analyzer.endpoint());
    let store = Arc::new(ConversationStore::new(analyzer));

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    render::print_welcome();

    let mut renderer = Renderer::new();
    let mut pending_file: Option<Attachment> = None;

    // ===== Main REPL Loop =====
    loop {
        let prompt = match &pending_file {
            Some(file) => format!("[{}] >> ", file.file_name()),
            None => ">> ".to_string(),
        };

        match rl.readline(&prompt) {
            Ok(line) => match Input::parse(&line) {
                Input::Quit => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Input::Attach(path) => match Attachment::from_path(&path) {
                    Ok(file) => {
                        let label = render::attachment_label(&file);
                        println!("{}", format!("Attached {label}").bright_black());
                        pending_file = Some(file);
                    }
                    Err(err) => eprintln!("{}", err.to_string().red()),
                },
                Input::Detach => {
                    if pending_file.take().is_some() {
                        println!("{}", "Attachment removed".bright_black());
                    }
                }
                Input::Message(content) => {
                    if !can_submit(&content, pending_file.is_some()) {
                        continue;
                    }
                    let _ = rl.add_history_entry(&line);
                    submit(&store, &mut renderer, content, pending_file.take()).await?;
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Runs one turn in the background and renders state changes until the
/// store reports the exchange finished.
async fn submit(
    store: &Arc<ConversationStore<HttpAnalyzer>>,
    renderer: &mut Renderer,
    content: String,
    file: Option<Attachment>,
) -> Result<()> {
    let mut updates = store.subscribe();
    let expected = updates.borrow_and_update().messages.len() + 2;

    let turn = {
        let store = Arc::clone(store);
        tokio::spawn(async move { store.submit_turn(content, file).await })
    };

    loop {
        if updates.changed().await.is_err() {
            break;
        }
        let state = updates.borrow_and_update().clone();
        renderer.render(&state);
        if !state.is_loading && state.messages.len() >= expected {
            break;
        }
    }

    turn.await.context("Turn task failed")?;
    Ok(())
}
