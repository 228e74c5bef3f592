mod config;
mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use runtime::{
    Agent, CustomAgent, InvocationContext, LlmAgent, LlmRequest, LlmResponse, Plugin,
    PluginConfig, PluginSet, RequestConfirmationProcessor, RequestProcessor,
};
use session::{Event, MemorySession, Part, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "ratify.toml";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Parser)]
#[command(name = "ratify")]
#[command(about = "Resolve tool confirmation answers from conversation history", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve confirmations from the latest user turn of a history file
    Resolve {
        /// JSON history file
        history: PathBuf,
        /// Kind of agent handling the turn
        #[arg(short, long, value_enum, default_value_t = AgentKind::Llm)]
        agent: AgentKind,
    },
    /// Show the events of a history file
    Events {
        /// JSON history file
        history: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AgentKind {
    /// Model-backed agent (takes part in confirmation)
    Llm,
    /// Custom agent without model hooks
    Custom,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.log.filter);

    match cli.command {
        Commands::Resolve { history, agent } => cmd_resolve(&config, &history, agent),
        Commands::Events { history } => cmd_events(&history),
    }
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_resolve(config: &Config, history: &Path, kind: AgentKind) -> Result<()> {
    let session = load_history(history)?;
    tracing::debug!(session = %session.id(), events = session.events.len(), "loaded history");

    let agent: Arc<dyn Agent> = match kind {
        AgentKind::Llm => Arc::new(LlmAgent::builder("assistant", DEFAULT_MODEL).build()),
        AgentKind::Custom => Arc::new(CustomAgent::new("custom")),
    };
    let plugins = Arc::new(PluginSet::new(vec![audit_plugin()?])?);
    let ctx = InvocationContext::new(agent)
        .with_session(Arc::new(session))
        .with_plugins(Arc::clone(&plugins));

    let mut request = LlmRequest::new(DEFAULT_MODEL);
    let outcome = RequestConfirmationProcessor::with_config(config.confirmation.clone())
        .process(&ctx, &mut request)
        .and_then(|()| ctx.plugins().run_before_model(&ctx, &mut request));
    plugins.close()?;
    outcome?;

    let sorted: BTreeMap<_, _> = request.tool_confirmations.iter().collect();
    println!("{}", serde_json::to_string_pretty(&sorted)?);
    Ok(())
}

/// Logs every confirmation attached to the outgoing request.
fn audit_plugin() -> Result<Plugin> {
    Ok(Plugin::new(PluginConfig {
        before_model: Some(Arc::new(
            |_: &InvocationContext, req: &mut LlmRequest| -> runtime::Result<Option<LlmResponse>> {
                for (id, confirmation) in &req.tool_confirmations {
                    tracing::info!(
                        call_id = %id,
                        confirmed = confirmation.confirmed,
                        hint = %confirmation.hint,
                        "tool confirmation"
                    );
                }
                Ok(None)
            },
        )),
        ..PluginConfig::new("audit")
    })?)
}

fn cmd_events(history: &Path) -> Result<()> {
    let session = load_history(history)?;

    if session.events.is_empty() {
        println!("No events found in {}", history.display());
        return Ok(());
    }

    println!("Session: {}\n", session.id());
    for event in &session.events {
        print_event(event);
    }

    Ok(())
}

fn print_event(event: &Event) {
    let time = Local
        .from_utc_datetime(&event.timestamp.naive_utc())
        .format("%H:%M:%S");

    let Some(content) = &event.content else {
        println!("[{time}] {}: (no content)", event.author);
        return;
    };

    for part in &content.parts {
        match part {
            Part::Text { text } => {
                // Truncate long messages for display
                let display: String = if text.chars().count() > 200 {
                    format!("{}...", text.chars().take(200).collect::<String>())
                } else {
                    text.clone()
                };
                println!("[{time}] {}: {display}", event.author);
            }
            Part::FunctionCall(call) => {
                println!(
                    "[{time}] {}: CALL {} ({}) {}",
                    event.author,
                    call.name,
                    call.id,
                    serde_json::Value::Object(call.args.clone())
                );
            }
            Part::FunctionResponse(response) => {
                let payload = response
                    .response
                    .clone()
                    .map(serde_json::Value::Object)
                    .unwrap_or_default();
                println!(
                    "[{time}] {}: RESPONSE {} ({}) {payload}",
                    event.author, response.name, response.id
                );
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => Ok(Config::load(CONFIG_FILE)?),
        None => Ok(Config::default()),
    }
}

fn load_history(path: &Path) -> Result<MemorySession> {
    if !path.exists() {
        return Err(Error::HistoryNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(MemorySession::load(path)?)
}
