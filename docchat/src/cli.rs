//! docchat-cli - one-shot commands against the document chat backend
//!
//! Each invocation performs a single backend operation and prints the
//! resulting status. Failures exit non-zero.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/docchat/config.toml (~/.config/docchat/config.toml)
//! - Logs: $XDG_STATE_HOME/docchat/docchat.log (~/.local/state/docchat/docchat.log)

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use docchat_core::dispatch::execute;
use docchat_core::format::format_metrics;
use docchat_core::markup::plain_text;
use docchat_core::{
    Backend, Config, DocumentId, HttpBackend, Orchestrator, QueryId, Region, Request, StatusKind,
};
use indicatif::{ProgressBar, ProgressStyle};

/// Column width answers are wrapped to.
const ANSWER_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "docchat-cli")]
#[command(about = "One-shot commands for the document chat backend")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, value_name = "URL")]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload and index a PDF
    Upload {
        /// Path to the PDF file
        path: PathBuf,
    },

    /// Fetch and index a website
    Website {
        /// Website URL
        url: String,
    },

    /// Delete an indexed document
    Delete {
        /// Document id as returned by upload or website
        id: String,
    },

    /// Ask a question about the indexed documents
    Ask {
        /// The question
        question: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rate an answer
    #[command(group(ArgGroup::new("judgment").required(true).args(["relevant", "irrelevant"])))]
    Feedback {
        /// Query id printed with the answer
        query_id: String,

        /// The answer was relevant
        #[arg(long)]
        relevant: bool,

        /// The answer was not relevant
        #[arg(long)]
        irrelevant: bool,
    },

    /// Clear the backend's chat history
    Clear,

    /// Check that the backend is reachable
    Status,

    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load()
        .context("failed to load configuration")?
        .with_backend_url(args.backend)
        .context("invalid backend URL")?;

    // Initialize logging
    let _log_guard =
        docchat_core::logging::init(&config.logging).context("failed to initialize logging")?;

    if let Command::Config = args.command {
        cmd_config(&config);
        return Ok(());
    }

    let backend = HttpBackend::new(&config.backend).context("failed to create HTTP client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;

    tracing::info!(backend = %backend.base_url(), "docchat-cli starting");

    match args.command {
        Command::Upload { path } => {
            let mut orch = Orchestrator::new();
            orch.forms.pdf_path = path.display().to_string();
            let request = orch.submit_upload();
            run_form(&runtime, &backend, &mut orch, Region::Upload, request)
        }
        Command::Website { url } => {
            let mut orch = Orchestrator::new();
            orch.forms.website_url = url;
            let request = orch.submit_website();
            run_form(&runtime, &backend, &mut orch, Region::Website, request)
        }
        Command::Delete { id } => cmd_delete(&runtime, &backend, DocumentId(id)),
        Command::Ask { question, format } => cmd_ask(&runtime, &backend, question, &format),
        Command::Feedback {
            query_id,
            relevant,
            irrelevant: _,
        } => cmd_feedback(&runtime, &backend, QueryId(query_id), relevant),
        Command::Clear => cmd_clear(&runtime, &backend),
        Command::Status => cmd_status(&runtime, &backend),
        Command::Config => Ok(()),
    }
}

/// Run a future behind a spinner showing `message`.
fn with_spinner<F: Future>(
    runtime: &tokio::runtime::Runtime,
    message: &str,
    future: F,
) -> Result<F::Output> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .context("invalid spinner template")?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));

    let output = runtime.block_on(future);

    pb.finish_and_clear();
    Ok(output)
}

/// Drive an ingestion form through the orchestrator and print its status.
fn run_form(
    runtime: &tokio::runtime::Runtime,
    backend: &HttpBackend,
    orch: &mut Orchestrator,
    region: Region,
    request: Option<Request>,
) -> Result<()> {
    if let Some(request) = request {
        let loading = orch
            .status()
            .status(region)
            .map(|s| s.text.clone())
            .unwrap_or_default();
        let completion = with_spinner(runtime, &loading, execute(backend, request))?;
        orch.apply(completion);
    }

    let Some(status) = orch.status().status(region) else {
        anyhow::bail!("no status reported for {}", region.name());
    };
    if status.kind == StatusKind::Error {
        anyhow::bail!("{}", status.text);
    }

    println!("{}", status.text);
    for doc in orch.documents().iter() {
        println!("  [{}] {} (id: {})", doc.kind.label(), doc.name, doc.id);
    }
    Ok(())
}

fn cmd_delete(
    runtime: &tokio::runtime::Runtime,
    backend: &HttpBackend,
    id: DocumentId,
) -> Result<()> {
    let outcome = with_spinner(
        runtime,
        "Deleting document...",
        backend.delete_document(id.clone()),
    )?;
    match outcome {
        Ok(_) => {
            println!("Deleted document {}", id);
            Ok(())
        }
        Err(failure) => anyhow::bail!(
            "{}",
            failure.status_text(&format!("Failed to delete document {}.", id))
        ),
    }
}

fn cmd_ask(
    runtime: &tokio::runtime::Runtime,
    backend: &HttpBackend,
    question: String,
    format: &str,
) -> Result<()> {
    let question = question.trim().to_string();
    if question.is_empty() {
        anyhow::bail!("Please enter a question.");
    }

    let outcome = with_spinner(runtime, "Searching...", backend.ask_question(question.clone()))?;
    let reply = match outcome {
        Ok(reply) => reply,
        Err(failure) => anyhow::bail!("{}", failure.status_text(Region::Chat.generic_error())),
    };

    if let Some(metrics) = &reply.metrics {
        tracing::info!(
            latency = metrics.latency_seconds,
            tokens_in = metrics.tokens_in,
            tokens_out = metrics.tokens_out,
            "Answer received"
        );
    }

    if format == "json" {
        let output = serde_json::json!({
            "question": question,
            "answer": plain_text(&reply.response, ANSWER_WIDTH),
            "html": reply.response,
            "query_id": reply.query_id,
            "metrics": reply.metrics,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", plain_text(&reply.response, ANSWER_WIDTH));
    println!();
    if let Some(metrics) = &reply.metrics {
        println!("{}", format_metrics(metrics));
    }
    if let Some(query_id) = &reply.query_id {
        println!("Query ID: {}", query_id);
    }
    Ok(())
}

fn cmd_feedback(
    runtime: &tokio::runtime::Runtime,
    backend: &HttpBackend,
    query_id: QueryId,
    relevant: bool,
) -> Result<()> {
    let outcome = with_spinner(
        runtime,
        "Sending feedback...",
        backend.submit_feedback(query_id.clone(), relevant),
    )?;
    match outcome {
        Ok(_) => {
            let judgment = if relevant { "relevant" } else { "irrelevant" };
            println!("Marked answer {} as {}", query_id, judgment);
            Ok(())
        }
        Err(failure) => anyhow::bail!("{}", failure.status_text("Failed to submit feedback.")),
    }
}

fn cmd_clear(runtime: &tokio::runtime::Runtime, backend: &HttpBackend) -> Result<()> {
    let outcome = with_spinner(runtime, "Clearing chat...", backend.clear_chat())?;
    match outcome {
        Ok(_) => {
            println!("Chat history cleared");
            Ok(())
        }
        Err(failure) => anyhow::bail!("{}", failure.status_text("Failed to clear chat history.")),
    }
}

fn cmd_status(runtime: &tokio::runtime::Runtime, backend: &HttpBackend) -> Result<()> {
    let reachable = with_spinner(runtime, "Contacting backend...", backend.health_check())?;
    if !reachable {
        anyhow::bail!("Backend at {} is not reachable", backend.base_url());
    }
    println!("Backend at {} is up", backend.base_url());
    Ok(())
}

fn cmd_config(config: &Config) {
    println!("docchat Configuration");
    println!("=====================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!("Backend URL:     {}", config.backend.normalized_base_url());
    println!(
        "Timeout:         {}",
        config
            .backend
            .request_timeout_secs
            .map(|secs| format!("{}s", secs))
            .unwrap_or_else(|| "none".to_string())
    );
    println!("Log level:       {}", config.logging.level);
    println!("Log file:        {}", Config::log_path().display());
}
