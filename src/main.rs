use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docchat::config::{Config, LogFormat};
use docchat::conversation::{ConversationTurn, TurnStatus};
use docchat::knowledge_base::Document;
use docchat::transport::UploadFile;
use docchat::AppState;

/// Terminal client for a retrieval-augmented document-chat backend.
#[derive(Debug, Parser)]
#[command(name = "docchat", version, about)]
struct Cli {
    /// Backend base URL (overrides DOCCHAT_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "docchat starting"
    );

    let state = AppState::new(config)?;

    // Initial listing; a dead backend is reported but not fatal.
    if let Err(e) = state.store.refresh().await {
        warn!(error = %e, "Initial knowledge-base refresh failed");
        println!("Note: {}", e.user_message());
    }
    print_banner(&state);

    run_repl(&state).await?;

    info!("docchat shutting down");
    Ok(())
}

fn print_banner(state: &AppState) {
    let count = state.store.snapshot().len();
    println!("docchat - ask questions about your documents");
    println!(
        "Knowledge base: {count} document{}",
        if count == 1 { "" } else { "s" }
    );
    println!("Commands: /list  /upload <path>...  /delete <id>  /help  /quit");
}

async fn run_repl(state: &AppState) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, rest)| (c, rest)) {
            ("/quit", _) | ("/exit", _) => break,
            ("/help", _) => {
                println!("/list             show the knowledge base");
                println!("/upload <path>... upload documents (pdf, doc, docx, txt, md; max 10 MiB each)");
                println!("/delete <id>      delete a document");
                println!("/quit             exit");
                println!("Anything else is sent as a question.");
            }
            ("/list", _) => list_documents(state),
            ("/upload", rest) => upload_files(state, rest).await,
            ("/delete", rest) => delete_document(state, rest).await,
            _ => ask(state, line).await,
        }
    }

    Ok(())
}

fn list_documents(state: &AppState) {
    let documents = state.store.snapshot();
    if documents.is_empty() {
        println!("No documents yet. Upload one with /upload <path>.");
        return;
    }
    for doc in documents.iter() {
        println!("  {}", describe_document(doc));
    }
}

fn describe_document(doc: &Document) -> String {
    let date = doc
        .uploaded_at
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let size = doc
        .size_bytes
        .map(format_file_size)
        .unwrap_or_else(|| "unknown size".to_string());
    format!("{}  {}  {}  [{}]", doc.display_name, date, size, doc.id)
}

/// Human-readable size, matching the usual Bytes/KB/MB/GB listing view.
fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} bytes")
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

async fn upload_files(state: &AppState, paths: &str) {
    let paths: Vec<PathBuf> = paths.split_whitespace().map(PathBuf::from).collect();
    if paths.is_empty() {
        println!("Usage: /upload <path>...");
        return;
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                files.push(UploadFile::new(name, bytes));
            }
            Err(e) => {
                println!("Cannot read {}: {}", path.display(), e);
                return;
            }
        }
    }

    match state.uploads.upload(files).await {
        Ok(summary) => {
            let count = state.store.snapshot().len();
            println!(
                "{}",
                summary
                    .message
                    .unwrap_or_else(|| "Documents processed successfully".to_string())
            );
            println!("Knowledge base now holds {count} document(s).");
        }
        Err(e) => println!("Upload failed: {e}"),
    }
}

async fn delete_document(state: &AppState, id: &str) {
    let id = id.trim();
    if id.is_empty() {
        println!("Usage: /delete <id>");
        return;
    }
    match state.store.remove(id).await {
        Ok(()) => println!("Deleted {id}."),
        Err(e) => println!("Delete failed: {}", e.user_message()),
    }
}

async fn ask(state: &AppState, question: &str) {
    match state.conversation.submit(question).await {
        Ok(handle) => {
            if let Some(turn) = state.conversation.turn(&handle.assistant_turn_id) {
                print_answer(&turn);
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn print_answer(turn: &ConversationTurn) {
    println!("{}", turn.text);
    if turn.status == TurnStatus::Failed {
        return;
    }
    if !turn.evidence.is_empty() {
        println!("Sources:");
        for evidence in &turn.evidence {
            println!(
                "  - {} (relevance {:.2})",
                evidence.source_document_name, evidence.relevance_score
            );
            println!("    {}", evidence.passage_text);
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
