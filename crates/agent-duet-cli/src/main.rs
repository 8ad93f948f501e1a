//! CLI for document-grounded two-agent conversations.
//!
//! Subcommands:
//!  - `chat`     : ingest a document, run a bounded Agent A / Agent B exchange and
//!                 write a Markdown summary report.
//!  - `retrieve` : print the document chunks most similar to a query.
//!
//! Completion settings come from `OPENROUTER_*` environment variables; an
//! optional login pair from `DUET_USERNAME` / `DUET_PASSWORD`.
//!
//! Usage examples:
//!  cargo run -p agent-duet -- chat --document notes.txt --seed "What is covered?"
//!  cargo run -p agent-duet -- retrieve --document notes.txt --query "billing" --json

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::info;

use agent_duet::{
    extractor_for_path, retrieve, CompletionConfig, ConversationOrchestrator, Credentials,
    LexicalIndex, MarkdownReport, OpenRouterClient, OrchestratorConfig, Persona, TextExtractor,
};

mod chat;
mod progress;

/// CLI entrypoint.
#[derive(Parser)]
#[command(
    name = "agent-duet",
    about = "Two agents discussing a document, grounded by lexical retrieval",
    version
)]
struct Cli {
    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a conversation and write a summary report.
    Chat(ChatArgs),

    /// Show the chunks retrieval would use as context for a query.
    Retrieve(RetrieveArgs),
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
struct ChatArgs {
    /// Document to ground the conversation on (plain text, or PDF by extension).
    #[arg(short, long, value_name = "PATH")]
    document: Option<PathBuf>,

    /// Opening question asked by Agent A.
    #[arg(short, long)]
    seed: String,

    /// Persona for Agent A: Patient, Doctor, Teacher, Engineer or Student.
    #[arg(long)]
    persona_a: Option<Persona>,

    /// Persona for Agent B.
    #[arg(long)]
    persona_b: Option<Persona>,

    /// Number of question/answer exchanges (1-10).
    #[arg(long, default_value_t = 3)]
    max_turns: usize,

    /// Number of chunks used as context for each answer.
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Also append the whole document to every Agent A question.
    #[arg(long)]
    inline_context: bool,

    /// Always continue with the first suggested follow-up instead of prompting.
    #[arg(long)]
    auto: bool,

    /// Override the completion model (defaults to OPENROUTER_MODEL or the built-in model).
    #[arg(long)]
    model: Option<String>,

    /// Path to write the Markdown summary report (default: conversation_summary.md).
    #[arg(long, short = 'o', value_name = "PATH")]
    report: Option<PathBuf>,

    /// Path to write the transcript as JSON (optional).
    #[arg(long, value_name = "PATH")]
    transcript: Option<PathBuf>,

    /// Username, required when DUET_USERNAME/DUET_PASSWORD are set.
    #[arg(long)]
    username: Option<String>,

    /// Password, required when DUET_USERNAME/DUET_PASSWORD are set.
    #[arg(long)]
    password: Option<String>,
}

/// Arguments for the `retrieve` subcommand.
#[derive(Args, Debug)]
struct RetrieveArgs {
    /// Document to index (plain text, or PDF by extension).
    #[arg(short, long, value_name = "PATH")]
    document: PathBuf,

    /// Query text.
    #[arg(short, long)]
    query: String,

    /// Number of chunks to return.
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Emit JSON instead of human-readable output.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Chat(args) => run_chat(args),
        Commands::Retrieve(args) => run_retrieve(args),
    }
}

/// Refuse to run when a login pair is configured and the supplied one differs.
fn check_login(args: &ChatArgs) -> Result<()> {
    let creds = Credentials::from_env().context("reading DUET_* credentials")?;
    if !creds.required() {
        return Ok(());
    }
    let username = args.username.as_deref().unwrap_or_default();
    let password = args.password.as_deref().unwrap_or_default();
    if !creds.verify(username, password) {
        bail!("invalid username or password");
    }
    info!("login accepted");
    Ok(())
}

/// Raw document bytes plus the extractor matching the file extension.
fn open_document(path: &Path) -> Result<(Vec<u8>, Box<dyn TextExtractor>)> {
    let extractor = extractor_for_path(path)?;
    let bytes =
        std::fs::read(path).with_context(|| format!("reading document {}", path.display()))?;
    Ok((bytes, extractor))
}

fn run_chat(args: ChatArgs) -> Result<()> {
    check_login(&args)?;

    let mut completion =
        CompletionConfig::from_env().context("reading OPENROUTER_* configuration")?;
    if let Some(model) = args.model.as_ref() {
        completion = completion.with_model(model.clone());
    }
    let client = OpenRouterClient::new(completion).context("building HTTP client")?;

    let config = OrchestratorConfig {
        max_turns: args.max_turns,
        top_k: args.top_k,
        persona_a: args.persona_a,
        persona_b: args.persona_b,
        inline_document_context: args.inline_context,
    };
    let mut orch = ConversationOrchestrator::new(client, config)?;

    if let Some(path) = args.document.as_ref() {
        let (bytes, extractor) = open_document(path)?;
        let report = orch
            .ingest_bytes(extractor.as_ref(), &bytes)
            .with_context(|| format!("extracting text from {}", path.display()))?;
        if report.is_empty() {
            println!("{} contains no text; answers will not be grounded.", path.display());
        } else {
            println!(
                "Indexed {} chunks ({} terms) from {}",
                report.chunks,
                report.vocabulary,
                path.display()
            );
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    chat::run_conversation(&mut orch, &args.seed, args.auto, &mut input, &mut out)?;
    drop(out);

    let report_path = args
        .report
        .unwrap_or_else(|| chat::default_report_path(&MarkdownReport));
    chat::write_outputs(&orch, &report_path, args.transcript.as_deref())
}

fn run_retrieve(args: RetrieveArgs) -> Result<()> {
    let (bytes, extractor) = open_document(&args.document)?;
    let text = extractor
        .extract(&bytes)
        .with_context(|| format!("extracting text from {}", args.document.display()))?;
    let index = LexicalIndex::build(&text);
    let hits = retrieve(&index, &args.query, args.top_k);

    if args.json {
        let results: Vec<_> = hits
            .iter()
            .map(|h| {
                json!({
                    "position": h.chunk.position,
                    "score": h.score,
                    "text": h.chunk.text,
                })
            })
            .collect();
        let out = json!({
            "query": args.query,
            "chunks": index.len(),
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Top {} matching chunks for query {:?}:", args.top_k, args.query);
        for (i, h) in hits.iter().enumerate() {
            let preview: String = h.chunk.text.chars().take(120).collect();
            println!(
                "{}. chunk={} score={:.4}\n   {}",
                i + 1,
                h.chunk.position,
                h.score,
                preview.split_whitespace().collect::<Vec<_>>().join(" ")
            );
        }
    }
    Ok(())
}
