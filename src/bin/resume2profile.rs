//! CLI binary for resume2profile.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints the parsed profile.

use anyhow::{Context, Result};
use clap::Parser;
use resume2profile::{
    extract_document_text, parse_resume, ExtractionConfig, MIME_DOC, MIME_DOCX, MIME_PDF,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Parse a resume and print the profile as JSON
  resume2profile resume.pdf

  # Use a specific model
  resume2profile --provider openai --model gpt-4.1 resume.docx

  # Extract the document's plain text only (no API key needed)
  resume2profile --text-only resume.pdf

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY           OpenAI API key
  ANTHROPIC_API_KEY        Anthropic API key
  GEMINI_API_KEY           Google Gemini API key
  RESUME2PROFILE_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  RESUME2PROFILE_MODEL     Override model ID

SETUP:
  1. Set API key:  export OPENAI_API_KEY=sk-...
  2. Parse:        resume2profile resume.pdf
"#;

/// Parse resumes into structured candidate profiles using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "resume2profile",
    version,
    about = "Parse resumes (PDF/DOC/DOCX) into structured candidate profiles using LLMs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the resume file (.pdf, .doc, or .docx).
    input: PathBuf,

    /// LLM model ID (e.g. gpt-4.1-mini, gpt-4.1).
    #[arg(long, env = "RESUME2PROFILE_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama.
    #[arg(long, env = "RESUME2PROFILE_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, default_value_t = 0.2)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, default_value_t = 2048)]
    max_tokens: usize,

    /// Print the extracted plain text and exit, skipping the model call.
    #[arg(long)]
    text_only: bool,

    /// Compact JSON output (single line) instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

/// Map a file extension to the upload MIME type the pipeline expects.
fn mime_for_path(path: &PathBuf) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => Ok(MIME_PDF),
        "doc" => Ok(MIME_DOC),
        "docx" => Ok(MIME_DOCX),
        other => anyhow::bail!(
            "Unsupported file extension '{}'; expected .pdf, .doc, or .docx",
            other
        ),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mime = mime_for_path(&cli.input)?;
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    if cli.text_only {
        let text = extract_document_text(bytes, mime).await;
        if text.is_empty() {
            anyhow::bail!("No text could be extracted from {}", cli.input.display());
        }
        println!("{}", text);
        return Ok(());
    }

    let mut builder = ExtractionConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens);
    if let Some(provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }
    let config = builder.build().context("Invalid configuration")?;

    let extraction = parse_resume(bytes, mime, &config)
        .await
        .context("Resume parsing failed")?;

    for degradation in &extraction.degradations {
        eprintln!("warning: {}", degradation);
    }
    eprintln!(
        "tokens: {} in / {} out, {} ms",
        extraction.stats.input_tokens, extraction.stats.output_tokens, extraction.stats.duration_ms
    );

    let json = if cli.compact {
        serde_json::to_string(&extraction.record)
    } else {
        serde_json::to_string_pretty(&extraction.record)
    }
    .context("Failed to serialize profile")?;
    println!("{}", json);

    Ok(())
}
