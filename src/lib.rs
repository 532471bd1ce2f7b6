//! # resume2profile
//!
//! Turn uploaded resumes into structured candidate profiles, and those
//! profiles into personalized outreach — powered by any LLM provider
//! supported by `edgequake-llm`.
//!
//! The crate is built around three pipeline stages:
//!
//! ```text
//! bytes ──▶ document ──▶ invoke ──▶ normalize
//! (upload)  (plain text) (model)   (typed record)
//! ```
//!
//! - **Document text extraction** is best-effort: a damaged PDF page or a
//!   format without a local extractor degrades to less (or no) text, never
//!   to an error. When no text comes out, parsing falls back to sending the
//!   raw file to the model inline.
//! - **Invocation** is a thin chat call: a per-task system prompt plus the
//!   user's content. Each task resolves its own credential slot (`parser`,
//!   `generator`, `chatbot`) so cost and quality can be tuned per use case.
//! - **Normalization** treats the model reply as untrusted text:
//!   fence-stripped, parsed, and coerced field by field into a
//!   schema-complete record. Bad fields degrade to empty defaults with a
//!   [`Degradation`] tag instead of failing the operation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resume2profile::{parse_resume, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder()
//!         .provider_name("openai")
//!         .model("gpt-4.1-mini")
//!         .build()?;
//!
//!     let bytes = std::fs::read("resume.pdf")?;
//!     let extraction = parse_resume(bytes, "application/pdf", &config).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&extraction.record)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod record;

pub use config::{
    CredentialProfile, CredentialSlot, ExtractionConfig, ExtractionConfigBuilder, Task,
};
pub use error::{Degradation, ExtractError};
pub use extract::{
    apply_quick_action, chat_edit, extract_document_text, generate_email, parse_resume,
    parse_resume_sync, parse_resume_text, refine_context, resolve_provider, suggest_context,
    DEFAULT_MODEL,
};
pub use pipeline::document::{is_supported_mime, MIME_DOC, MIME_DOCX, MIME_PDF};
pub use pipeline::invoke::{ExtractionInput, ExtractionRequest};
pub use record::{
    ChatRole, ChatTurn, ContextSuggestions, EmailDraft, EmailRequest, Extraction,
    InvocationStats, ModelReply, Normalized, ParsedProfile, QuickAction, TargetingContext,
};
