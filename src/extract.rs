//! High-level extraction entry points.
//!
//! Each function here wires the pipeline stages together for one use case:
//! resolve a provider for the task's credential slot, build the request,
//! invoke the model, and normalize the reply into a typed record. These are
//! the functions an application embeds; the stages under
//! [`crate::pipeline`] stay usable on their own.

use crate::config::{CredentialProfile, CredentialSlot, ExtractionConfig, Task};
use crate::error::ExtractError;
use crate::pipeline::invoke::{self, ExtractionRequest};
use crate::pipeline::{document, normalize};
use crate::prompts;
use crate::record::{
    ChatTurn, ContextSuggestions, EmailDraft, EmailRequest, Extraction, ParsedProfile,
    QuickAction, TargetingContext,
};
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::{debug, info};

/// Model used when a credential names a provider without a model, or when
/// falling back to `OPENAI_API_KEY` alone.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Environment variable naming the fallback provider.
pub const ENV_PROVIDER: &str = "RESUME2PROFILE_PROVIDER";
/// Environment variable naming the fallback model.
pub const ENV_MODEL: &str = "RESUME2PROFILE_MODEL";

// ── Provider resolution ──────────────────────────────────────────────────

/// Resolve the provider for a credential slot.
///
/// Resolution order:
/// 1. The slot's own credential (provider instance, then name/model)
/// 2. The default credential (provider instance, then name/model)
/// 3. `RESUME2PROFILE_PROVIDER` / `RESUME2PROFILE_MODEL` from the environment
/// 4. `OPENAI_API_KEY` shortcut (OpenAI with the default model)
/// 5. Full environment auto-detection via [`ProviderFactory::from_env`]
pub fn resolve_provider(
    config: &ExtractionConfig,
    slot: CredentialSlot,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    if let Some(credential) = config.slot_credential(slot) {
        debug!("Using {} slot credential", slot);
        return provider_from_credential(credential, slot);
    }

    if !config.default_credential.is_empty() {
        debug!("Slot {} unset; using default credential", slot);
        return provider_from_credential(&config.default_credential, slot);
    }

    if let Ok(name) = std::env::var(ENV_PROVIDER) {
        let model = std::env::var(ENV_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        info!("Using provider from environment: {} ({})", name, model);
        return create_named(&name, &model, slot);
    }

    if std::env::var("OPENAI_API_KEY").is_ok() {
        info!("Using OpenAI via OPENAI_API_KEY ({})", DEFAULT_MODEL);
        return create_named("openai", DEFAULT_MODEL, slot);
    }

    match ProviderFactory::from_env() {
        Ok((provider, _)) => Ok(provider),
        Err(e) => Err(ExtractError::ProviderNotConfigured {
            slot: slot.as_str(),
            hint: format!(
                "no credential configured and environment detection failed: {}. \
                 Set {} or an API key such as OPENAI_API_KEY",
                e, ENV_PROVIDER
            ),
        }),
    }
}

fn provider_from_credential(
    credential: &CredentialProfile,
    slot: CredentialSlot,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    if let Some(ref provider) = credential.provider {
        return Ok(Arc::clone(provider));
    }
    let name = credential
        .provider_name
        .as_deref()
        .unwrap_or("openai");
    let model = credential.model.as_deref().unwrap_or(DEFAULT_MODEL);
    create_named(name, model, slot)
}

fn create_named(
    name: &str,
    model: &str,
    slot: CredentialSlot,
) -> Result<Arc<dyn LLMProvider>, ExtractError> {
    ProviderFactory::create_llm_provider(name, model).map_err(|e| {
        ExtractError::ProviderNotConfigured {
            slot: slot.as_str(),
            hint: format!("provider '{}' with model '{}': {}", name, model, e),
        }
    })
}

// ── Document text ────────────────────────────────────────────────────────

/// Best-effort plain text from uploaded document bytes.
///
/// Runs the CPU-bound decode off the async runtime. Returns an empty string
/// for anything that cannot be decoded; see [`document::extract_text`] for
/// the full semantics.
pub async fn extract_document_text(bytes: Vec<u8>, mime_type: &str) -> String {
    let mime = mime_type.to_string();
    match tokio::task::spawn_blocking(move || document::extract_text(&bytes, &mime)).await {
        Ok(text) => text,
        Err(e) => {
            debug!("Text extraction task failed: {}", e);
            String::new()
        }
    }
}

// ── Resume parsing ───────────────────────────────────────────────────────

/// Parse already-extracted resume text into a [`ParsedProfile`].
pub async fn parse_resume_text(
    text: &str,
    config: &ExtractionConfig,
) -> Result<Extraction<ParsedProfile>, ExtractError> {
    let provider = resolve_provider(config, Task::Parse.slot())?;
    let request = ExtractionRequest::text(Task::Parse, text);
    let reply = invoke::invoke(&provider, &request, config).await?;
    Ok(Extraction::new(normalize::normalize_profile(&reply.content), &reply))
}

/// Parse a resume from uploaded document bytes.
///
/// Tries local text extraction first. When that yields nothing — scanned
/// PDFs, legacy DOC, damaged containers — the raw bytes are sent to the
/// model inline instead, so a resume is never rejected just because its
/// text layer is missing. Unsupported MIME types fail up front with
/// [`ExtractError::ExtractionUnavailable`].
pub async fn parse_resume(
    bytes: Vec<u8>,
    mime_type: &str,
    config: &ExtractionConfig,
) -> Result<Extraction<ParsedProfile>, ExtractError> {
    if !document::is_supported_mime(mime_type) {
        return Err(ExtractError::ExtractionUnavailable {
            mime_type: mime_type.to_string(),
        });
    }

    let text = extract_document_text(bytes.clone(), mime_type).await;
    let provider = resolve_provider(config, CredentialSlot::Parser)?;

    let request = if text.is_empty() {
        info!("No extractable text ({}); sending file inline", mime_type);
        ExtractionRequest::file(Task::ParseFile, bytes, mime_type)
    } else {
        debug!("Extracted {} chars of resume text", text.len());
        ExtractionRequest::text(Task::Parse, text)
    };

    let reply = invoke::invoke(&provider, &request, config).await?;
    Ok(Extraction::new(normalize::normalize_profile(&reply.content), &reply))
}

/// Synchronous wrapper around [`parse_resume`].
///
/// Creates a temporary tokio runtime internally.
pub fn parse_resume_sync(
    bytes: Vec<u8>,
    mime_type: &str,
    config: &ExtractionConfig,
) -> Result<Extraction<ParsedProfile>, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(parse_resume(bytes, mime_type, config))
}

// ── Email generation ─────────────────────────────────────────────────────

/// Generate a personalized outreach email for one company.
pub async fn generate_email(
    request: &EmailRequest,
    context: &TargetingContext,
    profile: &ParsedProfile,
    config: &ExtractionConfig,
) -> Result<Extraction<EmailDraft>, ExtractError> {
    let provider = resolve_provider(config, Task::GenerateEmail.slot())?;
    let user = prompts::email_user_prompt(request, context, profile);
    let req = ExtractionRequest::text(Task::GenerateEmail, user);
    let reply = invoke::invoke(&provider, &req, config).await?;
    Ok(Extraction::new(
        normalize::normalize_email_draft(&reply.content),
        &reply,
    ))
}

// ── Targeting context ────────────────────────────────────────────────────

/// Suggest targeting-context entries from a parsed profile.
pub async fn suggest_context(
    profile: &ParsedProfile,
    config: &ExtractionConfig,
) -> Result<Extraction<ContextSuggestions>, ExtractError> {
    let provider = resolve_provider(config, Task::SuggestContext.slot())?;
    let user = prompts::suggest_user_prompt(profile);
    let req = ExtractionRequest::text(Task::SuggestContext, user);
    let reply = invoke::invoke(&provider, &req, config).await?;
    Ok(Extraction::new(
        normalize::normalize_context_suggestions(&reply.content),
        &reply,
    ))
}

/// Suggest additions that refine an existing targeting context.
pub async fn refine_context(
    context: &TargetingContext,
    config: &ExtractionConfig,
) -> Result<Extraction<ContextSuggestions>, ExtractError> {
    let provider = resolve_provider(config, Task::RefineContext.slot())?;
    let user = prompts::refine_user_prompt(context);
    let req = ExtractionRequest::text(Task::RefineContext, user);
    let reply = invoke::invoke(&provider, &req, config).await?;
    Ok(Extraction::new(
        normalize::normalize_context_suggestions(&reply.content),
        &reply,
    ))
}

// ── Chat editing ─────────────────────────────────────────────────────────

/// Apply a free-form instruction to an email draft.
pub async fn chat_edit(
    draft: &EmailDraft,
    history: &[ChatTurn],
    instruction: &str,
    config: &ExtractionConfig,
) -> Result<Extraction<EmailDraft>, ExtractError> {
    let provider = resolve_provider(config, Task::ChatEdit.slot())?;
    let user = prompts::chat_edit_user_prompt(draft, history, instruction);
    let req = ExtractionRequest::text(Task::ChatEdit, user);
    let reply = invoke::invoke(&provider, &req, config).await?;
    Ok(Extraction::new(
        normalize::normalize_email_draft(&reply.content),
        &reply,
    ))
}

/// Apply a one-click quick action to an email draft.
///
/// Quick actions are canned instructions through the same edit path as
/// [`chat_edit`], with no conversation history.
pub async fn apply_quick_action(
    draft: &EmailDraft,
    action: QuickAction,
    config: &ExtractionConfig,
) -> Result<Extraction<EmailDraft>, ExtractError> {
    chat_edit(draft, &[], action.instruction(), config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_upload_fails_fast() {
        let config = ExtractionConfig::default();
        let err = parse_resume(b"<html>".to_vec(), "text/html", &config)
            .await
            .unwrap_err();
        match err {
            ExtractError::ExtractionUnavailable { mime_type } => {
                assert_eq!(mime_type, "text/html");
            }
            other => panic!("expected ExtractionUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn extract_document_text_is_best_effort() {
        assert_eq!(
            extract_document_text(b"garbage".to_vec(), "application/pdf").await,
            ""
        );
    }
}
