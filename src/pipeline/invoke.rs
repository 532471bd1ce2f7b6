//! Model interaction: build the task's messages and call the provider.
//!
//! This module converts an [`ExtractionRequest`] into a chat API call and
//! returns the raw reply text. It is intentionally thin — all prompt
//! engineering lives in [`crate::prompts`] so it can be changed without
//! touching transport logic here, and no parsing happens in this stage
//! (the reply goes to [`crate::pipeline::normalize`] as untrusted text).
//!
//! Network and API failures propagate unchanged as
//! [`ExtractError::ModelInvocationFailed`]; there is no retry or timeout in
//! this stage. A caller wanting either imposes it around the call.

use crate::config::{ExtractionConfig, Task};
use crate::error::ExtractError;
use crate::prompts;
use crate::record::ModelReply;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Input to one invoker call: a task tag plus inline text or file bytes.
///
/// Constructed per call, consumed once, discarded.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub task: Task,
    pub input: ExtractionInput,
}

impl ExtractionRequest {
    /// A text-carrying request.
    pub fn text(task: Task, text: impl Into<String>) -> Self {
        Self {
            task,
            input: ExtractionInput::Text(text.into()),
        }
    }

    /// A file-carrying request (raw bytes sent inline to the model).
    pub fn file(task: Task, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            task,
            input: ExtractionInput::File {
                bytes,
                mime_type: mime_type.into(),
            },
        }
    }
}

/// Either extracted text or raw file bytes — mutually exclusive by
/// construction.
#[derive(Debug, Clone)]
pub enum ExtractionInput {
    Text(String),
    File { bytes: Vec<u8>, mime_type: String },
}

/// Call the generative model for one request and return the raw reply.
///
/// ## Message layout
///
/// 1. **System message** — the task's instruction template, which embeds a
///    JSON shape example and the only-valid-JSON instruction
/// 2. **User message** — the inline text, or an empty text turn carrying
///    the file as a base64 attachment (chat APIs require at least one user
///    turn; for files the attachment carries all the content)
///
/// The reply is returned verbatim. Even providers with a structured-output
/// mode only guarantee syntactic JSON, not schema conformance, so the
/// normalizer downstream always treats the reply as untrusted.
pub async fn invoke(
    provider: &Arc<dyn LLMProvider>,
    request: &ExtractionRequest,
    config: &ExtractionConfig,
) -> Result<ModelReply, ExtractError> {
    let start = Instant::now();
    let messages = build_messages(request);
    let options = build_options(config);

    match provider.chat(&messages, Some(&options)).await {
        Ok(response) => {
            let duration = start.elapsed();
            debug!(
                "Task {:?}: {} input tokens, {} output tokens, {:?}",
                request.task, response.prompt_tokens, response.completion_tokens, duration
            );
            Ok(ModelReply {
                content: response.content,
                input_tokens: response.prompt_tokens as usize,
                output_tokens: response.completion_tokens as usize,
                duration_ms: duration.as_millis() as u64,
            })
        }
        Err(e) => Err(ExtractError::ModelInvocationFailed {
            detail: format!("{}", e),
        }),
    }
}

/// Assemble the chat messages for a request.
fn build_messages(request: &ExtractionRequest) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(prompts::system_prompt(request.task))];

    match &request.input {
        ExtractionInput::Text(text) => {
            messages.push(ChatMessage::user(text.as_str()));
        }
        ExtractionInput::File { bytes, mime_type } => {
            messages.push(ChatMessage::user_with_images(
                "",
                vec![encode_file(bytes, mime_type)],
            ));
        }
    }

    messages
}

/// Wrap raw file bytes as a base64 attachment with the declared MIME type.
fn encode_file(bytes: &[u8], mime_type: &str) -> ImageData {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded file → {} bytes base64 ({})", b64.len(), mime_type);
    ImageData::new(b64, mime_type)
}

/// Build `CompletionOptions` from the extraction config.
fn build_options(config: &ExtractionConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = ExtractionConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(2048));
    }

    #[test]
    fn encode_file_is_valid_base64() {
        let data = encode_file(b"%PDF-1.4 fake", "application/pdf");
        assert_eq!(data.mime_type, "application/pdf");
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        assert_eq!(decoded, b"%PDF-1.4 fake");
    }

    #[test]
    fn text_request_has_two_messages() {
        let req = ExtractionRequest::text(Task::Parse, "resume text");
        assert_eq!(build_messages(&req).len(), 2);
    }

    #[test]
    fn file_request_has_two_messages() {
        let req = ExtractionRequest::file(Task::ParseFile, b"PK".to_vec(), "application/pdf");
        assert_eq!(build_messages(&req).len(), 2);
    }
}
