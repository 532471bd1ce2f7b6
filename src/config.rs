//! Configuration types for the extraction pipeline.
//!
//! All behaviour is controlled through [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to substitute providers in
//! tests.
//!
//! # Per-task credentials
//! Each [`Task`] maps to a [`CredentialSlot`] (`parser`, `generator`,
//! `chatbot`). A slot may carry its own provider or provider-name/model
//! pair; slots left unset fall back to the single default credential. The
//! indirection exists so cost/quality can be tuned per task — a cheaper
//! model for bulk parsing, a stronger one for conversational editing —
//! without code changes. It is purely a configuration concern.

use crate::error::ExtractError;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named pipeline use case. Selects both a prompt template and a
/// credential slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Parse extracted resume text into a [`crate::ParsedProfile`].
    Parse,
    /// Parse a resume from inline file bytes (fallback when text extraction
    /// produced nothing).
    ParseFile,
    /// Refine an existing targeting context.
    RefineContext,
    /// Generate a personalized outreach email.
    GenerateEmail,
    /// Suggest targeting-context entries from a parsed profile.
    SuggestContext,
    /// Edit an email draft conversationally.
    ChatEdit,
}

impl Task {
    /// The credential slot this task prefers.
    pub fn slot(&self) -> CredentialSlot {
        match self {
            Task::Parse | Task::ParseFile => CredentialSlot::Parser,
            Task::GenerateEmail => CredentialSlot::Generator,
            Task::RefineContext | Task::SuggestContext | Task::ChatEdit => CredentialSlot::Chatbot,
        }
    }
}

/// Which per-task credential a [`Task`] resolves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSlot {
    Parser,
    Generator,
    Chatbot,
}

impl CredentialSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialSlot::Parser => "parser",
            CredentialSlot::Generator => "generator",
            CredentialSlot::Chatbot => "chatbot",
        }
    }
}

impl fmt::Display for CredentialSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One credential: either a pre-built provider or a provider name plus
/// optional model, resolved lazily against the environment.
#[derive(Clone, Default)]
pub struct CredentialProfile {
    /// Pre-constructed provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,
    /// Provider name (e.g. "openai", "gemini", "ollama").
    pub provider_name: Option<String>,
    /// Model identifier, e.g. "gpt-4.1-mini".
    pub model: Option<String>,
}

impl CredentialProfile {
    /// True when nothing is set and the slot should fall back.
    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.provider_name.is_none() && self.model.is_none()
    }
}

impl fmt::Debug for CredentialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProfile")
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .finish()
    }
}

/// Configuration for the extraction pipeline.
///
/// Built via [`ExtractionConfig::builder()`] or
/// [`ExtractionConfig::default()`]. Read-only after `build()`; safe to share
/// across concurrent pipeline invocations.
///
/// # Example
/// ```rust
/// use resume2profile::{CredentialSlot, ExtractionConfig};
///
/// let config = ExtractionConfig::builder()
///     .provider_name("openai")
///     .model("gpt-4.1-mini")
///     .slot_model(CredentialSlot::Parser, "gpt-4.1-nano")
///     .temperature(0.2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Sampling temperature for model completions. Range: 0.0–2.0. Default: 0.2.
    ///
    /// Low temperature keeps extraction faithful to the document. Raise it
    /// only for generation tasks where variety is wanted.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 2048.
    ///
    /// Dense resumes can produce long skill/achievement lists; setting this
    /// too low truncates the JSON mid-object, which the normalizer then
    /// reports as unparseable output.
    pub max_tokens: usize,

    /// The fallback credential used when a task's slot is unset.
    pub default_credential: CredentialProfile,

    /// Credential for resume parsing tasks.
    pub parser: CredentialProfile,

    /// Credential for email generation.
    pub generator: CredentialProfile,

    /// Credential for conversational/refinement tasks.
    pub chatbot: CredentialProfile,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 2048,
            default_credential: CredentialProfile::default(),
            parser: CredentialProfile::default(),
            generator: CredentialProfile::default(),
            chatbot: CredentialProfile::default(),
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("default_credential", &self.default_credential)
            .field("parser", &self.parser)
            .field("generator", &self.generator)
            .field("chatbot", &self.chatbot)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The credential profile configured for a slot, or `None` when the
    /// slot is unset and resolution should use the default credential.
    pub fn slot_credential(&self, slot: CredentialSlot) -> Option<&CredentialProfile> {
        let profile = match slot {
            CredentialSlot::Parser => &self.parser,
            CredentialSlot::Generator => &self.generator,
            CredentialSlot::Chatbot => &self.chatbot,
        };
        if profile.is_empty() {
            None
        } else {
            Some(profile)
        }
    }

    fn slot_mut(&mut self, slot: CredentialSlot) -> &mut CredentialProfile {
        match slot {
            CredentialSlot::Parser => &mut self.parser,
            CredentialSlot::Generator => &mut self.generator,
            CredentialSlot::Chatbot => &mut self.chatbot,
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    /// Set the default (fallback) provider instance.
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.default_credential.provider = Some(provider);
        self
    }

    /// Set the default (fallback) provider name.
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_credential.provider_name = Some(name.into());
        self
    }

    /// Set the default (fallback) model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.default_credential.model = Some(model.into());
        self
    }

    /// Set a slot-specific provider instance.
    pub fn slot_provider(mut self, slot: CredentialSlot, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.slot_mut(slot).provider = Some(provider);
        self
    }

    /// Set a slot-specific provider name.
    pub fn slot_provider_name(mut self, slot: CredentialSlot, name: impl Into<String>) -> Self {
        self.config.slot_mut(slot).provider_name = Some(name.into());
        self
    }

    /// Set a slot-specific model.
    pub fn slot_model(mut self, slot: CredentialSlot, model: impl Into<String>) -> Self {
        self.config.slot_mut(slot).model = Some(model.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ExtractError::InvalidConfig(format!(
                "Temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.max_tokens == 0 {
            return Err(ExtractError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ExtractionConfig::default();
        assert_eq!(c.temperature, 0.2);
        assert_eq!(c.max_tokens, 2048);
        assert!(c.default_credential.is_empty());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ExtractionConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        assert!(ExtractionConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn task_slot_mapping() {
        assert_eq!(Task::Parse.slot(), CredentialSlot::Parser);
        assert_eq!(Task::ParseFile.slot(), CredentialSlot::Parser);
        assert_eq!(Task::GenerateEmail.slot(), CredentialSlot::Generator);
        assert_eq!(Task::RefineContext.slot(), CredentialSlot::Chatbot);
        assert_eq!(Task::SuggestContext.slot(), CredentialSlot::Chatbot);
        assert_eq!(Task::ChatEdit.slot(), CredentialSlot::Chatbot);
    }

    #[test]
    fn unset_slot_falls_back() {
        let c = ExtractionConfig::builder()
            .slot_model(CredentialSlot::Parser, "gpt-4.1-nano")
            .build()
            .unwrap();
        assert!(c.slot_credential(CredentialSlot::Parser).is_some());
        assert!(c.slot_credential(CredentialSlot::Generator).is_none());
        assert!(c.slot_credential(CredentialSlot::Chatbot).is_none());
    }
}
