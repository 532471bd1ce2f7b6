//! Error types for the resume2profile library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the operation cannot produce a record at
//!   all (document unreadable with no fallback, provider not configured,
//!   model call failed). Returned as `Err(ExtractError)` from the top-level
//!   entry points.
//!
//! * [`Degradation`] — **Non-fatal**: the model replied badly but the
//!   pipeline self-healed by substituting empty defaults. Stored inside
//!   [`crate::record::Normalized`] so callers can log or surface a soft
//!   warning while still receiving a complete, schema-valid record.
//!
//! The separation lets callers decide their own tolerance: treat a degraded
//! record as success, warn the user that some fields may be incomplete, or
//! count degradations for monitoring.

use thiserror::Error;

/// All fatal errors returned by the resume2profile library.
///
/// Degraded-but-successful outcomes use [`Degradation`] and are stored in
/// [`crate::record::Normalized`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Document errors ───────────────────────────────────────────────────
    /// Text extraction produced nothing usable and no fallback path exists.
    ///
    /// Unsupported or legacy formats and corrupted documents all land here.
    /// Callers with access to the raw file should retry via the inline-file
    /// task before surfacing this to a user.
    #[error("No text could be extracted from document (mime type '{mime_type}')")]
    ExtractionUnavailable { mime_type: String },

    // ── Model errors ──────────────────────────────────────────────────────
    /// No credential is configured for the task's slot or the default.
    #[error("No model credential configured for slot '{slot}'.\n{hint}")]
    ProviderNotConfigured { slot: &'static str, hint: String },

    /// The generative-model call itself errored (network, auth, quota).
    ///
    /// Not retried inside the core; retry policy belongs to the caller.
    #[error("Model invocation failed: {detail}")]
    ModelInvocationFailed { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal, self-healed normalization outcome.
///
/// Carried alongside the record in [`crate::record::Normalized`]. The
/// overall operation succeeds; these tags exist so callers can distinguish
/// "the model answered cleanly" from "we filled in defaults".
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum Degradation {
    /// The reply was not a JSON object after fence stripping; the whole
    /// record was substituted with its all-empty default.
    #[error("model reply was not valid JSON; substituted the default record")]
    UnparseableModelOutput,

    /// One field's value failed compatibility coercion; that field (only)
    /// was substituted with its empty default.
    #[error("field '{field}' failed coercion; substituted its empty default")]
    FieldCoercionFallback { field: String },
}

impl Degradation {
    /// Shorthand used by the normalizer.
    pub(crate) fn field(name: &str) -> Self {
        Degradation::FieldCoercionFallback {
            field: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_unavailable_display() {
        let e = ExtractError::ExtractionUnavailable {
            mime_type: "application/msword".into(),
        };
        assert!(e.to_string().contains("application/msword"));
    }

    #[test]
    fn provider_not_configured_display() {
        let e = ExtractError::ProviderNotConfigured {
            slot: "parser",
            hint: "set OPENAI_API_KEY".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("parser"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn field_fallback_display() {
        let d = Degradation::field("links");
        assert!(d.to_string().contains("links"));
    }

    #[test]
    fn degradation_serialisable() {
        let d = Degradation::UnparseableModelOutput;
        let json = serde_json::to_string(&d).unwrap();
        let back: Degradation = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
