//! Record types produced and consumed by the extraction pipeline.
//!
//! Every output record here has a defined all-empty shape reachable via
//! `Default`, which is what makes the normalizer infallible: when the model
//! replies with garbage, the pipeline degrades to `T::default()` (or to the
//! empty value of a single field) instead of erroring. See
//! [`crate::pipeline::normalize`].

use crate::error::Degradation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Resume parsing ───────────────────────────────────────────────────────

/// The normalized output of resume extraction.
///
/// Invariant: always constructable. A field whose upstream value is absent,
/// malformed, or fails validation degrades to that field's empty value
/// (`None`, `{}`, or `[]`) rather than aborting the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedProfile {
    /// Candidate's full name, when the model could find one.
    #[serde(default)]
    pub name: Option<String>,

    /// Platform label → URL, e.g. `{"LinkedIn": "https://…", "GitHub": "https://…"}`.
    ///
    /// Keys are unique; insertion order carries no meaning.
    #[serde(default)]
    pub links: HashMap<String, String>,

    /// Technical and soft skills in reply order. Duplicates are not removed.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Total years of experience; `None` when the model cannot infer one.
    #[serde(default)]
    pub experience_years: Option<u32>,

    /// Degrees and certifications as free text (degree + institution).
    #[serde(default)]
    pub education: Vec<String>,

    /// Job titles held, free text.
    #[serde(default)]
    pub job_titles: Vec<String>,

    /// Key achievements and accomplishments, free text.
    #[serde(default)]
    pub achievements: Vec<String>,
}

// ── Email generation / chat editing ──────────────────────────────────────

/// A generated (or chat-edited) outreach email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// One turn of a chat-edit conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Canned one-click edits applied through the chat-edit task.
///
/// Each maps to a fixed rewrite instruction; the instruction text feeds the
/// same prompt path as a free-form chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    Formal,
    Casual,
    Personality,
    Shorten,
    Expand,
    FixGrammar,
}

impl QuickAction {
    /// The rewrite instruction sent to the model for this action.
    pub fn instruction(&self) -> &'static str {
        match self {
            QuickAction::Formal => {
                "Rewrite this email in a more formal, professional tone while keeping the key points."
            }
            QuickAction::Casual => {
                "Rewrite this email in a friendly, casual tone while maintaining professionalism."
            }
            QuickAction::Personality => {
                "Add more personality and warmth to this email, making it more engaging."
            }
            QuickAction::Shorten => {
                "Make this email more concise while preserving all important information."
            }
            QuickAction::Expand => "Expand this email with more details and context.",
            QuickAction::FixGrammar => {
                "Fix any grammar, spelling, or punctuation errors in this email."
            }
        }
    }
}

// ── Targeting context ────────────────────────────────────────────────────

/// The user's outreach targeting profile, input to context refinement and
/// email generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingContext {
    /// Why the user is reaching out: jobs, sponsorship, freelancing, …
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    /// Tone for generated emails; "professional" when unset.
    #[serde(default)]
    pub pitch_tone: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub custom_message: Option<String>,
    #[serde(default)]
    pub geography: Vec<String>,
}

impl TargetingContext {
    /// Tone to use for generation, defaulting to "professional".
    pub fn tone(&self) -> &str {
        self.pitch_tone.as_deref().unwrap_or("professional")
    }
}

/// AI-suggested additions to a [`TargetingContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSuggestions {
    #[serde(default)]
    pub suggested_roles: Vec<String>,
    #[serde(default)]
    pub suggested_industries: Vec<String>,
    #[serde(default)]
    pub suggested_keywords: Vec<String>,
    #[serde(default)]
    pub suggested_geography: Vec<String>,
}

/// Per-company inputs for email generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub company_name: String,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub position_title: Option<String>,
    #[serde(default)]
    pub company_location: Option<String>,
}

// ── Pipeline envelopes ───────────────────────────────────────────────────

/// Raw textual output from the generative model, with call bookkeeping.
///
/// Transient: consumed immediately by the normalizer.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// The reply text, potentially fenced and/or surrounded by prose.
    pub content: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// A normalized record plus the degradations applied while producing it.
///
/// `degradations` is empty when the model's reply matched the target schema
/// cleanly. It is never a reason to treat the operation as failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized<T> {
    pub record: T,
    pub degradations: Vec<Degradation>,
}

impl<T> Normalized<T> {
    /// A clean result with no degradations.
    pub fn clean(record: T) -> Self {
        Self {
            record,
            degradations: Vec::new(),
        }
    }

    /// True when no default substitution was needed anywhere.
    pub fn is_clean(&self) -> bool {
        self.degradations.is_empty()
    }
}

/// Token and timing stats for one model invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationStats {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Top-level result of an extraction entry point: the normalized record,
/// any degradations, and the invocation stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction<T> {
    pub record: T,
    pub degradations: Vec<Degradation>,
    pub stats: InvocationStats,
}

impl<T> Extraction<T> {
    pub(crate) fn new(normalized: Normalized<T>, reply: &ModelReply) -> Self {
        Self {
            record: normalized.record,
            degradations: normalized.degradations,
            stats: InvocationStats {
                input_tokens: reply.input_tokens,
                output_tokens: reply.output_tokens,
                duration_ms: reply.duration_ms,
            },
        }
    }

    /// True when no default substitution was needed anywhere.
    pub fn is_clean(&self) -> bool {
        self.degradations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_all_empty() {
        let p = ParsedProfile::default();
        assert!(p.name.is_none());
        assert!(p.links.is_empty());
        assert!(p.skills.is_empty());
        assert!(p.experience_years.is_none());
        assert!(p.education.is_empty());
        assert!(p.job_titles.is_empty());
        assert!(p.achievements.is_empty());
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let mut p = ParsedProfile {
            name: Some("Ada Lovelace".into()),
            skills: vec!["Rust".into(), "Rust".into()],
            experience_years: Some(7),
            ..Default::default()
        };
        p.links
            .insert("GitHub".into(), "https://github.com/ada".into());

        let json = serde_json::to_string(&p).unwrap();
        let back: ParsedProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn profile_deserialises_with_missing_fields() {
        // Partial JSON must still materialise thanks to per-field defaults.
        let p: ParsedProfile = serde_json::from_str(r#"{"skills":["Go"]}"#).unwrap();
        assert_eq!(p.skills, vec!["Go"]);
        assert!(p.experience_years.is_none());
    }

    #[test]
    fn quick_action_instructions_are_distinct() {
        let actions = [
            QuickAction::Formal,
            QuickAction::Casual,
            QuickAction::Personality,
            QuickAction::Shorten,
            QuickAction::Expand,
            QuickAction::FixGrammar,
        ];
        for (i, a) in actions.iter().enumerate() {
            for b in &actions[i + 1..] {
                assert_ne!(a.instruction(), b.instruction());
            }
        }
    }

    #[test]
    fn tone_defaults_to_professional() {
        assert_eq!(TargetingContext::default().tone(), "professional");
    }
}
