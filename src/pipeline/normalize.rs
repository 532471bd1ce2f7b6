//! Resilient normalization of untrusted model replies.
//!
//! Models asked to "return only valid JSON" still wrap replies in Markdown
//! fences, prepend prose, rename fields, or change a field's shape between
//! prompt revisions. This module turns such a reply into a fully-populated
//! record and never raises for "the model replied badly": the worst case is
//! the record's all-empty default plus a [`Degradation`] tag.
//!
//! ## Algorithm (order matters)
//!
//! 1. **Fence stripping** — a ```` ```json ```` block wins; otherwise the
//!    first plain ```` ``` ```` pair; otherwise the whole reply. An
//!    unclosed fence keeps everything after the marker.
//! 2. **Parse** — `serde_json` on the trimmed candidate. Anything that is
//!    not a JSON object (including the empty string) degrades to the
//!    default record with [`Degradation::UnparseableModelOutput`].
//! 3. **Per-field coercion** — each target field is read independently; a
//!    missing or null key takes its empty default silently, while a
//!    present-but-incompatible value takes the default with a
//!    [`Degradation::FieldCoercionFallback`] tag. One bad field never
//!    rejects the rest of the record.

use crate::error::Degradation;
use crate::record::{ContextSuggestions, EmailDraft, Normalized, ParsedProfile};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Extract the JSON candidate from a possibly-fenced reply.
///
/// Exposed for callers that want to inspect what the normalizer would
/// parse; the result is trimmed but not validated.
pub fn json_candidate(reply: &str) -> &str {
    if let Some(pos) = reply.find("```json") {
        let rest = &reply[pos + "```json".len()..];
        match rest.find("```") {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        }
    } else if let Some(pos) = reply.find("```") {
        let rest = &reply[pos + "```".len()..];
        match rest.find("```") {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        }
    } else {
        reply.trim()
    }
}

/// Parse the candidate into a JSON object, or `None` for anything else.
///
/// A zero-length candidate is unparseable, not an empty object; a reply of
/// `[1, 2]` or `"sorry"` is valid JSON of the wrong shape and lands here
/// too, since no field could ever be read from it.
fn parse_object(reply: &str) -> Option<Map<String, Value>> {
    let candidate = json_candidate(reply);
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            debug!("Model reply parsed as non-object JSON: {}", other);
            None
        }
        Err(e) => {
            debug!("Model reply is not valid JSON: {}", e);
            None
        }
    }
}

// ── Record normalizers ───────────────────────────────────────────────────

/// Normalize a reply into a [`ParsedProfile`]. Infallible.
pub fn normalize_profile(reply: &str) -> Normalized<ParsedProfile> {
    let map = match parse_object(reply) {
        Some(map) => map,
        None => {
            return Normalized {
                record: ParsedProfile::default(),
                degradations: vec![Degradation::UnparseableModelOutput],
            }
        }
    };

    let mut degradations = Vec::new();
    let record = ParsedProfile {
        name: coerce_opt_string(map.get("name"), "name", &mut degradations),
        links: coerce_links(map.get("links"), &mut degradations),
        skills: coerce_string_list(map.get("skills"), "skills", &mut degradations),
        experience_years: coerce_years(map.get("experience_years"), &mut degradations),
        education: coerce_string_list(map.get("education"), "education", &mut degradations),
        job_titles: coerce_string_list(map.get("job_titles"), "job_titles", &mut degradations),
        achievements: coerce_string_list(
            map.get("achievements"),
            "achievements",
            &mut degradations,
        ),
    };

    Normalized {
        record,
        degradations,
    }
}

/// Normalize a reply into an [`EmailDraft`]. Infallible.
///
/// Compatibility: the body is read from `body`, falling back to `content`
/// — older prompt revisions declared the latter key.
pub fn normalize_email_draft(reply: &str) -> Normalized<EmailDraft> {
    let map = match parse_object(reply) {
        Some(map) => map,
        None => {
            return Normalized {
                record: EmailDraft::default(),
                degradations: vec![Degradation::UnparseableModelOutput],
            }
        }
    };

    let mut degradations = Vec::new();
    let subject = coerce_opt_string(map.get("subject"), "subject", &mut degradations)
        .unwrap_or_default();
    let body = match map.get("body") {
        Some(v) if !v.is_null() => {
            coerce_opt_string(Some(v), "body", &mut degradations).unwrap_or_default()
        }
        _ => coerce_opt_string(map.get("content"), "body", &mut degradations).unwrap_or_default(),
    };

    Normalized {
        record: EmailDraft { subject, body },
        degradations,
    }
}

/// Normalize a reply into [`ContextSuggestions`]. Infallible.
pub fn normalize_context_suggestions(reply: &str) -> Normalized<ContextSuggestions> {
    let map = match parse_object(reply) {
        Some(map) => map,
        None => {
            return Normalized {
                record: ContextSuggestions::default(),
                degradations: vec![Degradation::UnparseableModelOutput],
            }
        }
    };

    let mut degradations = Vec::new();
    let record = ContextSuggestions {
        suggested_roles: coerce_string_list(
            map.get("suggested_roles"),
            "suggested_roles",
            &mut degradations,
        ),
        suggested_industries: coerce_string_list(
            map.get("suggested_industries"),
            "suggested_industries",
            &mut degradations,
        ),
        suggested_keywords: coerce_string_list(
            map.get("suggested_keywords"),
            "suggested_keywords",
            &mut degradations,
        ),
        suggested_geography: coerce_string_list(
            map.get("suggested_geography"),
            "suggested_geography",
            &mut degradations,
        ),
    };

    Normalized {
        record,
        degradations,
    }
}

// ── Field coercions ──────────────────────────────────────────────────────

/// String → `Some` (whitespace-only becomes `None`); absent/null → `None`;
/// anything else → `None` + fallback tag.
fn coerce_opt_string(
    value: Option<&Value>,
    field: &str,
    degradations: &mut Vec<Degradation>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Some(_) => {
            degradations.push(Degradation::field(field));
            None
        }
    }
}

/// Array → its string items in order (non-string items are dropped with a
/// fallback tag); absent/null → `[]`; anything else → `[]` + fallback tag.
fn coerce_string_list(
    value: Option<&Value>,
    field: &str,
    degradations: &mut Vec<Degradation>,
) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            let mut dropped = false;
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    _ => dropped = true,
                }
            }
            if dropped {
                degradations.push(Degradation::field(field));
            }
            out
        }
        Some(_) => {
            degradations.push(Degradation::field(field));
            Vec::new()
        }
    }
}

/// Coerce the `links` field to its canonical platform → URL mapping.
///
/// The prompt's declared shape for this field changed across revisions:
/// older variants asked for an array of `"Platform: URL"` strings, newer
/// ones for an object. Both are accepted; the array form is split on the
/// first `:` with both sides trimmed. Anything else present → `{}` +
/// fallback tag.
fn coerce_links(value: Option<&Value>, degradations: &mut Vec<Degradation>) -> HashMap<String, String> {
    match value {
        None | Some(Value::Null) => HashMap::new(),
        Some(Value::Object(map)) => {
            let mut out = HashMap::with_capacity(map.len());
            let mut dropped = false;
            for (platform, url) in map {
                match url {
                    Value::String(u) => {
                        out.insert(platform.clone(), u.clone());
                    }
                    _ => dropped = true,
                }
            }
            if dropped {
                degradations.push(Degradation::field("links"));
            }
            out
        }
        Some(Value::Array(items)) => {
            let mut out = HashMap::with_capacity(items.len());
            let mut dropped = false;
            for item in items {
                match item.as_str().and_then(|s| s.split_once(':')) {
                    Some((platform, url)) if !platform.trim().is_empty() => {
                        out.insert(platform.trim().to_string(), url.trim().to_string());
                    }
                    _ => dropped = true,
                }
            }
            if dropped {
                degradations.push(Degradation::field("links"));
            }
            out
        }
        Some(_) => {
            degradations.push(Degradation::field("links"));
            HashMap::new()
        }
    }
}

/// Non-negative integer (or a numeric string) → `Some`; absent/null →
/// `None`; anything else present → `None` + fallback tag.
fn coerce_years(value: Option<&Value>, degradations: &mut Vec<Degradation>) -> Option<u32> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(years) => Some(years.min(u32::MAX as u64) as u32),
            None => {
                degradations.push(Degradation::field("experience_years"));
                None
            }
        },
        Some(Value::String(s)) => match s.trim().parse::<u32>() {
            Ok(years) => Some(years),
            Err(_) => {
                degradations.push(Degradation::field("experience_years"));
                None
            }
        },
        Some(_) => {
            degradations.push(Degradation::field("experience_years"));
            None
        }
    }
}
