//! Pipeline stages for resume-to-profile extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different PDF backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ──▶ document ──▶ invoke ──▶ normalize
//! (upload)  (plain text) (model)   (typed record)
//! ```
//!
//! 1. [`document`]  — best-effort plain text from PDF/DOC/DOCX bytes; pure
//!    and CPU-bound, run under `spawn_blocking` by the entry points
//! 2. [`invoke`]    — task-tagged prompt plus text or file bytes to the
//!    generative model; the only stage with network I/O
//! 3. [`normalize`] — fence-strip, parse, and coerce the untrusted reply
//!    into a schema-complete record with per-field empty defaults

pub mod document;
pub mod invoke;
pub mod normalize;
