//! Document text extraction: best-effort plain text from uploaded bytes.
//!
//! ## Failure semantics
//!
//! Extraction is fully best-effort. Any decode failure — unsupported MIME
//! type, corrupt container, broken page — converts to an empty-string
//! result, never an error. Callers must treat empty text as "extraction
//! unavailable" and fall back to the inline-file model path
//! ([`crate::config::Task::ParseFile`]) when they have the raw bytes.
//!
//! ## Why per-page PDF extraction?
//!
//! A resume exported by a flaky tool often has one damaged page (usually a
//! graphics-heavy cover). Extracting page by page isolates the failure: the
//! broken page contributes no text while the rest of the document still
//! parses.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use tracing::debug;

/// MIME type for PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for legacy binary Word documents.
pub const MIME_DOC: &str = "application/msword";
/// MIME type for OOXML Word documents.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// True when the MIME type is one the pipeline accepts as a resume upload.
pub fn is_supported_mime(mime_type: &str) -> bool {
    matches!(mime_type, MIME_PDF | MIME_DOC | MIME_DOCX)
}

/// Extract plain text from document bytes, best-effort.
///
/// Returns the trimmed text, or an empty string when no text is available:
/// unsupported MIME types, legacy DOC (accepted but with no dedicated
/// extractor), and any internal decode failure all yield `""`.
pub fn extract_text(bytes: &[u8], mime_type: &str) -> String {
    let text = match mime_type {
        MIME_PDF => extract_pdf_text(bytes),
        MIME_DOCX => extract_docx_text(bytes),
        // Legacy DOC is accepted as an upload type but has no extractor;
        // callers fall through to the inline-file model path.
        MIME_DOC => String::new(),
        other => {
            debug!("No extractor for mime type '{}'", other);
            String::new()
        }
    };
    text.trim().to_string()
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Decode each page in order, concatenating per-page text with newlines.
///
/// Pages that fail to decode contribute no text but do not abort the
/// remaining pages. Whole-document load failure yields an empty string.
fn extract_pdf_text(bytes: &[u8]) -> String {
    let doc = match lopdf::Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("PDF load failed: {}", e);
            return String::new();
        }
    };

    let mut pages_text: Vec<String> = Vec::new();
    for (page_num, _object_id) in doc.get_pages() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages_text.push(text),
            Err(e) => {
                debug!("PDF page {} failed to decode: {}", page_num, e);
            }
        }
    }

    pages_text.join("\n")
}

// ── DOCX ─────────────────────────────────────────────────────────────────

/// Matches a `<w:t>` text run inside `word/document.xml`.
static RE_TEXT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").unwrap());

/// Concatenate paragraph text in document order with newline separators.
///
/// A DOCX file is a ZIP container; the body lives in `word/document.xml`
/// with paragraphs as `<w:p>` elements and text as `<w:t>` runs. Any
/// container or XML failure yields an empty string.
fn extract_docx_text(bytes: &[u8]) -> String {
    let xml = match read_document_xml(bytes) {
        Some(xml) => xml,
        None => return String::new(),
    };

    let mut paragraphs: Vec<String> = Vec::new();
    for para in xml.split("</w:p>") {
        let mut text = String::new();
        for caps in RE_TEXT_RUN.captures_iter(para) {
            text.push_str(&caps[1]);
        }
        let text = decode_xml_entities(&text);
        if !text.trim().is_empty() {
            paragraphs.push(text);
        }
    }

    paragraphs.join("\n")
}

fn read_document_xml(bytes: &[u8]) -> Option<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = match zip::ZipArchive::new(cursor) {
        Ok(a) => a,
        Err(e) => {
            debug!("DOCX container open failed: {}", e);
            return None;
        }
    };

    let mut file = match archive.by_name("word/document.xml") {
        Ok(f) => f,
        Err(e) => {
            debug!("DOCX missing word/document.xml: {}", e);
            return None;
        }
    };

    let mut xml = String::new();
    if let Err(e) = file.read_to_string(&mut xml) {
        debug!("DOCX document.xml read failed: {}", e);
        return None;
    }
    Some(xml)
}

/// Decode the five XML predefined entities. `&amp;` must go last so that
/// `&amp;lt;` decodes to the literal `&lt;` rather than `<`.
fn decode_xml_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
