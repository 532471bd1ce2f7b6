//! Prompt templates for every extraction task.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing a declared JSON shape (e.g. the
//!    `links` field) requires editing exactly one place, and the normalizer
//!    coercions in [`crate::pipeline::normalize`] can be kept in sync.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without a
//!    live model, so a prompt regression that drops the "return only valid
//!    JSON" instruction is caught immediately.
//!
//! Every system prompt embeds an explicit JSON shape example and ends with
//! the only-valid-JSON instruction. The model is still treated as untrusted:
//! schema conformance is enforced downstream by the normalizer, never
//! assumed from the prompt.

use crate::config::Task;
use crate::record::{ChatRole, ChatTurn, EmailDraft, EmailRequest, ParsedProfile, TargetingContext};

/// System prompt for parsing extracted resume text.
pub const PARSE_SYSTEM_PROMPT: &str = r#"You are an expert resume parser. Analyze the resume text provided by the user and extract structured information.

Return the information in exactly this JSON format:
{
    "name": "full name or null",
    "links": {"LinkedIn": "url", "GitHub": "url"},
    "skills": ["skill1", "skill2"],
    "experience_years": <number or null>,
    "education": ["degree1", "degree2"],
    "job_titles": ["title1", "title2"],
    "achievements": ["achievement1", "achievement2"]
}

Rules:
- Extract all technical and soft skills mentioned
- Calculate total years of experience if possible, else use null
- "links" maps platform names to URLs found in the resume
- List all degrees and certifications
- List all job titles held
- Extract key achievements and accomplishments
- Return only valid JSON"#;

/// System prompt for parsing a resume supplied as an attached document.
///
/// Used when text extraction produced nothing (scanned PDFs, legacy DOC)
/// and the raw file bytes are sent inline instead.
pub const PARSE_FILE_SYSTEM_PROMPT: &str = r#"You are an expert resume parser. Read the attached resume document and extract structured information.

Return the information in exactly this JSON format:
{
    "name": "full name or null",
    "links": {"LinkedIn": "url", "GitHub": "url"},
    "skills": ["skill1", "skill2"],
    "experience_years": <number or null>,
    "education": ["degree1", "degree2"],
    "job_titles": ["title1", "title2"],
    "achievements": ["achievement1", "achievement2"]
}

Rules:
- Read the whole document, including headers and side columns
- Calculate total years of experience if possible, else use null
- "links" maps platform names to URLs found in the resume
- Return only valid JSON"#;

/// System prompt for generating a personalized outreach email.
pub const GENERATE_EMAIL_SYSTEM_PROMPT: &str = r#"You write compelling, personalized job-outreach emails.

Write an email with:
1. An engaging subject line
2. A personalized body showing research about the company
3. A clear value proposition based on the candidate's profile
4. The requested tone

Return exactly this JSON format:
{"subject": "...", "body": "..."}

Return only valid JSON"#;

/// System prompt for suggesting targeting-context entries from a profile.
pub const SUGGEST_CONTEXT_SYSTEM_PROMPT: &str = r#"You help job seekers build an outreach targeting profile from their resume.

Based on the parsed resume data provided by the user, suggest:
1. Job titles worth targeting
2. Industries worth targeting
3. Keywords to include in outreach
4. Geographies worth considering

Return exactly this JSON format:
{
    "suggested_roles": ["role1", "role2"],
    "suggested_industries": ["industry1", "industry2"],
    "suggested_keywords": ["keyword1", "keyword2"],
    "suggested_geography": ["location1", "location2"]
}

Return only valid JSON"#;

/// System prompt for refining an existing targeting context.
pub const REFINE_CONTEXT_SYSTEM_PROMPT: &str = r#"You refine job-outreach targeting profiles.

Analyze the user's current targeting context and suggest related additions:
1. Related job titles to target
2. Related industries
3. Additional keywords to include
4. Additional geographies

Return exactly this JSON format:
{
    "suggested_roles": ["role1", "role2"],
    "suggested_industries": ["industry1", "industry2"],
    "suggested_keywords": ["keyword1", "keyword2"],
    "suggested_geography": ["location1", "location2"]
}

Return only valid JSON"#;

/// System prompt for conversational email editing.
pub const CHAT_EDIT_SYSTEM_PROMPT: &str = r#"You are an assistant helping to review and improve an outreach email.

Apply the user's instruction to the current draft. Focus on clarity, professionalism, and personalization. Keep the subject unchanged unless the instruction significantly affects it.

Return the updated email in exactly this JSON format:
{"subject": "updated subject", "body": "updated body text"}

Return only valid JSON"#;

/// The system prompt for a task.
pub fn system_prompt(task: Task) -> &'static str {
    match task {
        Task::Parse => PARSE_SYSTEM_PROMPT,
        Task::ParseFile => PARSE_FILE_SYSTEM_PROMPT,
        Task::GenerateEmail => GENERATE_EMAIL_SYSTEM_PROMPT,
        Task::SuggestContext => SUGGEST_CONTEXT_SYSTEM_PROMPT,
        Task::RefineContext => REFINE_CONTEXT_SYSTEM_PROMPT,
        Task::ChatEdit => CHAT_EDIT_SYSTEM_PROMPT,
    }
}

// ── User-prompt builders ─────────────────────────────────────────────────

/// User message for email generation: company details plus candidate profile.
pub fn email_user_prompt(
    request: &EmailRequest,
    context: &TargetingContext,
    profile: &ParsedProfile,
) -> String {
    let mut prompt = format!("Company: {}\n", request.company_name);
    if let Some(ref about) = request.company_description {
        prompt.push_str(&format!("About: {}\n", about));
    }
    if let Some(ref position) = request.position_title {
        prompt.push_str(&format!("Position: {}\n", position));
    }
    if let Some(ref location) = request.company_location {
        prompt.push_str(&format!("Location: {}\n", location));
    }

    prompt.push_str(&format!(
        "\nCandidate Profile:\n\
         - Target Roles: {}\n\
         - Skills: {}\n\
         - Job Titles Held: {}\n",
        context.target_roles.join(", "),
        profile.skills.join(", "),
        profile.job_titles.join(", "),
    ));
    if let Some(ref msg) = context.custom_message {
        prompt.push_str(&format!("- Candidate note: {}\n", msg));
    }

    prompt.push_str(&format!("\nTone: {}\n", context.tone()));
    prompt
}

/// User message for context suggestions: the parsed profile as JSON.
pub fn suggest_user_prompt(profile: &ParsedProfile) -> String {
    // Serialization of ParsedProfile cannot fail; all fields are plain data.
    let json = serde_json::to_string_pretty(profile).unwrap_or_default();
    format!("Parsed resume data:\n{}\n", json)
}

/// User message for context refinement: the current targeting context.
pub fn refine_user_prompt(context: &TargetingContext) -> String {
    format!(
        "Current targeting context:\n\
         Purpose: {}\n\
         Target Roles: {}\n\
         Industries: {}\n\
         Keywords: {}\n\
         Geography: {}\n",
        context.purpose.as_deref().unwrap_or("not set"),
        context.target_roles.join(", "),
        context.preferred_industries.join(", "),
        context.keywords.join(", "),
        context.geography.join(", "),
    )
}

/// User message for chat editing: draft, recent history, and the instruction.
///
/// Only the last five turns of history are included; older context adds
/// tokens without improving edits.
pub fn chat_edit_user_prompt(
    draft: &EmailDraft,
    history: &[ChatTurn],
    instruction: &str,
) -> String {
    let mut prompt = format!(
        "Current Subject: {}\nCurrent Body:\n{}\n",
        draft.subject, draft.body
    );

    let recent = if history.len() > 5 {
        &history[history.len() - 5..]
    } else {
        history
    };
    if !recent.is_empty() {
        prompt.push_str("\nChat History:\n");
        for turn in recent {
            let role = match turn.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "assistant",
            };
            prompt.push_str(&format!("{}: {}\n", role, turn.message));
        }
    }

    prompt.push_str(&format!("\nInstruction: {}\n", instruction));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every system prompt must carry the JSON-only instruction; the
    /// normalizer depends on replies at least attempting JSON.
    #[test]
    fn all_system_prompts_demand_json() {
        for task in [
            Task::Parse,
            Task::ParseFile,
            Task::GenerateEmail,
            Task::SuggestContext,
            Task::RefineContext,
            Task::ChatEdit,
        ] {
            let p = system_prompt(task);
            assert!(
                p.contains("Return only valid JSON"),
                "{:?} prompt lacks JSON instruction",
                task
            );
        }
    }

    #[test]
    fn parse_prompt_declares_all_profile_fields() {
        for field in [
            "name",
            "links",
            "skills",
            "experience_years",
            "education",
            "job_titles",
            "achievements",
        ] {
            assert!(
                PARSE_SYSTEM_PROMPT.contains(field),
                "parse prompt missing field '{}'",
                field
            );
        }
    }

    #[test]
    fn email_prompt_includes_company_and_tone() {
        let req = EmailRequest {
            company_name: "Acme Robotics".into(),
            company_description: Some("Builds robots".into()),
            ..Default::default()
        };
        let ctx = TargetingContext {
            target_roles: vec!["Robotics Engineer".into()],
            pitch_tone: Some("friendly".into()),
            ..Default::default()
        };
        let profile = ParsedProfile {
            skills: vec!["ROS".into(), "Rust".into()],
            ..Default::default()
        };

        let prompt = email_user_prompt(&req, &ctx, &profile);
        assert!(prompt.contains("Acme Robotics"));
        assert!(prompt.contains("Builds robots"));
        assert!(prompt.contains("ROS, Rust"));
        assert!(prompt.contains("Tone: friendly"));
    }

    #[test]
    fn chat_prompt_truncates_history_to_five_turns() {
        let draft = EmailDraft {
            subject: "Hello".into(),
            body: "World".into(),
        };
        let history: Vec<ChatTurn> = (0..8)
            .map(|i| ChatTurn {
                role: ChatRole::User,
                message: format!("turn-{}", i),
            })
            .collect();

        let prompt = chat_edit_user_prompt(&draft, &history, "make it shorter");
        assert!(!prompt.contains("turn-2"));
        assert!(prompt.contains("turn-3"));
        assert!(prompt.contains("turn-7"));
        assert!(prompt.contains("make it shorter"));
    }
}
