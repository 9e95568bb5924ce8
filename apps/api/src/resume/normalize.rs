//! Resume Model Normalizer — merges raw form fields into one canonical
//! [`ResumeRecord`].
//!
//! Two divergent input shapes arrive at this boundary: a free-text prompt
//! (expanded downstream by the LLM) or structured JSON-encoded fields. They
//! are classified into a tagged [`ResumeIntake`] here and resolved into the
//! same canonical record before the renderer ever sees them.
//!
//! Malformed optional fields never fail the request — they degrade to empty
//! sequences.

use serde::Deserialize;

use crate::models::resume::{EducationEntry, ExperienceEntry, ResumeFragment, ResumeRecord};

/// Raw text fields as they arrive from the multipart form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResumeFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub summary: String,
    /// JSON-encoded array of experience entries.
    #[serde(default)]
    pub experience: String,
    /// JSON-encoded array of education entries.
    #[serde(default)]
    pub education: String,
    /// JSON array of strings, or comma-separated text.
    #[serde(default)]
    pub skills: String,
}

/// Provenance-tagged intake. Prompt-driven submissions defer all structured
/// fields to the content expander; any structured fields sent alongside a
/// prompt are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeIntake {
    PromptDriven { text: String },
    Structured,
}

pub fn classify(raw: &RawResumeFields) -> ResumeIntake {
    let prompt = raw.prompt.trim();
    if prompt.is_empty() {
        ResumeIntake::Structured
    } else {
        ResumeIntake::PromptDriven {
            text: prompt.to_string(),
        }
    }
}

/// Parses the structured fields of a submission into a fragment.
/// Parse failures degrade: experience/education fall back to empty
/// sequences, skills fall back to comma-split text.
pub fn parse_structured(raw: &RawResumeFields) -> ResumeFragment {
    ResumeFragment {
        summary: raw.summary.trim().to_string(),
        experience: serde_json::from_str::<Vec<ExperienceEntry>>(&raw.experience)
            .unwrap_or_default(),
        education: serde_json::from_str::<Vec<EducationEntry>>(&raw.education)
            .unwrap_or_default(),
        skills: parse_skills(&raw.skills),
    }
}

/// Skills accept either a JSON array of strings or plain comma-separated
/// text. Both paths trim entries and drop empty segments, preserving order.
pub fn parse_skills(raw: &str) -> Vec<String> {
    if let Ok(skills) = serde_json::from_str::<Vec<String>>(raw) {
        return clean_skills(skills);
    }
    clean_skills(raw.split(',').map(str::to_string).collect())
}

/// Trims each skill and drops empty segments. Order is preserved.
pub fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Merges contact fields with a resolved fragment into the canonical record.
/// Every invariant of the record holds from here on: strings are empty, not
/// absent, and sequences are empty, not null.
pub fn into_record(raw: &RawResumeFields, fragment: ResumeFragment) -> ResumeRecord {
    ResumeRecord {
        name: raw.name.trim().to_string(),
        email: raw.email.trim().to_string(),
        phone: raw.phone.trim().to_string(),
        location: raw.location.trim().to_string(),
        summary: fragment.summary,
        experience: fragment.experience,
        education: fragment.education,
        skills: fragment.skills,
    }
}
