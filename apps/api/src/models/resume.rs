//! Canonical resume data model.
//!
//! Every field carries `#[serde(default)]` so partially-populated input —
//! including JSON produced by the content expander — deserializes into a
//! fully-populated record instead of failing. Strings are never null and
//! sequences are never absent by the time the renderer sees them.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One position in the work history. Order is preserved as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// One education entry. Order is preserved as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub dates: String,
}

/// The structured portion of a resume — what the content expander produces
/// and what the structured intake path parses from form fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeFragment {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Canonical normalized representation of one resume.
/// Immutable once built; owned by a single generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// An uploaded photo, held in memory for the duration of one generation
/// request. Embedded into the rendered document as a data URL and never
/// persisted on its own.
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Bytes,
    pub media_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_deserializes_with_all_keys_missing() {
        let fragment: ResumeFragment = serde_json::from_str("{}").unwrap();
        assert_eq!(fragment, ResumeFragment::default());
    }

    #[test]
    fn test_experience_entry_defaults_missing_fields() {
        let entry: ExperienceEntry =
            serde_json::from_str(r#"{"role": "Engineer"}"#).unwrap();
        assert_eq!(entry.role, "Engineer");
        assert_eq!(entry.company, "");
        assert!(entry.bullets.is_empty());
    }

    #[test]
    fn test_fragment_full_roundtrip() {
        let json = r#"{
            "summary": "Backend engineer.",
            "experience": [
                {"role": "Engineer", "company": "Acme", "dates": "2020 - Present",
                 "bullets": ["Built the billing service"]}
            ],
            "education": [
                {"degree": "BSc", "school": "State University", "dates": "2012 - 2016"}
            ],
            "skills": ["Rust", "PostgreSQL"]
        }"#;
        let fragment: ResumeFragment = serde_json::from_str(json).unwrap();
        assert_eq!(fragment.experience.len(), 1);
        assert_eq!(fragment.experience[0].bullets.len(), 1);
        assert_eq!(fragment.education[0].school, "State University");
        assert_eq!(fragment.skills, vec!["Rust", "PostgreSQL"]);
    }
}
