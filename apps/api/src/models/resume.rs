//! Resume documents and their database rows.
//!
//! `BaseResume` is the user's source of truth. `TailoredCandidate` is what the
//! model hands back for a specific job description; it shares the variable
//! parts of the base shape plus the keywords it claims to target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start_date: String,
    /// `None` means the role is current.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub bullets: Vec<String>,
}

/// A titled block of resume lines, in the order the resume lays them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseResume {
    pub contact: ContactInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    /// Original layout of the resume when it is known. Empty means the layout
    /// is derived from the structured fields.
    #[serde(default)]
    pub sections: Vec<ResumeSection>,
}

/// Model output for one tailoring attempt.
///
/// Every field is required on the wire: a response missing any of them fails
/// to decode and is treated as a generation failure, never as a verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredCandidate {
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub sections: Vec<ResumeSection>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BaseResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BaseResumeRow {
    /// Decodes the stored JSON document.
    pub fn document(&self) -> Result<BaseResume, serde_json::Error> {
        serde_json::from_value(self.content.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TailoredResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub base_resume_id: Uuid,
    pub content: Value,
    pub keywords: Vec<String>,
    pub s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_resume_optional_fields_default() {
        let json = serde_json::json!({
            "contact": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Engineer",
            "experience": [{
                "company": "Analytical Engines",
                "title": "Programmer",
                "start_date": "1842",
                "bullets": ["Wrote the first published algorithm"]
            }]
        });
        let resume: BaseResume = serde_json::from_value(json).unwrap();
        assert!(resume.sections.is_empty());
        assert!(resume.projects.is_empty());
        assert!(resume.experience[0].end_date.is_none());
        assert!(resume.contact.links.is_empty());
    }

    #[test]
    fn test_candidate_requires_keywords() {
        let json = serde_json::json!({
            "summary": "Engineer",
            "skills": ["Rust"],
            "experience": [],
            "projects": [],
            "sections": []
        });
        let result: Result<TailoredCandidate, _> = serde_json::from_value(json);
        assert!(result.is_err(), "candidate without keywords must not decode");
    }

    #[test]
    fn test_candidate_requires_sections() {
        let json = serde_json::json!({
            "summary": "Engineer",
            "skills": ["Rust"],
            "experience": [],
            "projects": [],
            "keywords": ["rust"]
        });
        let result: Result<TailoredCandidate, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
