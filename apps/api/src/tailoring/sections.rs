//! Canonical section layout of a base resume.
//!
//! When the resume carries its original layout, that layout wins. Otherwise
//! the layout is rebuilt from the structured fields in a fixed order, so two
//! calls on the same resume always yield the same titles and line counts.

use crate::models::resume::{
    BaseResume, EducationEntry, ExperienceEntry, ProjectEntry, ResumeSection,
};

pub const SUMMARY_TITLE: &str = "Summary";
pub const SKILLS_TITLE: &str = "Skills";
pub const EXPERIENCE_TITLE: &str = "Experience";
pub const EDUCATION_TITLE: &str = "Education";
pub const PROJECTS_TITLE: &str = "Projects";

/// Returns the section list the tailored resume must mirror.
pub fn canonical_sections(resume: &BaseResume) -> Vec<ResumeSection> {
    if !resume.sections.is_empty() {
        return resume.sections.clone();
    }
    derive_sections(resume)
}

/// Builds sections from structured fields, skipping any whose source is empty.
pub fn derive_sections(resume: &BaseResume) -> Vec<ResumeSection> {
    let mut sections = Vec::new();

    let summary = resume.summary.trim();
    if !summary.is_empty() {
        sections.push(section(SUMMARY_TITLE, vec![summary.to_string()]));
    }

    if !resume.skills.is_empty() {
        sections.push(section(SKILLS_TITLE, vec![resume.skills.join(", ")]));
    }

    if !resume.experience.is_empty() {
        let lines = resume
            .experience
            .iter()
            .flat_map(experience_lines)
            .collect();
        sections.push(section(EXPERIENCE_TITLE, lines));
    }

    if !resume.education.is_empty() {
        let lines = resume.education.iter().map(education_line).collect();
        sections.push(section(EDUCATION_TITLE, lines));
    }

    if !resume.projects.is_empty() {
        let lines = resume.projects.iter().flat_map(project_lines).collect();
        sections.push(section(PROJECTS_TITLE, lines));
    }

    sections
}

/// One-line-per-section outline used in prompts: `Experience (7 lines)`.
pub fn outline(sections: &[ResumeSection]) -> String {
    sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let unit = if s.lines.len() == 1 { "line" } else { "lines" };
            format!("{}. {} ({} {unit})", i + 1, s.title, s.lines.len())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(title: &str, lines: Vec<String>) -> ResumeSection {
    ResumeSection {
        title: title.to_string(),
        lines,
    }
}

fn experience_lines(entry: &ExperienceEntry) -> Vec<String> {
    let end = entry.end_date.as_deref().unwrap_or("Present");
    let mut header = format!(
        "{} | {} | {} - {}",
        entry.title, entry.company, entry.start_date, end
    );
    if let Some(location) = entry.location.as_deref().filter(|l| !l.trim().is_empty()) {
        header.push_str(" | ");
        header.push_str(location);
    }

    let mut lines = Vec::with_capacity(entry.bullets.len() + 1);
    lines.push(header);
    lines.extend(entry.bullets.iter().cloned());
    lines
}

fn education_line(entry: &EducationEntry) -> String {
    let mut line = entry.degree.clone();
    if let Some(field) = entry.field.as_deref().filter(|f| !f.trim().is_empty()) {
        line.push_str(" in ");
        line.push_str(field);
    }
    line.push_str(" | ");
    line.push_str(&entry.institution);

    let dates = match (entry.start_date.as_deref(), entry.end_date.as_deref()) {
        (Some(start), Some(end)) => Some(format!("{start} - {end}")),
        (Some(start), None) => Some(format!("{start} - Present")),
        (None, Some(end)) => Some(end.to_string()),
        (None, None) => None,
    };
    if let Some(dates) = dates {
        line.push_str(" | ");
        line.push_str(&dates);
    }
    line
}

fn project_lines(entry: &ProjectEntry) -> Vec<String> {
    let mut lines = Vec::with_capacity(entry.bullets.len() + 2);
    lines.push(format!("{}: {}", entry.name, entry.description));
    if !entry.technologies.is_empty() {
        lines.push(format!("Technologies: {}", entry.technologies.join(", ")));
    }
    lines.extend(entry.bullets.iter().cloned());
    lines
}
