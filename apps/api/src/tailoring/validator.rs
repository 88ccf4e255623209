//! Tailoring validator. Decides whether a generated resume is a faithful
//! rewrite of the base resume.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. summary, skills and keywords are present
//! 2. the section layout (titles and line counts) matches the base
//! 3. experience count matches and every company exists in the base
//! 4. every project exists in the base
//! 5. the rewrite actually uses the job keywords it reports
//!
//! Line text, bullet wording and ordering are free to change. Numeric claims
//! are not checked here; the generation prompt forbids inventing them.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::models::resume::{BaseResume, TailoredCandidate};
use crate::tailoring::sections::canonical_sections;

/// Keyword matches required, capped by how many keywords were reported.
const MIN_KEYWORD_MATCHES: usize = 3;

/// Why a candidate was rejected. `Display` yields the reason string surfaced
/// to callers and fed back into logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Violation {
    MissingSummary,
    MissingSkills,
    MissingKeywords,
    MissingSections,
    SectionCountChanged,
    SectionTitleChanged(String),
    SectionLineCountChanged(String),
    ExperienceCountChanged,
    UnknownCompany(String),
    ProjectsAddedWithoutBase,
    UnknownProject(String),
    LowKeywordCoverage,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingSummary => f.write_str("Missing summary"),
            Violation::MissingSkills => f.write_str("Missing skills"),
            Violation::MissingKeywords => f.write_str("Missing keywords"),
            Violation::MissingSections => f.write_str("Missing sections"),
            Violation::SectionCountChanged => f.write_str("Section count changed"),
            Violation::SectionTitleChanged(title) => write!(f, "Section title changed: {title}"),
            Violation::SectionLineCountChanged(title) => {
                write!(f, "Section line count changed: {title}")
            }
            Violation::ExperienceCountChanged => f.write_str("Experience count changed"),
            Violation::UnknownCompany(company) => write!(f, "Unknown company: {company}"),
            Violation::ProjectsAddedWithoutBase => {
                f.write_str("Projects added without a base project")
            }
            Violation::UnknownProject(name) => write!(f, "Unknown project: {name}"),
            Violation::LowKeywordCoverage => f.write_str("Low keyword coverage"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Violation),
}

/// Validates `candidate` against `base`. Pure: the same inputs always give
/// the same verdict.
pub fn validate(base: &BaseResume, candidate: &TailoredCandidate) -> Verdict {
    match check(base, candidate) {
        Ok(()) => Verdict::Valid,
        Err(violation) => Verdict::Invalid(violation),
    }
}

fn check(base: &BaseResume, candidate: &TailoredCandidate) -> Result<(), Violation> {
    check_completeness(candidate)?;
    check_sections(base, candidate)?;
    check_experience(base, candidate)?;
    check_projects(base, candidate)?;
    check_keyword_coverage(candidate)
}

fn check_completeness(candidate: &TailoredCandidate) -> Result<(), Violation> {
    if candidate.summary.trim().is_empty() {
        return Err(Violation::MissingSummary);
    }
    if candidate.skills.is_empty() {
        return Err(Violation::MissingSkills);
    }
    if candidate.keywords.is_empty() {
        return Err(Violation::MissingKeywords);
    }
    Ok(())
}

fn check_sections(base: &BaseResume, candidate: &TailoredCandidate) -> Result<(), Violation> {
    let base_sections = canonical_sections(base);
    if base_sections.is_empty() {
        return Ok(());
    }
    if candidate.sections.is_empty() {
        return Err(Violation::MissingSections);
    }
    if candidate.sections.len() != base_sections.len() {
        return Err(Violation::SectionCountChanged);
    }

    for (expected, actual) in base_sections.iter().zip(&candidate.sections) {
        if normalize(&expected.title) != normalize(&actual.title) {
            return Err(Violation::SectionTitleChanged(expected.title.clone()));
        }
        if expected.lines.len() != actual.lines.len() {
            return Err(Violation::SectionLineCountChanged(expected.title.clone()));
        }
    }
    Ok(())
}

fn check_experience(base: &BaseResume, candidate: &TailoredCandidate) -> Result<(), Violation> {
    if candidate.experience.len() != base.experience.len() {
        return Err(Violation::ExperienceCountChanged);
    }

    let companies: HashSet<String> = base
        .experience
        .iter()
        .map(|e| normalize(&e.company))
        .collect();

    match candidate
        .experience
        .iter()
        .find(|e| !companies.contains(&normalize(&e.company)))
    {
        Some(unknown) => Err(Violation::UnknownCompany(unknown.company.clone())),
        None => Ok(()),
    }
}

fn check_projects(base: &BaseResume, candidate: &TailoredCandidate) -> Result<(), Violation> {
    let names: HashSet<String> = base.projects.iter().map(|p| normalize(&p.name)).collect();

    if names.is_empty() {
        if candidate.projects.is_empty() {
            return Ok(());
        }
        return Err(Violation::ProjectsAddedWithoutBase);
    }

    match candidate
        .projects
        .iter()
        .find(|p| !names.contains(&normalize(&p.name)))
    {
        Some(unknown) => Err(Violation::UnknownProject(unknown.name.clone())),
        None => Ok(()),
    }
}

fn check_keyword_coverage(candidate: &TailoredCandidate) -> Result<(), Violation> {
    let corpus = keyword_corpus(candidate);
    let matched = candidate
        .keywords
        .iter()
        .filter(|k| corpus.contains(&k.to_lowercase()))
        .count();

    let required = MIN_KEYWORD_MATCHES.min(candidate.keywords.len());
    if matched < required {
        return Err(Violation::LowKeywordCoverage);
    }
    Ok(())
}

/// Lowercased text of everything a reader of the tailored resume would see.
fn keyword_corpus(candidate: &TailoredCandidate) -> String {
    let mut parts: Vec<&str> = vec![candidate.summary.as_str()];
    parts.extend(candidate.skills.iter().map(String::as_str));
    for entry in &candidate.experience {
        parts.extend(entry.bullets.iter().map(String::as_str));
    }
    for project in &candidate.projects {
        parts.push(project.description.as_str());
        parts.extend(project.bullets.iter().map(String::as_str));
    }
    for section in &candidate.sections {
        parts.extend(section.lines.iter().map(String::as_str));
    }
    parts.join(" ").to_lowercase()
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{
        ContactInfo, ExperienceEntry, ProjectEntry, ResumeSection,
    };

    fn section(title: &str, lines: &[&str]) -> ResumeSection {
        ResumeSection {
            title: title.to_string(),
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn job(company: &str, bullets: &[&str]) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            title: "Engineer".to_string(),
            start_date: "2020-01".to_string(),
            end_date: None,
            location: None,
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }

    fn project(name: &str) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            description: "Streaming log indexer".to_string(),
            technologies: vec!["Rust".to_string()],
            url: None,
            bullets: vec!["Indexed 2TB of logs per day".to_string()],
        }
    }

    fn base() -> BaseResume {
        BaseResume {
            contact: ContactInfo {
                name: "Sam Rivera".to_string(),
                email: "sam@example.com".to_string(),
                ..Default::default()
            },
            summary: "Backend engineer".to_string(),
            skills: vec!["Rust".to_string(), "Postgres".to_string()],
            experience: vec![
                job("Acme Corp", &["Built billing service"]),
                job("Globex", &["Ran on-call rotation"]),
            ],
            education: vec![],
            projects: vec![project("Logship")],
            sections: vec![
                section("Summary", &["Backend engineer"]),
                section("Experience", &["Acme Corp", "Built billing service", "Globex"]),
                section("Projects", &["Logship"]),
            ],
        }
    }

    fn valid_candidate() -> TailoredCandidate {
        TailoredCandidate {
            summary: "Rust backend engineer focused on distributed systems".to_string(),
            skills: vec!["Rust".to_string(), "Kubernetes".to_string()],
            experience: vec![
                job("Globex", &["Ran Kubernetes on-call rotation"]),
                job("Acme Corp", &["Built billing service in Rust"]),
            ],
            projects: vec![project("Logship")],
            sections: vec![
                section("Summary", &["Rust backend engineer"]),
                section("Experience", &["Acme Corp", "Built Rust billing service", "Globex"]),
                section("Projects", &["Logship"]),
            ],
            keywords: vec![
                "Rust".to_string(),
                "Kubernetes".to_string(),
                "distributed systems".to_string(),
            ],
        }
    }

    fn reason(verdict: Verdict) -> String {
        match verdict {
            Verdict::Valid => panic!("expected an invalid verdict"),
            Verdict::Invalid(v) => v.to_string(),
        }
    }

    #[test]
    fn test_faithful_candidate_is_valid() {
        assert_eq!(validate(&base(), &valid_candidate()), Verdict::Valid);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let (b, c) = (base(), valid_candidate());
        assert_eq!(validate(&b, &c), validate(&b, &c));

        let mut bad = valid_candidate();
        bad.sections.pop();
        assert_eq!(validate(&b, &bad), validate(&b, &bad));
    }

    #[test]
    fn test_blank_summary_rejected() {
        let mut c = valid_candidate();
        c.summary = "   ".to_string();
        assert_eq!(reason(validate(&base(), &c)), "Missing summary");
    }

    #[test]
    fn test_empty_skills_rejected() {
        let mut c = valid_candidate();
        c.skills.clear();
        assert_eq!(reason(validate(&base(), &c)), "Missing skills");
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let mut c = valid_candidate();
        c.keywords.clear();
        assert_eq!(reason(validate(&base(), &c)), "Missing keywords");
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        let mut c = valid_candidate();
        c.summary.clear();
        c.skills.clear();
        c.sections.clear();
        assert_eq!(reason(validate(&base(), &c)), "Missing summary");
    }

    #[test]
    fn test_missing_sections_rejected() {
        let mut c = valid_candidate();
        c.sections.clear();
        assert_eq!(reason(validate(&base(), &c)), "Missing sections");
    }

    #[test]
    fn test_dropped_section_rejected() {
        let mut c = valid_candidate();
        c.sections.pop();
        assert_eq!(reason(validate(&base(), &c)), "Section count changed");
    }

    #[test]
    fn test_renamed_section_reports_base_title() {
        let mut c = valid_candidate();
        c.sections[1].title = "Work History".to_string();
        assert_eq!(
            reason(validate(&base(), &c)),
            "Section title changed: Experience"
        );
    }

    #[test]
    fn test_section_title_comparison_ignores_case_and_padding() {
        let mut c = valid_candidate();
        c.sections[1].title = "  EXPERIENCE ".to_string();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_section_line_count_change_rejected() {
        let mut c = valid_candidate();
        c.sections[1].lines.push("Invented line".to_string());
        assert_eq!(
            reason(validate(&base(), &c)),
            "Section line count changed: Experience"
        );
    }

    #[test]
    fn test_sections_checked_against_derived_layout() {
        let mut b = base();
        b.sections.clear();
        // Derived: Summary(1), Skills(1), Experience(2 headers + 2 bullets), Projects(3)
        let mut c = valid_candidate();
        c.sections = vec![
            section("Summary", &["Rust backend engineer"]),
            section("Skills", &["Rust, Kubernetes"]),
            section("Experience", &["a", "b", "c", "d"]),
            section("Projects", &["Logship", "Technologies: Rust", "Indexed logs"]),
        ];
        assert_eq!(validate(&b, &c), Verdict::Valid);

        c.sections[2].lines.pop();
        assert_eq!(
            reason(validate(&b, &c)),
            "Section line count changed: Experience"
        );
    }

    #[test]
    fn test_section_check_skipped_when_base_has_no_layout() {
        let b = BaseResume {
            contact: base().contact,
            ..Default::default()
        };
        let mut c = valid_candidate();
        c.experience.clear();
        c.projects.clear();
        c.sections.clear();
        assert_eq!(validate(&b, &c), Verdict::Valid);
    }

    #[test]
    fn test_experience_count_change_rejected() {
        let mut c = valid_candidate();
        c.experience.pop();
        assert_eq!(reason(validate(&base(), &c)), "Experience count changed");
    }

    #[test]
    fn test_invented_company_rejected_with_name_as_given() {
        let mut c = valid_candidate();
        c.experience[0].company = "Initech LLC".to_string();
        assert_eq!(
            reason(validate(&base(), &c)),
            "Unknown company: Initech LLC"
        );
    }

    #[test]
    fn test_company_match_ignores_case_and_whitespace() {
        let mut c = valid_candidate();
        c.experience[0].company = "  GLOBEX ".to_string();
        c.experience[1].company = "acme corp".to_string();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_projects_added_without_base_project() {
        let mut b = base();
        b.projects.clear();
        b.sections.pop();
        let mut c = valid_candidate();
        c.sections.pop();
        assert_eq!(
            reason(validate(&b, &c)),
            "Projects added without a base project"
        );
    }

    #[test]
    fn test_no_projects_on_either_side_is_fine() {
        let mut b = base();
        b.projects.clear();
        b.sections.pop();
        let mut c = valid_candidate();
        c.projects.clear();
        c.sections.pop();
        assert_eq!(validate(&b, &c), Verdict::Valid);
    }

    #[test]
    fn test_unknown_project_rejected() {
        let mut c = valid_candidate();
        c.projects.push(project("Side Quest"));
        assert_eq!(reason(validate(&base(), &c)), "Unknown project: Side Quest");
    }

    #[test]
    fn test_dropping_projects_is_allowed() {
        let mut c = valid_candidate();
        c.projects.clear();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_two_of_four_keywords_is_low_coverage() {
        let mut c = valid_candidate();
        c.summary = "k1 and k2".to_string();
        c.skills = vec!["none".to_string()];
        c.experience.iter_mut().for_each(|e| e.bullets.clear());
        c.projects.clear();
        c.sections = vec![
            section("Summary", &["x"]),
            section("Experience", &["x", "x", "x"]),
            section("Projects", &["x"]),
        ];
        c.keywords = ["k1", "k2", "k3", "k4"].map(String::from).to_vec();
        assert_eq!(reason(validate(&base(), &c)), "Low keyword coverage");

        c.summary = "k1 and k2 and k3".to_string();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_coverage_requirement_capped_by_keyword_count() {
        let mut c = valid_candidate();
        c.keywords = vec!["Rust".to_string()];
        assert_eq!(validate(&base(), &c), Verdict::Valid);

        c.keywords = vec!["Haskell".to_string()];
        assert_eq!(reason(validate(&base(), &c)), "Low keyword coverage");
    }

    #[test]
    fn test_keyword_match_is_case_insensitive_substring() {
        let mut c = valid_candidate();
        c.keywords = ["RUST", "kubernetes", "Distributed"].map(String::from).to_vec();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_keywords_counted_in_section_and_project_text() {
        let mut c = valid_candidate();
        c.summary = "Engineer".to_string();
        c.skills = vec!["Go".to_string()];
        c.experience.iter_mut().for_each(|e| e.bullets.clear());
        c.projects[0].description = "uses kafka".to_string();
        c.projects[0].bullets = vec!["tuned grafana".to_string()];
        c.sections[0].lines = vec!["terraform everywhere".to_string()];
        c.keywords = ["Kafka", "Grafana", "Terraform"].map(String::from).to_vec();
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_keyword_can_span_adjacent_skills() {
        let mut c = valid_candidate();
        c.summary = "Backend engineer".to_string();
        c.skills = vec!["Machine".to_string(), "Learning".to_string()];
        c.keywords = vec!["machine learning".to_string()];
        assert_eq!(validate(&base(), &c), Verdict::Valid);
    }

    #[test]
    fn test_violation_serializes_with_detail() {
        let json = serde_json::to_value(Violation::UnknownCompany("Initech".to_string())).unwrap();
        assert_eq!(json["kind"], "unknown_company");
        assert_eq!(json["detail"], "Initech");
    }
}
