//! Normalization of job postings sent by the browser extension.
//!
//! The content script scrapes whatever the job board renders, so titles arrive
//! with stray newlines, descriptions with runs of blank lines, and the URL is
//! the only reliable identity. Everything here is pure; storage happens in
//! `jobs::store`.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Longest description we keep, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 20_000;

/// Hosts with a friendly source name. Matched as a suffix of the URL host.
const KNOWN_BOARDS: &[(&str, &str)] = &[
    ("linkedin.com", "linkedin"),
    ("indeed.com", "indeed"),
    ("greenhouse.io", "greenhouse"),
    ("lever.co", "lever"),
    ("myworkdayjobs.com", "workday"),
    ("ashbyhq.com", "ashby"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Posting URL is not valid: {0}")]
    InvalidUrl(String),

    #[error("Posting URL must use http or https")]
    UnsupportedScheme,

    #[error("Posting has no title")]
    MissingTitle,

    #[error("Posting has no company")]
    MissingCompany,

    #[error("Posting has no description")]
    MissingDescription,
}

/// Payload posted by the extension content script.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedPosting {
    pub user_id: Uuid,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    /// `document.title`, used when the board hides the job title in markup we
    /// failed to scrape.
    #[serde(default)]
    pub page_title: Option<String>,
}

/// A posting ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobPosting {
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: String,
    pub source: String,
}

pub fn normalize_extracted(raw: ExtractedPosting) -> Result<NewJobPosting, ExtractionError> {
    let url = Url::parse(raw.url.trim())
        .map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractionError::UnsupportedScheme);
    }
    let source = source_for_host(url.host_str().unwrap_or_default());

    let mut title = collapse_whitespace(&raw.title);
    if title.is_empty() {
        title = raw
            .page_title
            .as_deref()
            .map(collapse_whitespace)
            .unwrap_or_default();
    }

    let posting = normalize_fields(
        raw.user_id,
        title,
        &raw.company,
        raw.location.as_deref(),
        &raw.description,
    )?;

    Ok(NewJobPosting {
        url: Some(url.to_string()),
        source,
        ..posting
    })
}

/// Normalizes a hand-entered posting. The URL is optional but must be
/// well-formed when present.
pub fn normalize_manual(
    user_id: Uuid,
    title: &str,
    company: &str,
    location: Option<&str>,
    url: Option<&str>,
    description: &str,
) -> Result<NewJobPosting, ExtractionError> {
    let url = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(raw) => {
            let parsed =
                Url::parse(raw).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ExtractionError::UnsupportedScheme);
            }
            Some(parsed.to_string())
        }
        None => None,
    };

    let posting = normalize_fields(
        user_id,
        collapse_whitespace(title),
        company,
        location,
        description,
    )?;
    Ok(NewJobPosting { url, ..posting })
}

fn normalize_fields(
    user_id: Uuid,
    title: String,
    company: &str,
    location: Option<&str>,
    description: &str,
) -> Result<NewJobPosting, ExtractionError> {
    if title.is_empty() {
        return Err(ExtractionError::MissingTitle);
    }
    let company = collapse_whitespace(company);
    if company.is_empty() {
        return Err(ExtractionError::MissingCompany);
    }
    let description = clean_description(description);
    if description.is_empty() {
        return Err(ExtractionError::MissingDescription);
    }
    let location = location
        .map(collapse_whitespace)
        .filter(|l| !l.is_empty());

    Ok(NewJobPosting {
        user_id,
        title,
        company,
        location,
        url: None,
        description,
        source: "manual".to_string(),
    })
}

/// Maps a URL host to a job board name, or the bare host when unknown.
pub fn source_for_host(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    KNOWN_BOARDS
        .iter()
        .find(|(suffix, _)| host == *suffix || host.ends_with(&format!(".{suffix}")))
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| host.strip_prefix("www.").unwrap_or(&host).to_string())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims lines, keeps at most one blank line between paragraphs, and caps the
/// length at `MAX_DESCRIPTION_CHARS`.
fn clean_description(value: &str) -> String {
    let mut out = String::with_capacity(value.len().min(MAX_DESCRIPTION_CHARS));
    let mut blank_run = 0;

    for line in value.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        blank_run = 0;
        out.push_str(line);
    }

    match out.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => out[..cut].trim_end().to_string(),
        None => out,
    }
}
