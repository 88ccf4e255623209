//! Tailored resume generation: two attempts, each validated.
//!
//! Flow: build prompt → generate (relaxed) → validate → on rejection,
//!       generate again with RETRY_STRICT_NOTE (strict) → validate → done.
//!
//! Transport failures from the generator are never retried here; the LLM
//! client already retries its own 429/5xx responses.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{FACT_PRESERVATION_INSTRUCTION, JSON_OUTPUT_INSTRUCTION};
use crate::llm_client::{CallOptions, LlmClient, LlmError};
use crate::models::resume::{BaseResume, TailoredCandidate};
use crate::tailoring::prompts::{RETRY_STRICT_NOTE, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use crate::tailoring::sections::{canonical_sections, outline};
use crate::tailoring::validator::{validate, Verdict, Violation};

/// Tailoring makes at most this many generation calls per request.
pub const TAILORING_ATTEMPTS: u32 = 2;

/// A full resume rewrite does not fit the client default.
const TAILOR_MAX_TOKENS: u32 = 8192;
const RELAXED_TEMPERATURE: f32 = 0.4;
const STRICT_TEMPERATURE: f32 = 0.0;

// ────────────────────────────────────────────────────────────────────────────
// Generator seam
// ────────────────────────────────────────────────────────────────────────────

/// Produces one tailored candidate for a prompt.
///
/// `strict` is set on the final attempt. Implementations must either return a
/// fully formed candidate or an error; coercing model output into
/// `TailoredCandidate` is their job, not the validator's.
///
/// Carried in `AppState` as `Arc<dyn CandidateGenerator>`.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, strict: bool) -> Result<TailoredCandidate, LlmError>;
}

/// Claude-backed generator. Strict attempts run at temperature 0.
pub struct LlmCandidateGenerator {
    llm: LlmClient,
    system: String,
}

impl LlmCandidateGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            system: format!("{TAILOR_SYSTEM} {JSON_OUTPUT_INSTRUCTION}"),
        }
    }
}

#[async_trait]
impl CandidateGenerator for LlmCandidateGenerator {
    async fn generate(&self, prompt: &str, strict: bool) -> Result<TailoredCandidate, LlmError> {
        let options = CallOptions {
            max_tokens: TAILOR_MAX_TOKENS,
            temperature: Some(if strict {
                STRICT_TEMPERATURE
            } else {
                RELAXED_TEMPERATURE
            }),
        };
        self.llm.call_json(prompt, &self.system, options).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outcome types
// ────────────────────────────────────────────────────────────────────────────

/// Both attempts produced output and both were rejected. Only the last
/// attempt's reason is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub reason: String,
    pub violation: Violation,
    pub attempts: u32,
}

impl FailureReport {
    fn from_violation(violation: Violation) -> Self {
        Self {
            reason: violation.to_string(),
            violation,
            attempts: TAILORING_ATTEMPTS,
        }
    }
}

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Tailored resume rejected: {}", .0.reason)]
    Rejected(FailureReport),

    #[error("Failed to build tailoring prompt: {0}")]
    Prompt(#[from] serde_json::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

/// Generates a tailored resume that passes validation, or explains why not.
///
/// 1. relaxed attempt; a valid candidate is returned as-is
/// 2. only if (1) was rejected: strict attempt with RETRY_STRICT_NOTE appended
/// 3. if (2) is rejected too, `TailorError::Rejected` with (2)'s reason
///
/// A generator error on either attempt is returned unchanged as
/// `TailorError::Generation`.
pub async fn generate_tailored_resume(
    base: &BaseResume,
    job_description: &str,
    generator: &dyn CandidateGenerator,
) -> Result<TailoredCandidate, TailorError> {
    let base_prompt = build_tailoring_prompt(base, job_description)?;

    let first = generator.generate(&base_prompt, false).await?;
    let violation = match validate(base, &first) {
        Verdict::Valid => {
            info!("Tailoring attempt 1/{TAILORING_ATTEMPTS} accepted");
            return Ok(first);
        }
        Verdict::Invalid(violation) => violation,
    };

    warn!(
        reason = %violation,
        "Tailoring attempt 1/{TAILORING_ATTEMPTS} rejected, retrying in strict mode"
    );

    let strict_prompt = format!("{base_prompt}\n\n{RETRY_STRICT_NOTE}");
    let second = generator.generate(&strict_prompt, true).await?;

    match validate(base, &second) {
        Verdict::Valid => {
            info!("Tailoring attempt 2/{TAILORING_ATTEMPTS} accepted");
            Ok(second)
        }
        Verdict::Invalid(violation) => {
            warn!(
                reason = %violation,
                "Tailoring attempt 2/{TAILORING_ATTEMPTS} rejected, giving up"
            );
            Err(TailorError::Rejected(FailureReport::from_violation(
                violation,
            )))
        }
    }
}

/// Fills the tailoring template with the base resume, its section layout and
/// the job description.
pub fn build_tailoring_prompt(
    base: &BaseResume,
    job_description: &str,
) -> Result<String, serde_json::Error> {
    let resume_json = serde_json::to_string_pretty(base)?;
    let sections = canonical_sections(base);
    let section_outline = if sections.is_empty() {
        "(no sections; return an empty \"sections\" array)".to_string()
    } else {
        outline(&sections)
    };

    Ok(TAILOR_PROMPT_TEMPLATE
        .replace("{fact_instruction}", FACT_PRESERVATION_INSTRUCTION)
        .replace("{json_instruction}", JSON_OUTPUT_INSTRUCTION)
        .replace("{section_outline}", &section_outline)
        .replace("{resume_json}", &resume_json)
        .replace("{job_description}", job_description.trim()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
