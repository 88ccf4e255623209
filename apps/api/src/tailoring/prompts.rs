// All LLM prompt constants for the tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for tailoring. The JSON output rule is appended per call.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer. \
    You tailor an existing resume to a specific job description by rewording, \
    reordering, and emphasising what is already there. \
    You never add experience the candidate does not have.";

/// Tailoring prompt template.
/// Replace: {fact_instruction}, {json_instruction}, {resume_json},
///          {section_outline}, {job_description}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{fact_instruction}

BASE RESUME (source of truth):
{resume_json}

SECTION LAYOUT to preserve (title and exact number of lines per section):
{section_outline}

TARGET JOB DESCRIPTION:
{job_description}

Rewrite the resume for this job. Return a JSON object with this EXACT schema:
{
  "summary": "2-3 sentence summary aimed at this role",
  "skills": ["most relevant skills first, only skills from the base resume"],
  "experience": [
    {
      "company": "exact company name from the base resume",
      "title": "exact title from the base resume",
      "start_date": "exact start date from the base resume",
      "end_date": "exact end date, or null if current",
      "location": "exact location, or null",
      "bullets": ["rewritten achievement bullet"]
    }
  ],
  "projects": [
    {
      "name": "exact project name from the base resume",
      "description": "rewritten description",
      "technologies": ["technology"],
      "url": "url or null",
      "bullets": ["rewritten bullet"]
    }
  ],
  "sections": [
    {"title": "exact section title", "lines": ["one string per line"]}
  ],
  "keywords": ["keyword taken from the job description"]
}

RULES:
1. Keep EVERY experience entry. Do not add, merge, or drop employers.
2. Only include projects that exist in the base resume.
3. "sections" must list the same sections in the same order as the layout above,
   with exactly the same number of lines in each section.
4. Extract 5-15 keywords from the job description and work the ones the candidate
   genuinely has into the summary, skills, and bullets. Never claim a skill the
   base resume does not support.
5. Keep metrics exactly as written in the base resume.

{json_instruction}"#;

/// Appended to the prompt for the second and final attempt.
pub const RETRY_STRICT_NOTE: &str = "STRICT MODE: Your previous answer changed the \
    structure of the resume. Do NOT add or remove any experience entries, projects, \
    or sections. Preserve company names, job titles, dates, project names, section \
    titles, and the number of lines in every section EXACTLY as they appear in the \
    base resume. You may only change bullet wording, the summary, the order of \
    skills, and the wording of section lines.";
