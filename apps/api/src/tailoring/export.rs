//! Markdown export of a tailored resume, stored next to the database row in S3.

use anyhow::Result;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{BaseResume, TailoredCandidate};
use crate::tailoring::sections::{
    EDUCATION_TITLE, EXPERIENCE_TITLE, PROJECTS_TITLE, SKILLS_TITLE, SUMMARY_TITLE,
};

pub fn export_key(user_id: Uuid, tailored_id: Uuid) -> String {
    format!("tailored/{user_id}/{tailored_id}.md")
}

/// Renders the tailored resume as Markdown. The candidate's section layout is
/// used when present; otherwise the structured fields are laid out in the
/// canonical order, with education taken from the base resume.
pub fn render_markdown(base: &BaseResume, candidate: &TailoredCandidate) -> String {
    let mut md = format!("# {}\n\n", base.contact.name);

    let mut contact = vec![base.contact.email.clone()];
    contact.extend(base.contact.phone.iter().cloned());
    contact.extend(base.contact.location.iter().cloned());
    contact.extend(base.contact.links.iter().cloned());
    md.push_str(&contact.join(" | "));
    md.push_str("\n\n");

    if !candidate.sections.is_empty() {
        for section in &candidate.sections {
            md.push_str(&format!("## {}\n\n", section.title));
            for line in &section.lines {
                md.push_str(&format!("- {line}\n"));
            }
            md.push('\n');
        }
        return md;
    }

    md.push_str(&format!("## {SUMMARY_TITLE}\n\n{}\n\n", candidate.summary.trim()));
    md.push_str(&format!("## {SKILLS_TITLE}\n\n{}\n\n", candidate.skills.join(", ")));

    if !candidate.experience.is_empty() {
        md.push_str(&format!("## {EXPERIENCE_TITLE}\n\n"));
        for entry in &candidate.experience {
            let end = entry.end_date.as_deref().unwrap_or("Present");
            md.push_str(&format!(
                "### {}, {} ({} - {end})\n",
                entry.title, entry.company, entry.start_date
            ));
            for bullet in &entry.bullets {
                md.push_str(&format!("- {bullet}\n"));
            }
            md.push('\n');
        }
    }

    if !base.education.is_empty() {
        md.push_str(&format!("## {EDUCATION_TITLE}\n\n"));
        for entry in &base.education {
            match entry.field.as_deref() {
                Some(field) => md.push_str(&format!(
                    "- {} in {field}, {}\n",
                    entry.degree, entry.institution
                )),
                None => md.push_str(&format!("- {}, {}\n", entry.degree, entry.institution)),
            }
        }
        md.push('\n');
    }

    if !candidate.projects.is_empty() {
        md.push_str(&format!("## {PROJECTS_TITLE}\n\n"));
        for project in &candidate.projects {
            md.push_str(&format!("### {}\n{}\n", project.name, project.description));
            for bullet in &project.bullets {
                md.push_str(&format!("- {bullet}\n"));
            }
            md.push('\n');
        }
    }

    md
}

/// Uploads a rendered export under `key`.
pub async fn upload_export(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    markdown: String,
) -> Result<()> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(markdown.into_bytes()))
        .content_type("text/markdown")
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

    info!("Uploaded tailored resume export to s3://{bucket}/{key}");
    Ok(())
}
