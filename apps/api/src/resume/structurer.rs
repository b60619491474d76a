use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{generate_json, TextGenerator};
use crate::resume::models::StructuredResume;
use crate::resume::prompts::STRUCTURE_PROMPT_TEMPLATE;

pub fn structure_prompt(resume_text: &str) -> String {
    STRUCTURE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", resume_text)
}

/// Turns raw resume text into a `StructuredResume` via the LLM.
pub async fn structure_resume(
    resume_text: &str,
    generator: &dyn TextGenerator,
) -> Result<StructuredResume, AppError> {
    let resume: StructuredResume = generate_json(generator, &structure_prompt(resume_text))
        .await
        .map_err(|e| AppError::Llm(format!("Resume structuring failed: {e}")))?;

    info!(
        "Structured resume: {} jobs, {} education entries, {} skills",
        resume.work_experience.len(),
        resume.education.len(),
        resume.skills.len()
    );
    Ok(resume)
}
