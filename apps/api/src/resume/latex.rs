//! LaTeX resume generation.
//!
//! Each section is generated by its own LLM call; the four calls run
//! concurrently and their fragments are spliced into one article document.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::prompts::LATEX_ONLY_INSTRUCTION;
use crate::llm_client::{strip_code_fences, TextGenerator};
use crate::resume::models::StructuredResume;
use crate::resume::prompts::{
    EDUCATION_SECTION, INTRODUCTION_SECTION, OTHER_SECTIONS, WORK_EXPERIENCE_SECTION,
};

const PREAMBLE: &str = "\\documentclass{article}
\\usepackage{geometry}
\\geometry{a4paper, margin=1in}
\\begin{document}";

const POSTAMBLE: &str = "\\end{document}";

/// LaTeX fragments for each part of the resume, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct LatexSections {
    pub introduction: String,
    pub work_experience: String,
    pub education: String,
    pub other: String,
}

impl LatexSections {
    pub fn into_document(self) -> String {
        let body = [
            self.introduction,
            self.work_experience,
            self.education,
            self.other,
        ]
        .iter()
        .map(|s| strip_code_fences(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

        format!("{PREAMBLE}\n\n{body}\n\n{POSTAMBLE}\n")
    }
}

fn section_prompt(instruction: &str, resume_json: &str) -> String {
    format!("{instruction}\n\n{LATEX_ONLY_INSTRUCTION}\n\nRESUME DATA:\n{resume_json}")
}

async fn generate_section(
    generator: &dyn TextGenerator,
    name: &str,
    instruction: &str,
    resume_json: &str,
) -> Result<String, AppError> {
    generator
        .generate(&section_prompt(instruction, resume_json))
        .await
        .map_err(|e| AppError::Llm(format!("LaTeX generation failed for {name}: {e}")))
}

/// Builds a complete LaTeX document from a structured resume.
/// Fails if any section fails.
pub async fn build_latex(
    resume: &StructuredResume,
    generator: &dyn TextGenerator,
) -> Result<String, AppError> {
    let resume_json = serde_json::to_string_pretty(resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode resume: {e}")))?;

    let (introduction, work_experience, education, other) = tokio::try_join!(
        generate_section(generator, "introduction", INTRODUCTION_SECTION, &resume_json),
        generate_section(generator, "work experience", WORK_EXPERIENCE_SECTION, &resume_json),
        generate_section(generator, "education", EDUCATION_SECTION, &resume_json),
        generate_section(generator, "other sections", OTHER_SECTIONS, &resume_json),
    )?;

    let document = LatexSections {
        introduction,
        work_experience,
        education,
        other,
    }
    .into_document();

    info!("Generated LaTeX document: {} chars", document.len());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    /// Answers each section prompt with a marker naming the section.
    struct SectionEcho {
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl TextGenerator for SectionEcho {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            let marker = if prompt.starts_with(INTRODUCTION_SECTION) {
                "intro"
            } else if prompt.starts_with(WORK_EXPERIENCE_SECTION) {
                "work"
            } else if prompt.starts_with(EDUCATION_SECTION) {
                "edu"
            } else {
                "other"
            };
            if self.fail_on == Some(marker) {
                return Err(LlmError::EmptyContent);
            }
            Ok(format!("```latex\n\\section{{{marker}}}\n```"))
        }
    }

    #[test]
    fn test_document_wraps_sections_in_order() {
        let doc = LatexSections {
            introduction: "A".into(),
            work_experience: "B".into(),
            education: "C".into(),
            other: "D".into(),
        }
        .into_document();

        assert!(doc.starts_with("\\documentclass{article}"));
        assert!(doc.contains("\\geometry{a4paper, margin=1in}"));
        assert!(doc.contains("\\begin{document}\n\nA\n\nB\n\nC\n\nD\n\n\\end{document}"));
    }

    #[test]
    fn test_document_skips_empty_sections() {
        let doc = LatexSections {
            introduction: "A".into(),
            work_experience: "   ".into(),
            education: String::new(),
            other: "D".into(),
        }
        .into_document();
        assert!(doc.contains("\\begin{document}\n\nA\n\nD\n\n\\end{document}"));
    }

    #[test]
    fn test_section_prompt_carries_resume_data() {
        let prompt = section_prompt(EDUCATION_SECTION, "{\"education\": []}");
        assert!(prompt.starts_with(EDUCATION_SECTION));
        assert!(prompt.ends_with("RESUME DATA:\n{\"education\": []}"));
    }

    #[tokio::test]
    async fn test_build_latex_assembles_all_sections() {
        let generator = SectionEcho { fail_on: None };
        let doc = build_latex(&StructuredResume::default(), &generator)
            .await
            .unwrap();

        let positions: Vec<usize> = ["intro", "work", "edu", "other"]
            .iter()
            .map(|m| doc.find(&format!("\\section{{{m}}}")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!doc.contains("```"));
    }

    #[tokio::test]
    async fn test_build_latex_fails_when_any_section_fails() {
        let generator = SectionEcho {
            fail_on: Some("edu"),
        };
        let result = build_latex(&StructuredResume::default(), &generator).await;
        assert!(matches!(result, Err(AppError::Llm(msg)) if msg.contains("education")));
    }
}
