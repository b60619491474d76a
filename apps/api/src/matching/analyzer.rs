//! Resume analysis — runs the full matching pipeline for one resume/job pair.
//!
//! Flow: embeddings → similarity score → missing keywords → tips → AI suggestions.
//!
//! Third-party failures never fail the analysis: the similarity score falls
//! back to 0 and the suggestions fall back to a fixed message.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{EmbeddingProvider, TextGenerator};
use crate::matching::keywords::find_missing_keywords;
use crate::matching::prompts::suggestions_prompt;
use crate::matching::similarity::score_texts;
use crate::matching::tips::generate_tips;

pub const SUGGESTIONS_UNAVAILABLE: &str = "Unable to generate AI suggestions at this time.";
pub const NO_SUGGESTIONS_NEEDED: &str =
    "Your resume already contains the key terms from the job description.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// Cosine similarity of the two embeddings, 0 – 100.
    pub similarity_score: u32,
    pub missing_keywords: Vec<String>,
    pub tips: Vec<String>,
    pub ai_suggestions: String,
}

pub async fn analyze_resume(
    job_description: &str,
    resume_text: &str,
    embedder: &dyn EmbeddingProvider,
    generator: &dyn TextGenerator,
) -> ResumeAnalysis {
    let similarity_score = score_texts(job_description, resume_text, embedder).await;
    let missing_keywords = find_missing_keywords(job_description, resume_text);
    let tips = generate_tips(&missing_keywords);

    info!(
        "Resume analysed: similarity={} missing_keywords={}",
        similarity_score,
        missing_keywords.len()
    );

    let ai_suggestions = if missing_keywords.is_empty() {
        NO_SUGGESTIONS_NEEDED.to_string()
    } else {
        match generator.generate(&suggestions_prompt(&missing_keywords)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to get AI suggestions: {e}");
                SUGGESTIONS_UNAVAILABLE.to_string()
            }
        }
    };

    ResumeAnalysis {
        similarity_score,
        missing_keywords,
        tips,
        ai_suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::matching::tips::NO_GAPS_TIP;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct UnitEmbedder;

    #[async_trait]
    impl EmbeddingProvider for UnitEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct BrokenEmbedder;

    #[async_trait]
    impl EmbeddingProvider for BrokenEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
            Err(LlmError::RateLimited { retries: 3 })
        }
    }

    /// Records every prompt it receives and answers with a fixed reply.
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(LlmError::EmptyContent)
            } else {
                Ok("Add a bullet about Terraform modules.".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_analysis_with_gaps_asks_for_suggestions() {
        let generator = RecordingGenerator::default();
        let analysis = analyze_resume(
            "Terraform and Python developer",
            "Python developer",
            &UnitEmbedder,
            &generator,
        )
        .await;

        assert_eq!(analysis.similarity_score, 100);
        assert_eq!(analysis.missing_keywords, vec!["terraform"]);
        assert_eq!(
            analysis.tips,
            vec!["Consider adding experience with other skills: terraform"]
        );
        assert_eq!(analysis.ai_suggestions, "Add a bullet about Terraform modules.");

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Job Description Keywords: terraform"));
    }

    #[tokio::test]
    async fn test_analysis_without_gaps_skips_generator() {
        let generator = RecordingGenerator::default();
        let analysis =
            analyze_resume("Rust developer", "Senior Rust developer", &UnitEmbedder, &generator)
                .await;

        assert!(analysis.missing_keywords.is_empty());
        assert_eq!(analysis.tips, vec![NO_GAPS_TIP.to_string()]);
        assert_eq!(analysis.ai_suggestions, NO_SUGGESTIONS_NEEDED);
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back() {
        let generator = RecordingGenerator {
            fail: true,
            ..Default::default()
        };
        let analysis =
            analyze_resume("Kafka engineer", "Python engineer", &UnitEmbedder, &generator).await;

        assert_eq!(analysis.missing_keywords, vec!["kafka"]);
        assert_eq!(analysis.ai_suggestions, SUGGESTIONS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_embedder_failure_scores_zero() {
        let generator = RecordingGenerator::default();
        let analysis =
            analyze_resume("Kafka engineer", "Kafka engineer", &BrokenEmbedder, &generator).await;

        assert_eq!(analysis.similarity_score, 0);
        assert!(analysis.missing_keywords.is_empty());
    }
}
