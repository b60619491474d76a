use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::analyzer::ResumeAnalysis;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub job_description: String,
    pub resume_text: String,
    pub similarity_score: i32,
    pub missing_keywords: Vec<String>,
    pub tips: Vec<String>,
    pub ai_suggestions: String,
    pub resume_s3_key: Option<String>,
    pub extraction_method: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRow {
    pub fn analysis(&self) -> ResumeAnalysis {
        ResumeAnalysis {
            similarity_score: self.similarity_score.clamp(0, 100) as u32,
            missing_keywords: self.missing_keywords.clone(),
            tips: self.tips.clone(),
            ai_suggestions: self.ai_suggestions.clone(),
        }
    }
}
