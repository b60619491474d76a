use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::matching::analyzer::ResumeAnalysis;
use crate::models::analysis::AnalysisRow;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

/// Inputs recorded alongside an analysis.
pub struct NewAnalysis<'a> {
    pub id: Uuid,
    pub job_description: &'a str,
    pub resume_text: &'a str,
    pub analysis: &'a ResumeAnalysis,
    pub resume_s3_key: Option<&'a str>,
    pub extraction_method: Option<&'a str>,
}

pub async fn save_analysis(pool: &PgPool, new: NewAnalysis<'_>) -> Result<AnalysisRow> {
    let NewAnalysis {
        id,
        job_description,
        resume_text,
        analysis,
        resume_s3_key,
        extraction_method,
    } = new;

    let row = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO resume_analyses
            (id, job_description, resume_text, similarity_score, missing_keywords,
             tips, ai_suggestions, resume_s3_key, extraction_method)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(job_description)
    .bind(resume_text)
    .bind(analysis.similarity_score as i32)
    .bind(&analysis.missing_keywords)
    .bind(&analysis.tips)
    .bind(&analysis.ai_suggestions)
    .bind(resume_s3_key)
    .bind(extraction_method)
    .fetch_one(pool)
    .await?;

    info!("Stored resume analysis {id}");
    Ok(row)
}

pub async fn get_analysis(pool: &PgPool, id: Uuid) -> Result<Option<AnalysisRow>> {
    Ok(
        sqlx::query_as::<_, AnalysisRow>("SELECT * FROM resume_analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Most recent analyses first.
pub async fn list_recent_analyses(pool: &PgPool, limit: i64) -> Result<Vec<AnalysisRow>> {
    Ok(sqlx::query_as::<_, AnalysisRow>(
        "SELECT * FROM resume_analyses ORDER BY created_at DESC LIMIT $1",
    )
    .bind(clamp_limit(Some(limit)))
    .fetch_all(pool)
    .await?)
}

/// Applies the default page size and caps it at `MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}
