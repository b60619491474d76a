//! Axum route handlers for the Matching API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::matching::analyzer::{analyze_resume, ResumeAnalysis};
use crate::models::analysis::AnalysisRow;
use crate::state::AppState;
use crate::storage::analyses::{
    clamp_limit, get_analysis, list_recent_analyses, save_analysis, NewAnalysis,
};
use crate::storage::archive::archive_resume;
use crate::upload::read_resume_upload;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job_description: String,
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub analysis: ResumeAnalysis,
    pub extraction_method: Option<String>,
    pub resume_s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for AnalysisResponse {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            analysis: row.analysis(),
            extraction_method: row.extraction_method,
            resume_s3_key: row.resume_s3_key,
            created_at: row.created_at,
        }
    }
}

fn require_text<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} cannot be empty")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Scores plain resume text against a job description and stores the result.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<(StatusCode, Json<AnalysisResponse>), AppError> {
    let job_description =
        require_text(Some(request.job_description.as_str()), JOB_DESCRIPTION_FIELD)?;
    let resume_text = require_text(Some(request.resume_text.as_str()), "resume_text")?;

    let analysis = analyze_resume(
        job_description,
        resume_text,
        state.embedder.as_ref(),
        state.generator.as_ref(),
    )
    .await;

    let row = save_analysis(
        &state.db,
        NewAnalysis {
            id: Uuid::new_v4(),
            job_description,
            resume_text,
            analysis: &analysis,
            resume_s3_key: None,
            extraction_method: None,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// POST /api/v1/match/upload
///
/// Multipart: `resume` (PDF) + `job_description`. Extracts the resume text
/// (OCR for scanned PDFs), scores it, archives the PDF and stores the result.
pub async fn handle_match_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AnalysisResponse>), AppError> {
    let upload = read_resume_upload(multipart, state.config.max_upload_bytes).await?;
    let job_description =
        require_text(upload.text(JOB_DESCRIPTION_FIELD), JOB_DESCRIPTION_FIELD)?;
    let file = upload.require_file()?;

    let extracted = extract_text(file, &state.ocr).await?;
    let resume_text = require_text(Some(extracted.text.as_str()), "extracted resume text")
        .map_err(|_| AppError::Extraction("No text could be read from the resume".to_string()))?;

    let analysis = analyze_resume(
        job_description,
        resume_text,
        state.embedder.as_ref(),
        state.generator.as_ref(),
    )
    .await;

    let id = Uuid::new_v4();
    let s3_key = archive_resume(&state.s3, &state.config.s3_bucket, id, file.to_vec()).await?;

    let row = save_analysis(
        &state.db,
        NewAnalysis {
            id,
            job_description,
            resume_text,
            analysis: &analysis,
            resume_s3_key: Some(&s3_key),
            extraction_method: Some(extracted.method.as_str()),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// GET /api/v1/match/:id
pub async fn handle_get_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let row = get_analysis(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(row.into()))
}

/// GET /api/v1/match?limit=
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AnalysisResponse>>, AppError> {
    let rows = list_recent_analyses(&state.db, clamp_limit(query.limit)).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
