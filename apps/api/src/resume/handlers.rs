//! Axum route handlers for the Resume API.

use axum::{extract::Multipart, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::{extract_text, ExtractionMethod};
use crate::resume::latex::build_latex;
use crate::resume::models::StructuredResume;
use crate::resume::structurer::structure_resume;
use crate::state::AppState;
use crate::upload::read_resume_upload;

/// Multipart flag asking the extract endpoint to also structure the text.
pub const STRUCTURED_FIELD: &str = "structured";

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub method: ExtractionMethod,
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredResume>,
}

#[derive(Debug, Deserialize)]
pub struct StructureRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct LatexRequest {
    pub resume: StructuredResume,
}

#[derive(Debug, Serialize)]
pub struct LatexResponse {
    pub latex: String,
}

/// POST /api/v1/resumes/extract
///
/// Multipart: `resume` (PDF), optional `structured=true` to run the
/// structuring model over the extracted text.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_resume_upload(multipart, state.config.max_upload_bytes).await?;
    let file = upload.require_file()?;

    let extracted = extract_text(file, &state.ocr).await?;

    let structured = if upload.flag(STRUCTURED_FIELD) {
        Some(structure_resume(&extracted.text, state.generator.as_ref()).await?)
    } else {
        None
    };

    Ok(Json(ExtractResponse {
        text: extracted.text,
        method: extracted.method,
        page_count: extracted.page_count,
        structured,
    }))
}

/// POST /api/v1/resumes/structure
pub async fn handle_structure(
    State(state): State<AppState>,
    Json(request): Json<StructureRequest>,
) -> Result<Json<StructuredResume>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let resume = structure_resume(&request.resume_text, state.generator.as_ref()).await?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/latex
pub async fn handle_latex(
    State(state): State<AppState>,
    Json(request): Json<LatexRequest>,
) -> Result<Json<LatexResponse>, AppError> {
    let latex = build_latex(&request.resume, state.generator.as_ref()).await?;
    Ok(Json(LatexResponse { latex }))
}
