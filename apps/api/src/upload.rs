//! Reads a multipart resume upload: one `resume` file part plus text fields.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Default)]
pub struct ResumeUpload {
    pub file: Option<Bytes>,
    pub fields: HashMap<String, String>,
}

impl ResumeUpload {
    /// The uploaded resume, or a validation error when the part is missing.
    pub fn require_file(&self) -> Result<&Bytes, AppError> {
        self.file
            .as_ref()
            .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))
    }

    /// A non-blank text field, trimmed.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.text(name), Some("true" | "1" | "yes"))
    }
}

pub async fn read_resume_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<ResumeUpload, AppError> {
    let mut upload = ResumeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == RESUME_FIELD {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            if bytes.len() > max_bytes {
                return Err(AppError::Validation(format!(
                    "Resume exceeds the {max_bytes} byte upload limit"
                )));
            }
            upload.file = Some(bytes);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read field {name}: {e}")))?;
            upload.fields.insert(name, value);
        }
    }

    Ok(upload)
}
