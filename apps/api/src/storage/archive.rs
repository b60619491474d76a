use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

pub fn resume_key(analysis_id: Uuid) -> String {
    format!("resumes/{analysis_id}.pdf")
}

/// Uploads the original resume PDF and returns its object key.
pub async fn archive_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    analysis_id: Uuid,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    let key = resume_key(analysis_id);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!("Archived resume to s3://{}/{}", bucket, key);
    Ok(key)
}
