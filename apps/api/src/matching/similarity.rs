//! Embedding-based similarity between a job description and a resume.

use tracing::warn;

use crate::llm_client::EmbeddingProvider;

/// Cosine of the angle between `a` and `b`; 0.0 when either has zero magnitude.
/// Extra trailing components of the longer slice are ignored.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let magnitude_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }
    dot / (magnitude_a * magnitude_b)
}

/// Cosine similarity scaled to a 0–100 percentage.
/// Empty or mismatched vectors score 0.
pub fn similarity_score(a: &[f32], b: &[f32]) -> u32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0;
    }
    (cosine_similarity(a, b) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Embeds both texts and scores them. Any embedding failure scores 0.
pub async fn score_texts(
    job_description: &str,
    resume_text: &str,
    embedder: &dyn EmbeddingProvider,
) -> u32 {
    let (job_vector, resume_vector) =
        tokio::join!(embedder.embed(job_description), embedder.embed(resume_text));

    match (job_vector, resume_vector) {
        (Ok(job), Ok(resume)) => similarity_score(&job, &resume),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Embedding failed, similarity defaults to 0: {e}");
            0
        }
    }
}
