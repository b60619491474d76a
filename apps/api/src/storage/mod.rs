//! Persistence: analyses in Postgres, uploaded resumes in S3.

pub mod analyses;
pub mod archive;
