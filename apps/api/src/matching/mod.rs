// Resume-to-job matching pipeline.
// Implements: keyword extraction, keyword gaps, tips, embedding similarity, AI suggestions.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod keywords;
pub mod prompts;
pub mod similarity;
pub mod tips;
