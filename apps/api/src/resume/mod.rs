// Resume assistant: text extraction endpoints, AI structuring, LaTeX generation.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod latex;
pub mod models;
pub mod prompts;
pub mod structurer;
