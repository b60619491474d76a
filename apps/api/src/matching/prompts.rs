// Prompt templates for the matching pipeline.

/// Suggestion prompt. Replace `{missing_keywords}` before sending.
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = "\
I'm applying for a job and my resume seems to be missing some important keywords.

Job Description Keywords: {missing_keywords}

Can you provide specific suggestions on how I could incorporate these keywords into my resume naturally?
Please provide examples of bullet points or phrases I could use for each category of missing skills.";

pub fn suggestions_prompt(missing_keywords: &[String]) -> String {
    SUGGESTIONS_PROMPT_TEMPLATE.replace("{missing_keywords}", &missing_keywords.join(", "))
}
