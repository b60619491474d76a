// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to prompts whose output is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to prompts whose output is spliced into a LaTeX document.
pub const LATEX_ONLY_INSTRUCTION: &str = "\
    Respond with LaTeX body content only. \
    Do NOT include \\documentclass, \\usepackage, \\begin{document} or \\end{document}. \
    Do NOT wrap the output in markdown code fences.";
