//! Keyword extraction and keyword-gap analysis between a job description and a resume.

use std::collections::HashSet;

/// Words that carry no signal for matching: English function words plus the
/// filler vocabulary that shows up in nearly every job posting.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "with", "by", "of",
    "about", "above", "after", "again", "against", "all", "am", "any", "are", "as", "be",
    "because", "been", "before", "being", "below", "between", "both", "can", "did", "do", "does",
    "doing", "down", "during", "each", "few", "from", "further", "had", "has", "have", "having",
    "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "into",
    "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "now", "off", "once", "only", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "too", "under",
    "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who",
    "whom", "why", "will", "would", "you", "your", "yours", "yourself", "yourselves",
    // job-posting filler
    "ability", "able", "skills", "job", "work", "working", "position", "company", "role",
    "responsible", "responsibility", "responsibilities", "experience", "year", "years", "month",
    "months", "day", "days", "time", "also", "include", "including", "included", "etc", "may",
    "must", "need", "needed", "new", "well", "good", "great", "strong", "excellent",
];

const MIN_KEYWORD_LEN: usize = 3;

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extracts the distinct keywords of `text` in first-seen order.
///
/// Text is lowercased and split on anything that is not a word character.
/// A token survives when it is at least three characters long, is not a stop
/// word, and consists only of ASCII letters.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();

    lowered
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| w.len() >= MIN_KEYWORD_LEN)
        .filter(|w| w.bytes().all(|b| b.is_ascii_lowercase()))
        .filter(|w| !is_stop_word(w))
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}

/// Job-description keywords absent from the resume, in job-description order.
pub fn find_missing_keywords(job_description: &str, resume_text: &str) -> Vec<String> {
    let resume_keywords: HashSet<String> = extract_keywords(resume_text).into_iter().collect();

    extract_keywords(job_description)
        .into_iter()
        .filter(|k| !resume_keywords.contains(k))
        .collect()
}
