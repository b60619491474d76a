//! Groups missing keywords into skill categories and turns them into advice.

pub const NO_GAPS_TIP: &str = "Your resume already contains most keywords from the job description.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    ProgrammingLanguages,
    Frameworks,
    CloudDevOps,
    DatabaseData,
    SoftSkills,
    OtherSkills,
}

/// Patterns per category, checked in order; the first hit wins.
/// Patterns of two characters or fewer must match the whole keyword, so
/// `golang` needs its own entry.
const CATEGORY_PATTERNS: &[(KeywordCategory, &[&str])] = &[
    (
        KeywordCategory::ProgrammingLanguages,
        &[
            "javascript", "typescript", "python", "java", "golang", "go", "rust", "c++", "php",
            "ruby",
        ],
    ),
    (
        KeywordCategory::Frameworks,
        &[
            "react", "angular", "vue", "svelte", "node", "express", "django", "flask", "spring",
        ],
    ),
    (
        KeywordCategory::CloudDevOps,
        &["aws", "azure", "gcp", "cloud", "docker", "kubernetes", "serverless"],
    ),
    (
        KeywordCategory::DatabaseData,
        &["sql", "nosql", "mongodb", "postgresql", "mysql", "database", "data"],
    ),
    (
        KeywordCategory::SoftSkills,
        &["lead", "manage", "team", "agile", "scrum", "communicate"],
    ),
];

impl KeywordCategory {
    pub fn label(self) -> &'static str {
        match self {
            KeywordCategory::ProgrammingLanguages => "Programming Languages",
            KeywordCategory::Frameworks => "Frameworks",
            KeywordCategory::CloudDevOps => "Cloud & DevOps",
            KeywordCategory::DatabaseData => "Database & Data",
            KeywordCategory::SoftSkills => "Soft Skills",
            KeywordCategory::OtherSkills => "Other Skills",
        }
    }
}

const WHOLE_WORD_PATTERN_LEN: usize = 2;

fn pattern_matches(keyword: &str, pattern: &str) -> bool {
    if pattern.len() <= WHOLE_WORD_PATTERN_LEN {
        keyword == pattern
    } else {
        keyword.contains(pattern)
    }
}

pub fn categorize(keyword: &str) -> KeywordCategory {
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, patterns)| patterns.iter().any(|p| pattern_matches(keyword, p)))
        .map(|(category, _)| *category)
        .unwrap_or(KeywordCategory::OtherSkills)
}

/// Buckets keywords by category, keeping categories in first-appearance order.
pub fn group_keywords(keywords: &[String]) -> Vec<(KeywordCategory, Vec<&str>)> {
    let mut groups: Vec<(KeywordCategory, Vec<&str>)> = Vec::new();
    for keyword in keywords {
        let category = categorize(keyword);
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(keyword),
            None => groups.push((category, vec![keyword.as_str()])),
        }
    }
    groups
}

/// One tip per category of missing keywords.
pub fn generate_tips(missing_keywords: &[String]) -> Vec<String> {
    if missing_keywords.is_empty() {
        return vec![NO_GAPS_TIP.to_string()];
    }

    group_keywords(missing_keywords)
        .into_iter()
        .map(|(category, keywords)| {
            format!(
                "Consider adding experience with {}: {}",
                category.label().to_lowercase(),
                keywords.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_categorize_known_keywords() {
        assert_eq!(categorize("typescript"), KeywordCategory::ProgrammingLanguages);
        assert_eq!(categorize("django"), KeywordCategory::Frameworks);
        assert_eq!(categorize("kubernetes"), KeywordCategory::CloudDevOps);
        assert_eq!(categorize("mongodb"), KeywordCategory::DatabaseData);
        assert_eq!(categorize("leadership"), KeywordCategory::SoftSkills);
        assert_eq!(categorize("photoshop"), KeywordCategory::OtherSkills);
    }

    #[test]
    fn test_categorize_first_pattern_wins() {
        // "javascript" also contains "java"; both are languages.
        assert_eq!(categorize("javascript"), KeywordCategory::ProgrammingLanguages);
        // "nodejs" hits frameworks before anything later in the list.
        assert_eq!(categorize("nodejs"), KeywordCategory::Frameworks);
    }

    #[test]
    fn test_categorize_short_pattern_needs_whole_word() {
        assert_eq!(categorize("go"), KeywordCategory::ProgrammingLanguages);
        assert_eq!(categorize("django"), KeywordCategory::Frameworks);
        assert_eq!(categorize("algorithms"), KeywordCategory::OtherSkills);
        assert_eq!(categorize("mongodb"), KeywordCategory::DatabaseData);
    }

    #[test]
    fn test_golang_is_a_language() {
        assert_eq!(categorize("golang"), KeywordCategory::ProgrammingLanguages);
        assert_eq!(
            generate_tips(&owned(&["golang"])),
            vec!["Consider adding experience with programming languages: golang"]
        );
    }

    #[test]
    fn test_generate_tips_no_missing_keywords() {
        assert_eq!(generate_tips(&[]), vec![NO_GAPS_TIP.to_string()]);
    }

    #[test]
    fn test_generate_tips_groups_in_first_appearance_order() {
        let tips = generate_tips(&owned(&["docker", "python", "aws", "scrum"]));
        assert_eq!(
            tips,
            vec![
                "Consider adding experience with cloud & devops: docker, aws".to_string(),
                "Consider adding experience with programming languages: python".to_string(),
                "Consider adding experience with soft skills: scrum".to_string(),
            ]
        );
    }

    #[test]
    fn test_generate_tips_other_bucket() {
        let tips = generate_tips(&owned(&["figma"]));
        assert_eq!(tips, vec!["Consider adding experience with other skills: figma"]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(KeywordCategory::CloudDevOps.label(), "Cloud & DevOps");
        assert_eq!(KeywordCategory::DatabaseData.label(), "Database & Data");
    }
}
