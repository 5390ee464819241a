//! Skill infusion: appending missing job keywords to the skills section

use crate::config::TailoringConfig;
use crate::processing::keywords::KeywordMap;
use crate::processing::normalizer::is_term_contained;

/// Appends extracted keywords the skills section does not already cover.
/// Existing entries are never removed, reordered or rewritten.
pub struct SkillInfuser {
    similarity_threshold: f64,
}

impl SkillInfuser {
    pub fn new(config: &TailoringConfig) -> Self {
        Self {
            similarity_threshold: config.skill_similarity_threshold,
        }
    }

    /// Append keywords missing from `skills`, concrete technical
    /// categories first and soft skills last. Returns the keywords that
    /// were added.
    pub fn infuse(&self, skills: &mut Vec<String>, keywords: &KeywordMap) -> Vec<String> {
        let mut added = Vec::new();
        for candidate in keywords.flattened() {
            if self.is_covered(skills, &candidate) {
                continue;
            }
            skills.push(candidate.clone());
            added.push(candidate);
        }
        added
    }

    /// A candidate is covered when an existing skill matches it exactly
    /// (case-insensitive), contains it or is contained by it, or sits
    /// above the fuzzy similarity threshold.
    fn is_covered(&self, skills: &[String], candidate: &str) -> bool {
        let candidate_lowered = candidate.to_lowercase();
        skills.iter().any(|existing| {
            let existing_lowered = existing.to_lowercase();
            existing_lowered == candidate_lowered
                || is_term_contained(&candidate_lowered, &existing_lowered)
                || is_term_contained(&existing_lowered, &candidate_lowered)
                || strsim::jaro_winkler(&existing_lowered, &candidate_lowered)
                    >= self.similarity_threshold
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::keywords::KeywordCategory;

    fn infuser() -> SkillInfuser {
        SkillInfuser::new(&TailoringConfig::default())
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_keywords_appended_in_priority_order() {
        let mut keywords = KeywordMap::new();
        keywords.set(KeywordCategory::SoftSkills, strings(&["Leadership"]));
        keywords.set(KeywordCategory::ProgrammingLanguages, strings(&["Python"]));
        keywords.set(KeywordCategory::CloudTechnologies, strings(&["AWS"]));

        let mut skills = strings(&["SQL"]);
        let added = infuser().infuse(&mut skills, &keywords);

        // Existing entry untouched and in place, soft skills trail.
        assert_eq!(skills, strings(&["SQL", "Python", "AWS", "Leadership"]));
        assert_eq!(added, strings(&["Python", "AWS", "Leadership"]));
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let mut keywords = KeywordMap::new();
        keywords.set(KeywordCategory::ProgrammingLanguages, strings(&["SQL"]));

        let mut skills = strings(&["sql"]);
        let added = infuser().infuse(&mut skills, &keywords);

        assert_eq!(skills, strings(&["sql"]));
        assert!(added.is_empty());
    }

    #[test]
    fn test_contained_candidates_skipped_both_directions() {
        let mut keywords = KeywordMap::new();
        keywords.set(
            KeywordCategory::ProgrammingLanguages,
            strings(&["SQL", "Python Programming"]),
        );

        let mut skills = strings(&["SQL Server", "Python"]);
        let added = infuser().infuse(&mut skills, &keywords);

        // "SQL" is inside "SQL Server"; "Python Programming" contains "Python".
        assert_eq!(skills, strings(&["SQL Server", "Python"]));
        assert!(added.is_empty());
    }

    #[test]
    fn test_no_duplicate_invariant_after_infusion() {
        let mut keywords = KeywordMap::new();
        keywords.set(
            KeywordCategory::TechnicalSkills,
            strings(&["Data Analysis", "Data", "Reporting"]),
        );

        let mut skills = strings(&["Data Analysis"]);
        let added = infuser().infuse(&mut skills, &keywords);

        // "Data" is a substring of an existing entry, only "Reporting" lands.
        assert_eq!(skills, strings(&["Data Analysis", "Reporting"]));
        assert_eq!(added, strings(&["Reporting"]));
        for (i, a) in skills.iter().enumerate() {
            for (j, b) in skills.iter().enumerate() {
                if i != j {
                    assert!(!a.to_lowercase().contains(&b.to_lowercase()));
                }
            }
        }
    }

    #[test]
    fn test_near_duplicates_skipped_by_similarity() {
        let mut keywords = KeywordMap::new();
        keywords.set(KeywordCategory::TechnicalTools, strings(&["PowerBI"]));

        // Not a substring of "Power BI", only jaro_winkler catches it.
        let mut skills = strings(&["Power BI"]);
        let added = infuser().infuse(&mut skills, &keywords);

        assert_eq!(skills, strings(&["Power BI"]));
        assert!(added.is_empty());
    }

    #[test]
    fn test_infusion_into_empty_skills() {
        let mut keywords = KeywordMap::new();
        keywords.set(KeywordCategory::TechnicalSkills, strings(&["Data Analysis"]));
        keywords.set(KeywordCategory::SoftSkills, strings(&["Communication"]));

        let mut skills = Vec::new();
        infuser().infuse(&mut skills, &keywords);

        assert_eq!(skills, strings(&["Data Analysis", "Communication"]));
    }
}
