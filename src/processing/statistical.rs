//! Deterministic keyword extraction used when the generator tier fails

use crate::processing::keywords::{KeywordCategory, KeywordMap};
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Technologies recognized by the vocabulary scan, in canonical casing.
const VOCABULARY: &[&str] = &[
    "Python", "Java", "C++", "JavaScript", "TypeScript", "R", "SQL", "NoSQL",
    "MongoDB", "MySQL", "PostgreSQL", "AWS", "Azure", "GCP", "Docker",
    "Kubernetes", "CI/CD", "DevOps", "Machine Learning", "AI", "NLP",
    "Data Science", "Data Analysis", "Big Data", "Hadoop", "Spark", "Excel",
    "Power BI", "PowerBI", "Tableau", "REST", "API", "Git", "Agile", "Scrum",
    "Microservices", "TensorFlow", "PyTorch", "Snowflake", "Amplitude",
    "Metabase", "Data Engineering", "Data Visualization", "ETL",
    "Data Warehousing", "Airflow", "Kafka", "Pandas", "NumPy", "Leadership",
    "Communication", "Teamwork", "Problem Solving", "Capital Markets",
    "Finance",
];

/// Assigns terms to categories when no generator output is available.
/// Frequency plus position weighting over the raw text, with a known
/// technology vocabulary matched exactly.
pub struct StatisticalExtractor {
    stop_words: HashSet<&'static str>,
    vocabulary_matcher: AhoCorasick,
    requirement_regex: Regex,
    cloud_terms: HashSet<&'static str>,
    programming_terms: HashSet<&'static str>,
    data_terms: HashSet<&'static str>,
    tool_terms: HashSet<&'static str>,
    soft_terms: HashSet<&'static str>,
}

impl StatisticalExtractor {
    pub fn new() -> Self {
        let vocabulary_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(VOCABULARY)
            .expect("vocabulary patterns are valid");

        let requirement_regex = Regex::new(
            r"(?i)(?:proficient|proficiency|experience|experienced|knowledge|skills|expertise|familiarity|ability)\s+(?:in|with|of|to)\s+([^.;,\n]+)",
        )
        .expect("requirement regex is valid");

        Self {
            stop_words: Self::stop_words(),
            vocabulary_matcher,
            requirement_regex,
            cloud_terms: [
                "aws", "azure", "gcp", "cloud", "serverless", "lambda", "ec2", "s3",
                "dynamodb", "firebase", "cloudflare", "kubernetes", "docker", "snowflake",
            ]
            .into_iter()
            .collect(),
            programming_terms: [
                "python", "java", "javascript", "typescript", "c++", "ruby", "php", "sql",
                "nosql", "programming", "coding", "algorithm", "data structure", "api",
            ]
            .into_iter()
            .collect(),
            data_terms: [
                "etl", "data warehousing", "data warehouse", "tableau", "power bi",
                "powerbi", "excel", "metabase", "amplitude", "spark", "hadoop", "airflow",
                "pandas", "numpy", "visualization", "big data",
            ]
            .into_iter()
            .collect(),
            tool_terms: [
                "git", "github", "gitlab", "jira", "jenkins", "terraform", "ansible",
                "linux", "bash", "kafka", "rest", "microservices", "agile", "scrum",
            ]
            .into_iter()
            .collect(),
            soft_terms: [
                "communication", "leadership", "teamwork", "collaboration",
                "problem solving", "creativity", "adaptability", "time management",
                "critical thinking", "attention to detail", "organization", "flexibility",
                "stakeholder", "mentoring", "presentation",
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Extract and categorize keywords from raw job text. Deterministic;
    /// results are uncapped and unnormalized, the caller applies both.
    pub fn extract(&self, text: &str) -> KeywordMap {
        let mut map = KeywordMap::new();
        if text.trim().is_empty() {
            return map;
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut add = |map: &mut KeywordMap, keyword: &str| {
            let cleaned = keyword.trim();
            if cleaned.len() < 2 {
                return;
            }
            if seen.insert(cleaned.to_lowercase()) {
                map.push(self.categorize(cleaned), cleaned.to_string());
            }
        };

        // Known technologies first, in canonical casing.
        for hit in self.find_vocabulary_terms(text) {
            add(&mut map, &hit);
        }

        // Phrases trailing requirement verbs ("experience with ...").
        for cap in self.requirement_regex.captures_iter(text) {
            if let Some(phrase) = cap.get(1) {
                let phrase = phrase.as_str().trim();
                if phrase.len() > 3 && phrase.split_whitespace().count() <= 5 {
                    add(&mut map, phrase);
                }
            }
        }

        // Remaining capacity from frequency + position scoring.
        for token in self.score_tokens(text, 10) {
            add(&mut map, &token);
        }

        map
    }

    /// Scan for vocabulary terms, honoring word boundaries so "R" does not
    /// fire inside "Reports".
    fn find_vocabulary_terms(&self, text: &str) -> Vec<String> {
        let bytes = text.as_bytes();
        let mut found = Vec::new();
        let mut seen = HashSet::new();

        for mat in self.vocabulary_matcher.find_iter(text) {
            let boundary_before =
                mat.start() == 0 || !bytes[mat.start() - 1].is_ascii_alphanumeric();
            let boundary_after =
                mat.end() == text.len() || !bytes[mat.end()].is_ascii_alphanumeric();
            if !boundary_before || !boundary_after {
                continue;
            }
            let canonical = VOCABULARY[mat.pattern().as_usize()];
            if seen.insert(canonical.to_lowercase()) {
                found.push(canonical.to_string());
            }
        }

        found
    }

    /// Top tokens by frequency with an early-position bonus.
    fn score_tokens(&self, text: &str, max_tokens: usize) -> Vec<String> {
        let tokens: Vec<String> = text
            .unicode_words()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 2 && !self.stop_words.contains(w.as_str()))
            .filter(|w| w.chars().any(|c| c.is_alphabetic()))
            .collect();

        if tokens.is_empty() {
            return Vec::new();
        }

        let total = tokens.len() as f32;
        let mut frequency: HashMap<&str, f32> = HashMap::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        for (index, token) in tokens.iter().enumerate() {
            *frequency.entry(token.as_str()).or_insert(0.0) += 1.0;
            first_seen.entry(token.as_str()).or_insert(index);
        }

        let mut scored: Vec<(&str, f32)> = frequency
            .into_iter()
            .map(|(token, freq)| {
                let position_bonus = 1.0 - (first_seen[token] as f32 / total);
                (token, freq + position_bonus)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(max_tokens)
            .map(|(token, _)| token.to_string())
            .collect()
    }

    /// Heuristic category assignment: cloud first, then programming, data,
    /// tools, soft skills, and technical skills as the default bucket.
    pub fn categorize(&self, keyword: &str) -> KeywordCategory {
        let lowered = keyword.to_lowercase();
        let matches_any =
            |terms: &HashSet<&'static str>| terms.iter().any(|term| lowered.contains(term));

        if matches_any(&self.cloud_terms) {
            KeywordCategory::CloudTechnologies
        } else if matches_any(&self.programming_terms) {
            KeywordCategory::ProgrammingLanguages
        } else if matches_any(&self.data_terms) {
            KeywordCategory::DataTools
        } else if matches_any(&self.tool_terms) {
            KeywordCategory::TechnicalTools
        } else if matches_any(&self.soft_terms) {
            KeywordCategory::SoftSkills
        } else {
            KeywordCategory::TechnicalSkills
        }
    }

    fn stop_words() -> HashSet<&'static str> {
        [
            "and", "are", "the", "for", "with", "you", "will", "our", "your", "their",
            "have", "has", "this", "that", "from", "they", "been", "were", "was", "can",
            "could", "should", "would", "must", "may", "might", "who", "what", "when",
            "where", "which", "while", "work", "working", "role", "team", "teams",
            "years", "year", "strong", "ability", "skills", "skill", "experience",
            "knowledge", "proficiency", "proficient", "including", "required",
            "requirements", "preferred", "about", "join", "looking", "candidate",
            "candidates", "position", "company", "job", "description", "responsibilities",
            "qualifications", "plus", "within", "across", "using", "other", "more",
            "etc", "well", "also", "into", "over", "both", "such", "each", "all", "per",
            "not", "but", "own", "out", "use", "new",
        ]
        .into_iter()
        .collect()
    }
}

impl Default for StatisticalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_terms_found_and_categorized() {
        let extractor = StatisticalExtractor::new();
        let job = "We need strong Python and SQL experience, AWS deployment \
                   knowledge, and Tableau dashboards. Leadership is valued.";

        let map = extractor.extract(job);

        assert!(map
            .get(KeywordCategory::ProgrammingLanguages)
            .contains(&"Python".to_string()));
        assert!(map
            .get(KeywordCategory::ProgrammingLanguages)
            .contains(&"SQL".to_string()));
        assert!(map
            .get(KeywordCategory::CloudTechnologies)
            .contains(&"AWS".to_string()));
        assert!(map
            .get(KeywordCategory::DataTools)
            .contains(&"Tableau".to_string()));
        assert!(map
            .get(KeywordCategory::SoftSkills)
            .contains(&"Leadership".to_string()));
    }

    #[test]
    fn test_single_letter_language_respects_word_boundaries() {
        let extractor = StatisticalExtractor::new();
        let map = extractor.extract("Built reports and dashboards for the sales group.");
        assert!(!map
            .get(KeywordCategory::TechnicalSkills)
            .contains(&"R".to_string()));

        let map = extractor.extract("Statistical modeling in R required for this position.");
        let all: Vec<String> = map.iter().flat_map(|(_, v)| v.to_vec()).collect();
        assert!(all.contains(&"R".to_string()));
    }

    #[test]
    fn test_requirement_phrases_captured() {
        let extractor = StatisticalExtractor::new();
        let map = extractor.extract(
            "The analyst will need experience with self-service dashboards. \
             Proficiency in stakeholder reporting matters.",
        );

        let all: Vec<String> = map.iter().flat_map(|(_, v)| v.to_vec()).collect();
        assert!(all.iter().any(|k| k.to_lowercase().contains("dashboards")));
        assert!(all
            .iter()
            .any(|k| k.to_lowercase().contains("stakeholder reporting")));
    }

    #[test]
    fn test_empty_text_yields_empty_map() {
        let extractor = StatisticalExtractor::new();
        let map = extractor.extract("   ");
        assert!(map.is_empty());
        // Category keys still exist even when empty.
        for category in KeywordCategory::all() {
            assert!(map.get(category).is_empty());
        }
    }

    #[test]
    fn test_scoring_prefers_frequent_and_early_terms() {
        let extractor = StatisticalExtractor::new();
        let tokens = extractor.score_tokens(
            "blockchain analytics blockchain pipelines blockchain reporting pipelines",
            3,
        );
        assert_eq!(tokens.first().map(String::as_str), Some("blockchain"));
        assert!(tokens.contains(&"pipelines".to_string()));
    }
}
