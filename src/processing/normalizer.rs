//! Keyword canonicalization: qualifier stripping, synonym mapping,
//! deduplication

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Qualifier phrases stripped from keyword boundaries. Multi-word forms
/// precede their single-word bases so "skills in python" loses the whole
/// phrase, not just "skills".
const QUALIFIERS: &[&str] = &[
    "skills in",
    "skill in",
    "skills with",
    "skill with",
    "experience in",
    "experience with",
    "experienced in",
    "experienced with",
    "knowledge of",
    "knowledge in",
    "proficiency in",
    "proficient in",
    "proficient with",
    "expertise in",
    "expert in",
    "familiar with",
    "familiarity with",
    "understanding of",
    "work with",
    "working with",
    "skills",
    "skill",
    "expertise",
    "knowledge",
    "ability to use",
    "ability to",
    "proficiency",
    "experience",
    "understanding",
    "demonstrated ability",
    "prior experience",
    "plus",
];

/// Canonical form lookup, keyed by the lowercased stripped term.
const SYNONYMS: &[(&str, &str)] = &[
    ("sql skills", "SQL"),
    ("sql", "SQL"),
    ("sql programming", "SQL"),
    ("sql databases", "SQL"),
    ("sql knowledge", "SQL"),
    ("nosql", "NoSQL"),
    ("python programming", "Python"),
    ("python skills", "Python"),
    ("python", "Python"),
    ("r programming", "R"),
    ("r skills", "R"),
    ("r", "R"),
    ("snowflake cloud platform", "Snowflake"),
    ("snowflake", "Snowflake"),
    ("metabase bi tool", "Metabase"),
    ("metabase", "Metabase"),
    ("amplitude analytics tool", "Amplitude"),
    ("amplitude", "Amplitude"),
    ("data engineering", "Data Engineering"),
    ("data engineer", "Data Engineering"),
    ("database work", "Database Management"),
    ("database management", "Database Management"),
    ("database", "Database Management"),
    ("machine learning", "Machine Learning"),
    ("ml", "Machine Learning"),
    ("artificial intelligence", "AI"),
    ("ai", "AI"),
    ("bi", "Business Intelligence"),
    ("business intelligence", "Business Intelligence"),
    ("data analysis", "Data Analysis"),
    ("data analytics", "Data Analysis"),
    ("data visualization", "Data Visualization"),
    ("data science", "Data Science"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("java", "Java"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mongodb", "MongoDB"),
    ("powerbi", "Power BI"),
    ("power bi", "Power BI"),
    ("k8s", "Kubernetes"),
    ("kubernetes", "Kubernetes"),
    ("ci/cd pipelines", "CI/CD"),
    ("self-service tools", "Self-Service Tools"),
    ("self service tools", "Self-Service Tools"),
    ("self-service tools creation", "Self-Service Tools"),
    ("finance", "Finance"),
    ("financial analysis", "Financial Analysis"),
    ("financial planning", "Financial Planning"),
    ("financial reporting", "Financial Reporting"),
    ("capital markets", "Capital Markets"),
];

/// Terms rendered all-caps when no synonym applies.
const ACRONYMS: &[&str] = &["AWS", "GCP", "ETL", "API", "UI", "UX", "CI/CD", "NLP"];

/// Canonicalizes raw keyword strings. Deterministic and free of I/O;
/// `normalize` is idempotent.
pub struct KeywordNormalizer {
    whitespace: Regex,
    synonyms: HashMap<&'static str, &'static str>,
    acronyms: HashSet<&'static str>,
}

impl KeywordNormalizer {
    pub fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace regex is valid"),
            synonyms: SYNONYMS.iter().copied().collect(),
            acronyms: ACRONYMS.iter().copied().collect(),
        }
    }

    /// Canonicalize a list: strip qualifiers, map synonyms, fix casing,
    /// then drop case-insensitive and contained duplicates while keeping
    /// first-seen order.
    pub fn normalize(&self, raw: &[String]) -> Vec<String> {
        let mut kept: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for keyword in raw {
            let Some(canonical) = self.normalize_term(keyword) else {
                continue;
            };
            let lowered = canonical.to_lowercase();
            if seen.contains(&lowered) {
                continue;
            }
            let redundant = kept.iter().any(|existing| {
                let existing_lowered = existing.to_lowercase();
                is_term_contained(&lowered, &existing_lowered)
                    || is_term_contained(&existing_lowered, &lowered)
            });
            if redundant {
                continue;
            }
            seen.insert(lowered);
            kept.push(canonical);
        }

        kept
    }

    /// Canonicalize a single keyword. Returns None for blank input.
    pub fn normalize_term(&self, raw: &str) -> Option<String> {
        let mut term = self
            .whitespace
            .replace_all(raw.trim(), " ")
            .to_lowercase();
        if term.is_empty() {
            return None;
        }

        term = self.strip_qualifiers(&term);
        if term.is_empty() {
            return None;
        }

        if let Some(canonical) = self.synonyms.get(term.as_str()) {
            return Some((*canonical).to_string());
        }

        let upper = term.to_uppercase();
        if self.acronyms.contains(upper.as_str()) {
            return Some(upper);
        }

        Some(title_case(&term))
    }

    /// Strip qualifier phrases from either end until none match. A single
    /// pass is not enough: "communication skills experience" sheds
    /// "experience" first and "skills" only on the next round.
    fn strip_qualifiers(&self, term: &str) -> String {
        let mut current = term.to_string();
        loop {
            let mut stripped = false;
            for qualifier in QUALIFIERS {
                let prefix = format!("{} ", qualifier);
                if let Some(rest) = current.strip_prefix(&prefix) {
                    current = rest.trim().to_string();
                    stripped = true;
                }
                let suffix = format!(" {}", qualifier);
                if let Some(rest) = current.strip_suffix(&suffix) {
                    current = rest.trim().to_string();
                    stripped = true;
                }
            }
            if !stripped || current.is_empty() {
                break;
            }
        }
        current
    }
}

impl Default for KeywordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strict containment check on lowercased terms: true when `needle` is a
/// proper substring of `haystack`. "sql" is contained in "sql server" and
/// collapses into it. Shared with skill infusion and used-keyword
/// tracking.
pub fn is_term_contained(needle: &str, haystack: &str) -> bool {
    !needle.is_empty() && needle.len() < haystack.len() && haystack.contains(needle)
}

fn title_case(term: &str) -> String {
    term.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
