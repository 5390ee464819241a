//! Categorized keyword map extracted from job descriptions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed set of keyword categories recognized by extraction, infusion and
/// tailoring. Declaration order is the order categories appear in prompts
/// and printed output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCategory {
    TechnicalSkills,
    SoftSkills,
    ProgrammingLanguages,
    TechnicalTools,
    DataTools,
    CloudTechnologies,
}

impl KeywordCategory {
    /// All categories in prompt/display order.
    pub fn all() -> [KeywordCategory; 6] {
        [
            KeywordCategory::TechnicalSkills,
            KeywordCategory::SoftSkills,
            KeywordCategory::ProgrammingLanguages,
            KeywordCategory::TechnicalTools,
            KeywordCategory::DataTools,
            KeywordCategory::CloudTechnologies,
        ]
    }

    /// Order used when flattening a map for skill infusion. Concrete
    /// technical categories come first, soft skills last.
    pub fn infusion_priority() -> [KeywordCategory; 6] {
        [
            KeywordCategory::TechnicalSkills,
            KeywordCategory::ProgrammingLanguages,
            KeywordCategory::TechnicalTools,
            KeywordCategory::DataTools,
            KeywordCategory::CloudTechnologies,
            KeywordCategory::SoftSkills,
        ]
    }

    /// Human-readable header, as used in generator prompts and
    /// line-oriented responses ("Technical Skills: a, b, c").
    pub fn header(&self) -> &'static str {
        match self {
            KeywordCategory::TechnicalSkills => "Technical Skills",
            KeywordCategory::SoftSkills => "Soft Skills",
            KeywordCategory::ProgrammingLanguages => "Programming Languages",
            KeywordCategory::TechnicalTools => "Technical Tools",
            KeywordCategory::DataTools => "Data Tools",
            KeywordCategory::CloudTechnologies => "Cloud Technologies",
        }
    }

    /// Snake_case name used as the JSON key for this category.
    pub fn key(&self) -> &'static str {
        match self {
            KeywordCategory::TechnicalSkills => "technical_skills",
            KeywordCategory::SoftSkills => "soft_skills",
            KeywordCategory::ProgrammingLanguages => "programming_languages",
            KeywordCategory::TechnicalTools => "technical_tools",
            KeywordCategory::DataTools => "data_tools",
            KeywordCategory::CloudTechnologies => "cloud_technologies",
        }
    }

    /// Recognize a category from a response header or JSON key. Accepts
    /// both spellings seen in the wild for the languages category.
    pub fn from_header(header: &str) -> Option<KeywordCategory> {
        let normalized = header
            .trim()
            .trim_matches(|c: char| c == '*' || c == '#' || c == ':')
            .trim()
            .to_lowercase()
            .replace('_', " ");

        match normalized.as_str() {
            "technical skills" => Some(KeywordCategory::TechnicalSkills),
            "soft skills" => Some(KeywordCategory::SoftSkills),
            "programming languages" | "programming knowledge" => {
                Some(KeywordCategory::ProgrammingLanguages)
            }
            "technical tools" | "tools" => Some(KeywordCategory::TechnicalTools),
            "data tools" => Some(KeywordCategory::DataTools),
            "cloud technologies" | "cloud platforms" => Some(KeywordCategory::CloudTechnologies),
            _ => None,
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// Keywords grouped by category. Every category key is always present, so
/// consumers never have to handle absence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordMap {
    entries: BTreeMap<KeywordCategory, Vec<String>>,
}

impl KeywordMap {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        for category in KeywordCategory::all() {
            entries.insert(category, Vec::new());
        }
        Self { entries }
    }

    pub fn get(&self, category: KeywordCategory) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set(&mut self, category: KeywordCategory, keywords: Vec<String>) {
        self.entries.insert(category, keywords);
    }

    pub fn push(&mut self, category: KeywordCategory, keyword: String) {
        self.entries.entry(category).or_default().push(keyword);
    }

    pub fn iter(&self) -> impl Iterator<Item = (KeywordCategory, &[String])> {
        self.entries.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// Total keyword count across all categories.
    pub fn total_len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Flatten into a single list in infusion priority order, dropping
    /// case-insensitive duplicates across categories.
    pub fn flattened(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut flattened = Vec::new();
        for category in KeywordCategory::infusion_priority() {
            for keyword in self.get(category) {
                if seen.insert(keyword.to_lowercase()) {
                    flattened.push(keyword.clone());
                }
            }
        }
        flattened
    }
}

impl Default for KeywordMap {
    fn default() -> Self {
        Self::new()
    }
}

// Deserialization repopulates any category the payload omitted so the
// always-present guarantee survives a round trip.
impl<'de> Deserialize<'de> for KeywordMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = BTreeMap::<KeywordCategory, Vec<String>>::deserialize(deserializer)?;
        let mut map = KeywordMap::new();
        for (category, keywords) in entries {
            map.set(category, keywords);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_has_every_category() {
        let map = KeywordMap::new();
        for category in KeywordCategory::all() {
            assert!(map.get(category).is_empty());
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_flattened_priority_and_dedup() {
        let mut map = KeywordMap::new();
        map.set(
            KeywordCategory::SoftSkills,
            vec!["Communication".to_string()],
        );
        map.set(
            KeywordCategory::ProgrammingLanguages,
            vec!["Python".to_string(), "SQL".to_string()],
        );
        map.set(
            KeywordCategory::TechnicalSkills,
            vec!["Data Analysis".to_string(), "python".to_string()],
        );

        let flat = map.flattened();
        // Technical skills lead, soft skills trail, "python" collapses.
        assert_eq!(
            flat,
            vec!["Data Analysis", "python", "SQL", "Communication"]
        );
    }

    #[test]
    fn test_from_header_variants() {
        assert_eq!(
            KeywordCategory::from_header("Technical Skills:"),
            Some(KeywordCategory::TechnicalSkills)
        );
        assert_eq!(
            KeywordCategory::from_header("**Programming Knowledge**"),
            Some(KeywordCategory::ProgrammingLanguages)
        );
        assert_eq!(
            KeywordCategory::from_header("cloud_technologies"),
            Some(KeywordCategory::CloudTechnologies)
        );
        assert_eq!(KeywordCategory::from_header("Benefits"), None);
    }

    #[test]
    fn test_serde_round_trip_restores_missing_categories() {
        let json = r#"{"technical_skills": ["ETL"], "soft_skills": ["Teamwork"]}"#;
        let map: KeywordMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.get(KeywordCategory::TechnicalSkills), ["ETL"]);
        assert_eq!(map.get(KeywordCategory::SoftSkills), ["Teamwork"]);
        for category in [
            KeywordCategory::ProgrammingLanguages,
            KeywordCategory::TechnicalTools,
            KeywordCategory::DataTools,
            KeywordCategory::CloudTechnologies,
        ] {
            assert!(map.get(category).is_empty());
        }

        let serialized = serde_json::to_string(&map).unwrap();
        let restored: KeywordMap = serde_json::from_str(&serialized).unwrap();
        assert_eq!(map, restored);
    }
}
