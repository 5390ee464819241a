//! Tiered keyword extraction from job descriptions
//!
//! Extraction tries the text generator first and degrades through parsing
//! strategies down to statistical analysis. It never fails: every path
//! ends in a complete `KeywordMap`.

use crate::config::TailoringConfig;
use crate::llm::generator::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use crate::processing::keywords::{KeywordCategory, KeywordMap};
use crate::processing::normalizer::KeywordNormalizer;
use crate::processing::statistical::StatisticalExtractor;

/// Generic analyst-profile keywords returned when the job description is
/// too short to say anything meaningful.
const FALLBACK_KEYWORDS: &[(KeywordCategory, &[&str])] = &[
    (
        KeywordCategory::TechnicalSkills,
        &["Data Analysis", "Reporting", "Dashboards"],
    ),
    (KeywordCategory::SoftSkills, &["Communication", "Problem Solving"]),
    (KeywordCategory::ProgrammingLanguages, &["SQL", "Python"]),
    (KeywordCategory::TechnicalTools, &["Excel", "Tableau"]),
    (KeywordCategory::DataTools, &["ETL", "Data Warehousing"]),
    (KeywordCategory::CloudTechnologies, &["AWS"]),
];

/// Extracts categorized keywords from a job description.
pub struct KeywordExtractor {
    templates: PromptTemplates,
    statistical: StatisticalExtractor,
    normalizer: KeywordNormalizer,
    max_per_category: usize,
    min_job_len: usize,
}

impl KeywordExtractor {
    pub fn new(config: &TailoringConfig) -> Self {
        Self {
            templates: PromptTemplates::default(),
            statistical: StatisticalExtractor::new(),
            normalizer: KeywordNormalizer::new(),
            max_per_category: config.max_keywords_per_category,
            min_job_len: config.min_job_len,
        }
    }

    /// Extract keywords, degrading through strategies on failure:
    /// generator response parsed as JSON, then as labeled lines, then
    /// statistical extraction over the job text itself. Short job
    /// descriptions skip the generator entirely.
    pub async fn extract<G: TextGenerator>(&self, generator: &G, job_description: &str) -> KeywordMap {
        let job = job_description.trim();
        if job.chars().count() < self.min_job_len {
            log::debug!(
                "job description below {} chars, using fallback keywords",
                self.min_job_len
            );
            return self.finalize(fallback_keywords());
        }

        let prompt = self.templates.render_extraction(job, self.max_per_category);
        match generator.generate(&prompt).await {
            Ok(response) => match parse_keyword_response(&response) {
                Some(map) => self.finalize(map),
                None => {
                    log::warn!("keyword response unparseable, falling back to statistical extraction");
                    self.finalize(self.statistical.extract(job))
                }
            },
            Err(e) => {
                log::warn!("keyword generation failed ({}), falling back to statistical extraction", e);
                self.finalize(self.statistical.extract(job))
            }
        }
    }

    /// Cap each category and normalize its terms. The map stays complete.
    fn finalize(&self, map: KeywordMap) -> KeywordMap {
        let mut finalized = KeywordMap::new();
        for (category, keywords) in map.iter() {
            let capped: Vec<String> = keywords
                .iter()
                .take(self.max_per_category)
                .cloned()
                .collect();
            finalized.set(category, self.normalizer.normalize(&capped));
        }
        finalized
    }
}

/// Keyword map used when the job description carries too little signal.
pub fn fallback_keywords() -> KeywordMap {
    let mut map = KeywordMap::new();
    for (category, keywords) in FALLBACK_KEYWORDS {
        map.set(
            *category,
            keywords.iter().map(|k| k.to_string()).collect(),
        );
    }
    map
}

/// A strategy for reading a keyword map out of generator output. Parsers
/// are tried in order; returning None hands off to the next one.
trait ResponseParser {
    fn parse(&self, response: &str) -> Option<KeywordMap>;
}

fn parse_keyword_response(response: &str) -> Option<KeywordMap> {
    let parsers: [&dyn ResponseParser; 2] = [&JsonResponseParser, &LineResponseParser];
    parsers.iter().find_map(|parser| parser.parse(response))
}

/// Reads the first balanced JSON object out of the response, tolerating
/// markdown code fences and prose around the object.
struct JsonResponseParser;

impl ResponseParser for JsonResponseParser {
    fn parse(&self, response: &str) -> Option<KeywordMap> {
        let cleaned = without_code_fences(response);
        let block = extract_json_object(&cleaned)?;
        let value: serde_json::Value = serde_json::from_str(block).ok()?;
        let object = value.as_object()?;

        let mut map = KeywordMap::new();
        for (key, value) in object {
            let Some(category) = KeywordCategory::from_header(key) else {
                continue;
            };
            for term in value_to_terms(value) {
                map.push(category, term);
            }
        }

        if map.is_empty() {
            None
        } else {
            Some(map)
        }
    }
}

/// Reads "Category: a, b, c" style responses, with the category either on
/// its own line (possibly bold or numbered) or inline before a colon.
struct LineResponseParser;

impl ResponseParser for LineResponseParser {
    fn parse(&self, response: &str) -> Option<KeywordMap> {
        let mut map = KeywordMap::new();
        let mut current: Option<KeywordCategory> = None;

        for raw_line in response.lines() {
            let line = strip_list_decoration(raw_line);
            if line.is_empty() {
                continue;
            }

            // "Technical Skills: SQL, Python" carries both header and terms.
            if let Some((head, tail)) = line.split_once(':') {
                if let Some(category) = KeywordCategory::from_header(head) {
                    current = Some(category);
                    push_terms(&mut map, category, tail);
                    continue;
                }
            }

            if let Some(category) = KeywordCategory::from_header(&line) {
                current = Some(category);
                continue;
            }

            if let Some(category) = current {
                push_terms(&mut map, category, &line);
            }
        }

        if map.is_empty() {
            None
        } else {
            Some(map)
        }
    }
}

fn push_terms(map: &mut KeywordMap, category: KeywordCategory, text: &str) {
    for term in text.split(&[',', ';'][..]) {
        let term = term
            .trim()
            .trim_matches(|c: char| c == '"' || c == '*')
            .trim();
        if term.len() > 1 {
            map.push(category, term.to_string());
        }
    }
}

/// Drop code fence lines so fenced JSON parses like bare JSON.
fn without_code_fences(response: &str) -> String {
    response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Locate the first balanced `{ ... }` block, ignoring braces inside
/// string literals.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Accept both arrays of strings and a single comma-separated string.
fn value_to_terms(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        serde_json::Value::String(s) => s
            .split(&[',', ';'][..])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Remove bullet markers, numbering and markdown emphasis from a line.
fn strip_list_decoration(line: &str) -> String {
    let mut trimmed = line
        .trim()
        .trim_start_matches(['•', '-', '*', '·'])
        .trim_start();

    // "1. Technical Skills" style numbering.
    let after_digits = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if after_digits.len() < trimmed.len() {
        if let Some(rest) = after_digits.strip_prefix('.') {
            trimmed = rest.trim_start();
        }
    }

    trimmed.trim_end_matches('*').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, Result};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedGenerator {
        response: Result<String>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn replying(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                response: Err(PipelineError::Generation("scripted failure".to_string())),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn generate(&self, _prompt: &str) -> impl Future<Output = Result<String>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(PipelineError::Generation(e.to_string())),
            };
            async move { response }
        }
    }

    fn extractor() -> KeywordExtractor {
        KeywordExtractor::new(&TailoringConfig::default())
    }

    const JOB: &str = "We are hiring a data analyst with strong SQL and Python skills, \
                       experience with AWS, and excellent leadership and communication.";

    #[tokio::test]
    async fn test_short_job_uses_fallback_without_calling_generator() {
        let generator = ScriptedGenerator::replying("{}");
        let map = extractor().extract(&generator, "short").await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(map
            .get(KeywordCategory::ProgrammingLanguages)
            .contains(&"SQL".to_string()));
        for category in KeywordCategory::all() {
            assert!(!map.get(category).is_empty());
        }
    }

    #[tokio::test]
    async fn test_json_response_with_fences_and_prose() {
        let response = "Here are the keywords:\n```json\n{\n  \"technical_skills\": [\"Data Analysis\"],\n  \"programming_languages\": [\"Python\", \"SQL\"],\n  \"cloud_technologies\": \"AWS, GCP\"\n}\n```\nLet me know if you need more.";
        let generator = ScriptedGenerator::replying(response);
        let map = extractor().extract(&generator, JOB).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            map.get(KeywordCategory::TechnicalSkills),
            ["Data Analysis"]
        );
        assert_eq!(map.get(KeywordCategory::ProgrammingLanguages), ["Python", "SQL"]);
        assert_eq!(map.get(KeywordCategory::CloudTechnologies), ["AWS", "GCP"]);
        // Unmentioned categories stay present but empty.
        assert!(map.get(KeywordCategory::SoftSkills).is_empty());
    }

    #[tokio::test]
    async fn test_line_response_parsing() {
        let response = "**Technical Skills:**\n- Data Analysis\n- Reporting\n\n1. Programming Languages\nPython, SQL\n\nSoft Skills: Communication; Leadership";
        let generator = ScriptedGenerator::replying(response);
        let map = extractor().extract(&generator, JOB).await;

        assert_eq!(
            map.get(KeywordCategory::TechnicalSkills),
            ["Data Analysis", "Reporting"]
        );
        assert_eq!(map.get(KeywordCategory::ProgrammingLanguages), ["Python", "SQL"]);
        assert_eq!(
            map.get(KeywordCategory::SoftSkills),
            ["Communication", "Leadership"]
        );
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back_to_statistical() {
        let generator = ScriptedGenerator::replying("I cannot help with that request.");
        let map = extractor().extract(&generator, JOB).await;

        // Statistical extraction still finds the vocabulary terms in the job.
        assert!(map
            .get(KeywordCategory::ProgrammingLanguages)
            .contains(&"SQL".to_string()));
        assert!(map
            .get(KeywordCategory::CloudTechnologies)
            .contains(&"AWS".to_string()));
    }

    #[tokio::test]
    async fn test_generator_error_falls_back_to_statistical() {
        let generator = ScriptedGenerator::failing();
        let map = extractor().extract(&generator, JOB).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(map
            .get(KeywordCategory::ProgrammingLanguages)
            .contains(&"Python".to_string()));
    }

    #[tokio::test]
    async fn test_categories_are_capped() {
        let mut config = TailoringConfig::default();
        config.max_keywords_per_category = 2;
        let extractor = KeywordExtractor::new(&config);

        let response = r#"{"technical_skills": ["Data Analysis", "Reporting", "Dashboards", "Forecasting"]}"#;
        let generator = ScriptedGenerator::replying(response);
        let map = extractor.extract(&generator, JOB).await;

        assert_eq!(map.get(KeywordCategory::TechnicalSkills).len(), 2);
    }

    #[test]
    fn test_extract_json_object_ignores_braces_in_strings() {
        let text = r#"noise {"a": "value with } brace", "b": [1]} trailing"#;
        let block = extract_json_object(text).unwrap();
        assert_eq!(block, r#"{"a": "value with } brace", "b": [1]}"#);
    }

    #[test]
    fn test_fallback_map_is_complete() {
        let map = fallback_keywords();
        for category in KeywordCategory::all() {
            assert!(!map.get(category).is_empty());
        }
    }
}
