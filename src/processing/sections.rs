//! Structured resume representation and resume text parsing

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};

/// One experience or project entry.
///
/// Flat entries keep the single-string `"anchor: description"` shape they
/// were parsed from; structured entries carry explicit fields. The
/// pipeline reads both, and writes back in whichever representation the
/// entry arrived in. The anchor is never altered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionEntry {
    Structured {
        anchor: String,
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dates: Option<String>,
    },
    Flat(String),
}

impl SectionEntry {
    pub fn flat(raw: impl Into<String>) -> Self {
        SectionEntry::Flat(raw.into())
    }

    pub fn structured(anchor: impl Into<String>, description: impl Into<String>) -> Self {
        SectionEntry::Structured {
            anchor: anchor.into(),
            description: description.into(),
            dates: None,
        }
    }

    /// Split into (anchor, description). Flat entries split at the first
    /// colon; a flat entry with no colon returns None because its anchor
    /// cannot be isolated safely.
    pub fn parts(&self) -> Option<(String, String)> {
        match self {
            SectionEntry::Structured {
                anchor,
                description,
                ..
            } => Some((anchor.clone(), description.clone())),
            SectionEntry::Flat(raw) => raw
                .split_once(':')
                .map(|(anchor, description)| (anchor.to_string(), description.trim().to_string())),
        }
    }

    /// Rebuild the entry with a new description, preserving representation
    /// and keeping the anchor bytes untouched. For a flat entry without a
    /// colon this returns an unchanged clone.
    pub fn with_description(&self, new_description: &str) -> SectionEntry {
        match self {
            SectionEntry::Structured { anchor, dates, .. } => SectionEntry::Structured {
                anchor: anchor.clone(),
                description: new_description.to_string(),
                dates: dates.clone(),
            },
            SectionEntry::Flat(raw) => match raw.split_once(':') {
                Some((anchor, _)) => {
                    SectionEntry::Flat(format!("{}: {}", anchor, new_description.trim()))
                }
                None => self.clone(),
            },
        }
    }

    /// Single-line form used for rendering and console output.
    pub fn display_line(&self) -> String {
        match self {
            SectionEntry::Structured {
                anchor,
                description,
                dates: Some(dates),
            } => format!("{} ({}): {}", anchor, dates, description),
            SectionEntry::Structured {
                anchor,
                description,
                dates: None,
            } => format!("{}: {}", anchor, description),
            SectionEntry::Flat(raw) => raw.clone(),
        }
    }
}

/// Parsed resume content, one field per recognized section. Constructed
/// once per run, mutated through the pipeline, then rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<SectionEntry>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub projects: Vec<SectionEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl ResumeSections {
    /// True when nothing at all was recovered from the input.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.summary.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.projects.is_empty()
            && self.certifications.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
}

/// Header synonyms checked against whole lines (case-insensitive, trailing
/// colon ignored).
const SECTION_HEADERS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &["summary", "professional summary", "objective", "profile", "about", "overview"],
    ),
    (
        SectionKind::Skills,
        &["skills", "technical skills", "core competencies", "expertise"],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "employment history",
            "career",
        ],
    ),
    (
        SectionKind::Education,
        &["education", "academic background", "qualifications"],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "portfolio", "notable projects"],
    ),
    (
        SectionKind::Certifications,
        &["certifications", "certificates", "licenses"],
    ),
];

/// Parses raw extracted resume text into `ResumeSections` by scanning for
/// section header lines.
pub struct ResumeParser;

impl ResumeParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse resume text. Blank input is a structural error; text without
    /// recognizable headers degrades to a name line plus summary content.
    pub fn parse(&self, text: &str) -> Result<ResumeSections> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyResume(
                "no text extracted from resume".to_string(),
            ));
        }

        let mut sections = ResumeSections::default();
        let mut current: Option<SectionKind> = None;

        for raw_line in text.lines() {
            let line = clean_line(raw_line);
            if line.is_empty() {
                continue;
            }

            if let Some(kind) = detect_header(&line) {
                current = Some(kind);
                continue;
            }

            match current {
                Some(SectionKind::Summary) => sections.summary.push(line),
                Some(SectionKind::Skills) => {
                    sections.skills.extend(split_skill_line(&line));
                }
                Some(SectionKind::Experience) => {
                    sections.experience.push(SectionEntry::Flat(strip_bullet(&line)));
                }
                Some(SectionKind::Projects) => {
                    sections.projects.push(SectionEntry::Flat(strip_bullet(&line)));
                }
                Some(SectionKind::Education) => sections.education.push(strip_bullet(&line)),
                Some(SectionKind::Certifications) => {
                    sections.certifications.push(strip_bullet(&line))
                }
                None => {
                    // Text before any header: first line is the name, the
                    // rest accumulates as summary.
                    if sections.name.is_empty() {
                        sections.name = line;
                    } else {
                        sections.summary.push(line);
                    }
                }
            }
        }

        if sections.is_empty() {
            return Err(PipelineError::UnparseableResume(
                "no recognizable content in resume text".to_string(),
            ));
        }

        Ok(sections)
    }
}

impl Default for ResumeParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip non-printable characters, keep the line's visible text.
fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn detect_header(line: &str) -> Option<SectionKind> {
    let normalized = line.trim().trim_end_matches(':').trim().to_lowercase();
    for (kind, synonyms) in SECTION_HEADERS {
        if synonyms.iter().any(|synonym| normalized == *synonym) {
            return Some(*kind);
        }
    }
    None
}

/// Skills lines arrive as comma or bullet separated lists.
fn split_skill_line(line: &str) -> Vec<String> {
    strip_bullet(line)
        .split(&[',', ';', '|'][..])
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn strip_bullet(line: &str) -> String {
    line.trim_start_matches(['•', '-', '*', '·', '◦'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
Jane Smith

Summary
Data analyst with five years of reporting experience.

Skills
SQL, Excel, Data Visualization
• Communication

Experience
Acme Corp: Built reports for the finance team
Initech - Data Analyst: Maintained dashboards

Projects
Churn Model: Predicted customer churn with logistic regression

Education
B.S. Statistics, State University

Certifications
• AWS Certified Cloud Practitioner
";

    #[test]
    fn test_parse_sectioned_resume() {
        let parser = ResumeParser::new();
        let sections = parser.parse(SAMPLE_RESUME).unwrap();

        assert_eq!(sections.name, "Jane Smith");
        assert_eq!(
            sections.summary,
            vec!["Data analyst with five years of reporting experience."]
        );
        assert_eq!(
            sections.skills,
            vec!["SQL", "Excel", "Data Visualization", "Communication"]
        );
        assert_eq!(sections.experience.len(), 2);
        assert_eq!(
            sections.experience[0],
            SectionEntry::Flat("Acme Corp: Built reports for the finance team".to_string())
        );
        assert_eq!(sections.projects.len(), 1);
        assert_eq!(sections.education, vec!["B.S. Statistics, State University"]);
        assert_eq!(
            sections.certifications,
            vec!["AWS Certified Cloud Practitioner"]
        );
    }

    #[test]
    fn test_parse_headerless_text_degrades_to_summary() {
        let parser = ResumeParser::new();
        let sections = parser
            .parse("John Doe\nBuilt data pipelines at a startup.\nLed a team of three.")
            .unwrap();

        assert_eq!(sections.name, "John Doe");
        assert_eq!(sections.summary.len(), 2);
        assert!(sections.experience.is_empty());
    }

    #[test]
    fn test_parse_blank_text_is_structural_error() {
        let parser = ResumeParser::new();
        let err = parser.parse("   \n  \n").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_entry_parts_and_reassembly() {
        let flat = SectionEntry::flat("Acme Corp: Built reports");
        let (anchor, description) = flat.parts().unwrap();
        assert_eq!(anchor, "Acme Corp");
        assert_eq!(description, "Built reports");

        let rewritten = flat.with_description("Delivered SQL reporting");
        assert_eq!(
            rewritten,
            SectionEntry::Flat("Acme Corp: Delivered SQL reporting".to_string())
        );
    }

    #[test]
    fn test_flat_entry_without_colon_is_untouchable() {
        let entry = SectionEntry::flat("Freelance consulting work");
        assert!(entry.parts().is_none());
        assert_eq!(entry.with_description("anything"), entry);
    }

    #[test]
    fn test_structured_entry_keeps_dates() {
        let entry = SectionEntry::Structured {
            anchor: "Acme Corp - Analyst".to_string(),
            description: "Built reports".to_string(),
            dates: Some("2020-2023".to_string()),
        };

        let rewritten = entry.with_description("Automated ETL reporting");
        match rewritten {
            SectionEntry::Structured {
                anchor,
                description,
                dates,
            } => {
                assert_eq!(anchor, "Acme Corp - Analyst");
                assert_eq!(description, "Automated ETL reporting");
                assert_eq!(dates.as_deref(), Some("2020-2023"));
            }
            SectionEntry::Flat(_) => panic!("representation changed"),
        }
    }

    #[test]
    fn test_serde_round_trip_preserves_entry_shapes() {
        let json = r#"{
            "skills": ["SQL"],
            "experience": [
                "Acme Corp: Built reports",
                {"anchor": "Initech", "description": "Maintained dashboards", "dates": "2019"}
            ]
        }"#;

        let sections: ResumeSections = serde_json::from_str(json).unwrap();
        assert_eq!(sections.skills, vec!["SQL"]);
        assert!(matches!(sections.experience[0], SectionEntry::Flat(_)));
        assert!(matches!(
            sections.experience[1],
            SectionEntry::Structured { .. }
        ));

        let serialized = serde_json::to_string(&sections).unwrap();
        let restored: ResumeSections = serde_json::from_str(&serialized).unwrap();
        assert_eq!(sections, restored);
    }

    #[test]
    fn test_display_line_forms() {
        assert_eq!(
            SectionEntry::flat("Acme Corp: Built reports").display_line(),
            "Acme Corp: Built reports"
        );
        let structured = SectionEntry::Structured {
            anchor: "Initech".to_string(),
            description: "Maintained dashboards".to_string(),
            dates: Some("2019".to_string()),
        };
        assert_eq!(structured.display_line(), "Initech (2019): Maintained dashboards");
    }
}
