//! Integration tests for the resume tailor

use resume_tailor::config::{Config, OutputFormat};
use resume_tailor::error::{PipelineError, Result};
use resume_tailor::input::file_detector::FileType;
use resume_tailor::input::manager::InputManager;
use resume_tailor::llm::generator::TextGenerator;
use resume_tailor::output::renderer::RenderManager;
use resume_tailor::processing::pipeline::TailoringPipeline;
use resume_tailor::processing::sections::{ResumeSections, SectionEntry};
use std::future::Future;
use std::path::Path;

/// Answers extraction prompts with canned JSON and every rewrite prompt
/// with canned prose, the shapes a live endpoint returns.
struct CannedGenerator;

impl TextGenerator for CannedGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        let response = if prompt.contains("Extract the most important keywords") {
            concat!(
                r#"{"technical_skills": ["Data Warehousing"], "soft_skills": ["Communication"], "#,
                r#""programming_languages": ["Python", "SQL"], "technical_tools": ["Tableau"], "#,
                r#""data_tools": ["ETL"], "cloud_technologies": ["AWS"]}"#
            )
            .to_string()
        } else {
            "Built and automated SQL and Python reporting pipelines on AWS for finance stakeholders"
                .to_string()
        };
        async move { Ok(response) }
    }
}

/// Fails every call, simulating an unreachable endpoint.
struct OfflineGenerator;

impl TextGenerator for OfflineGenerator {
    fn generate(&self, _prompt: &str) -> impl Future<Output = Result<String>> + Send {
        async move {
            Err(PipelineError::Generation(
                "endpoint unreachable".to_string(),
            ))
        }
    }
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("SQL"));
    assert!(text.contains("Acme Corp"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("Jane Smith"));
    assert!(text.contains("SQL"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    // First extraction
    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // Second extraction should use cache
    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.xyz");
    std::fs::write(&path, "some resume text").unwrap();

    let mut manager = InputManager::new();
    let result = manager.extract_text(&path).await;
    assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
}

#[tokio::test]
async fn test_pipeline_tailors_text_resume_end_to_end() {
    let resume_text = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let job_text = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();

    let pipeline = TailoringPipeline::new(CannedGenerator, &Config::default());
    let result = pipeline
        .run_with_result(&resume_text, &job_text)
        .await
        .unwrap();

    assert_eq!(result.sections.name, "Jane Smith");

    // Extracted keywords joined the skills list alongside the originals.
    let skills = &result.sections.skills;
    assert!(skills.contains(&"Excel".to_string()));
    assert!(skills.contains(&"Python".to_string()));
    assert!(skills.contains(&"AWS".to_string()));

    // Descriptions were rewritten, anchors were not.
    let (anchor, description) = result.sections.experience[0].parts().unwrap();
    assert_eq!(anchor, "Acme Corp - Data Analyst");
    assert_ne!(description, "Built weekly revenue reports for the finance team");
    assert!(description.contains("SQL"));

    assert!(!result.escalated);
    assert!(result.change_ratio > 0.0);
}

#[tokio::test]
async fn test_pipeline_degrades_when_generator_is_offline() {
    let resume_text = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let job_text = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();

    let pipeline = TailoringPipeline::new(OfflineGenerator, &Config::default());
    let result = pipeline
        .run_with_result(&resume_text, &job_text)
        .await
        .unwrap();

    // Keywords came from statistical extraction over the job text.
    assert!(!result.keywords.is_empty());

    // Every rewrite failed, so entries pass through byte-identical.
    assert_eq!(
        result.sections.experience[0],
        SectionEntry::Flat(
            "Acme Corp - Data Analyst: Built weekly revenue reports for the finance team"
                .to_string()
        )
    );
}

#[tokio::test]
async fn test_structured_json_resume_flows_through_pipeline() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.json");
    assert_eq!(manager.detect_file_type(path).unwrap(), FileType::Json);

    let raw = manager.extract_text(path).await.unwrap();
    let sections: ResumeSections = serde_json::from_str(&raw).unwrap();
    let job_text = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();

    let pipeline = TailoringPipeline::new(CannedGenerator, &Config::default());
    let result = pipeline.tailor_sections(sections, &job_text).await.unwrap();

    match &result.sections.experience[0] {
        SectionEntry::Structured {
            anchor,
            description,
            dates,
        } => {
            assert_eq!(anchor, "Acme Corp - Data Analyst");
            assert_eq!(dates.as_deref(), Some("2019-2023"));
            assert!(description.contains("SQL"));
        }
        SectionEntry::Flat(_) => panic!("structured entry lost its shape"),
    }
    assert!(matches!(
        result.sections.experience[1],
        SectionEntry::Flat(_)
    ));
}

#[test]
fn test_render_manager_writes_markdown_output() {
    let raw = std::fs::read_to_string("tests/fixtures/sample_resume.json").unwrap();
    let sections: ResumeSections = serde_json::from_str(&raw).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("resume_tailored.md");
    let written = RenderManager::new()
        .write(&sections, &target, OutputFormat::Markdown)
        .unwrap();

    assert_eq!(written, target);
    let content = std::fs::read_to_string(&target).unwrap();
    assert!(content.starts_with("# Jane Smith"));
    assert!(content.contains("## Experience"));
    assert!(content.contains("- **Acme Corp - Data Analyst** (2019-2023):"));
}
