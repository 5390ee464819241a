//! Pipeline orchestration: extract, infuse, tailor, verify

use crate::config::Config;
use crate::error::Result;
use crate::llm::generator::TextGenerator;
use crate::processing::extractor::KeywordExtractor;
use crate::processing::infuser::SkillInfuser;
use crate::processing::keywords::KeywordMap;
use crate::processing::sections::{ResumeParser, ResumeSections};
use crate::processing::tailor::SectionTailor;
use crate::processing::verifier::ModificationVerifier;
use std::collections::HashSet;

/// Final sections plus the run metadata the CLI reports. The metadata is
/// informational; only `sections` feeds rendering.
#[derive(Debug)]
pub struct TailoringResult {
    pub sections: ResumeSections,
    pub keywords: KeywordMap,
    pub infused_skills: Vec<String>,
    pub change_ratio: f64,
    pub escalated: bool,
}

/// Runs the full tailoring sequence against one resume and job
/// description. Stateless across runs; every `run` starts fresh.
///
/// Generation failures never surface: extraction and rewriting degrade
/// per entry. The only errors reported are structural ones, raised when
/// the resume input itself is unusable.
pub struct TailoringPipeline<G: TextGenerator> {
    generator: G,
    parser: ResumeParser,
    extractor: KeywordExtractor,
    infuser: SkillInfuser,
    tailor: SectionTailor,
    verifier: ModificationVerifier,
}

impl<G: TextGenerator> TailoringPipeline<G> {
    pub fn new(generator: G, config: &Config) -> Self {
        Self {
            generator,
            parser: ResumeParser::new(),
            extractor: KeywordExtractor::new(&config.tailoring),
            infuser: SkillInfuser::new(&config.tailoring),
            tailor: SectionTailor::new(&config.tailoring),
            verifier: ModificationVerifier::new(&config.tailoring),
        }
    }

    /// Parse resume text and tailor it against the job description.
    pub async fn run(&self, resume_text: &str, job_description: &str) -> Result<ResumeSections> {
        let result = self.run_with_result(resume_text, job_description).await?;
        Ok(result.sections)
    }

    /// Like `run`, but returns the run metadata along with the sections.
    pub async fn run_with_result(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<TailoringResult> {
        let sections = self.parser.parse(resume_text)?;
        self.tailor_sections(sections, job_description).await
    }

    /// Tailor already-parsed sections. Entry point for structured (JSON)
    /// resume input that never passes through the text parser.
    pub async fn tailor_sections(
        &self,
        mut sections: ResumeSections,
        job_description: &str,
    ) -> Result<TailoringResult> {
        let original = sections.clone();

        let keywords = self
            .extractor
            .extract(&self.generator, job_description)
            .await;
        log::info!(
            "extracted {} keywords from the job description",
            keywords.total_len()
        );

        let infused_skills = self.infuser.infuse(&mut sections.skills, &keywords);
        if !infused_skills.is_empty() {
            log::info!("infused {} new skills", infused_skills.len());
        }

        let mut used_keywords = HashSet::new();
        self.rewrite_sections(&mut sections, &keywords, job_description, &mut used_keywords, false)
            .await;

        let mut escalated = false;
        if !self.verifier.is_sufficiently_modified(&original, &sections) {
            log::info!(
                "change ratio {:.2} below threshold, escalating rewrite",
                self.verifier.change_ratio(&original, &sections)
            );
            escalated = true;
            // One escalated pass over the already-tailored sections, then
            // accept the outcome either way. No retry loop.
            self.rewrite_sections(&mut sections, &keywords, job_description, &mut used_keywords, true)
                .await;
        }

        let change_ratio = self.verifier.change_ratio(&original, &sections);
        log::info!("tailoring finished with change ratio {:.2}", change_ratio);

        Ok(TailoringResult {
            sections,
            keywords,
            infused_skills,
            change_ratio,
            escalated,
        })
    }

    async fn rewrite_sections(
        &self,
        sections: &mut ResumeSections,
        keywords: &KeywordMap,
        job_description: &str,
        used_keywords: &mut HashSet<String>,
        escalated: bool,
    ) {
        let experience = self
            .tailor
            .tailor_entries(
                &self.generator,
                &sections.experience,
                keywords,
                job_description,
                used_keywords,
                escalated,
            )
            .await;
        sections.experience = experience;

        let projects = self
            .tailor
            .tailor_entries(
                &self.generator,
                &sections.projects,
                keywords,
                job_description,
                used_keywords,
                escalated,
            )
            .await;
        sections.projects = projects;
    }
}
