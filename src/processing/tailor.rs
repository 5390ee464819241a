//! Entry rewriting against a job description, with anchor preservation

use crate::config::TailoringConfig;
use crate::llm::generator::TextGenerator;
use crate::llm::prompts::PromptTemplates;
use crate::processing::keywords::KeywordMap;
use crate::processing::normalizer::is_term_contained;
use crate::processing::sections::SectionEntry;
use std::collections::HashSet;

/// Rewrites experience and project descriptions one entry at a time.
///
/// Anchors never change: the rewrite prompt receives only the description,
/// and the rewritten text is spliced back with `SectionEntry::with_description`,
/// which keeps the anchor bytes and the entry representation intact.
pub struct SectionTailor {
    templates: PromptTemplates,
    min_generated_len: usize,
}

impl SectionTailor {
    pub fn new(config: &TailoringConfig) -> Self {
        Self {
            templates: PromptTemplates::default(),
            min_generated_len: config.min_generated_len,
        }
    }

    /// Rewrite each entry's description. Entries whose anchor cannot be
    /// isolated, and entries whose rewrite fails or comes back degenerate,
    /// pass through untouched. `used_keywords` accumulates across calls so
    /// later entries favor keywords no earlier entry absorbed.
    pub async fn tailor_entries<G: TextGenerator>(
        &self,
        generator: &G,
        entries: &[SectionEntry],
        keywords: &KeywordMap,
        job_description: &str,
        used_keywords: &mut HashSet<String>,
        escalated: bool,
    ) -> Vec<SectionEntry> {
        let mut tailored = Vec::with_capacity(entries.len());
        for entry in entries {
            let rewritten = self
                .tailor_entry(
                    generator,
                    entry,
                    keywords,
                    job_description,
                    used_keywords,
                    escalated,
                )
                .await;
            tailored.push(rewritten);
        }
        tailored
    }

    async fn tailor_entry<G: TextGenerator>(
        &self,
        generator: &G,
        entry: &SectionEntry,
        keywords: &KeywordMap,
        job_description: &str,
        used_keywords: &mut HashSet<String>,
        escalated: bool,
    ) -> SectionEntry {
        let Some((anchor, description)) = entry.parts() else {
            return entry.clone();
        };
        if description.trim().is_empty() {
            return entry.clone();
        }

        let candidates = order_candidates(keywords, used_keywords);
        let prompt = self.templates.render_rewrite(
            &anchor,
            &description,
            &candidates,
            job_description,
            escalated,
        );

        match generator.generate(&prompt).await {
            Ok(response) => {
                let cleaned = clean_generated_description(&response, &anchor);
                if cleaned.chars().count() < self.min_generated_len {
                    log::debug!(
                        "rewrite for '{}' came back too short, keeping original",
                        anchor
                    );
                    entry.clone()
                } else {
                    mark_used(&cleaned, &candidates, used_keywords);
                    entry.with_description(&cleaned)
                }
            }
            Err(e) => {
                log::warn!("rewrite for '{}' failed ({}), keeping original", anchor, e);
                entry.clone()
            }
        }
    }
}

/// Flattened keyword list with keywords no entry has used yet moved to the
/// front, relative order preserved on both sides.
fn order_candidates(keywords: &KeywordMap, used: &HashSet<String>) -> Vec<String> {
    let (mut unused, already): (Vec<String>, Vec<String>) = keywords
        .flattened()
        .into_iter()
        .partition(|keyword| !used.contains(&keyword.to_lowercase()));
    unused.extend(already);
    unused
}

/// Record which candidates actually appear in the rewritten description.
fn mark_used(description: &str, candidates: &[String], used: &mut HashSet<String>) {
    let text = description.to_lowercase();
    for candidate in candidates {
        let lowered = candidate.to_lowercase();
        if text == lowered || is_term_contained(&lowered, &text) {
            used.insert(lowered);
        }
    }
}

/// Reduce a generator response to the bare description: drop an echoed
/// section marker and code fences, flatten to one line, strip wrapping
/// quotes and a restated "Anchor:" prefix.
fn clean_generated_description(response: &str, anchor: &str) -> String {
    let lines: Vec<&str> = response.lines().collect();
    let start = lines
        .iter()
        .rposition(|line| line.to_lowercase().contains("rewritten description"))
        .map(|index| index + 1)
        .unwrap_or(0);

    let joined = lines[start..]
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .collect::<Vec<_>>()
        .join(" ");

    let unquoted = joined.trim().trim_matches('"').trim();
    let without_echo = strip_anchor_echo(unquoted, anchor);
    without_echo.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_anchor_echo<'a>(text: &'a str, anchor: &str) -> &'a str {
    let prefix = anchor.trim();
    if prefix.is_empty() || text.len() <= prefix.len() {
        return text;
    }
    if text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
        && text[prefix.len()..].starts_with(':')
    {
        return text[prefix.len() + 1..].trim_start();
    }
    text
}
