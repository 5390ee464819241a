//! Prompt templates for keyword extraction and entry rewriting

/// Template set used by the extraction and tailoring stages. Placeholders
/// are substituted with `.replace`, no templating engine involved.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub extraction: String,
    pub rewrite: String,
    pub escalated_rewrite: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            extraction: EXTRACTION_TEMPLATE.to_string(),
            rewrite: REWRITE_TEMPLATE.to_string(),
            escalated_rewrite: ESCALATED_REWRITE_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_extraction(&self, job_description: &str, max_per_category: usize) -> String {
        self.extraction
            .replace("{max_keywords}", &max_per_category.to_string())
            .replace("{job}", &truncate(job_description, MAX_JOB_CHARS))
    }

    pub fn render_rewrite(
        &self,
        anchor: &str,
        description: &str,
        keywords: &[String],
        job_description: &str,
        escalated: bool,
    ) -> String {
        let template = if escalated {
            &self.escalated_rewrite
        } else {
            &self.rewrite
        };
        template
            .replace("{anchor}", anchor)
            .replace("{keywords}", &keywords.join(", "))
            .replace("{job}", &truncate(job_description, MAX_JOB_CHARS))
            .replace("{description}", description)
    }
}

const MAX_JOB_CHARS: usize = 4000;

/// Trim overlong input so prompts stay inside the generator's context.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

const EXTRACTION_TEMPLATE: &str = r#"TASK: Extract the most important keywords from the job description below.

Group them into exactly these categories:
- technical_skills
- soft_skills
- programming_languages
- technical_tools
- data_tools
- cloud_technologies

Return a JSON object whose keys are the category names and whose values are
arrays of short keyword strings, at most {max_keywords} per category. Use an
empty array for categories the job description does not cover. Return only
the JSON object, no commentary.

### JOB DESCRIPTION ###
{job}"#;

const REWRITE_TEMPLATE: &str = r#"TASK: Rewrite a resume entry description so it aligns with the target job.

### GUIDELINES ###
- The description belongs to the entry "{anchor}". Do not restate or alter that name; return only the description text.
- Weave in these keywords where they fit naturally: {keywords}
- Be specific, and quantitative where the original supports it.
- Stay factually consistent with the current description; invent nothing.
- Write one to three sentences of plain text, no bullet points or headers.
- The result must be meaningfully different from the current description.

### JOB DESCRIPTION ###
{job}

### CURRENT DESCRIPTION ###
{description}

### REWRITTEN DESCRIPTION ###"#;

const ESCALATED_REWRITE_TEMPLATE: &str = r#"TASK: Rewrite a resume entry description so it aligns with the target job. A previous rewrite changed too little; this one must differ substantially.

### GUIDELINES ###
- The description belongs to the entry "{anchor}". Do not restate or alter that name; return only the description text.
- Restructure the sentences entirely. Reusing the original phrasing is not acceptable.
- Weave in these keywords where they fit naturally: {keywords}
- Be specific, and quantitative where the original supports it.
- Stay factually consistent with the current description; invent nothing.
- Write one to three sentences of plain text, no bullet points or headers.

### JOB DESCRIPTION ###
{job}

### CURRENT DESCRIPTION ###
{description}

### REWRITTEN DESCRIPTION ###"#;
