//! Renderers for the tailored resume - plain text, Markdown, JSON, HTML and PDF

use crate::config::OutputFormat;
use crate::error::{PipelineError, Result};
use crate::processing::sections::{ResumeSections, SectionEntry};
use askama::Template;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for rendering a tailored resume into one concrete format
pub trait ResumeRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>>;
    fn supports_format(&self) -> OutputFormat;
}

/// Sectioned plain text with underlined headers
pub struct TextRenderer;

/// Markdown document with bold entry anchors
pub struct MarkdownRenderer;

/// JSON serialization of the section structure
pub struct JsonRenderer {
    pretty: bool,
}

/// Standalone HTML page rendered through an Askama template
pub struct HtmlRenderer {
    include_styles: bool,
}

/// Single-column PDF built from the PDF base fonts
pub struct PdfRenderer;

/// Coordinates the per-format renderers and owns the plain-text
/// fallback chain for rich formats
pub struct RenderManager {
    text_renderer: TextRenderer,
    markdown_renderer: MarkdownRenderer,
    json_renderer: JsonRenderer,
    html_renderer: HtmlRenderer,
    pdf_renderer: PdfRenderer,
}

/// Askama template for HTML output
#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.5;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 40px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        h1 {
            text-align: center;
            margin: 0 0 24px 0;
            color: #212529;
        }
        .section {
            margin: 22px 0;
        }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 6px;
            font-size: 1.05em;
            text-transform: uppercase;
            letter-spacing: 1px;
        }
        .entry {
            margin: 12px 0;
        }
        .entry h3 {
            margin: 0 0 4px 0;
            color: #495057;
        }
        .entry p {
            margin: 0;
        }
        .dates {
            color: #6c757d;
            font-weight: normal;
            font-size: 0.9em;
        }
        ul {
            margin: 10px 0;
            padding-left: 22px;
        }
        li {
            margin: 4px 0;
        }
        .skills ul {
            padding-left: 0;
            list-style: none;
        }
        .skills li {
            display: inline-block;
            background: #f1f3f5;
            border-radius: 4px;
            padding: 3px 10px;
            margin: 3px;
        }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        {% if has_name %}
        <h1>{{ name }}</h1>
        {% endif %}

        {% if has_summary %}
        <div class="section">
            <h2>Summary</h2>
            {{ summary_html|safe }}
        </div>
        {% endif %}

        {% if has_skills %}
        <div class="section skills">
            <h2>Skills</h2>
            {{ skills_html|safe }}
        </div>
        {% endif %}

        {% if has_experience %}
        <div class="section">
            <h2>Experience</h2>
            {{ experience_html|safe }}
        </div>
        {% endif %}

        {% if has_education %}
        <div class="section">
            <h2>Education</h2>
            {{ education_html|safe }}
        </div>
        {% endif %}

        {% if has_projects %}
        <div class="section">
            <h2>Projects</h2>
            {{ projects_html|safe }}
        </div>
        {% endif %}

        {% if has_certifications %}
        <div class="section">
            <h2>Certifications</h2>
            {{ certifications_html|safe }}
        </div>
        {% endif %}
    </div>
</body>
</html>"#, ext = "html")]
struct ResumeTemplate {
    include_styles: bool,
    title: String,
    has_name: bool,
    name: String,
    has_summary: bool,
    summary_html: String,
    has_skills: bool,
    skills_html: String,
    has_experience: bool,
    experience_html: String,
    has_education: bool,
    education_html: String,
    has_projects: bool,
    projects_html: String,
    has_certifications: bool,
    certifications_html: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn push_header(out: &mut String, title: &str) {
        out.push_str(title);
        out.push('\n');
        out.push_str(&"-".repeat(title.len()));
        out.push('\n');
    }
}

impl ResumeRenderer for TextRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>> {
        let mut out = String::new();

        if !sections.name.is_empty() {
            out.push_str(&sections.name);
            out.push('\n');
            out.push_str(&"=".repeat(sections.name.chars().count()));
            out.push_str("\n\n");
        }

        if !sections.summary.is_empty() {
            Self::push_header(&mut out, "SUMMARY");
            for line in &sections.summary {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        if !sections.skills.is_empty() {
            Self::push_header(&mut out, "SKILLS");
            for skill in &sections.skills {
                out.push_str(&format!("• {}\n", skill));
            }
            out.push('\n');
        }

        if !sections.experience.is_empty() {
            Self::push_header(&mut out, "EXPERIENCE");
            for entry in &sections.experience {
                out.push_str(&format!("• {}\n", entry.display_line()));
            }
            out.push('\n');
        }

        if !sections.education.is_empty() {
            Self::push_header(&mut out, "EDUCATION");
            for line in &sections.education {
                out.push_str(&format!("• {}\n", line));
            }
            out.push('\n');
        }

        if !sections.projects.is_empty() {
            Self::push_header(&mut out, "PROJECTS");
            for entry in &sections.projects {
                out.push_str(&format!("• {}\n", entry.display_line()));
            }
            out.push('\n');
        }

        if !sections.certifications.is_empty() {
            Self::push_header(&mut out, "CERTIFICATIONS");
            for line in &sections.certifications {
                out.push_str(&format!("• {}\n", line));
            }
            out.push('\n');
        }

        Ok(out.into_bytes())
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    fn markdown_entry(entry: &SectionEntry) -> String {
        match entry {
            SectionEntry::Structured {
                anchor,
                description,
                dates: Some(dates),
            } => format!("- **{}** ({}): {}", anchor, dates, description),
            SectionEntry::Structured {
                anchor,
                description,
                dates: None,
            } => format!("- **{}**: {}", anchor, description),
            SectionEntry::Flat(raw) => match raw.split_once(':') {
                Some((anchor, description)) => {
                    format!("- **{}**: {}", anchor, description.trim())
                }
                None => format!("- {}", raw),
            },
        }
    }
}

impl ResumeRenderer for MarkdownRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>> {
        let mut out = String::new();

        if !sections.name.is_empty() {
            out.push_str(&format!("# {}\n\n", sections.name));
        }

        if !sections.summary.is_empty() {
            out.push_str("## Summary\n\n");
            for line in &sections.summary {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }

        if !sections.skills.is_empty() {
            out.push_str("## Skills\n\n");
            for skill in &sections.skills {
                out.push_str(&format!("- {}\n", skill));
            }
            out.push('\n');
        }

        if !sections.experience.is_empty() {
            out.push_str("## Experience\n\n");
            for entry in &sections.experience {
                out.push_str(&Self::markdown_entry(entry));
                out.push('\n');
            }
            out.push('\n');
        }

        if !sections.education.is_empty() {
            out.push_str("## Education\n\n");
            for line in &sections.education {
                out.push_str(&format!("- {}\n", line));
            }
            out.push('\n');
        }

        if !sections.projects.is_empty() {
            out.push_str("## Projects\n\n");
            for entry in &sections.projects {
                out.push_str(&Self::markdown_entry(entry));
                out.push('\n');
            }
            out.push('\n');
        }

        if !sections.certifications.is_empty() {
            out.push_str("## Certifications\n\n");
            for line in &sections.certifications {
                out.push_str(&format!("- {}\n", line));
            }
            out.push('\n');
        }

        Ok(out.into_bytes())
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ResumeRenderer for JsonRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>> {
        let json = if self.pretty {
            serde_json::to_string_pretty(sections)?
        } else {
            serde_json::to_string(sections)?
        };
        Ok(json.into_bytes())
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl HtmlRenderer {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, sections: &ResumeSections) -> ResumeTemplate {
        let title = if sections.name.is_empty() {
            "Tailored Resume".to_string()
        } else {
            sections.name.clone()
        };

        ResumeTemplate {
            include_styles: self.include_styles,
            title,
            has_name: !sections.name.is_empty(),
            name: sections.name.clone(),
            has_summary: !sections.summary.is_empty(),
            summary_html: paragraphs_html(&sections.summary),
            has_skills: !sections.skills.is_empty(),
            skills_html: list_html(&sections.skills),
            has_experience: !sections.experience.is_empty(),
            experience_html: entries_html(&sections.experience),
            has_education: !sections.education.is_empty(),
            education_html: list_html(&sections.education),
            has_projects: !sections.projects.is_empty(),
            projects_html: entries_html(&sections.projects),
            has_certifications: !sections.certifications.is_empty(),
            certifications_html: list_html(&sections.certifications),
        }
    }
}

impl ResumeRenderer for HtmlRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>> {
        let template_data = self.create_template_data(sections);
        let html = template_data
            .render()
            .map_err(|e| PipelineError::Rendering(e.to_string()))?;
        Ok(html.into_bytes())
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

/// Characters per line before the PDF renderer wraps
const PDF_WRAP_WIDTH: usize = 88;

/// Lines that fit on one page at the fixed leading
const PDF_LINES_PER_PAGE: usize = 48;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_bulleted(writer: &mut PdfWriter, text: &str, font: &IndirectFontRef) {
        for (i, piece) in wrap_line(text, PDF_WRAP_WIDTH).into_iter().enumerate() {
            let line = if i == 0 {
                format!("- {}", piece)
            } else {
                format!("  {}", piece)
            };
            writer.body_line(&line, font);
        }
    }
}

impl ResumeRenderer for PdfRenderer {
    fn render(&self, sections: &ResumeSections) -> Result<Vec<u8>> {
        let title = if sections.name.is_empty() {
            "Tailored Resume".to_string()
        } else {
            sections.name.clone()
        };

        let (doc, first_page, first_layer) =
            PdfDocument::new(&title, Mm(215.9), Mm(279.4), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let layer = doc.get_page(first_page).get_layer(first_layer);
        let mut writer = PdfWriter::start(&doc, layer);

        if !sections.name.is_empty() {
            writer.title_line(&sanitize_pdf_text(&sections.name), &bold);
            writer.blank_line();
        }

        if !sections.summary.is_empty() {
            writer.heading_line("SUMMARY", &bold);
            for line in &sections.summary {
                for piece in wrap_line(&sanitize_pdf_text(line), PDF_WRAP_WIDTH) {
                    writer.body_line(&piece, &regular);
                }
            }
            writer.blank_line();
        }

        if !sections.skills.is_empty() {
            writer.heading_line("SKILLS", &bold);
            for skill in &sections.skills {
                Self::write_bulleted(&mut writer, &sanitize_pdf_text(skill), &regular);
            }
            writer.blank_line();
        }

        if !sections.experience.is_empty() {
            writer.heading_line("EXPERIENCE", &bold);
            for entry in &sections.experience {
                Self::write_bulleted(
                    &mut writer,
                    &sanitize_pdf_text(&entry.display_line()),
                    &regular,
                );
            }
            writer.blank_line();
        }

        if !sections.education.is_empty() {
            writer.heading_line("EDUCATION", &bold);
            for line in &sections.education {
                Self::write_bulleted(&mut writer, &sanitize_pdf_text(line), &regular);
            }
            writer.blank_line();
        }

        if !sections.projects.is_empty() {
            writer.heading_line("PROJECTS", &bold);
            for entry in &sections.projects {
                Self::write_bulleted(
                    &mut writer,
                    &sanitize_pdf_text(&entry.display_line()),
                    &regular,
                );
            }
            writer.blank_line();
        }

        if !sections.certifications.is_empty() {
            writer.heading_line("CERTIFICATIONS", &bold);
            for line in &sections.certifications {
                Self::write_bulleted(&mut writer, &sanitize_pdf_text(line), &regular);
            }
        }

        writer.finish();
        doc.save_to_bytes().map_err(pdf_error)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Pdf
    }
}

/// Cursor state for sequential PDF text layout. Tracks consumed lines and
/// starts a fresh page when the current one is full.
struct PdfWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    lines_used: usize,
}

impl<'a> PdfWriter<'a> {
    fn start(doc: &'a PdfDocumentReference, layer: PdfLayerReference) -> Self {
        layer.begin_text_section();
        layer.set_text_cursor(Mm(15.0), Mm(264.0));
        layer.set_line_height(14.0);
        Self {
            doc,
            layer,
            lines_used: 0,
        }
    }

    fn ensure_room(&mut self, lines: usize) {
        if self.lines_used + lines <= PDF_LINES_PER_PAGE {
            return;
        }
        self.layer.end_text_section();
        let (page, layer) = self.doc.add_page(Mm(215.9), Mm(279.4), "Layer 1");
        let layer = self.doc.get_page(page).get_layer(layer);
        layer.begin_text_section();
        layer.set_text_cursor(Mm(15.0), Mm(264.0));
        layer.set_line_height(14.0);
        self.layer = layer;
        self.lines_used = 0;
    }

    fn title_line(&mut self, text: &str, font: &IndirectFontRef) {
        self.ensure_room(1);
        self.layer.set_font(font, 16.0);
        self.layer.write_text(text, font);
        self.layer.add_line_break();
        self.lines_used += 1;
    }

    fn heading_line(&mut self, text: &str, font: &IndirectFontRef) {
        // Never orphan a heading at the bottom of a page
        self.ensure_room(3);
        self.layer.set_font(font, 12.0);
        self.layer.write_text(text, font);
        self.layer.add_line_break();
        self.lines_used += 1;
    }

    fn body_line(&mut self, text: &str, font: &IndirectFontRef) {
        self.ensure_room(1);
        self.layer.set_font(font, 11.0);
        self.layer.write_text(text, font);
        self.layer.add_line_break();
        self.lines_used += 1;
    }

    fn blank_line(&mut self) {
        self.ensure_room(1);
        self.layer.add_line_break();
        self.lines_used += 1;
    }

    fn finish(self) {
        self.layer.end_text_section();
    }
}

fn pdf_error(err: impl std::fmt::Display) -> PipelineError {
    PipelineError::Rendering(err.to_string())
}

/// The PDF base fonts cover WinAnsi only, so anything outside Latin-1 is
/// replaced before layout.
fn sanitize_pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

/// Greedy whitespace wrap. A single word longer than the width stays on
/// its own line.
fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn paragraphs_html(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("<p>{}</p>", escape_html(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_html(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    format!(
        "<ul>\n{}\n</ul>",
        items
            .iter()
            .map(|item| format!("  <li>{}</li>", escape_html(item)))
            .collect::<Vec<_>>()
            .join("\n")
    )
}

fn entries_html(entries: &[SectionEntry]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            SectionEntry::Structured {
                anchor,
                description,
                dates: Some(dates),
            } => format!(
                "<div class=\"entry\">\n  <h3>{} <span class=\"dates\">({})</span></h3>\n  <p>{}</p>\n</div>",
                escape_html(anchor),
                escape_html(dates),
                escape_html(description)
            ),
            SectionEntry::Structured {
                anchor,
                description,
                dates: None,
            } => format!(
                "<div class=\"entry\">\n  <h3>{}</h3>\n  <p>{}</p>\n</div>",
                escape_html(anchor),
                escape_html(description)
            ),
            SectionEntry::Flat(raw) => match raw.split_once(':') {
                Some((anchor, description)) => format!(
                    "<div class=\"entry\">\n  <h3>{}</h3>\n  <p>{}</p>\n</div>",
                    escape_html(anchor),
                    escape_html(description.trim())
                ),
                None => format!(
                    "<div class=\"entry\">\n  <p>{}</p>\n</div>",
                    escape_html(raw)
                ),
            },
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl RenderManager {
    pub fn new() -> Self {
        Self {
            text_renderer: TextRenderer::new(),
            markdown_renderer: MarkdownRenderer::new(),
            json_renderer: JsonRenderer::new(true),
            html_renderer: HtmlRenderer::new(true),
            pdf_renderer: PdfRenderer::new(),
        }
    }

    pub fn with_options(pretty_json: bool, include_html_styles: bool) -> Self {
        Self {
            text_renderer: TextRenderer::new(),
            markdown_renderer: MarkdownRenderer::new(),
            json_renderer: JsonRenderer::new(pretty_json),
            html_renderer: HtmlRenderer::new(include_html_styles),
            pdf_renderer: PdfRenderer::new(),
        }
    }

    pub fn render(&self, sections: &ResumeSections, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Text => self.text_renderer.render(sections),
            OutputFormat::Markdown => self.markdown_renderer.render(sections),
            OutputFormat::Json => self.json_renderer.render(sections),
            OutputFormat::Html => self.html_renderer.render(sections),
            OutputFormat::Pdf => self.pdf_renderer.render(sections),
        }
    }

    /// Render in the requested format and write the file, falling back to a
    /// plain-text rendering at the same location with a `.txt` extension if
    /// the requested format fails. Returns the path actually written.
    pub fn write(
        &self,
        sections: &ResumeSections,
        path: &Path,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        match self.render(sections, format) {
            Ok(bytes) => {
                write_atomic(path, &bytes)?;
                Ok(path.to_path_buf())
            }
            Err(err) if format != OutputFormat::Text => {
                log::warn!(
                    "{:?} rendering failed ({}), writing plain text instead",
                    format,
                    err
                );
                let fallback_path = path.with_extension(format_extension(OutputFormat::Text));
                let bytes = self.text_renderer.render(sections)?;
                write_atomic(&fallback_path, &bytes)?;
                Ok(fallback_path)
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for RenderManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Write through a temp file in the destination directory so an
/// interrupted run never leaves a truncated file at the target path.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    Ok(())
}

pub fn format_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
        OutputFormat::Pdf => "pdf",
    }
}

/// Suggest an output filename next to the resume's stem, in the
/// `<stem>_tailored[.stamp].<ext>` shape.
pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    format!(
        "{}_tailored{}.{}",
        base_name,
        timestamp_suffix,
        format_extension(format)
    )
}
