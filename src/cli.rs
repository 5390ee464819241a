//! CLI interface for the resume tailor

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-tailor")]
#[command(about = "Keyword-aware resume tailoring driven by a remote text generator")]
#[command(
    long_about = "Extract keywords from a job description, infuse them into the skills section and rewrite experience and project entries to match, while companies, roles and dates stay untouched"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tailor a resume to a job description
    Tailor {
        /// Path to resume file (PDF, TXT, MD, JSON)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD), or '-' to read stdin
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: text, json, markdown, html, pdf (defaults to the
        /// configured output format)
        #[arg(short, long)]
        format: Option<String>,

        /// Save the tailored resume to this path (derived from the resume
        /// filename when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the extracted keyword map before tailoring
        #[arg(long)]
        show_keywords: bool,
    },

    /// Extract and print the keyword map for a job description
    Keywords {
        /// Path to job description file (TXT, MD), or '-' to read stdin
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write a default configuration file
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "generator.model")
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    format.parse()
}

/// A lone `-` selects stdin instead of a file
pub fn is_stdin_marker(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format_aliases() {
        assert_eq!(parse_output_format("text").unwrap(), OutputFormat::Text);
        assert_eq!(parse_output_format("TXT").unwrap(), OutputFormat::Text);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert_eq!(parse_output_format("pdf").unwrap(), OutputFormat::Pdf);
        assert!(parse_output_format("docx").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let path = PathBuf::from("resume.PDF");
        assert!(validate_file_extension(&path, &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(&path, &["txt", "md"]).is_err());
        assert!(validate_file_extension(&PathBuf::from("noext"), &["txt"]).is_err());
    }

    #[test]
    fn test_stdin_marker() {
        assert!(is_stdin_marker(Path::new("-")));
        assert!(!is_stdin_marker(Path::new("job.txt")));
        assert!(!is_stdin_marker(Path::new("./-")));
    }
}
