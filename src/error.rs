//! Error handling for the resume tailor application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Resume text is empty: {0}")]
    EmptyResume(String),

    #[error("Resume could not be parsed into sections: {0}")]
    UnparseableResume(String),

    #[error("Job description is empty: {0}")]
    EmptyJobDescription(String),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Generator response could not be parsed: {0}")]
    ResponseParse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rendering error: {0}")]
    Rendering(String),
}

impl PipelineError {
    /// Structural errors describe unusable input. They are the only
    /// category a pipeline run surfaces; generation and parse errors are
    /// recovered internally by falling back to the original content.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PipelineError::EmptyResume(_)
                | PipelineError::UnparseableResume(_)
                | PipelineError::EmptyJobDescription(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::InvalidInput(err.to_string())
    }
}

/// Convert reqwest transport errors to our custom error type
impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            PipelineError::Network(err.to_string())
        } else {
            PipelineError::Generation(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        assert!(PipelineError::EmptyResume("no text".to_string()).is_structural());
        assert!(PipelineError::UnparseableResume("garbage".to_string()).is_structural());
        assert!(!PipelineError::Generation("timeout".to_string()).is_structural());
        assert!(!PipelineError::ResponseParse("bad json".to_string()).is_structural());
    }
}
