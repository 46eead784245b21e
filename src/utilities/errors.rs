//! Error types for the content marketing pipeline.
//!
//! Every failure is classified as critical or non-critical. Critical errors
//! abort the run; non-critical errors are logged and satisfied by fallback
//! content so the remaining steps can still execute.

use thiserror::Error;

/// How severe a pipeline error is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run cannot continue.
    Critical,
    /// The step can recover with fallback content.
    NonCritical,
}

/// Errors raised anywhere in the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The API key is missing from both the environment and the config.
    #[error("OpenAI API key is not set. Set the OPENAI_API_KEY environment variable")]
    MissingApiKey,

    /// The completion API rejected the request (4xx, malformed response body).
    #[error("completion API error: {0}")]
    Api(String),

    /// The completion API was unreachable or returned a retryable status
    /// (connection failure, timeout, 429, 5xx).
    #[error("completion API unavailable: {0}")]
    Transport(String),

    /// No usable seed keywords were provided.
    #[error("invalid keywords: {0}")]
    InvalidKeywords(String),

    /// The requested blog word count is outside 300-600.
    #[error("word count {0} is out of range (must be between 300 and 600)")]
    InvalidWordCount(u32),

    /// The pipeline configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A model response could not be parsed into the expected JSON shape.
    #[error("could not parse model response: {0}")]
    ResponseParse(String),

    /// The article failed an SEO sanity check (headline or meta
    /// description out of bounds).
    #[error("SEO check failed: {0}")]
    SeoCheck(String),

    /// The CSV schedule export failed.
    #[error("CSV export failed: {0}")]
    CsvExport(String),

    /// A step finished but produced nothing the next step can consume.
    #[error("{step} produced no usable output: {reason}")]
    EmptyStepOutput { step: &'static str, reason: String },
}

impl PipelineError {
    /// Classify this error.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingApiKey
            | Self::Api(_)
            | Self::Transport(_)
            | Self::InvalidKeywords(_)
            | Self::InvalidWordCount(_)
            | Self::Config(_)
            | Self::FileWrite { .. }
            | Self::EmptyStepOutput { .. } => Severity::Critical,
            Self::ResponseParse(_) | Self::SeoCheck(_) | Self::CsvExport(_) => {
                Severity::NonCritical
            }
        }
    }

    /// Whether the run should abort on this error.
    pub fn is_critical(&self) -> bool {
        self.severity() == Severity::Critical
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Only transport-level failures qualify; a 4xx or a parse failure will
    /// not change on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_failures_are_critical() {
        assert!(PipelineError::MissingApiKey.is_critical());
        assert!(PipelineError::Api("bad request".into()).is_critical());
        assert!(PipelineError::Transport("timeout".into()).is_critical());
    }

    #[test]
    fn test_parse_and_csv_errors_are_non_critical() {
        let parse = PipelineError::ResponseParse("no JSON found".into());
        assert_eq!(parse.severity(), Severity::NonCritical);

        let csv = PipelineError::CsvExport("disk full".into());
        assert_eq!(csv.severity(), Severity::NonCritical);

        let seo = PipelineError::SeoCheck("meta description too short".into());
        assert_eq!(seo.severity(), Severity::NonCritical);
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(PipelineError::Transport("503".into()).is_retryable());
        assert!(!PipelineError::Api("401".into()).is_retryable());
        assert!(!PipelineError::ResponseParse("oops".into()).is_retryable());
    }

    #[test]
    fn test_file_write_is_critical() {
        let err = PipelineError::FileWrite {
            path: "output/campaign.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_critical());
    }
}
