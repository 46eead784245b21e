//! # Content Marketing Pipeline
//!
//! A configuration-driven content marketing pipeline that sequences four
//! completion-model calls (topic research, blog writing, social post
//! generation, schedule generation) and writes the results as JSON,
//! Markdown, CSV and plain text files.
//!
//! The agents are prompt personas configured in YAML; all content reasoning
//! happens in the hosted model. Steps run strictly sequentially, errors are
//! classified critical vs non-critical, and unparseable responses degrade
//! to deterministic fallback content.

pub mod agent;
pub mod agents;
pub mod cli;
pub mod config;
pub mod crew;
pub mod llm;
pub mod output;
pub mod types;
pub mod utilities;

pub use agent::Agent;
pub use config::{PipelineConfig, RuntimeEnv};
pub use crew::{ContentMarketingCrew, PipelineParams, WorkflowOutput};
pub use llm::openai::OpenAiCompletion;
pub use llm::CompletionModel;
pub use types::Campaign;
pub use utilities::errors::{PipelineError, Severity};

/// Pipeline version recorded in every campaign package.
pub const VERSION: &str = "1.0.0";
