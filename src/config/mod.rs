//! Pipeline configuration.
//!
//! The whole run is driven by one YAML document: agent definitions (role,
//! goal, backstory, temperature), the prompt template for every step, the
//! pipeline settings (step list, retries, timeouts), and the output layout.
//! A default document ships inside the binary; `--config` swaps in a custom
//! file; a handful of environment variables override either.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utilities::errors::PipelineError;

/// The default configuration document compiled into the binary.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../config/pipeline.yaml");

/// One agent definition from the `agents:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Sampling temperature for this agent's completions.
    pub temperature: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: u32,
}

fn default_max_iter() -> u32 {
    3
}

/// The four agents of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    pub researcher: AgentConfig,
    pub writer: AgentConfig,
    pub social_manager: AgentConfig,
    pub scheduler: AgentConfig,
}

/// Prompt templates, one per model call. Placeholders use `{name}` syntax
/// and are filled by the owning agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptsConfig {
    pub topic_research: String,
    pub blog_writing: String,
    pub linkedin_posts: String,
    pub twitter_posts: String,
    pub posting_schedule: String,
}

/// One of the four pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStep {
    Research,
    Blog,
    Social,
    Schedule,
}

impl PipelineStep {
    /// The step whose output this step consumes, if any.
    pub fn prerequisite(&self) -> Option<PipelineStep> {
        match self {
            Self::Research => None,
            Self::Blog => Some(Self::Research),
            Self::Social | Self::Schedule => Some(Self::Blog),
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Research => write!(f, "research"),
            Self::Blog => write!(f, "blog"),
            Self::Social => write!(f, "social"),
            Self::Schedule => write!(f, "schedule"),
        }
    }
}

/// Execution settings from the `pipeline:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Ordered steps to run. The full pipeline is all four.
    pub steps: Vec<PipelineStep>,
    /// Retries per model call, on top of the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial delay between retries; doubles each attempt.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Must stay `false`; only sequential execution is supported.
    #[serde(default)]
    pub concurrent_requests: bool,
    #[serde(default = "default_campaign_duration")]
    pub campaign_duration_days: i64,
    #[serde(default = "default_linkedin_count")]
    pub linkedin_post_count: u32,
    #[serde(default = "default_twitter_count")]
    pub twitter_post_count: u32,
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    2
}

fn default_timeout() -> u64 {
    120
}

fn default_campaign_duration() -> i64 {
    7
}

fn default_linkedin_count() -> u32 {
    2
}

fn default_twitter_count() -> u32 {
    3
}

/// Completion model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Output layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

fn default_output_directory() -> String {
    "output".to_string()
}

/// The full configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub agents: AgentsConfig,
    pub prompts: PromptsConfig,
    pub pipeline: PipelineSettings,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load the configuration: a custom YAML file if given, otherwise the
    /// embedded default document.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    PipelineError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&text)?
            }
            None => Self::from_yaml(DEFAULT_CONFIG_YAML)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(yaml).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Reject documents the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.pipeline.concurrent_requests {
            return Err(PipelineError::Config(
                "concurrent_requests is not supported; steps run sequentially".into(),
            ));
        }
        if self.pipeline.steps.is_empty() {
            return Err(PipelineError::Config("pipeline.steps is empty".into()));
        }

        let mut seen = HashSet::new();
        for step in &self.pipeline.steps {
            if !seen.insert(*step) {
                return Err(PipelineError::Config(format!(
                    "step '{}' is listed more than once",
                    step
                )));
            }
            if let Some(required) = step.prerequisite() {
                if !seen.contains(&required) {
                    return Err(PipelineError::Config(format!(
                        "step '{}' requires '{}' to run before it",
                        step, required
                    )));
                }
            }
        }

        if self.pipeline.campaign_duration_days < 1 {
            return Err(PipelineError::Config(
                "campaign_duration_days must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Whether the configured step list is the complete pipeline.
    pub fn runs_full_pipeline(&self) -> bool {
        use PipelineStep::*;
        let steps: HashSet<_> = self.pipeline.steps.iter().copied().collect();
        [Research, Blog, Social, Schedule]
            .iter()
            .all(|s| steps.contains(s))
    }

    /// Fold environment overrides into the document.
    pub fn apply_env(&mut self, env: &RuntimeEnv) {
        if let Some(ref model) = env.model {
            self.model.name = model.clone();
        }
        if let Some(ref base_url) = env.base_url {
            self.model.base_url = Some(base_url.clone());
        }
        if let Some(timeout) = env.timeout_secs {
            self.pipeline.request_timeout_secs = timeout;
        }
    }
}

/// Settings resolved from the process environment (after dotenv loading).
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnv {
    /// `OPENAI_API_KEY` - required to run.
    pub api_key: Option<String>,
    /// `OPENAI_MODEL` - overrides `model.name`.
    pub model: Option<String>,
    /// `OPENAI_BASE_URL` - overrides `model.base_url`.
    pub base_url: Option<String>,
    /// `PIPELINE_TIMEOUT_SECS` - overrides `pipeline.request_timeout_secs`.
    pub timeout_secs: Option<u64>,
    /// `PIPELINE_MAX_RPM` - requests-per-minute cap; absent means unlimited.
    pub max_rpm: Option<u32>,
    /// `PIPELINE_CACHE` - truthy value enables response caching.
    pub cache_enabled: bool,
}

impl RuntimeEnv {
    /// Read the override set from the process environment.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_var("OPENAI_API_KEY"),
            model: non_empty_var("OPENAI_MODEL"),
            base_url: non_empty_var("OPENAI_BASE_URL"),
            timeout_secs: parsed_var("PIPELINE_TIMEOUT_SECS"),
            max_rpm: parsed_var("PIPELINE_MAX_RPM"),
            cache_enabled: non_empty_var("PIPELINE_CACHE")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
        }
    }

    /// The API key, or the critical startup error.
    pub fn require_api_key(&self) -> Result<String, PipelineError> {
        self.api_key.clone().ok_or(PipelineError::MissingApiKey)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match non_empty_var(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("ignoring {}: '{}' is not a valid value", name, raw);
                None
            }
        },
        None => None,
    }
}

/// Accepts 1/true/yes/on, case-insensitive.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
