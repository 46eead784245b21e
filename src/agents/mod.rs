//! The four pipeline agents.
//!
//! Each agent owns its prompt template (from the `prompts:` config section),
//! calls the completion model once per operation, parses the JSON response
//! into a typed record, and falls back to deterministic content when the
//! response cannot be parsed. Parse failures are non-critical; only model
//! call failures propagate.

pub mod blog_writer;
pub mod scheduler;
pub mod social_post;
pub mod topic_research;

pub use blog_writer::BlogWriterAgent;
pub use scheduler::SchedulerAgent;
pub use social_post::SocialPostAgent;
pub use topic_research::TopicResearchAgent;

/// Fill `{name}` placeholders in a prompt template.
///
/// Only the given keys are replaced; literal braces elsewhere in the
/// template (JSON examples in particular) pass through untouched.
pub(crate) fn interpolate(template: &str, inputs: &[(&str, String)]) -> String {
    let mut result = template.to_string();
    for (key, value) in inputs {
        let pattern = format!("{{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

/// Truncate to at most `max` characters, appending "..." when shortened.
pub(crate) fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted completion model for agent and crew tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm::{ChatMessage, CompletionModel};
    use crate::utilities::errors::PipelineError;

    /// Returns scripted responses in order; errors once the script runs out.
    #[derive(Debug, Default)]
    pub struct ScriptedModel {
        responses: Mutex<VecDeque<String>>,
        calls: AtomicU32,
    }

    impl ScriptedModel {
        pub fn new<I, S>(responses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
                calls: AtomicU32::new(0),
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _temperature: f64,
        ) -> Result<String, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| PipelineError::Transport("scripted model exhausted".into()))
        }
    }

    /// Always fails with a transport error.
    #[derive(Debug, Default)]
    pub struct FailingModel {
        calls: AtomicU32,
    }

    impl FailingModel {
        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for FailingModel {
        fn model(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _temperature: f64,
        ) -> Result<String, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PipelineError::Transport("connection refused".into()))
        }
    }
}
