//! Topic research agent.
//!
//! Turns seed keywords and optional industry context into a ranked list of
//! trending content topics.

use std::sync::Arc;

use crate::agent::Agent;
use crate::agents::interpolate;
use crate::config::AgentConfig;
use crate::llm::{parse_response, ChatMessage, CompletionModel};
use crate::types::{TopicResearch, TrendingTopic};
use crate::utilities::errors::PipelineError;

/// Researches trending topics for the configured industry.
#[derive(Debug)]
pub struct TopicResearchAgent {
    agent: Agent,
    template: String,
    llm: Arc<dyn CompletionModel>,
}

impl TopicResearchAgent {
    pub fn new(config: &AgentConfig, template: &str, llm: Arc<dyn CompletionModel>) -> Self {
        Self {
            agent: Agent::from_config(config),
            template: template.to_string(),
            llm,
        }
    }

    /// Research trending topics for the given seed keywords.
    ///
    /// A response that cannot be parsed is replaced by a deterministic
    /// fallback record; only model call failures are returned as errors.
    pub async fn research_topics(
        &self,
        seed_keywords: &[String],
        industry_context: &str,
    ) -> Result<TopicResearch, PipelineError> {
        let prompt = self.prompt(seed_keywords, industry_context);
        let messages = [
            ChatMessage::system(self.agent.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let response = self.llm.complete(&messages, self.agent.temperature).await?;

        match parse_response::<TopicResearch>(&response) {
            Ok(research) if !research.trending_topics.is_empty() => Ok(research),
            Ok(_) => {
                log::warn!("topic research returned no topics, using fallback");
                Ok(Self::fallback())
            }
            Err(e) => {
                log::warn!("topic research response was not parseable ({}), using fallback", e);
                Ok(Self::fallback())
            }
        }
    }

    fn prompt(&self, seed_keywords: &[String], industry_context: &str) -> String {
        interpolate(
            &self.template,
            &[
                ("keywords", seed_keywords.join(", ")),
                ("industry_context", industry_context.to_string()),
            ],
        )
    }

    /// Deterministic research record used when the model response is
    /// unusable.
    fn fallback() -> TopicResearch {
        TopicResearch {
            trending_topics: vec![TrendingTopic {
                title: "AI and Digital Transformation in Modern Business".into(),
                trending_reason: "Growing adoption of AI technologies in business operations".into(),
                target_audience: "Business professionals and decision makers".into(),
                content_angles: vec![
                    "AI implementation".into(),
                    "Business automation".into(),
                    "Digital strategy".into(),
                ],
                seo_score: 8,
                urgency_level: "high".into(),
            }],
            market_insights: "Strong market interest in AI and automation solutions".into(),
            recommended_focus: "AI and digital transformation topics show high engagement potential"
                .into(),
        }
    }
}
