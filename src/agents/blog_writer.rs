//! Blog writer agent.
//!
//! Writes a 300-600 word article for the top researched topic, in the
//! requested brand voice.

use std::sync::Arc;

use crate::agent::Agent;
use crate::agents::interpolate;
use crate::config::AgentConfig;
use crate::llm::{parse_response, ChatMessage, CompletionModel};
use crate::types::{reading_time_for, BlogArticle, TrendingTopic};
use crate::utilities::errors::PipelineError;

/// Lower bound on article length.
pub const MIN_WORD_COUNT: u32 = 300;
/// Upper bound on article length.
pub const MAX_WORD_COUNT: u32 = 600;

/// Meta descriptions should land near the 150-160 character target.
const META_DESCRIPTION_RANGE: std::ops::RangeInclusive<usize> = 120..=160;
/// Headlines longer than this get truncated in search results.
const MAX_HEADLINE_CHARS: usize = 70;

/// SEO sanity check on a finished article. Failures are non-critical: the
/// caller logs them and keeps the article.
pub fn seo_check(article: &BlogArticle) -> Result<(), PipelineError> {
    let headline_chars = article.headline.chars().count();
    if headline_chars > MAX_HEADLINE_CHARS {
        return Err(PipelineError::SeoCheck(format!(
            "headline is {} characters (max {})",
            headline_chars, MAX_HEADLINE_CHARS
        )));
    }

    let meta_chars = article.meta_description.chars().count();
    if !META_DESCRIPTION_RANGE.contains(&meta_chars) {
        return Err(PipelineError::SeoCheck(format!(
            "meta description is {} characters (target 150-160)",
            meta_chars
        )));
    }

    Ok(())
}

/// Writes the blog article for a researched topic.
#[derive(Debug)]
pub struct BlogWriterAgent {
    agent: Agent,
    template: String,
    llm: Arc<dyn CompletionModel>,
}

impl BlogWriterAgent {
    pub fn new(config: &AgentConfig, template: &str, llm: Arc<dyn CompletionModel>) -> Self {
        Self {
            agent: Agent::from_config(config),
            template: template.to_string(),
            llm,
        }
    }

    /// Write an article about `topic`.
    ///
    /// The word count is clamped into 300-600. A response that cannot be
    /// parsed becomes a fallback article carrying the raw model text.
    pub async fn write_blog_article(
        &self,
        topic: &TrendingTopic,
        target_word_count: u32,
        brand_voice: &str,
    ) -> Result<BlogArticle, PipelineError> {
        let word_count = target_word_count.clamp(MIN_WORD_COUNT, MAX_WORD_COUNT);
        let prompt = self.prompt(topic, word_count, brand_voice);
        let messages = [
            ChatMessage::system(self.agent.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let response = self.llm.complete(&messages, self.agent.temperature).await?;

        match parse_response::<BlogArticle>(&response) {
            Ok(article) => Ok(Self::validated(article, topic, word_count)),
            Err(e) => {
                log::warn!("blog response was not parseable ({}), keeping raw content", e);
                Ok(Self::fallback(topic, word_count, response))
            }
        }
    }

    fn prompt(&self, topic: &TrendingTopic, word_count: u32, brand_voice: &str) -> String {
        let angles = if topic.content_angles.is_empty() {
            "industry insights, practical tips".to_string()
        } else {
            topic.content_angles.join(", ")
        };
        let audience = if topic.target_audience.is_empty() {
            "business professionals".to_string()
        } else {
            topic.target_audience.clone()
        };

        interpolate(
            &self.template,
            &[
                ("topic_title", topic.title.clone()),
                ("word_count", word_count.to_string()),
                ("target_audience", audience),
                ("brand_voice", brand_voice.to_string()),
                ("content_angles", angles),
            ],
        )
    }

    /// Fill the fields the model is allowed to omit.
    fn validated(mut article: BlogArticle, topic: &TrendingTopic, word_count: u32) -> BlogArticle {
        if article.headline.is_empty() {
            article.headline = topic.title.clone();
        }
        if article.article_content.is_empty() {
            article.article_content = "Content generation failed. Please try again.".into();
        }
        if article.word_count == 0 {
            article.word_count = word_count;
        }
        if article.reading_time.is_empty() {
            article.reading_time = reading_time_for(article.word_count);
        }
        article
    }

    /// Article wrapping the unparseable raw response.
    fn fallback(topic: &TrendingTopic, word_count: u32, raw: String) -> BlogArticle {
        let audience = if topic.target_audience.is_empty() {
            "business professionals".to_string()
        } else {
            topic.target_audience.clone()
        };
        BlogArticle {
            headline: topic.title.clone(),
            meta_description: format!("Learn about {} and its impact on {}", topic.title, audience),
            article_content: raw,
            word_count,
            key_takeaways: vec!["Manual extraction needed".into()],
            suggested_tags: vec!["content".into(), "marketing".into(), "business".into()],
            reading_time: reading_time_for(word_count),
            call_to_action: "Learn more about our services".into(),
            parsing_note: Some("Raw content provided due to JSON parsing issue".into()),
        }
    }
}
