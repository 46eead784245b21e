//! Social post agent.
//!
//! Derives LinkedIn and Twitter/X posts from the finished blog article.
//! Two separate completions are made, one per platform, each with its own
//! prompt template.

use std::sync::Arc;

use crate::agent::Agent;
use crate::agents::{interpolate, preview};
use crate::config::AgentConfig;
use crate::llm::{parse_response, ChatMessage, CompletionModel};
use crate::types::{BlogArticle, LinkedInBatch, LinkedInPost, TwitterBatch, TwitterPost};
use crate::utilities::errors::PipelineError;

/// Creates platform-specific social posts from blog content.
#[derive(Debug)]
pub struct SocialPostAgent {
    agent: Agent,
    linkedin_template: String,
    twitter_template: String,
    llm: Arc<dyn CompletionModel>,
}

impl SocialPostAgent {
    pub fn new(
        config: &AgentConfig,
        linkedin_template: &str,
        twitter_template: &str,
        llm: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            agent: Agent::from_config(config),
            linkedin_template: linkedin_template.to_string(),
            twitter_template: twitter_template.to_string(),
            llm,
        }
    }

    /// Generate `num_posts` LinkedIn posts from the article.
    pub async fn generate_linkedin_posts(
        &self,
        blog: &BlogArticle,
        num_posts: u32,
    ) -> Result<LinkedInBatch, PipelineError> {
        let prompt = self.linkedin_prompt(blog, num_posts, "professional");
        let messages = [
            ChatMessage::system(self.agent.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let response = self.llm.complete(&messages, self.agent.temperature).await?;

        match parse_response::<LinkedInBatch>(&response) {
            Ok(mut batch) => {
                if batch.linkedin_posts.is_empty() {
                    log::warn!("LinkedIn batch was empty, adding a default post");
                    batch.linkedin_posts.push(Self::default_linkedin_post(blog));
                }
                Ok(batch)
            }
            Err(e) => {
                log::warn!("LinkedIn response was not parseable ({}), using fallback", e);
                Ok(Self::linkedin_fallback(&response))
            }
        }
    }

    /// Generate `num_posts` Twitter/X posts from the article.
    pub async fn generate_twitter_posts(
        &self,
        blog: &BlogArticle,
        num_posts: u32,
    ) -> Result<TwitterBatch, PipelineError> {
        let prompt = self.twitter_prompt(blog, num_posts);
        let messages = [
            ChatMessage::system(self.agent.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let response = self.llm.complete(&messages, self.agent.temperature).await?;

        match parse_response::<TwitterBatch>(&response) {
            Ok(mut batch) => {
                if batch.twitter_posts.is_empty() {
                    log::warn!("Twitter batch was empty, adding a default post");
                    batch.twitter_posts.push(Self::default_tweet(blog));
                }
                Ok(batch)
            }
            Err(e) => {
                log::warn!("Twitter response was not parseable ({}), using fallback", e);
                Ok(Self::twitter_fallback(blog))
            }
        }
    }

    fn linkedin_prompt(&self, blog: &BlogArticle, num_posts: u32, post_style: &str) -> String {
        let takeaways = blog
            .key_takeaways
            .iter()
            .take(3)
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");

        interpolate(
            &self.linkedin_template,
            &[
                ("num_posts", num_posts.to_string()),
                ("headline", blog.headline.clone()),
                ("content_preview", preview(&blog.article_content, 300)),
                ("takeaways", takeaways),
                ("post_style", post_style.to_string()),
            ],
        )
    }

    fn twitter_prompt(&self, blog: &BlogArticle, num_posts: u32) -> String {
        let takeaways = blog
            .key_takeaways
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        interpolate(
            &self.twitter_template,
            &[
                ("num_posts", num_posts.to_string()),
                ("headline", blog.headline.clone()),
                ("takeaways", takeaways),
            ],
        )
    }

    /// Minimal promotional post when the model returned none.
    fn default_linkedin_post(blog: &BlogArticle) -> LinkedInPost {
        let takeaways = blog
            .key_takeaways
            .iter()
            .take(3)
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n");
        let content = format!(
            "Just published: {}\n\n{}\n\nWhat are your thoughts?",
            blog.headline, takeaways
        );
        LinkedInPost {
            character_count: content.chars().count(),
            post_content: content,
            hashtags: vec!["#contentmarketing".into(), "#business".into()],
            post_type: "promotional".into(),
            engagement_prediction: "medium".into(),
            call_to_action: "Share your thoughts below".into(),
            posting_tip: "Post during business hours for better reach".into(),
        }
    }

    /// Batch wrapping the raw response when parsing failed.
    fn linkedin_fallback(response: &str) -> LinkedInBatch {
        let content = preview(response, 1000);
        LinkedInBatch {
            linkedin_posts: vec![LinkedInPost {
                character_count: content.chars().count(),
                post_content: content,
                hashtags: vec!["#contentmarketing".into(), "#business".into(), "#insights".into()],
                post_type: "general".into(),
                engagement_prediction: "medium".into(),
                call_to_action: "What do you think?".into(),
                posting_tip: "Review and edit before posting".into(),
            }],
            content_themes: vec!["business insights".into()],
            overall_strategy: "Manual review recommended due to parsing issue".into(),
        }
    }

    /// Minimal teaser tweet when the model returned none.
    fn default_tweet(blog: &BlogArticle) -> TwitterPost {
        let content = format!(
            "New post: {}\n\nKey insights inside.\n\n#contentmarketing #business",
            preview(&blog.headline, 100)
        );
        TwitterPost {
            character_count: content.chars().count(),
            tweet_content: content,
            post_type: "single_tweet".into(),
            hashtags: vec!["#contentmarketing".into(), "#business".into()],
            engagement_elements: vec!["call_to_action".into()],
            thread_position: None,
            retweet_potential: "medium".into(),
        }
    }

    /// One tweet per takeaway when parsing failed.
    fn twitter_fallback(blog: &BlogArticle) -> TwitterBatch {
        let twitter_posts = blog
            .key_takeaways
            .iter()
            .take(3)
            .map(|takeaway| {
                let content = format!("{}\n\n#insights #business", preview(takeaway, 200));
                TwitterPost {
                    character_count: content.chars().count(),
                    tweet_content: content,
                    post_type: "single_tweet".into(),
                    hashtags: vec!["#insights".into(), "#business".into()],
                    engagement_elements: Vec::new(),
                    thread_position: None,
                    retweet_potential: "medium".into(),
                }
            })
            .collect::<Vec<_>>();

        let twitter_posts = if twitter_posts.is_empty() {
            vec![Self::default_tweet(blog)]
        } else {
            twitter_posts
        };

        TwitterBatch {
            twitter_posts,
            thread_posts: Vec::new(),
            posting_strategy: "Manual review recommended - parsing issue occurred".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedModel;
    use crate::config::{PipelineConfig, DEFAULT_CONFIG_YAML};

    fn agent_with(model: Arc<dyn CompletionModel>) -> SocialPostAgent {
        let config = PipelineConfig::from_yaml(DEFAULT_CONFIG_YAML).unwrap();
        SocialPostAgent::new(
            &config.agents.social_manager,
            &config.prompts.linkedin_posts,
            &config.prompts.twitter_posts,
            model,
        )
    }

    fn blog() -> BlogArticle {
        BlogArticle {
            headline: "Five Automation Wins".into(),
            article_content: "Automation pays off quickly when targeted well.".into(),
            key_takeaways: vec![
                "Start with repetitive tasks".into(),
                "Measure before and after".into(),
                "Keep humans in the loop".into(),
                "Budget for maintenance".into(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_linkedin_prompt_limits_takeaways() {
        let agent = agent_with(Arc::new(ScriptedModel::default()));
        let prompt = agent.linkedin_prompt(&blog(), 2, "professional");
        assert!(prompt.contains("Create 2 engaging LinkedIn posts"));
        assert!(prompt.contains("- Keep humans in the loop"));
        // Only the first three takeaways are included.
        assert!(!prompt.contains("Budget for maintenance"));
    }

    #[tokio::test]
    async fn test_linkedin_parse_success() {
        let response = r#"{
            "linkedin_posts": [
                {"post_content": "Post one", "character_count": 8, "post_type": "educational"}
            ],
            "content_themes": ["automation"],
            "overall_strategy": "Lead with value"
        }"#;
        let agent = agent_with(Arc::new(ScriptedModel::new([response])));
        let batch = agent.generate_linkedin_posts(&blog(), 2).await.unwrap();

        assert_eq!(batch.linkedin_posts.len(), 1);
        assert_eq!(batch.content_themes, vec!["automation"]);
    }

    #[tokio::test]
    async fn test_linkedin_empty_batch_gets_default_post() {
        let agent = agent_with(Arc::new(ScriptedModel::new([r#"{"linkedin_posts": []}"#])));
        let batch = agent.generate_linkedin_posts(&blog(), 2).await.unwrap();

        assert_eq!(batch.linkedin_posts.len(), 1);
        assert!(batch.linkedin_posts[0].post_content.contains("Five Automation Wins"));
        assert_eq!(batch.linkedin_posts[0].post_type, "promotional");
    }

    #[tokio::test]
    async fn test_linkedin_fallback_wraps_raw_response() {
        let agent = agent_with(Arc::new(ScriptedModel::new(["plain prose, no JSON"])));
        let batch = agent.generate_linkedin_posts(&blog(), 2).await.unwrap();

        assert_eq!(batch.linkedin_posts[0].post_content, "plain prose, no JSON");
        assert!(batch.overall_strategy.contains("Manual review"));
    }

    #[tokio::test]
    async fn test_twitter_fallback_builds_tweets_from_takeaways() {
        let agent = agent_with(Arc::new(ScriptedModel::new(["not json either"])));
        let batch = agent.generate_twitter_posts(&blog(), 3).await.unwrap();

        assert_eq!(batch.twitter_posts.len(), 3);
        assert!(batch.twitter_posts[0]
            .tweet_content
            .contains("Start with repetitive tasks"));
        assert!(batch.twitter_posts[0].tweet_content.contains("#insights"));
    }

    #[tokio::test]
    async fn test_twitter_empty_batch_gets_teaser() {
        let agent = agent_with(Arc::new(ScriptedModel::new([r#"{"twitter_posts": []}"#])));
        let batch = agent.generate_twitter_posts(&blog(), 3).await.unwrap();

        assert_eq!(batch.twitter_posts.len(), 1);
        assert!(batch.twitter_posts[0].tweet_content.contains("Five Automation Wins"));
    }
}
