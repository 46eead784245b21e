//! Data-transfer records produced by the pipeline steps.
//!
//! These are the JSON shapes the agents ask the model to return, plus the
//! bundled campaign package written at the end of a run. Deserialization is
//! lenient (`serde(default)` throughout) because the model may omit fields;
//! the owning agent fills in defaults afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trending topic suggested by the research step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendingTopic {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub trending_reason: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub content_angles: Vec<String>,
    /// SEO potential score, 1-10.
    #[serde(default)]
    pub seo_score: u8,
    /// "high", "medium" or "low".
    #[serde(default)]
    pub urgency_level: String,
}

/// Result of the topic research step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicResearch {
    #[serde(default)]
    pub trending_topics: Vec<TrendingTopic>,
    #[serde(default)]
    pub market_insights: String,
    #[serde(default)]
    pub recommended_focus: String,
}

impl TopicResearch {
    /// The topic the blog step should write about.
    pub fn top_topic(&self) -> Option<&TrendingTopic> {
        self.trending_topics.first()
    }
}

/// A complete blog article with metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogArticle {
    #[serde(default)]
    pub headline: String,
    /// SEO meta description, 150-160 characters.
    #[serde(default)]
    pub meta_description: String,
    /// Full article body in Markdown.
    #[serde(default)]
    pub article_content: String,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
    /// e.g. "3 min read".
    #[serde(default)]
    pub reading_time: String,
    #[serde(default)]
    pub call_to_action: String,
    /// Set when the article body is the raw model response rather than
    /// parsed JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsing_note: Option<String>,
}

/// Estimated reading time at 200 words per minute, never under one minute.
pub fn reading_time_for(words: u32) -> String {
    let minutes = (words / 200).max(1);
    format!("{} min read", minutes)
}

/// One LinkedIn post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedInPost {
    #[serde(default)]
    pub post_content: String,
    #[serde(default)]
    pub character_count: usize,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// "educational", "thought-leadership", "promotional", ...
    #[serde(default)]
    pub post_type: String,
    #[serde(default)]
    pub engagement_prediction: String,
    #[serde(default)]
    pub call_to_action: String,
    #[serde(default)]
    pub posting_tip: String,
}

/// The LinkedIn half of the social step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedInBatch {
    #[serde(default)]
    pub linkedin_posts: Vec<LinkedInPost>,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub overall_strategy: String,
}

/// One Twitter/X post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterPost {
    #[serde(default)]
    pub tweet_content: String,
    #[serde(default)]
    pub character_count: usize,
    /// "single_tweet", "quote_tweet", "question", ...
    #[serde(default)]
    pub post_type: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub engagement_elements: Vec<String>,
    #[serde(default)]
    pub thread_position: Option<u32>,
    #[serde(default)]
    pub retweet_potential: String,
}

/// A thread suggestion from the social step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadPost {
    #[serde(default)]
    pub thread_content: Vec<String>,
    #[serde(default)]
    pub thread_topic: String,
    #[serde(default)]
    pub total_tweets: u32,
}

/// The Twitter half of the social step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterBatch {
    #[serde(default)]
    pub twitter_posts: Vec<TwitterPost>,
    #[serde(default)]
    pub thread_posts: Vec<ThreadPost>,
    #[serde(default)]
    pub posting_strategy: String,
}

/// Totals across both platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialSummary {
    pub total_linkedin_posts: usize,
    pub total_twitter_posts: usize,
    #[serde(default)]
    pub content_themes: Vec<String>,
}

/// Combined output of the social media step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialBundle {
    pub linkedin_posts: LinkedInBatch,
    pub twitter_posts: TwitterBatch,
    pub campaign_summary: SocialSummary,
}

impl SocialBundle {
    /// Bundle both batches and derive the summary totals.
    pub fn new(linkedin: LinkedInBatch, twitter: TwitterBatch) -> Self {
        let summary = SocialSummary {
            total_linkedin_posts: linkedin.linkedin_posts.len(),
            total_twitter_posts: twitter.twitter_posts.len(),
            content_themes: linkedin.content_themes.clone(),
        };
        Self {
            linkedin_posts: linkedin,
            twitter_posts: twitter,
            campaign_summary: summary,
        }
    }
}

/// Campaign-level framing of the schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignOverview {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub total_posts: u32,
    #[serde(default)]
    pub strategy: String,
}

/// When to publish the blog article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogSlot {
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub publish_time: String,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub preparation_deadline: String,
}

/// A scheduled social post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledPost {
    #[serde(default)]
    pub post_index: u32,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub publish_time: String,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub post_type: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub expected_engagement: String,
}

/// One row of the CSV calendar export.
///
/// Field names serialize in the fixed column layout of the export file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(rename = "Content_Type")]
    pub content_type: String,
    #[serde(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Publish_Date")]
    pub publish_date: String,
    #[serde(rename = "Publish_Time")]
    pub publish_time: String,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    #[serde(rename = "Expected_Engagement")]
    pub expected_engagement: String,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// Result of the scheduling step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingSchedule {
    #[serde(default)]
    pub campaign_overview: CampaignOverview,
    #[serde(default)]
    pub blog_schedule: BlogSlot,
    #[serde(default)]
    pub linkedin_schedule: Vec<ScheduledPost>,
    #[serde(default)]
    pub twitter_schedule: Vec<ScheduledPost>,
    #[serde(default)]
    pub optimization_tips: Vec<String>,
    #[serde(default)]
    pub success_metrics: Vec<String>,
    /// Flattened rows for the calendar import file, derived from the
    /// schedules above.
    #[serde(default)]
    pub csv_export: Vec<ScheduleRow>,
}

impl PostingSchedule {
    /// Derive the flat CSV rows from the blog, LinkedIn and Twitter slots.
    pub fn derive_csv_rows(&self) -> Vec<ScheduleRow> {
        let mut rows = Vec::new();

        if !self.blog_schedule.publish_date.is_empty() {
            rows.push(ScheduleRow {
                content_type: "Blog Post".into(),
                platform: "Website".into(),
                publish_date: self.blog_schedule.publish_date.clone(),
                publish_time: self.blog_schedule.publish_time.clone(),
                day_of_week: self.blog_schedule.day_of_week.clone(),
                expected_engagement: "High".into(),
                notes: self.blog_schedule.rationale.clone(),
            });
        }

        for post in &self.linkedin_schedule {
            rows.push(ScheduleRow {
                content_type: format!("LinkedIn Post {}", post.post_index),
                platform: "LinkedIn".into(),
                publish_date: post.publish_date.clone(),
                publish_time: post.publish_time.clone(),
                day_of_week: post.day_of_week.clone(),
                expected_engagement: capitalize_or(&post.expected_engagement, "Medium"),
                notes: post.rationale.clone(),
            });
        }

        for post in &self.twitter_schedule {
            rows.push(ScheduleRow {
                content_type: format!("Twitter Post {}", post.post_index),
                platform: "Twitter/X".into(),
                publish_date: post.publish_date.clone(),
                publish_time: post.publish_time.clone(),
                day_of_week: post.day_of_week.clone(),
                expected_engagement: capitalize_or(&post.expected_engagement, "Medium"),
                notes: post.rationale.clone(),
            });
        }

        rows
    }
}

fn capitalize_or(value: &str, fallback: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => fallback.to_string(),
    }
}

/// Run-level metadata recorded in the campaign package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignMetadata {
    pub generated_at: DateTime<Utc>,
    pub pipeline_version: String,
    pub status: String,
}

/// Rollup section of the campaign package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub total_content_pieces: usize,
    pub estimated_reach: String,
    pub campaign_duration: String,
    pub key_topics: Vec<TrendingTopic>,
    pub success_metrics: Vec<String>,
}

/// The bundled output of one complete pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_metadata: CampaignMetadata,
    pub topic_research: TopicResearch,
    pub blog_article: BlogArticle,
    pub social_media: SocialBundle,
    pub posting_schedule: PostingSchedule,
    pub campaign_summary: CampaignSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_time_minimum_one_minute() {
        assert_eq!(reading_time_for(50), "1 min read");
        assert_eq!(reading_time_for(199), "1 min read");
        assert_eq!(reading_time_for(600), "3 min read");
    }

    #[test]
    fn test_lenient_topic_research_deserialization() {
        let json = r#"{"trending_topics": [{"title": "AI at work"}]}"#;
        let research: TopicResearch = serde_json::from_str(json).unwrap();
        assert_eq!(research.trending_topics.len(), 1);
        assert_eq!(research.top_topic().unwrap().title, "AI at work");
        assert!(research.market_insights.is_empty());
    }

    #[test]
    fn test_csv_rows_cover_all_slots() {
        let schedule = PostingSchedule {
            blog_schedule: BlogSlot {
                publish_date: "2026-08-05".into(),
                publish_time: "09:00".into(),
                day_of_week: "Wednesday".into(),
                rationale: "midweek reach".into(),
                ..Default::default()
            },
            linkedin_schedule: vec![ScheduledPost {
                post_index: 1,
                publish_date: "2026-08-06".into(),
                publish_time: "10:00".into(),
                day_of_week: "Thursday".into(),
                expected_engagement: "high".into(),
                ..Default::default()
            }],
            twitter_schedule: vec![
                ScheduledPost {
                    post_index: 1,
                    expected_engagement: "medium".into(),
                    ..Default::default()
                },
                ScheduledPost {
                    post_index: 2,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let rows = schedule.derive_csv_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].platform, "Website");
        assert_eq!(rows[1].content_type, "LinkedIn Post 1");
        assert_eq!(rows[1].expected_engagement, "High");
        assert_eq!(rows[3].platform, "Twitter/X");
        assert_eq!(rows[3].expected_engagement, "Medium");
    }

    #[test]
    fn test_schedule_row_column_names() {
        let row = ScheduleRow {
            content_type: "Blog Post".into(),
            platform: "Website".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("Content_Type").is_some());
        assert!(value.get("Expected_Engagement").is_some());
    }

    #[test]
    fn test_social_bundle_totals() {
        let linkedin = LinkedInBatch {
            linkedin_posts: vec![LinkedInPost::default(), LinkedInPost::default()],
            content_themes: vec!["automation".into()],
            ..Default::default()
        };
        let twitter = TwitterBatch {
            twitter_posts: vec![TwitterPost::default(), TwitterPost::default(), TwitterPost::default()],
            ..Default::default()
        };
        let bundle = SocialBundle::new(linkedin, twitter);
        assert_eq!(bundle.campaign_summary.total_linkedin_posts, 2);
        assert_eq!(bundle.campaign_summary.total_twitter_posts, 3);
        assert_eq!(bundle.campaign_summary.content_themes, vec!["automation"]);
    }
}
