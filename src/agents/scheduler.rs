//! Scheduler agent.
//!
//! Produces the posting calendar for the campaign: when the blog goes live
//! and when each social post follows. The model proposes the timing; when
//! its answer cannot be parsed, a deterministic weekly grid is used instead.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use crate::agent::Agent;
use crate::agents::interpolate;
use crate::config::AgentConfig;
use crate::llm::{parse_response, ChatMessage, CompletionModel};
use crate::types::{
    BlogArticle, BlogSlot, CampaignOverview, PostingSchedule, ScheduledPost, SocialBundle,
};
use crate::utilities::errors::PipelineError;

/// Day offsets from the start date for the fallback LinkedIn slots.
const LINKEDIN_OFFSETS: [i64; 2] = [3, 5];
/// Day offsets from the start date for the fallback Twitter slots.
const TWITTER_OFFSETS: [i64; 3] = [2, 4, 6];

/// Plans the posting schedule for a campaign.
#[derive(Debug)]
pub struct SchedulerAgent {
    agent: Agent,
    template: String,
    llm: Arc<dyn CompletionModel>,
}

impl SchedulerAgent {
    pub fn new(config: &AgentConfig, template: &str, llm: Arc<dyn CompletionModel>) -> Self {
        Self {
            agent: Agent::from_config(config),
            template: template.to_string(),
            llm,
        }
    }

    /// Generate the posting schedule for the campaign starting at
    /// `start_date`.
    pub async fn generate_posting_schedule(
        &self,
        blog: &BlogArticle,
        social: Option<&SocialBundle>,
        target_audience: &str,
        timezone: &str,
        duration_days: i64,
        start_date: NaiveDate,
    ) -> Result<PostingSchedule, PipelineError> {
        let num_linkedin = social
            .map(|s| s.linkedin_posts.linkedin_posts.len() as u32)
            .unwrap_or(0);
        let num_twitter = social
            .map(|s| s.twitter_posts.twitter_posts.len() as u32)
            .unwrap_or(0);

        let prompt = self.prompt(
            blog,
            num_linkedin,
            num_twitter,
            target_audience,
            timezone,
            duration_days,
            start_date,
        );
        let messages = [
            ChatMessage::system(self.agent.system_prompt()),
            ChatMessage::user(prompt),
        ];

        let response = self.llm.complete(&messages, self.agent.temperature).await?;

        let mut schedule = match parse_response::<PostingSchedule>(&response) {
            Ok(schedule) => schedule,
            Err(e) => {
                log::warn!("schedule response was not parseable ({}), using fallback grid", e);
                Self::fallback_schedule(start_date, duration_days, num_linkedin, num_twitter)
            }
        };

        if schedule.campaign_overview.start_date.is_empty() {
            schedule.campaign_overview = Self::default_overview(
                start_date,
                duration_days,
                num_linkedin + num_twitter + 1,
            );
        }
        schedule.csv_export = schedule.derive_csv_rows();

        Ok(schedule)
    }

    #[allow(clippy::too_many_arguments)]
    fn prompt(
        &self,
        blog: &BlogArticle,
        num_linkedin: u32,
        num_twitter: u32,
        target_audience: &str,
        timezone: &str,
        duration_days: i64,
        start_date: NaiveDate,
    ) -> String {
        interpolate(
            &self.template,
            &[
                ("blog_title", blog.headline.clone()),
                ("num_linkedin", num_linkedin.to_string()),
                ("num_twitter", num_twitter.to_string()),
                ("target_audience", target_audience.to_string()),
                ("timezone", timezone.to_string()),
                ("campaign_duration", duration_days.to_string()),
                ("start_date", start_date.format("%Y-%m-%d").to_string()),
                ("total_posts", (num_linkedin + num_twitter + 1).to_string()),
            ],
        )
    }

    fn default_overview(start_date: NaiveDate, duration_days: i64, total_posts: u32) -> CampaignOverview {
        CampaignOverview {
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: (start_date + Duration::days(duration_days))
                .format("%Y-%m-%d")
                .to_string(),
            total_posts,
            strategy: "Balanced cross-platform content distribution".into(),
        }
    }

    /// Deterministic weekly grid: blog the day after the start, LinkedIn on
    /// days 3 and 5, Twitter on days 2, 4 and 6.
    fn fallback_schedule(
        start_date: NaiveDate,
        duration_days: i64,
        num_linkedin: u32,
        num_twitter: u32,
    ) -> PostingSchedule {
        let blog_date = start_date + Duration::days(1);

        let linkedin_schedule = LINKEDIN_OFFSETS
            .iter()
            .take(num_linkedin as usize)
            .enumerate()
            .map(|(i, offset)| {
                let date = start_date + Duration::days(*offset);
                ScheduledPost {
                    post_index: i as u32 + 1,
                    publish_date: date.format("%Y-%m-%d").to_string(),
                    publish_time: "10:00".into(),
                    day_of_week: date.format("%A").to_string(),
                    post_type: "professional".into(),
                    rationale: "Business hours for professional audience".into(),
                    expected_engagement: "medium".into(),
                }
            })
            .collect();

        let twitter_schedule = TWITTER_OFFSETS
            .iter()
            .take(num_twitter as usize)
            .enumerate()
            .map(|(i, offset)| {
                let date = start_date + Duration::days(*offset);
                ScheduledPost {
                    post_index: i as u32 + 1,
                    publish_date: date.format("%Y-%m-%d").to_string(),
                    publish_time: "18:00".into(),
                    day_of_week: date.format("%A").to_string(),
                    post_type: "engagement".into(),
                    rationale: "Evening hours for higher Twitter engagement".into(),
                    expected_engagement: "medium".into(),
                }
            })
            .collect();

        PostingSchedule {
            campaign_overview: CampaignOverview {
                start_date: start_date.format("%Y-%m-%d").to_string(),
                end_date: (start_date + Duration::days(duration_days))
                    .format("%Y-%m-%d")
                    .to_string(),
                total_posts: num_linkedin + num_twitter + 1,
                strategy: "Standard weekly distribution - manual optimization recommended".into(),
            },
            blog_schedule: BlogSlot {
                publish_date: blog_date.format("%Y-%m-%d").to_string(),
                publish_time: "09:00".into(),
                day_of_week: blog_date.format("%A").to_string(),
                rationale: "Early-week morning slot for B2B audience engagement".into(),
                preparation_deadline: format!("{} 17:00", start_date.format("%Y-%m-%d")),
            },
            linkedin_schedule,
            twitter_schedule,
            optimization_tips: vec![
                "Post blog content early in the week".into(),
                "Schedule LinkedIn during business hours".into(),
                "Use Twitter for evening engagement".into(),
            ],
            success_metrics: vec![
                "Engagement rate".into(),
                "Click-through rate".into(),
                "Share count".into(),
            ],
            csv_export: Vec::new(),
        }
    }
}
