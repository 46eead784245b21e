//! The content marketing crew.
//!
//! Owns the four agents and runs the configured steps in order: topic
//! research, blog writing, social post generation, schedule generation.
//! Every step writes its result to a timestamped file; when all four steps
//! run, the results are compiled into the campaign package and summary.
//!
//! Execution is strictly sequential. Critical errors abort the run;
//! non-critical ones (unparseable responses, CSV export) are logged and
//! recovered through fallbacks.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, Utc};

use crate::agents::{BlogWriterAgent, SchedulerAgent, SocialPostAgent, TopicResearchAgent};
use crate::config::{PipelineConfig, PipelineStep};
use crate::llm::CompletionModel;
use crate::output::OutputWriter;
use crate::types::{
    BlogArticle, Campaign, CampaignMetadata, CampaignSummary, PostingSchedule, SocialBundle,
    TopicResearch,
};
use crate::utilities::console::Console;
use crate::utilities::errors::PipelineError;

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineParams {
    pub seed_keywords: Vec<String>,
    pub industry_context: String,
    pub target_audience: String,
    /// Target article length, 300-600 words.
    pub word_count: u32,
    pub brand_voice: String,
    /// Opaque timezone label passed to the scheduling prompt.
    pub timezone: String,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            seed_keywords: Vec::new(),
            industry_context: String::new(),
            target_audience: "B2B professionals".into(),
            word_count: 500,
            brand_voice: "professional".into(),
            timezone: "UTC".into(),
        }
    }
}

/// Results of a run: whatever steps were configured, plus the campaign
/// package when the full pipeline ran.
#[derive(Debug, Default)]
pub struct WorkflowOutput {
    pub research: Option<TopicResearch>,
    pub blog: Option<BlogArticle>,
    pub social: Option<SocialBundle>,
    pub schedule: Option<PostingSchedule>,
    pub campaign: Option<Campaign>,
    /// Path of the Markdown article, when written.
    pub blog_markdown: Option<PathBuf>,
    /// Path of the CSV schedule, when written.
    pub schedule_csv: Option<PathBuf>,
    /// Path of the campaign package, when written.
    pub campaign_json: Option<PathBuf>,
}

/// Orchestrates the four agents over the configured steps.
pub struct ContentMarketingCrew {
    config: PipelineConfig,
    researcher: TopicResearchAgent,
    writer: BlogWriterAgent,
    social_manager: SocialPostAgent,
    scheduler: SchedulerAgent,
    console: Console,
}

impl std::fmt::Debug for ContentMarketingCrew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentMarketingCrew")
            .field("steps", &self.config.pipeline.steps)
            .field("model", &self.config.model.name)
            .finish_non_exhaustive()
    }
}

impl ContentMarketingCrew {
    /// Build the crew from its configuration and a completion backend.
    pub fn new(config: PipelineConfig, llm: Arc<dyn CompletionModel>, console: Console) -> Self {
        let researcher = TopicResearchAgent::new(
            &config.agents.researcher,
            &config.prompts.topic_research,
            llm.clone(),
        );
        let writer = BlogWriterAgent::new(
            &config.agents.writer,
            &config.prompts.blog_writing,
            llm.clone(),
        );
        let social_manager = SocialPostAgent::new(
            &config.agents.social_manager,
            &config.prompts.linkedin_posts,
            &config.prompts.twitter_posts,
            llm.clone(),
        );
        let scheduler = SchedulerAgent::new(
            &config.agents.scheduler,
            &config.prompts.posting_schedule,
            llm,
        );

        Self {
            config,
            researcher,
            writer,
            social_manager,
            scheduler,
            console,
        }
    }

    /// Check run inputs before any model call is made.
    pub fn validate_params(params: &PipelineParams) -> Result<(), PipelineError> {
        let usable = params
            .seed_keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .count();
        if usable == 0 {
            return Err(PipelineError::InvalidKeywords(
                "at least one non-empty seed keyword is required".into(),
            ));
        }
        if !(300..=600).contains(&params.word_count) {
            return Err(PipelineError::InvalidWordCount(params.word_count));
        }
        Ok(())
    }

    /// Run the configured steps and write their outputs.
    pub async fn run(&self, params: &PipelineParams) -> Result<WorkflowOutput, PipelineError> {
        Self::validate_params(params)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let out = OutputWriter::new(&self.config.output.directory, stamp);
        let steps = &self.config.pipeline.steps;
        let mut output = WorkflowOutput::default();

        if steps.contains(&PipelineStep::Research) {
            self.console.step(1, "Researching trending topics...");
            let research = self
                .researcher
                .research_topics(&params.seed_keywords, &params.industry_context)
                .await?;
            let path = out.save_json("topic_research", &research)?;
            self.console
                .step_done(&format!("topic research saved to {}", path.display()));
            output.research = Some(research);
        }

        if steps.contains(&PipelineStep::Blog) {
            if let Some(ref research) = output.research {
                self.console.step(2, "Writing blog article...");
                let topic = research.top_topic().ok_or_else(|| PipelineError::EmptyStepOutput {
                    step: "topic research",
                    reason: "no trending topics available for blog writing".into(),
                })?;
                let blog = self
                    .writer
                    .write_blog_article(topic, params.word_count, &params.brand_voice)
                    .await?;
                if let Err(e) = crate::agents::blog_writer::seo_check(&blog) {
                    // Non-critical: the article ships as written.
                    log::warn!("{}", e);
                    self.console.step_warn(&e.to_string());
                }
                out.save_json("blog_article", &blog)?;
                let md_path = out.save_markdown("blog_article", &blog)?;
                self.console
                    .step_done(&format!("blog article saved to {}", md_path.display()));
                output.blog_markdown = Some(md_path);
                output.blog = Some(blog);
            }
        }

        if steps.contains(&PipelineStep::Social) {
            if let Some(ref blog) = output.blog {
                self.console.step(3, "Creating social media posts...");
                let linkedin = self
                    .social_manager
                    .generate_linkedin_posts(blog, self.config.pipeline.linkedin_post_count)
                    .await?;
                let twitter = self
                    .social_manager
                    .generate_twitter_posts(blog, self.config.pipeline.twitter_post_count)
                    .await?;
                let bundle = SocialBundle::new(linkedin, twitter);
                let path = out.save_json("social_posts", &bundle)?;
                self.console
                    .step_done(&format!("social posts saved to {}", path.display()));
                output.social = Some(bundle);
            }
        }

        if steps.contains(&PipelineStep::Schedule) {
            if let Some(ref blog) = output.blog {
                self.console.step(4, "Creating posting schedule...");
                let schedule = self
                    .scheduler
                    .generate_posting_schedule(
                        blog,
                        output.social.as_ref(),
                        &params.target_audience,
                        &params.timezone,
                        self.config.pipeline.campaign_duration_days,
                        Local::now().date_naive(),
                    )
                    .await?;
                out.save_json("posting_schedule", &schedule)?;
                match out.save_csv("posting_schedule", &schedule.csv_export) {
                    Ok(path) => {
                        self.console
                            .step_done(&format!("schedule saved to {}", path.display()));
                        output.schedule_csv = Some(path);
                    }
                    Err(e) => {
                        // Non-critical: the JSON schedule is already on disk.
                        log::warn!("schedule CSV export failed: {}", e);
                        self.console.step_warn("could not write the CSV schedule");
                    }
                }
                output.schedule = Some(schedule);
            }
        }

        if let (Some(research), Some(blog), Some(social), Some(schedule)) = (
            output.research.as_ref(),
            output.blog.as_ref(),
            output.social.as_ref(),
            output.schedule.as_ref(),
        ) {
            self.console.step(5, "Compiling final campaign...");
            let campaign = Self::compile_campaign(research, blog, social, schedule);
            let path = out.save_json("complete_campaign", &campaign)?;
            out.save_summary("campaign_summary", &campaign)?;
            self.console
                .step_done(&format!("campaign package saved to {}", path.display()));
            output.campaign_json = Some(path);
            output.campaign = Some(campaign);
        }

        Ok(output)
    }

    /// Bundle the step results into the campaign package.
    fn compile_campaign(
        research: &TopicResearch,
        blog: &BlogArticle,
        social: &SocialBundle,
        schedule: &PostingSchedule,
    ) -> Campaign {
        let total_content_pieces = 1
            + social.campaign_summary.total_linkedin_posts
            + social.campaign_summary.total_twitter_posts;

        Campaign {
            campaign_metadata: CampaignMetadata {
                generated_at: Utc::now(),
                pipeline_version: crate::VERSION.into(),
                status: "completed".into(),
            },
            topic_research: research.clone(),
            blog_article: blog.clone(),
            social_media: social.clone(),
            posting_schedule: schedule.clone(),
            campaign_summary: CampaignSummary {
                total_content_pieces,
                estimated_reach: "Varies by audience size and engagement".into(),
                campaign_duration: schedule.campaign_overview.end_date.clone(),
                key_topics: research.trending_topics.iter().take(3).cloned().collect(),
                success_metrics: schedule.success_metrics.clone(),
            },
        }
    }
}
