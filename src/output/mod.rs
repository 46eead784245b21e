//! Output file writers.
//!
//! Every run writes timestamped files into the configured output directory:
//! per-step JSON, the article as Markdown, the schedule as CSV, and a plain
//! text campaign summary. JSON and Markdown write failures are critical;
//! the CSV export is classified non-critical so a failed calendar file does
//! not sink an otherwise finished campaign.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::types::{BlogArticle, Campaign, ScheduleRow};
use crate::utilities::errors::PipelineError;

/// Fixed column layout of the schedule export.
pub const CSV_HEADER: &str =
    "Content_Type,Platform,Publish_Date,Publish_Time,Day_of_Week,Expected_Engagement,Notes";

/// Writes run artifacts into one directory with a shared timestamp.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    directory: PathBuf,
    stamp: String,
}

impl OutputWriter {
    /// Create a writer rooted at `directory`, suffixing every file with
    /// `stamp` (e.g. "20260805_091500").
    pub fn new(directory: impl Into<PathBuf>, stamp: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            stamp: stamp.into(),
        }
    }

    /// The path a file with this prefix and extension will be written to.
    pub fn path_for(&self, prefix: &str, extension: &str) -> PathBuf {
        self.directory
            .join(format!("{}_{}.{}", prefix, self.stamp, extension))
    }

    fn ensure_directory(&self) -> Result<(), PipelineError> {
        std::fs::create_dir_all(&self.directory).map_err(|e| PipelineError::FileWrite {
            path: self.directory.display().to_string(),
            source: e,
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), PipelineError> {
        self.ensure_directory()?;
        std::fs::write(path, content).map_err(|e| PipelineError::FileWrite {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write a step result as pretty-printed JSON.
    pub fn save_json<T: Serialize>(&self, prefix: &str, value: &T) -> Result<PathBuf, PipelineError> {
        let path = self.path_for(prefix, "json");
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| PipelineError::ResponseParse(e.to_string()))?;
        self.write(&path, &content)?;
        Ok(path)
    }

    /// Write the article as a Markdown file.
    pub fn save_markdown(&self, prefix: &str, article: &BlogArticle) -> Result<PathBuf, PipelineError> {
        let path = self.path_for(prefix, "md");
        self.write(&path, &render_markdown(article))?;
        Ok(path)
    }

    /// Write the schedule rows as a CSV file. Failures are non-critical.
    pub fn save_csv(&self, prefix: &str, rows: &[ScheduleRow]) -> Result<PathBuf, PipelineError> {
        let path = self.path_for(prefix, "csv");
        self.write(&path, &render_csv(rows))
            .map_err(|e| PipelineError::CsvExport(e.to_string()))?;
        Ok(path)
    }

    /// Write the plain text campaign summary.
    pub fn save_summary(&self, prefix: &str, campaign: &Campaign) -> Result<PathBuf, PipelineError> {
        let path = self.path_for(prefix, "txt");
        self.write(&path, &render_summary(campaign))?;
        Ok(path)
    }
}

/// Markdown layout of the article file.
pub fn render_markdown(article: &BlogArticle) -> String {
    format!(
        "# {headline}\n\n*{meta}*\n\n{body}\n\n**Reading time:** {reading}\n\n**Tags:** {tags}\n",
        headline = article.headline,
        meta = article.meta_description,
        body = article.article_content,
        reading = article.reading_time,
        tags = article.suggested_tags.join(", "),
    )
}

/// The CSV export with its fixed header row.
pub fn render_csv(rows: &[ScheduleRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let fields = [
            &row.content_type,
            &row.platform,
            &row.publish_date,
            &row.publish_time,
            &row.day_of_week,
            &row.expected_engagement,
            &row.notes,
        ];
        let line = fields
            .iter()
            .map(|f| csv_field(f))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Plain text rollup of the campaign.
pub fn render_summary(campaign: &Campaign) -> String {
    let mut out = String::new();
    out.push_str("CONTENT MARKETING CAMPAIGN SUMMARY\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    let blog = &campaign.blog_article;
    out.push_str("BLOG ARTICLE\n");
    out.push_str(&format!("Headline: {}\n", blog.headline));
    out.push_str(&format!("Word Count: {}\n", blog.word_count));
    out.push_str(&format!("Reading Time: {}\n\n", blog.reading_time));

    let social = &campaign.social_media.campaign_summary;
    out.push_str("SOCIAL MEDIA CONTENT\n");
    out.push_str(&format!("LinkedIn Posts: {}\n", social.total_linkedin_posts));
    out.push_str(&format!("Twitter Posts: {}\n\n", social.total_twitter_posts));

    let overview = &campaign.posting_schedule.campaign_overview;
    out.push_str("POSTING SCHEDULE\n");
    out.push_str(&format!("Campaign Start: {}\n", overview.start_date));
    out.push_str(&format!("Campaign End: {}\n", overview.end_date));
    out.push_str(&format!("Total Posts: {}\n", overview.total_posts));

    let metrics = &campaign.posting_schedule.success_metrics;
    if !metrics.is_empty() {
        out.push_str("\nSUCCESS METRICS\n");
        for metric in metrics {
            out.push_str(&format!("- {}\n", metric));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CampaignMetadata, CampaignOverview, CampaignSummary, PostingSchedule, SocialBundle,
        SocialSummary, TopicResearch,
    };
    use chrono::Utc;

    fn article() -> BlogArticle {
        BlogArticle {
            headline: "Automation Wins".into(),
            meta_description: "What automation buys you.".into(),
            article_content: "## Why automate\n\nBecause toil compounds.".into(),
            word_count: 420,
            suggested_tags: vec!["automation".into(), "ops".into()],
            reading_time: "2 min read".into(),
            ..Default::default()
        }
    }

    fn campaign() -> Campaign {
        Campaign {
            campaign_metadata: CampaignMetadata {
                generated_at: Utc::now(),
                pipeline_version: "1.0.0".into(),
                status: "completed".into(),
            },
            topic_research: TopicResearch::default(),
            blog_article: article(),
            social_media: SocialBundle {
                campaign_summary: SocialSummary {
                    total_linkedin_posts: 2,
                    total_twitter_posts: 3,
                    content_themes: Vec::new(),
                },
                ..Default::default()
            },
            posting_schedule: PostingSchedule {
                campaign_overview: CampaignOverview {
                    start_date: "2026-08-03".into(),
                    end_date: "2026-08-10".into(),
                    total_posts: 6,
                    ..Default::default()
                },
                success_metrics: vec!["Engagement rate".into()],
                ..Default::default()
            },
            campaign_summary: CampaignSummary::default(),
        }
    }

    #[test]
    fn test_markdown_layout() {
        let md = render_markdown(&article());
        assert!(md.starts_with("# Automation Wins\n"));
        assert!(md.contains("*What automation buys you.*"));
        assert!(md.contains("## Why automate"));
        assert!(md.contains("**Reading time:** 2 min read"));
        assert!(md.contains("**Tags:** automation, ops"));
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let rows = vec![ScheduleRow {
            content_type: "Blog Post".into(),
            platform: "Website".into(),
            publish_date: "2026-08-04".into(),
            publish_time: "09:00".into(),
            day_of_week: "Tuesday".into(),
            expected_engagement: "High".into(),
            notes: "early week, strong \"organic\" reach".into(),
        }];
        let csv = render_csv(&rows);
        let mut lines = csv.lines();

        assert_eq!(lines.next().unwrap(), CSV_HEADER);
        let row = lines.next().unwrap();
        assert!(row.starts_with("Blog Post,Website,2026-08-04,09:00,Tuesday,High,"));
        assert!(row.ends_with("\"early week, strong \"\"organic\"\" reach\""));
    }

    #[test]
    fn test_summary_sections() {
        let text = render_summary(&campaign());
        assert!(text.starts_with("CONTENT MARKETING CAMPAIGN SUMMARY\n"));
        assert!(text.contains("Headline: Automation Wins"));
        assert!(text.contains("LinkedIn Posts: 2"));
        assert!(text.contains("Twitter Posts: 3"));
        assert!(text.contains("Campaign Start: 2026-08-03"));
        assert!(text.contains("- Engagement rate"));
    }

    #[test]
    fn test_writer_creates_directory_and_timestamped_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let writer = OutputWriter::new(&root, "20260805_091500");

        let path = writer.save_json("topic_research", &TopicResearch::default()).unwrap();
        assert!(path.ends_with("topic_research_20260805_091500.json"));
        assert!(path.exists());

        let md = writer.save_markdown("blog_article", &article()).unwrap();
        assert!(md.ends_with("blog_article_20260805_091500.md"));

        let csv = writer.save_csv("posting_schedule", &[]).unwrap();
        let content = std::fs::read_to_string(csv).unwrap();
        assert_eq!(content.trim_end(), CSV_HEADER);
    }

    #[test]
    fn test_unwritable_directory_is_critical_for_json() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("file");
        std::fs::write(&blocked, "not a directory").unwrap();

        let writer = OutputWriter::new(blocked.join("out"), "stamp");
        let err = writer.save_json("campaign", &TopicResearch::default()).unwrap_err();
        assert!(err.is_critical());

        // The CSV variant of the same failure stays non-critical.
        let err = writer.save_csv("schedule", &[]).unwrap_err();
        assert!(!err.is_critical());
    }
}
