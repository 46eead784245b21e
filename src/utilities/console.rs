//! Console progress output.
//!
//! Human-facing run progress: the banner, one line per pipeline step, and
//! the closing campaign summary. `--quiet` silences everything here;
//! diagnostics go through the `log` macros instead.

use crate::types::Campaign;

/// ANSI colors used for step output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Yellow,
    Red,
    Cyan,
    BoldWhite,
}

impl Color {
    fn ansi_code(&self) -> &'static str {
        match self {
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Red => "\x1b[31m",
            Self::Cyan => "\x1b[36m",
            Self::BoldWhite => "\x1b[1;37m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Progress printer honoring quiet mode.
#[derive(Debug, Clone)]
pub struct Console {
    /// When set, nothing is printed.
    pub quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn print(&self, content: &str, color: Color) {
        if !self.quiet {
            println!("{}{}{}", color.ansi_code(), content, RESET);
        }
    }

    /// Opening banner with the run parameters.
    pub fn banner(&self, keywords: &[String], audience: &str, word_count: u32, voice: &str, timezone: &str) {
        if self.quiet {
            return;
        }
        let rule = "=".repeat(60);
        self.print(&rule, Color::BoldWhite);
        self.print("CONTENT MARKETING PIPELINE", Color::BoldWhite);
        self.print(&rule, Color::BoldWhite);

        let shown: Vec<&str> = keywords.iter().take(3).map(String::as_str).collect();
        let suffix = if keywords.len() > 3 { ", ..." } else { "" };
        println!();
        self.print(&format!("Seed keywords: {}{}", shown.join(", "), suffix), Color::Cyan);
        self.print(&format!("Target audience: {}", audience), Color::Cyan);
        self.print(&format!("Blog word count: {}", word_count), Color::Cyan);
        self.print(&format!("Brand voice: {}", voice), Color::Cyan);
        self.print(&format!("Timezone: {}", timezone), Color::Cyan);
        println!();
    }

    /// Announce a pipeline step.
    pub fn step(&self, number: usize, message: &str) {
        self.print(&format!("Step {}: {}", number, message), Color::BoldWhite);
    }

    /// Report a finished step, typically with the output path.
    pub fn step_done(&self, message: &str) {
        self.print(&format!("  + {}", message), Color::Green);
    }

    /// Report a recovered problem inside a step.
    pub fn step_warn(&self, message: &str) {
        self.print(&format!("  ! {}", message), Color::Yellow);
    }

    /// Report a run failure.
    pub fn failure(&self, message: &str) {
        // Failures print even in quiet mode.
        eprintln!("{}{}{}", Color::Red.ansi_code(), message, RESET);
    }

    /// Closing campaign summary.
    pub fn campaign_summary(&self, campaign: &Campaign) {
        if self.quiet {
            return;
        }
        let rule = "=".repeat(60);
        println!();
        self.print(&rule, Color::BoldWhite);
        self.print("CAMPAIGN SUMMARY", Color::BoldWhite);
        self.print(&rule, Color::BoldWhite);

        let topics = &campaign.topic_research.trending_topics;
        if let Some(top) = topics.first() {
            self.print(
                &format!("Research: {} trending topics, top: '{}'", topics.len(), top.title),
                Color::Cyan,
            );
        }

        let blog = &campaign.blog_article;
        if !blog.headline.is_empty() {
            self.print(&format!("Blog: '{}'", blog.headline), Color::Cyan);
            self.print(
                &format!("  {} words, {}", blog.word_count, blog.reading_time),
                Color::Cyan,
            );
        }

        let social = &campaign.social_media.campaign_summary;
        self.print(
            &format!(
                "Social media: {} LinkedIn + {} Twitter posts",
                social.total_linkedin_posts, social.total_twitter_posts
            ),
            Color::Cyan,
        );

        let overview = &campaign.posting_schedule.campaign_overview;
        self.print(
            &format!(
                "Schedule: {} to {}, {} posts total",
                overview.start_date, overview.end_date, overview.total_posts
            ),
            Color::Cyan,
        );
    }
}
