//! Command-line interface.
//!
//! Flags mirror the pipeline inputs: seed keywords (inline, from a file, or
//! from the sample data fallback), audience, word count, brand voice,
//! timezone, an optional custom configuration file, and quiet mode.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::crew::PipelineParams;
use crate::utilities::errors::PipelineError;

/// Default keyword source checked when no flag is given.
const SAMPLE_KEYWORDS_FILE: &str = "sample_data/seed_keywords.txt";

/// Keywords used when no source is available at all.
const DEFAULT_KEYWORDS: [&str; 3] = ["business automation", "digital marketing", "productivity tools"];

/// Brand voice for the blog article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrandVoice {
    Professional,
    Casual,
    Authoritative,
    Friendly,
    Technical,
}

impl std::fmt::Display for BrandVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Authoritative => "authoritative",
            Self::Friendly => "friendly",
            Self::Technical => "technical",
        };
        write!(f, "{}", name)
    }
}

/// Content marketing pipeline: topic research, a 300-600 word blog article,
/// LinkedIn and Twitter/X posts, and a posting schedule.
#[derive(Debug, Parser)]
#[command(name = "content-pipeline", version)]
pub struct Args {
    /// Comma-separated seed keywords (e.g. "AI, automation, business")
    #[arg(short, long)]
    pub keywords: Option<String>,

    /// Path to a file containing seed keywords, one per line
    #[arg(long, value_name = "FILE")]
    pub keywords_file: Option<PathBuf>,

    /// Additional industry context for topic research
    #[arg(short = 'i', long, default_value = "")]
    pub industry_context: String,

    /// Target audience description
    #[arg(short, long, default_value = "B2B professionals")]
    pub audience: String,

    /// Target blog word count, 300-600
    #[arg(short, long, default_value_t = 500)]
    pub word_count: u32,

    /// Brand voice style
    #[arg(short = 'v', long, value_enum, default_value_t = BrandVoice::Professional)]
    pub voice: BrandVoice,

    /// Target timezone for scheduling
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Path to a custom pipeline configuration YAML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Reduce output verbosity
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Assemble the run parameters from the parsed flags and resolved
    /// keywords.
    pub fn to_params(&self, seed_keywords: Vec<String>) -> PipelineParams {
        PipelineParams {
            seed_keywords,
            industry_context: self.industry_context.clone(),
            target_audience: self.audience.clone(),
            word_count: self.word_count,
            brand_voice: self.voice.to_string(),
            timezone: self.timezone.clone(),
        }
    }
}

/// Resolve the seed keywords from the configured source.
///
/// Priority: `--keywords-file`, then `--keywords`, then the sample data
/// file (first five entries), then built-in defaults.
pub fn resolve_keywords(args: &Args) -> Result<Vec<String>, PipelineError> {
    if let Some(ref path) = args.keywords_file {
        let keywords = read_keywords_file(path)?;
        if keywords.is_empty() {
            return Err(PipelineError::InvalidKeywords(format!(
                "{} contains no keywords",
                path.display()
            )));
        }
        return Ok(keywords);
    }

    if let Some(ref inline) = args.keywords {
        let keywords = split_keywords(inline);
        if keywords.is_empty() {
            return Err(PipelineError::InvalidKeywords(
                "--keywords contained no usable entries".into(),
            ));
        }
        return Ok(keywords);
    }

    let sample = Path::new(SAMPLE_KEYWORDS_FILE);
    if sample.is_file() {
        let mut keywords = read_keywords_file(sample)?;
        keywords.truncate(5);
        if !keywords.is_empty() {
            return Ok(keywords);
        }
    }

    log::warn!(
        "{} not found, falling back to default keywords",
        SAMPLE_KEYWORDS_FILE
    );
    Ok(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
}

/// Split a comma-separated keyword list, dropping empty entries.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// Read keywords from a file: one per line, skipping blanks and `#`
/// comments.
pub fn read_keywords_file(path: &Path) -> Result<Vec<String>, PipelineError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::InvalidKeywords(format!("cannot read {}: {}", path.display(), e))
    })?;
    Ok(parse_keyword_lines(&content))
}

fn parse_keyword_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("content-pipeline").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.audience, "B2B professionals");
        assert_eq!(args.word_count, 500);
        assert_eq!(args.voice, BrandVoice::Professional);
        assert_eq!(args.timezone, "UTC");
        assert!(!args.quiet);
        assert!(args.keywords.is_none());
    }

    #[test]
    fn test_flag_parsing() {
        let args = parse(&[
            "-k", "AI, automation",
            "-a", "tech startups",
            "-w", "400",
            "-v", "casual",
            "--timezone", "EST",
            "-q",
        ]);
        assert_eq!(args.keywords.as_deref(), Some("AI, automation"));
        assert_eq!(args.audience, "tech startups");
        assert_eq!(args.word_count, 400);
        assert_eq!(args.voice, BrandVoice::Casual);
        assert_eq!(args.timezone, "EST");
        assert!(args.quiet);
    }

    #[test]
    fn test_unknown_voice_rejected() {
        let result = Args::try_parse_from(["content-pipeline", "--voice", "sarcastic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_split_keywords_drops_empty_entries() {
        assert_eq!(
            split_keywords(" AI , , automation,,business "),
            vec!["AI", "automation", "business"]
        );
        assert!(split_keywords(" , ,").is_empty());
    }

    #[test]
    fn test_keywords_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# seed keywords").unwrap();
        writeln!(file, "business automation").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  digital marketing  ").unwrap();

        let keywords = read_keywords_file(file.path()).unwrap();
        assert_eq!(keywords, vec!["business automation", "digital marketing"]);
    }

    #[test]
    fn test_missing_keywords_file_is_invalid_keywords() {
        let args = parse(&["--keywords-file", "/nonexistent/keywords.txt"]);
        let err = resolve_keywords(&args).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidKeywords(_)));
        assert!(err.is_critical());
    }

    #[test]
    fn test_to_params_uses_voice_name() {
        let args = parse(&["-v", "technical"]);
        let params = args.to_params(vec!["ai".into()]);
        assert_eq!(params.brand_voice, "technical");
        assert_eq!(params.seed_keywords, vec!["ai"]);
    }
}
