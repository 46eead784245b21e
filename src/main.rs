//! Content marketing pipeline binary.
//!
//! Runs the configured steps (topic research, blog writing, social posts,
//! posting schedule) and writes the results into the output directory.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` - required
//! - `OPENAI_MODEL` - completion model override (default: gpt-4o)
//! - `OPENAI_BASE_URL` - API root override
//! - `PIPELINE_TIMEOUT_SECS` - per-request timeout override
//! - `PIPELINE_MAX_RPM` - requests-per-minute cap
//! - `PIPELINE_CACHE` - truthy value enables response caching
//! - `RUST_LOG` - log filter (default: "warn")
//!
//! # Usage
//!
//! ```bash
//! content-pipeline --keywords "AI automation, B2B SaaS, productivity"
//! content-pipeline --keywords-file custom_keywords.txt --audience "tech startups"
//! content-pipeline --word-count 400 --voice casual --timezone EST
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use content_pipeline::cli::{self, Args};
use content_pipeline::config::{PipelineConfig, RuntimeEnv};
use content_pipeline::crew::ContentMarketingCrew;
use content_pipeline::llm::openai::OpenAiCompletion;
use content_pipeline::llm::RetryPolicy;
use content_pipeline::utilities::console::Console;

#[tokio::main]
async fn main() -> ExitCode {
    // .env first, so RUST_LOG set there is honored too.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let console = Console::new(args.quiet);

    match run(args, &console).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            console.failure(&format!("Pipeline failed: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, console: &Console) -> anyhow::Result<()> {
    let mut config =
        PipelineConfig::load(args.config.as_deref()).context("loading pipeline configuration")?;
    let env = RuntimeEnv::from_env();
    config.apply_env(&env);

    let seed_keywords = cli::resolve_keywords(&args)?;
    let params = args.to_params(seed_keywords);

    console.banner(
        &params.seed_keywords,
        &params.target_audience,
        params.word_count,
        &params.brand_voice,
        &params.timezone,
    );

    let retry = RetryPolicy {
        max_retries: config.pipeline.max_retries,
        initial_delay: Duration::from_secs(config.pipeline.retry_delay_secs),
    };
    let mut llm = OpenAiCompletion::from_env(
        config.model.name.clone(),
        &env,
        retry,
        config.pipeline.request_timeout_secs,
    )?;
    if let Some(ref base_url) = config.model.base_url {
        llm = llm.with_base_url(base_url);
    }

    let crew = ContentMarketingCrew::new(config, Arc::new(llm), console.clone());
    let output = crew.run(&params).await?;

    if let Some(ref campaign) = output.campaign {
        console.campaign_summary(campaign);
    }

    if !args.quiet {
        println!();
        println!("Content marketing pipeline completed successfully.");
        if let Some(path) = output.blog_markdown {
            println!("  Blog article: {}", path.display());
        }
        if let Some(path) = output.campaign_json {
            println!("  Full campaign: {}", path.display());
        }
        if let Some(path) = output.schedule_csv {
            println!("  Schedule: {}", path.display());
        }
    }

    Ok(())
}
