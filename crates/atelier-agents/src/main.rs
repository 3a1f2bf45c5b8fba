use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;

use atelier_agents::backend::ChatBackend;
use atelier_agents::config::BackendConfig;
use atelier_agents::prompts::{classic_pipeline, classifier_pipeline, PROMPT_VERSION};
use refinement::{RoundController, RunParams, Topic};

/// Which pipeline variant to run.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PipelineArg {
    /// Bare-topic entry; asking turn from round 1.
    Classic,
    /// Pre-split entry: one-shot topic classifiers before round 1.
    Classifier,
}

#[derive(Parser, Debug)]
#[command(
    name = "atelier-agents",
    about = "Refine a topic into converged style and object directives through a multi-round agent debate"
)]
struct Args {
    /// Topic to refine, e.g. "Fauvism, a fox"
    #[arg(long)]
    prompt: String,

    /// Output directory for run logs and artifacts
    #[arg(long, default_value = "logs_run")]
    outdir: PathBuf,

    /// Number of refinement rounds
    #[arg(long, default_value_t = 3)]
    rounds: u32,

    /// Pipeline variant
    #[arg(long, value_enum, default_value = "classifier")]
    pipeline: PipelineArg,

    /// TOML file overriding the backend defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = match args.config {
        Some(ref path) => BackendConfig::load(path)?,
        None => BackendConfig::default(),
    };
    info!(
        url = %config.url,
        model = %config.model,
        prompt_version = PROMPT_VERSION,
        "atelier backend configured"
    );

    let backend = ChatBackend::new(config);
    let pipeline = match args.pipeline {
        PipelineArg::Classic => classic_pipeline(),
        PipelineArg::Classifier => classifier_pipeline(),
    };

    let topic = Topic::new(&args.prompt)?;
    let params = RunParams::new(topic, args.rounds, &args.outdir)?;
    let mut controller = RoundController::new(&backend, pipeline, params)?;

    let outcome = controller.run().await?;
    info!("{}", outcome.summary_line());
    println!("{}", outcome.style_directive);
    println!("{}", outcome.object_directive);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = Args::try_parse_from(["atelier-agents", "--prompt", "Fauvism, a fox"]).unwrap();
        assert_eq!(args.prompt, "Fauvism, a fox");
        assert_eq!(args.rounds, 3);
        assert_eq!(args.outdir, PathBuf::from("logs_run"));
        assert!(matches!(args.pipeline, PipelineArg::Classifier));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_cli_requires_prompt() {
        assert!(Args::try_parse_from(["atelier-agents"]).is_err());
    }

    #[test]
    fn test_cli_selects_classic_pipeline() {
        let args = Args::try_parse_from([
            "atelier-agents",
            "--prompt",
            "t",
            "--pipeline",
            "classic",
            "--rounds",
            "1",
        ])
        .unwrap();
        assert!(matches!(args.pipeline, PipelineArg::Classic));
        assert_eq!(args.rounds, 1);
    }
}
