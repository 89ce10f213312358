use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vignette_check::config::{
    optional_client, require_client, GeneratorConfig, OutputPaths, RaterConfig, ValidatorConfig, DEFAULT_FRAME,
    DEFAULT_MODEL,
};
use vignette_check::llm::{ChatParams, Llm};
use vignette_check::pipeline::{run_generate, run_validate};
use vignette_check::prompt::{PromptTemplate, DEFAULT_GENERATION_TEMPLATE, DEFAULT_RATING_TEMPLATE};
use vignette_check::sentiment::{Lexicon, OutlierRule};

#[derive(Parser)]
#[command(name = "vignette-check", version, about = "Generate and validate survey vignettes")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// Directory for generated and validated files
    #[arg(long, global = true, default_value = "./output")]
    out_dir: PathBuf,
    /// Framing the vignettes are meant to carry
    #[arg(long, global = true, default_value = DEFAULT_FRAME)]
    frame: String,
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// OpenAI-compatible endpoint
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,
    #[arg(long, default_value_t = 4000)]
    max_tokens: u32,
    /// Prompt template with {n} {frame} {policies} {min_words} {max_words} {min_grade} {max_grade}
    #[arg(long)]
    prompt_file: Option<PathBuf>,
    #[arg(long, default_value_t = 6)]
    count: usize,
    #[arg(long, value_delimiter = ',', default_value = "immigration,healthcare,climate")]
    policies: Vec<String>,
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(long, default_value = DEFAULT_MODEL)]
    rating_model: String,
    #[arg(long, default_value_t = 0.0)]
    rating_temperature: f32,
    /// Prompt template with {text} {frame} {policy}
    #[arg(long)]
    rating_prompt_file: Option<PathBuf>,
    /// Skip the llm rating pass even when a key is configured
    #[arg(long, default_value_t = false)]
    skip_rating: bool,
    /// AFINN-format word<TAB>score file replacing the built-in lexicon
    #[arg(long)]
    lexicon: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutlierRule::FullBatch)]
    outlier_rule: OutlierRule,
}

#[derive(Subcommand)]
enum Cmd {
    /// Ask the model for a batch of vignettes and write them to disk
    Generate(GenerateArgs),
    /// Check previously generated vignettes and write the report
    Validate(ValidateArgs),
    /// generate, then validate
    Run {
        #[command(flatten)]
        generate: GenerateArgs,
        #[command(flatten)]
        validate: ValidateArgs,
    },
}

async fn generate_stage(cli: &Cli, args: &GenerateArgs, paths: &OutputPaths) -> Result<()> {
    let client = require_client(cli.api_key.clone(), cli.base_url.clone())?;
    let cfg = GeneratorConfig {
        params: ChatParams {
            model: args.model.clone(),
            temperature: args.temperature,
            max_tokens: Some(args.max_tokens),
        },
        template: PromptTemplate::load_or(args.prompt_file.as_deref(), DEFAULT_GENERATION_TEMPLATE)?,
        count: args.count,
        frame: cli.frame.clone(),
        policies: args.policies.clone(),
    };
    run_generate(&client, &cfg, paths).await.context("vignette generation failed")?;
    Ok(())
}

async fn validate_stage(cli: &Cli, args: &ValidateArgs, paths: &OutputPaths) -> Result<()> {
    let cfg = ValidatorConfig {
        lexicon: args.lexicon.as_deref().map(Lexicon::from_file).transpose()?,
        outlier_rule: args.outlier_rule,
    };

    let client = if args.skip_rating {
        None
    } else {
        optional_client(cli.api_key.clone(), cli.base_url.clone())
    };
    let rater_cfg = match client {
        Some(_) => Some(RaterConfig {
            params: ChatParams {
                model: args.rating_model.clone(),
                temperature: args.rating_temperature,
                max_tokens: None,
            },
            template: PromptTemplate::load_or(args.rating_prompt_file.as_deref(), DEFAULT_RATING_TEMPLATE)?,
            frame: cli.frame.clone(),
        }),
        None => None,
    };
    let rater = client
        .as_ref()
        .zip(rater_cfg.as_ref())
        .map(|(c, r)| (c as &dyn Llm, r));

    run_validate(rater, &cfg, paths).await.context("validation failed")?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = OutputPaths::new(&cli.out_dir);
    match &cli.cmd {
        Cmd::Generate(args) => generate_stage(&cli, args, &paths).await?,
        Cmd::Validate(args) => validate_stage(&cli, args, &paths).await?,
        Cmd::Run { generate, validate } => {
            generate_stage(&cli, generate, &paths).await?;
            validate_stage(&cli, validate, &paths).await?;
        }
    }
    Ok(())
}
