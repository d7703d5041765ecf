use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use mmd_core::config::{load_config, SummarizerBackend};
use mmd_core::pipeline::InteractionStatus;
use mmd_core::{InteractionRequest, LengthBounds, MmdConfig, ModelSelector, Pipeline};
use std::fs::OpenOptions;
use std::path::PathBuf;

mod interactive;
mod render;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SummarizerChoice {
    Local,
    Remote,
}

impl From<SummarizerChoice> for SummarizerBackend {
    fn from(choice: SummarizerChoice) -> Self {
        match choice {
            SummarizerChoice::Local => SummarizerBackend::Local,
            SummarizerChoice::Remote => SummarizerBackend::Remote,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "mmd",
    author,
    version,
    about = "Translate text, summarize the translation and score the summary"
)]
struct Cli {
    #[clap(long, short, default_value = "mmd.yaml", help = "Path to the YAML configuration file")]
    config: PathBuf,

    #[clap(
        long,
        short,
        value_parser = parse_log_level,
        help = "Log level (defaults to logging.level from the configuration)"
    )]
    log_level: Option<LevelFilter>,

    #[clap(long, short, conflicts_with = "text_file", help = "Process this text once and exit")]
    text: Option<String>,

    #[clap(long, help = "Process the contents of this file once and exit")]
    text_file: Option<PathBuf>,

    #[clap(long, help = "Output language code (e.g. fra, spa, de)")]
    target_lang: Option<String>,

    #[clap(long, short, help = "Translation model: 0/seamless, 1/opus-mt or 2/madlad")]
    model: Option<ModelSelector>,

    #[clap(long, value_parser = parse_min_length, help = "Minimum summary length in words (5-100)")]
    min_length: Option<usize>,

    #[clap(long, value_parser = parse_max_length, help = "Maximum summary length in words (5-200)")]
    max_length: Option<usize>,

    #[clap(long, help = "Print the one-shot result as JSON")]
    json: bool,

    #[clap(long, value_enum, help = "Summarization backend")]
    summarizer: Option<SummarizerChoice>,
}

fn parse_log_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' is not one of off, error, warn, info, debug, trace", value))
}

fn parse_length(value: &str, (low, high): (usize, usize)) -> Result<usize, String> {
    let length: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if (low..=high).contains(&length) {
        Ok(length)
    } else {
        Err(format!("{} is not between {} and {}", length, low, high))
    }
}

fn parse_min_length(value: &str) -> Result<usize, String> {
    parse_length(value, interactive::MIN_LENGTH_RANGE)
}

fn parse_max_length(value: &str) -> Result<usize, String> {
    parse_length(value, interactive::MAX_LENGTH_RANGE)
}

impl Cli {
    fn is_one_shot(&self) -> bool {
        self.text.is_some() || self.text_file.is_some()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(choice) = cli.summarizer {
        config.summarization.backend = choice.into();
    }

    init_logging(&cli, &config)?;
    log::info!("Starting mmd with configuration {}", cli.config.display());

    let pipeline = Pipeline::from_config(&config).context("Failed to set up the pipeline")?;

    if cli.is_one_shot() {
        run_once(&cli, &config, &pipeline).await
    } else {
        interactive::run_session(&pipeline, &config, cli.model).await
    }
}

fn init_logging(cli: &Cli, config: &MmdConfig) -> Result<()> {
    let (log_level_filter, invalid_config_level) = match cli.log_level {
        Some(level) => (level, None),
        None => match config.logging.level.parse::<LevelFilter>() {
            Ok(level) => (level, None),
            Err(_) => (LevelFilter::Info, Some(config.logging.level.as_str())),
        },
    };
    let warn_invalid_level = || {
        if let Some(level) = invalid_config_level {
            log::warn!("Unknown logging.level '{}' in configuration, using info", level);
        }
    };

    if cli.is_one_shot() && config.logging.file.is_none() {
        env_logger::Builder::new()
            .filter_level(log_level_filter)
            .init();
        warn_invalid_level();
        return Ok(());
    }

    // Interactive mode logs to a file to keep the prompts clean
    let path = config
        .logging
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from("mmd.log"));
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    warn_invalid_level();
    Ok(())
}

async fn run_once(cli: &Cli, config: &MmdConfig, pipeline: &Pipeline) -> Result<()> {
    let text = match (&cli.text, &cli.text_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => String::new(),
    };

    let selector = match cli.model {
        Some(selector) => selector,
        None => ModelSelector::try_from(config.translation.default_model as i64)?,
    };
    let bounds = LengthBounds::new(
        cli.min_length.unwrap_or(config.summarization.min_length),
        cli.max_length.unwrap_or(config.summarization.max_length),
    )?;

    let request = InteractionRequest {
        text,
        target_language: cli
            .target_lang
            .clone()
            .unwrap_or_else(|| config.translation.default_target_language.clone()),
        selector,
        bounds,
    };

    let report = pipeline.run(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::report(&report));
    }

    if report.status == InteractionStatus::EmptyInput {
        log::warn!("No input text was provided");
    }
    Ok(())
}
