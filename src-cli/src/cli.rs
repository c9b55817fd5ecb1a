use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scholariq_core::domain::{CitationStyle, ModelTier};

#[derive(Debug, Parser)]
#[command(name = "scholariq", version, about = "Citation-aware long-form writing")]
pub struct Cli {
    /// Debug logging (overridden by SCHOLARIQ_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Extra TOML file layered over the user and project config.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a draft or chapter from a JSON writing request, then score its citations.
    Write(WriteArgs),
    /// Generate an outline from a JSON outline request, then score its citations.
    Outline(OutlineArgs),
    /// Score an existing document without calling the generator.
    Score(ScoreArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// The full response as JSON.
    #[default]
    Json,
    /// Annotated text only.
    Text,
    /// Markdown citation report.
    Markdown,
}

#[derive(Debug, clap::Args)]
pub struct WriteArgs {
    /// Path to a WritingRequest JSON file (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,

    /// Override the request's model tier.
    #[arg(long, value_parser = parse_model)]
    pub model: Option<ModelTier>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, clap::Args)]
pub struct OutlineArgs {
    /// Path to an OutlineRequest JSON file (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,

    #[arg(long, value_parser = parse_model)]
    pub model: Option<ModelTier>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, clap::Args)]
pub struct ScoreArgs {
    /// Text file to score (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    pub text: PathBuf,

    #[arg(long, value_parser = parse_style)]
    pub style: CitationStyle,

    #[arg(long)]
    pub allow_old: bool,

    /// Scoring year; defaults to the current UTC year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Recency window in years; defaults to the configured window.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub window: Option<u32>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

fn parse_style(raw: &str) -> Result<CitationStyle, String> {
    CitationStyle::ALL
        .into_iter()
        .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            let known = CitationStyle::ALL.map(|s| s.as_str()).join(", ");
            format!("unknown citation style {raw:?}; expected one of: {known}")
        })
}

fn parse_model(raw: &str) -> Result<ModelTier, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pro" => Ok(ModelTier::Pro),
        "flash" => Ok(ModelTier::Flash),
        _ => Err(format!("unknown model {raw:?}; expected pro or flash")),
    }
}
