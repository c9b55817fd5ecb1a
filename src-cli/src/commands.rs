use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use scholariq_ai::config::ScholariqConfig;
use scholariq_ai::llm::gemini_llm::GeminiLlm;
use scholariq_ai::write::{current_year, WriteSettings, WritingService};
use scholariq_core::domain::{OutlineRequest, ScoreResult, ScoringOptions, WritingRequest};
use scholariq_core::pipeline::score_document;
use scholariq_core::report::{annotate_text, render_score_markdown};
use scholariq_core::validate::{ensure_valid_outline_request, ensure_valid_writing_request};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cli::{OutlineArgs, OutputFormat, ScoreArgs, WriteArgs};

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).with_context(|| format!("invalid request JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

fn emit<T: Serialize>(
    format: OutputFormat,
    response: &T,
    annotated: &str,
    score: &ScoreResult,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(response),
        OutputFormat::Text => {
            println!("{annotated}");
            Ok(())
        }
        OutputFormat::Markdown => {
            print!("{}", render_score_markdown(score));
            Ok(())
        }
    }
}

fn writing_service(config: &ScholariqConfig) -> anyhow::Result<WritingService> {
    let client = config
        .gemini
        .client()
        .context("gemini is not configured for generation")?;
    tracing::debug!(base_url = client.base_url(), "using gemini endpoint");
    Ok(WritingService::new(
        Arc::new(GeminiLlm::new(client)),
        WriteSettings::from(config),
    ))
}

pub fn write(args: &WriteArgs, config: &ScholariqConfig) -> anyhow::Result<()> {
    let mut req: WritingRequest = read_json(&args.request)?;
    if args.model.is_some() {
        req.model = args.model;
    }
    ensure_valid_writing_request(&req)?;
    let service = writing_service(config)?;
    let res = service.generate_writing(&req)?;
    emit(args.format, &res, &res.annotated_text, &res.score)
}

pub fn outline(args: &OutlineArgs, config: &ScholariqConfig) -> anyhow::Result<()> {
    let mut req: OutlineRequest = read_json(&args.request)?;
    if args.model.is_some() {
        req.model = args.model;
    }
    ensure_valid_outline_request(&req)?;
    let service = writing_service(config)?;
    let res = service.generate_outline(&req)?;
    emit(args.format, &res, &res.annotated_text, &res.score)
}

pub fn score(args: &ScoreArgs, config: &ScholariqConfig) -> anyhow::Result<()> {
    let text = read_input(&args.text)?;
    let options = ScoringOptions::new(args.style, args.year.unwrap_or_else(current_year))
        .with_allow_old_citations(args.allow_old)
        .with_recency_window(args.window.unwrap_or(config.citations.recency_window_years));
    let result = score_document(&text, &options)?;
    let annotated = annotate_text(&text, &result);
    emit(args.format, &result, &annotated, &result)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use scholariq_core::error::{AppError, VALIDATION_FAILED};

    use super::*;

    fn request_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(json.as_bytes()).expect("write");
        file
    }

    fn write_args(path: &Path) -> WriteArgs {
        WriteArgs {
            request: path.to_path_buf(),
            model: None,
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn invalid_request_is_reported_before_the_client_is_built() {
        let file = request_file(
            r#"{"topic":"","category":"academic","writing_type":"Essay","citation_style":"APA","word_count":0}"#,
        );
        let config = ScholariqConfig::default();
        assert!(!config.gemini.is_configured());

        let err = write(&write_args(file.path()), &config).expect_err("invalid request");
        let app = err.downcast_ref::<AppError>().expect("app error");
        assert_eq!(app.code, VALIDATION_FAILED);
        assert_eq!(app.violated_fields(), vec!["topic", "word_count"]);
    }

    #[test]
    fn invalid_outline_is_reported_before_the_client_is_built() {
        let file = request_file(
            r#"{"topic":"Sleep","category":"academic","writing_type":"sonnet","citation_style":"APA"}"#,
        );
        let args = OutlineArgs {
            request: file.path().to_path_buf(),
            model: None,
            format: OutputFormat::Json,
        };
        let err = outline(&args, &ScholariqConfig::default()).expect_err("invalid request");
        let app = err.downcast_ref::<AppError>().expect("app error");
        assert_eq!(app.code, VALIDATION_FAILED);
        assert_eq!(app.violated_fields(), vec!["writing_type"]);
    }

    #[test]
    fn valid_request_without_a_key_fails_on_configuration() {
        let file = request_file(
            r#"{"topic":"Sleep","category":"academic","writing_type":"Essay","citation_style":"APA","word_count":800}"#,
        );
        let err = write(&write_args(file.path()), &ScholariqConfig::default()).expect_err("no key");
        assert!(format!("{err:#}").contains("gemini is not configured"));
    }
}
