use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scholariq_core::domain::{
    CitationStyle, ModelTier, OutlineRequest, ScoreResult, ScoringOptions, WritingRequest,
};
use scholariq_core::error::{AppError, GENERATION_TIMEOUT, GENERATION_UNAVAILABLE};
use scholariq_core::pipeline::score_document;
use scholariq_core::report::annotate_text;
use scholariq_core::validate::{ensure_valid_outline_request, ensure_valid_writing_request};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::ScholariqConfig;
use crate::guardrails::ensure_generated_text;
use crate::llm::{GenerationParams, Llm};
use crate::prompts;

pub const OUTLINE_TEMPERATURE: f32 = 0.3;
pub const OUTLINE_MAX_TOKENS: u32 = 4096;
pub const DRAFT_TEMPERATURE: f32 = 0.4;
pub const DRAFT_MAX_TOKENS: u32 = 16384;
const DRAFT_MIN_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WritingResponse {
    pub text: String,
    /// `text` plus a citation-quality warning when the score is not a pass.
    pub annotated_text: String,
    pub text_sha256: String,
    pub model: ModelTier,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineResponse {
    pub outline: String,
    pub annotated_text: String,
    pub text_sha256: String,
    pub model: ModelTier,
    pub score: ScoreResult,
}

/// Orchestrator settings, normally taken from [`ScholariqConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSettings {
    pub timeout: Duration,
    pub retries: u32,
    pub default_model: ModelTier,
    pub recency_window_years: u32,
}

impl Default for WriteSettings {
    fn default() -> Self {
        WriteSettings::from(&ScholariqConfig::default())
    }
}

impl From<&ScholariqConfig> for WriteSettings {
    fn from(config: &ScholariqConfig) -> Self {
        Self {
            timeout: config.generation.timeout(),
            retries: config.generation.retries,
            default_model: config.generation.default_model,
            recency_window_years: config.citations.recency_window_years,
        }
    }
}

/// Token budget for a draft: roughly two tokens per requested word plus headroom.
pub fn draft_max_tokens(word_count: u32) -> u32 {
    word_count
        .saturating_mul(2)
        .saturating_add(1024)
        .clamp(DRAFT_MIN_TOKENS, DRAFT_MAX_TOKENS)
}

pub fn text_sha256(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}

/// Generation failures surface as `GENERATION_UNAVAILABLE` or `GENERATION_TIMEOUT` only.
fn as_generation_error(e: AppError) -> AppError {
    if e.code == GENERATION_UNAVAILABLE || e.code == GENERATION_TIMEOUT {
        return e;
    }
    let retryable = e.retryable;
    AppError::generation_unavailable("Generation call failed")
        .with_details(e.to_string())
        .with_retryable(retryable)
}

/// The request orchestrator: validate, prompt, generate (bounded), guard, score, annotate.
#[derive(Clone)]
pub struct WritingService {
    llm: Arc<dyn Llm>,
    settings: WriteSettings,
}

impl WritingService {
    pub fn new(llm: Arc<dyn Llm>, settings: WriteSettings) -> Self {
        Self { llm, settings }
    }

    pub fn generate_writing(&self, req: &WritingRequest) -> Result<WritingResponse, AppError> {
        self.generate_writing_at(req, current_year())
    }

    /// [`Self::generate_writing`] with an explicit scoring year.
    pub fn generate_writing_at(
        &self,
        req: &WritingRequest,
        current_year: i32,
    ) -> Result<WritingResponse, AppError> {
        let writing_type = ensure_valid_writing_request(req)?;
        let model = req.model.unwrap_or(self.settings.default_model);
        let prompt =
            prompts::draft_prompt(req, writing_type, self.settings.recency_window_years);
        let params = GenerationParams {
            max_tokens: draft_max_tokens(req.word_count),
            temperature: DRAFT_TEMPERATURE,
            timeout: self.settings.timeout,
        };

        tracing::info!(
            writing_type = writing_type.label(),
            style = %req.citation_style,
            mode = %req.long_form_mode,
            %model,
            word_count = req.word_count,
            "generating draft"
        );
        let text = self.generate_text(prompt, model, params)?;
        let score = self.score(&text, req.citation_style, req.allow_old_citations, current_year)?;

        Ok(WritingResponse {
            annotated_text: annotate_text(&text, &score),
            text_sha256: text_sha256(&text),
            text,
            model,
            score,
        })
    }

    pub fn generate_outline(&self, req: &OutlineRequest) -> Result<OutlineResponse, AppError> {
        self.generate_outline_at(req, current_year())
    }

    pub fn generate_outline_at(
        &self,
        req: &OutlineRequest,
        current_year: i32,
    ) -> Result<OutlineResponse, AppError> {
        let writing_type = ensure_valid_outline_request(req)?;
        let model = req.model.unwrap_or(self.settings.default_model);
        let prompt =
            prompts::outline_prompt(req, writing_type, self.settings.recency_window_years);
        let params = GenerationParams {
            max_tokens: OUTLINE_MAX_TOKENS,
            temperature: OUTLINE_TEMPERATURE,
            timeout: self.settings.timeout,
        };

        tracing::info!(
            writing_type = writing_type.label(),
            style = %req.citation_style,
            %model,
            "generating outline"
        );
        let outline = self.generate_text(prompt, model, params)?;
        let score =
            self.score(&outline, req.citation_style, req.allow_old_citations, current_year)?;

        Ok(OutlineResponse {
            annotated_text: annotate_text(&outline, &score),
            text_sha256: text_sha256(&outline),
            outline,
            model,
            score,
        })
    }

    fn score(
        &self,
        text: &str,
        style: CitationStyle,
        allow_old_citations: bool,
        current_year: i32,
    ) -> Result<ScoreResult, AppError> {
        let options = ScoringOptions::new(style, current_year)
            .with_allow_old_citations(allow_old_citations)
            .with_recency_window(self.settings.recency_window_years);
        let score = score_document(text, &options)?;
        tracing::info!(
            score = score.score,
            band = %score.band,
            citations = score.citations.len(),
            flags = score.flags.len(),
            "scored generated text"
        );
        Ok(score)
    }

    /// One call plus at most `settings.retries` more, only after a retryable failure.
    fn generate_text(
        &self,
        prompt: String,
        model: ModelTier,
        params: GenerationParams,
    ) -> Result<String, AppError> {
        let attempts = 1 + self.settings.retries.min(crate::config::MAX_RETRIES);
        let prompt: Arc<str> = Arc::from(prompt);
        let mut attempt = 1;
        loop {
            match self.call_bounded(Arc::clone(&prompt), model, params) {
                Ok(raw) => return ensure_generated_text(&raw),
                Err(e) if e.retryable && attempt < attempts => {
                    tracing::warn!(attempt, code = %e.code, "retrying generation");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run the collaborator on a worker thread and wait at most `params.timeout`.
    ///
    /// A timed-out worker is abandoned; its late result is dropped with the channel.
    fn call_bounded(
        &self,
        prompt: Arc<str>,
        model: ModelTier,
        params: GenerationParams,
    ) -> Result<String, AppError> {
        let llm = Arc::clone(&self.llm);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("scholariq-generate".to_string())
            .spawn(move || {
                let _ = tx.send(llm.generate(&prompt, model, &params));
            })
            .map_err(|e| {
                AppError::generation_unavailable("Failed to start generation worker")
                    .with_details(e.to_string())
            })?;

        match rx.recv_timeout(params.timeout) {
            Ok(result) => result.map_err(as_generation_error),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(timeout_ms = params.timeout.as_millis() as u64, "generation timed out");
                Err(AppError::generation_timeout(params.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(AppError::generation_unavailable(
                "Generation worker stopped without a result",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_budget_scales_with_word_count() {
        assert_eq!(draft_max_tokens(200), DRAFT_MIN_TOKENS);
        assert_eq!(draft_max_tokens(3000), 7024);
        assert_eq!(draft_max_tokens(50_000), DRAFT_MAX_TOKENS);
    }

    #[test]
    fn foreign_error_codes_become_unavailable() {
        let e = as_generation_error(AppError::new("HTTP_BROKEN", "boom").with_retryable(true));
        assert_eq!(e.code, GENERATION_UNAVAILABLE);
        assert!(e.retryable);
        let t = as_generation_error(AppError::generation_timeout(Duration::from_secs(1)));
        assert_eq!(t.code, GENERATION_TIMEOUT);
    }

    #[test]
    fn digest_is_hex_sha256() {
        assert_eq!(
            text_sha256(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
