use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use scholariq_ai::llm::{GenerationParams, Llm};
use scholariq_ai::write::{
    text_sha256, WriteSettings, WritingService, DRAFT_TEMPERATURE, OUTLINE_MAX_TOKENS,
    OUTLINE_TEMPERATURE,
};
use scholariq_core::domain::{
    CitationStyle, FlagKind, LongFormMode, ModelTier, OutlineRequest, ScoreBand, WritingCategory,
    WritingRequest,
};
use scholariq_core::error::{
    AppError, GENERATION_TIMEOUT, GENERATION_UNAVAILABLE, VALIDATION_FAILED,
};

const YEAR: i32 = 2025;

/// Returns scripted results in order, repeating the last one; records every call.
struct ScriptedLlm {
    script: Vec<Result<String, AppError>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, ModelTier, GenerationParams)>>,
}

impl ScriptedLlm {
    fn new(script: Vec<Result<String, AppError>>) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn text(out: &str) -> Arc<Self> {
        Self::new(vec![Ok(out.to_string())])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_call(&self) -> (String, ModelTier, GenerationParams) {
        self.seen.lock().unwrap().last().cloned().expect("called")
    }
}

impl Llm for ScriptedLlm {
    fn generate(
        &self,
        prompt: &str,
        model: ModelTier,
        params: &GenerationParams,
    ) -> Result<String, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((prompt.to_string(), model, *params));
        let i = n.min(self.script.len() - 1);
        self.script[i].clone()
    }
}

struct SlowLlm {
    delay: Duration,
}

impl Llm for SlowLlm {
    fn generate(
        &self,
        _prompt: &str,
        _model: ModelTier,
        _params: &GenerationParams,
    ) -> Result<String, AppError> {
        std::thread::sleep(self.delay);
        Ok("Too late (Smith, 2024).".to_string())
    }
}

fn request() -> WritingRequest {
    WritingRequest {
        topic: "Sleep and memory consolidation".to_string(),
        category: WritingCategory::Academic,
        writing_type: "research paper".to_string(),
        citation_style: CitationStyle::Apa,
        word_count: 1200,
        long_form_mode: LongFormMode::Single,
        allow_old_citations: false,
        chapter_title: None,
        outline_points: Vec::new(),
        education_level: None,
        model: None,
    }
}

fn service(llm: Arc<dyn Llm>, retries: u32) -> WritingService {
    WritingService::new(
        llm,
        WriteSettings {
            retries,
            timeout: Duration::from_secs(5),
            ..WriteSettings::default()
        },
    )
}

fn unavailable(retryable: bool) -> Result<String, AppError> {
    Err(AppError::generation_unavailable("provider down").with_retryable(retryable))
}

#[test]
fn stale_citation_end_to_end() {
    let text = format!(
        "Memory improves after sleep (Smith, {}). Later work agrees (Lee, 2024).",
        YEAR - 10
    );
    let llm = ScriptedLlm::text(&text);
    let res = service(llm.clone(), 0)
        .generate_writing_at(&request(), YEAR)
        .expect("generate");

    assert_eq!(res.text, text);
    assert_eq!(res.text_sha256, text_sha256(&text));
    assert_eq!(res.model, ModelTier::Pro);
    assert_eq!(res.score.count_of(FlagKind::StaleCitation), 1);
    assert_eq!(res.score.flags.len(), 1);
    assert_eq!(res.score.score, 75);
    assert_eq!(res.score.band, ScoreBand::Warn);
    assert!(res.annotated_text.starts_with(&text));
    assert!(res.annotated_text.contains("CITATION QUALITY WARNING"));
    assert_eq!(llm.calls(), 1);
}

#[test]
fn allow_old_citations_reaches_the_scorer() {
    let llm = ScriptedLlm::text("Classic finding (Smith, 1998).");
    let req = WritingRequest {
        allow_old_citations: true,
        ..request()
    };
    let res = service(llm, 0).generate_writing_at(&req, YEAR).expect("generate");
    assert_eq!(res.score.score, 100);
    assert_eq!(res.annotated_text, res.text);
}

#[test]
fn invalid_request_never_reaches_the_generator() {
    let llm = ScriptedLlm::text("unused");
    let req = WritingRequest {
        topic: String::new(),
        word_count: 0,
        ..request()
    };
    let err = service(llm.clone(), 1)
        .generate_writing_at(&req, YEAR)
        .expect_err("invalid");
    assert_eq!(err.code, VALIDATION_FAILED);
    assert_eq!(err.violated_fields(), vec!["topic", "word_count"]);
    assert_eq!(llm.calls(), 0);
}

#[test]
fn empty_output_is_generation_unavailable() {
    let llm = ScriptedLlm::text("   \n");
    let err = service(llm.clone(), 1)
        .generate_writing_at(&request(), YEAR)
        .expect_err("empty");
    assert_eq!(err.code, GENERATION_UNAVAILABLE);
    assert_eq!(llm.calls(), 1);
}

#[test]
fn failure_without_retry_budget_is_not_retried() {
    let llm = ScriptedLlm::new(vec![unavailable(true), Ok("Fine (Smith, 2024).".to_string())]);
    let err = service(llm.clone(), 0)
        .generate_writing_at(&request(), YEAR)
        .expect_err("unavailable");
    assert_eq!(err.code, GENERATION_UNAVAILABLE);
    assert_eq!(llm.calls(), 1);
}

#[test]
fn one_configured_retry_recovers_retryable_failure() {
    let llm = ScriptedLlm::new(vec![unavailable(true), Ok("Fine (Smith, 2024).".to_string())]);
    let res = service(llm.clone(), 1)
        .generate_writing_at(&request(), YEAR)
        .expect("second attempt succeeds");
    assert_eq!(res.score.band, ScoreBand::Pass);
    assert_eq!(llm.calls(), 2);
}

#[test]
fn retry_budget_is_at_most_one() {
    let llm = ScriptedLlm::new(vec![unavailable(true)]);
    let err = service(llm.clone(), 5)
        .generate_writing_at(&request(), YEAR)
        .expect_err("unavailable");
    assert_eq!(err.code, GENERATION_UNAVAILABLE);
    assert_eq!(llm.calls(), 2);
}

#[test]
fn non_retryable_failure_is_not_retried() {
    let llm = ScriptedLlm::new(vec![unavailable(false), Ok("Fine.".to_string())]);
    let err = service(llm.clone(), 1)
        .generate_writing_at(&request(), YEAR)
        .expect_err("unavailable");
    assert_eq!(err.code, GENERATION_UNAVAILABLE);
    assert_eq!(llm.calls(), 1);
}

#[test]
fn foreign_errors_are_reported_as_unavailable() {
    let llm = ScriptedLlm::new(vec![Err(AppError::new("SOCKET_CLOSED", "closed"))]);
    let err = service(llm, 0)
        .generate_writing_at(&request(), YEAR)
        .expect_err("unavailable");
    assert_eq!(err.code, GENERATION_UNAVAILABLE);
    assert!(err.details.unwrap_or_default().contains("SOCKET_CLOSED"));
}

#[test]
fn slow_generator_times_out() {
    let llm = Arc::new(SlowLlm {
        delay: Duration::from_millis(800),
    });
    let svc = WritingService::new(
        llm,
        WriteSettings {
            timeout: Duration::from_millis(50),
            retries: 0,
            ..WriteSettings::default()
        },
    );
    let started = std::time::Instant::now();
    let err = svc
        .generate_writing_at(&request(), YEAR)
        .expect_err("timeout");
    assert_eq!(err.code, GENERATION_TIMEOUT);
    assert!(started.elapsed() < Duration::from_millis(700));
}

#[test]
fn draft_call_carries_model_and_params() {
    let llm = ScriptedLlm::text("Fine (Smith, 2024).");
    let req = WritingRequest {
        model: Some(ModelTier::Flash),
        ..request()
    };
    let res = service(llm.clone(), 0)
        .generate_writing_at(&req, YEAR)
        .expect("generate");
    assert_eq!(res.model, ModelTier::Flash);

    let (prompt, model, params) = llm.last_call();
    assert_eq!(model, ModelTier::Flash);
    assert_eq!(params.temperature, DRAFT_TEMPERATURE);
    assert_eq!(params.max_tokens, 3424);
    assert_eq!(params.timeout, Duration::from_secs(5));
    assert!(prompt.contains("Topic: Sleep and memory consolidation"));
    assert!(prompt.contains("Use ONLY references from the last 5 years."));
}

#[test]
fn outline_is_generated_and_scored() {
    let outline = "1. Foundations of sleep science\n2. Consolidation models (Anonymous, 2023)\n";
    let llm = ScriptedLlm::text(outline);
    let req = OutlineRequest {
        topic: "Sleep and memory".to_string(),
        category: WritingCategory::Academic,
        writing_type: "Thesis".to_string(),
        citation_style: CitationStyle::Apa,
        long_form_mode: LongFormMode::Chapters,
        allow_old_citations: false,
        education_level: Some("Postgraduate".to_string()),
        model: None,
    };
    let res = service(llm.clone(), 0)
        .generate_outline_at(&req, YEAR)
        .expect("outline");

    assert_eq!(res.outline, outline.trim());
    assert_eq!(res.score.count_of(FlagKind::MalformedAuthor), 1);
    assert_eq!(res.score.band, ScoreBand::Pass);

    let (prompt, _, params) = llm.last_call();
    assert_eq!(params.temperature, OUTLINE_TEMPERATURE);
    assert_eq!(params.max_tokens, OUTLINE_MAX_TOKENS);
    assert!(prompt.contains("Education level: Postgraduate"));
    assert!(prompt.contains("Return ONLY the outline"));
}

#[test]
fn old_apa_citation_is_never_a_pass() {
    let text = "Early work linked sleep to recall (Smith, 1995). Recent imaging confirms the link (Lee, 2024).";
    let llm = ScriptedLlm::text(text);
    let req = WritingRequest {
        word_count: 500,
        ..request()
    };
    let res = service(llm, 0)
        .generate_writing_at(&req, YEAR)
        .expect("generate");

    assert_eq!(res.score.count_of(FlagKind::StaleCitation), 1);
    assert_eq!(res.score.flags.len(), 1);
    assert_eq!(res.score.band, ScoreBand::Warn);
    assert_ne!(res.score.band, ScoreBand::Pass);
}
