use crate::age::{validate_ages, RecencyPolicy};
use crate::citations::extract_citations;
use crate::domain::{ScoreResult, ScoringOptions};
use crate::error::AppError;
use crate::heuristics::{prose_signals, run_checks, DocumentContext};
use crate::scoring::aggregate;

pub const SCORING_EMPTY_DOCUMENT: &str = "SCORING_EMPTY_DOCUMENT";

/// Score generated text: extraction, heuristics, recency, aggregation.
///
/// Pure and deterministic for a given `options` (including `current_year`). Blank text is not
/// scoreable and fails instead of returning a clean score.
pub fn score_document(text: &str, options: &ScoringOptions) -> Result<ScoreResult, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::new(
            SCORING_EMPTY_DOCUMENT,
            "Cannot score an empty document",
        ));
    }

    let citations = extract_citations(text, options.style);
    let ctx = DocumentContext::new(&citations, options);

    let mut flags = run_checks(&citations, &ctx);
    flags.extend(validate_ages(&citations, &RecencyPolicy::from(options)));

    let prose = prose_signals(text, &citations, &flags);
    aggregate(citations, flags, prose)
}
