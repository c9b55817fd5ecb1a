use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::domain::{Citation, FlagKind, HallucinationFlag, ProseSignals};

/// Assertive appeals to unnamed research. Hedged wording ("research suggests") is allowed.
static UNSUPPORTED_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:studies\s+(?:have\s+)?(?:shown|show|proven|prove|proved|confirm|confirmed)|research\s+(?:has\s+)?(?:shown|shows|proves|proven|confirms|confirmed)|experts\s+(?:agree|say|confirm)|scientists\s+(?:agree|have\s+(?:shown|proven|found))|it\s+is\s+(?:widely|well)[\s-](?:known|established|accepted)|according\s+to\s+(?:recent\s+)?(?:studies|research|experts))\b",
    )
    .unwrap_or_else(|e| panic!("invalid prose pattern: {e}"))
});

const SENTENCE_BREAKS: [&str; 4] = [". ", "! ", "? ", "\n"];

/// Byte range of the sentence around `pos`.
fn sentence_bounds(text: &str, pos: usize) -> (usize, usize) {
    let start = SENTENCE_BREAKS
        .iter()
        .filter_map(|b| text[..pos].rfind(b).map(|i| i + b.len()))
        .max()
        .unwrap_or(0);
    let end = SENTENCE_BREAKS
        .iter()
        .filter_map(|b| text[pos..].find(b).map(|i| pos + i))
        .min()
        .unwrap_or(text.len());
    (start, end)
}

/// Document-level signals. Never divides by zero: a document without citations has ratio 0.0.
pub fn prose_signals(
    text: &str,
    citations: &[Citation],
    flags: &[HallucinationFlag],
) -> ProseSignals {
    let unverifiable: BTreeSet<usize> = flags
        .iter()
        .filter(|f| f.kind == FlagKind::Unverifiable)
        .map(|f| f.citation_index)
        .collect();

    let mut seen_sentences = BTreeSet::new();
    let mut unsupported_claims = 0usize;
    for m in UNSUPPORTED_CLAIM.find_iter(text) {
        let (start, end) = sentence_bounds(text, m.start());
        if !seen_sentences.insert(start) {
            continue;
        }
        let cited = citations.iter().any(|c| c.start < end && c.end > start);
        if !cited {
            unsupported_claims += 1;
        }
    }

    let citation_count = citations.len();
    let unverifiable_ratio = if citation_count == 0 {
        0.0
    } else {
        unverifiable.len() as f64 / citation_count as f64
    };

    ProseSignals {
        citation_count,
        unverifiable_citations: unverifiable.len(),
        unverifiable_ratio,
        unsupported_claims,
        no_citations: citation_count == 0,
    }
}
