//! Score aggregation.
//!
//! `score = 100 - sum(flag weights) - prose penalty`, clamped to 0..=100. The weight table is
//! fixed and versioned so that a score can be reproduced from its flags.

use std::collections::BTreeSet;

use crate::domain::{
    Citation, FlagKind, HallucinationFlag, ProseSignals, ScoreBand, ScoreResult,
};
use crate::error::AppError;

pub const WEIGHT_TABLE_VERSION: &str = "2026.1";

/// Points deducted per flag kind.
pub const WEIGHT_TABLE: [(FlagKind, u32); 6] = [
    (FlagKind::FabricatedVenue, 35),
    (FlagKind::ImplausibleYear, 30),
    (FlagKind::StaleCitation, 25),
    (FlagKind::MalformedAuthor, 15),
    (FlagKind::Unverifiable, 10),
    (FlagKind::StyleMismatch, 5),
];

pub const UNSUPPORTED_CLAIM_WEIGHT: u32 = 3;
pub const UNSUPPORTED_CLAIM_CAP: u32 = 15;
/// Extra deduction when more than half of the citations are unverifiable.
pub const UNVERIFIABLE_MAJORITY_PENALTY: u32 = 10;

pub fn weight_for(kind: FlagKind) -> u32 {
    WEIGHT_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(0, |(_, w)| *w)
}

pub fn prose_penalty(prose: &ProseSignals) -> u32 {
    let claims = u32::try_from(prose.unsupported_claims).unwrap_or(u32::MAX);
    let mut penalty = claims
        .saturating_mul(UNSUPPORTED_CLAIM_WEIGHT)
        .min(UNSUPPORTED_CLAIM_CAP);
    if prose.unverifiable_ratio > 0.5 {
        penalty += UNVERIFIABLE_MAJORITY_PENALTY;
    }
    penalty
}

/// The same source cited in text and listed in the references shares one key, so a repeated
/// finding from the same check is only deducted once.
fn source_key(citation: &Citation) -> String {
    match (citation.lead_surname(), citation.year, citation.undated) {
        (Some(surname), Some(year), _) => format!("{surname}:{year}"),
        (Some(surname), None, true) => format!("{surname}:n.d."),
        _ => format!("#{}", citation.index),
    }
}

fn check_flag_refs(citations: &[Citation], flags: &[HallucinationFlag]) -> Result<(), AppError> {
    for f in flags {
        let Some(c) = citations.get(f.citation_index) else {
            return Err(AppError::scoring_internal("Flag references a missing citation")
                .with_details(format!(
                    "citation_index={}; citations={}",
                    f.citation_index,
                    citations.len()
                )));
        };
        if c.index != f.citation_index || c.raw != f.citation {
            return Err(
                AppError::scoring_internal("Flag does not match its citation").with_details(
                    format!("citation_index={}; check={}", f.citation_index, f.check),
                ),
            );
        }
    }
    Ok(())
}

/// Combine per-citation flags and prose signals into a [`ScoreResult`].
///
/// Flags are ordered by citation, keeping the order they were raised in. Fails with
/// `SCORING_INTERNAL` when a flag does not point at an extracted citation.
pub fn aggregate(
    citations: Vec<Citation>,
    mut flags: Vec<HallucinationFlag>,
    prose: ProseSignals,
) -> Result<ScoreResult, AppError> {
    check_flag_refs(&citations, &flags)?;

    flags.sort_by_key(|f| f.citation_index);

    let mut counted: BTreeSet<(String, String)> = BTreeSet::new();
    let mut deducted = 0u32;
    for f in flags.iter_mut() {
        let key = (f.check.clone(), source_key(&citations[f.citation_index]));
        f.weight = if counted.insert(key) {
            weight_for(f.kind)
        } else {
            0
        };
        deducted = deducted.saturating_add(f.weight);
    }
    deducted = deducted.saturating_add(prose_penalty(&prose));

    let score = 100u32.saturating_sub(deducted).min(100) as u8;
    let band = ScoreBand::from_score(score);

    let flagged: BTreeSet<usize> = flags.iter().map(|f| f.citation_index).collect();
    let flagged_citations = flagged.len();
    let clean_citations = citations.len() - flagged_citations;

    let issues = build_issues(&citations, &flags, &prose, flagged_citations);
    let recommendations = build_recommendations(&flags, &prose, band);

    Ok(ScoreResult {
        score,
        band,
        weight_table_version: WEIGHT_TABLE_VERSION.to_string(),
        flags,
        citations,
        prose,
        flagged_citations,
        clean_citations,
        issues,
        recommendations,
    })
}

fn build_issues(
    citations: &[Citation],
    flags: &[HallucinationFlag],
    prose: &ProseSignals,
    flagged: usize,
) -> Vec<String> {
    let mut issues = Vec::new();
    if flagged > 0 {
        issues.push(format!(
            "{flagged}/{} citations flagged as suspicious",
            citations.len()
        ));
    }
    for f in flags {
        issues.push(format!(
            "{} [{}, -{}]: {}",
            f.citation, f.kind, f.weight, f.reason
        ));
    }
    if prose.unsupported_claims > 0 {
        issues.push(format!(
            "{} sentence(s) appeal to unnamed research without a citation",
            prose.unsupported_claims
        ));
    }
    if prose.unverifiable_ratio > 0.5 {
        issues.push(format!(
            "{}/{} citations cannot be traced to a reference entry",
            prose.unverifiable_citations, prose.citation_count
        ));
    }
    issues
}

fn build_recommendations(
    flags: &[HallucinationFlag],
    prose: &ProseSignals,
    band: ScoreBand,
) -> Vec<String> {
    let has = |kind: FlagKind| flags.iter().any(|f| f.kind == kind);
    let mut out = Vec::new();

    if band != ScoreBand::Pass {
        out.push("Review all flagged citations manually".to_string());
    }
    if band == ScoreBand::Fail {
        out.push("Do not publish without verifying every reference".to_string());
        out.push("Regenerate with stricter citation rules".to_string());
    }
    if has(FlagKind::FabricatedVenue) || has(FlagKind::ImplausibleYear) {
        out.push("Remove citations with placeholder venues or impossible dates".to_string());
    }
    if has(FlagKind::StaleCitation) {
        out.push(
            "Replace citations older than the recency window, or set allow_old_citations"
                .to_string(),
        );
    }
    if has(FlagKind::StyleMismatch) {
        out.push("Reformat in-text citations to the requested style".to_string());
    }
    if prose.unsupported_claims > 0 {
        out.push("Attach a citation to each research claim or soften the wording".to_string());
    }
    if prose.no_citations {
        out.push(
            "No citations detected; academic and research writing usually needs supporting sources"
                .to_string(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flag_kind_has_a_weight() {
        for kind in FlagKind::ALL {
            assert!(weight_for(kind) > 0, "missing weight for {kind}");
        }
    }

    #[test]
    fn prose_penalty_is_capped() {
        let prose = ProseSignals {
            unsupported_claims: 40,
            ..ProseSignals::default()
        };
        assert_eq!(prose_penalty(&prose), UNSUPPORTED_CLAIM_CAP);
    }

    #[test]
    fn empty_document_scores_clean() {
        let prose = ProseSignals {
            no_citations: true,
            ..ProseSignals::default()
        };
        let result = aggregate(Vec::new(), Vec::new(), prose).expect("aggregate");
        assert_eq!(result.score, 100);
        assert_eq!(result.band, ScoreBand::Pass);
        assert!(result.flags.is_empty());
    }
}
