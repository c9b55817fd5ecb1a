use pretty_assertions::assert_eq;
use scholariq_core::age::{check_age, validate_ages, RecencyPolicy};
use scholariq_core::citations::extract_citations;
use scholariq_core::domain::{
    Citation, CitationKind, CitationStyle, FlagKind, HallucinationFlag, ProseSignals, ScoreBand,
    ScoringOptions,
};
use scholariq_core::error::SCORING_INTERNAL;
use scholariq_core::scoring::{aggregate, weight_for, WEIGHT_TABLE_VERSION};

fn citation(index: usize, raw: &str, year: Option<i32>) -> Citation {
    Citation {
        index,
        raw: raw.to_string(),
        start: 0,
        end: raw.len(),
        kind: CitationKind::Parenthetical,
        authors: vec!["Smith".to_string()],
        year,
        undated: false,
        venue: None,
        locator: None,
        style_conformant: true,
    }
}

fn policy(current_year: i32) -> RecencyPolicy {
    RecencyPolicy::from(&ScoringOptions::new(CitationStyle::Apa, current_year))
}

#[test]
fn window_boundary_is_inclusive() {
    let p = policy(2025);
    assert_eq!(p.oldest_allowed_year(), 2020);
    assert!(check_age(&citation(0, "(Smith, 2020)", Some(2020)), &p).is_none());
    let stale = check_age(&citation(0, "(Smith, 2019)", Some(2019)), &p).expect("stale");
    assert_eq!(stale.kind, FlagKind::StaleCitation);
    assert_eq!(stale.check, "recency_window");
}

#[test]
fn allow_old_citations_disables_the_window() {
    let options = ScoringOptions::new(CitationStyle::Apa, 2025).with_allow_old_citations(true);
    let p = RecencyPolicy::from(&options);
    let old = vec![
        citation(0, "(Smith, 1990)", Some(1990)),
        citation(1, "(Smith, 2001)", Some(2001)),
    ];
    assert!(validate_ages(&old, &p).is_empty());
}

#[test]
fn configured_window_is_respected() {
    let options = ScoringOptions::new(CitationStyle::Apa, 2025).with_recency_window(10);
    let p = RecencyPolicy::from(&options);
    assert!(check_age(&citation(0, "(Smith, 2016)", Some(2016)), &p).is_none());
    assert!(check_age(&citation(0, "(Smith, 2014)", Some(2014)), &p).is_some());
}

#[test]
fn undated_citations_are_left_to_heuristics() {
    assert!(check_age(&citation(0, "(Smith, n.d.)", None), &policy(2025)).is_none());
}

#[test]
fn each_flag_carries_its_table_weight() {
    let c = citation(0, "(Smith, 2015)", Some(2015));
    let flags = vec![HallucinationFlag::new(
        &c,
        FlagKind::StaleCitation,
        "recency_window",
        "old",
    )];
    let result = aggregate(vec![c], flags, ProseSignals::default()).expect("aggregate");

    assert_eq!(result.flags[0].weight, weight_for(FlagKind::StaleCitation));
    assert_eq!(result.score, 75);
    assert_eq!(result.band, ScoreBand::Warn);
    assert_eq!(result.weight_table_version, WEIGHT_TABLE_VERSION);
    assert_eq!(result.flagged_citations, 1);
    assert_eq!(result.clean_citations, 0);
}

#[test]
fn same_source_in_text_and_reference_list_is_deducted_once() {
    let text = "Evidence is mixed (Smith, 2015).\n\nReferences\nSmith, J. (2015). Sleep study. Journal of Sleep Research, 1(2), 3-4.";
    let citations = extract_citations(text, CitationStyle::Apa);
    assert_eq!(citations.len(), 2);

    let flags = validate_ages(&citations, &policy(2025));
    assert_eq!(flags.len(), 2);

    let result = aggregate(citations, flags, ProseSignals::default()).expect("aggregate");
    let weights: Vec<u32> = result.flags.iter().map(|f| f.weight).collect();
    assert_eq!(weights, vec![25, 0]);
    assert_eq!(result.score, 75);
}

#[test]
fn score_clamps_at_zero_and_fails() {
    let citations: Vec<Citation> = (0..4)
        .map(|i| Citation {
            authors: vec![format!("Author{i}")],
            ..citation(i, &format!("(Author{i}, 2031)"), Some(2031))
        })
        .collect();
    let flags: Vec<HallucinationFlag> = citations
        .iter()
        .flat_map(|c| {
            [
                HallucinationFlag::new(c, FlagKind::ImplausibleYear, "year_range", "future"),
                HallucinationFlag::new(c, FlagKind::FabricatedVenue, "placeholder_venue", "fake"),
            ]
        })
        .collect();
    let result = aggregate(citations, flags, ProseSignals::default()).expect("aggregate");
    assert_eq!(result.score, 0);
    assert_eq!(result.band, ScoreBand::Fail);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r.contains("Do not publish")));
}

#[test]
fn band_thresholds() {
    assert_eq!(ScoreBand::from_score(100), ScoreBand::Pass);
    assert_eq!(ScoreBand::from_score(80), ScoreBand::Pass);
    assert_eq!(ScoreBand::from_score(79), ScoreBand::Warn);
    assert_eq!(ScoreBand::from_score(50), ScoreBand::Warn);
    assert_eq!(ScoreBand::from_score(49), ScoreBand::Fail);
    assert_eq!(ScoreBand::from_score(0), ScoreBand::Fail);
}

#[test]
fn unverifiable_majority_adds_penalty() {
    let prose = ProseSignals {
        citation_count: 3,
        unverifiable_citations: 2,
        unverifiable_ratio: 2.0 / 3.0,
        unsupported_claims: 1,
        no_citations: false,
    };
    let result = aggregate(Vec::new(), Vec::new(), prose).expect("aggregate");
    assert_eq!(result.score, 100 - 10 - 3);
}

#[test]
fn flag_pointing_at_missing_citation_is_an_internal_error() {
    let c = citation(5, "(Smith, 2020)", Some(2020));
    let flags = vec![HallucinationFlag::new(
        &c,
        FlagKind::Unverifiable,
        "unresolved_reference",
        "none",
    )];
    let err = aggregate(Vec::new(), flags, ProseSignals::default()).expect_err("must fail");
    assert_eq!(err.code, SCORING_INTERNAL);
}
