use scholariq_core::citations::extract_citations;
use scholariq_core::domain::{CitationStyle, FlagKind, HallucinationFlag, ScoringOptions};
use scholariq_core::heuristics::{prose_signals, run_checks, DocumentContext, CHECKS};

const YEAR: i32 = 2025;

fn flags_for(text: &str, style: CitationStyle) -> Vec<HallucinationFlag> {
    let options = ScoringOptions::new(style, YEAR);
    let citations = extract_citations(text, style);
    let ctx = DocumentContext::new(&citations, &options);
    run_checks(&citations, &ctx)
}

fn checks_raised(flags: &[HallucinationFlag]) -> Vec<&str> {
    flags.iter().map(|f| f.check.as_str()).collect()
}

#[test]
fn at_least_eight_independent_checks() {
    assert!(CHECKS.len() >= 8, "only {} checks", CHECKS.len());
}

#[test]
fn clean_apa_document_raises_nothing() {
    let text = "Sleep consolidates memory (Smith, 2023).\n\nReferences\nSmith, J. (2023). Sleep and memory. Journal of Sleep Research, 12(3), 45-67.";
    let flags = flags_for(text, CitationStyle::Apa);
    assert!(flags.is_empty(), "unexpected flags: {flags:?}");
}

#[test]
fn placeholder_venue_is_fabricated() {
    let text = "Sleep matters (Doe, 2022).\n\nReferences\nDoe, J. (2022). A study. Fake University Press.";
    let flags = flags_for(text, CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["placeholder_venue"], "{flags:?}");
    assert_eq!(flags[0].kind, FlagKind::FabricatedVenue);
    assert_eq!(flags[0].citation_index, 1);
}

#[test]
fn generic_venue_is_fabricated() {
    let text = "Kim, S. (2024). Everything about learning. International Journal of Research, 1(1), 1-2.";
    let flags = flags_for(text, CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["generic_venue"], "{flags:?}");
}

#[test]
fn placeholder_url_is_fabricated() {
    let flags = flags_for("Full data at https://example.com/study today.", CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["placeholder_url"]);
    assert_eq!(flags[0].kind, FlagKind::FabricatedVenue);
}

#[test]
fn future_year_is_implausible() {
    let flags = flags_for("A forecast (Smith, 2031).", CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["year_range"]);
    assert_eq!(flags[0].kind, FlagKind::ImplausibleYear);
    assert!(flags[0].reason.contains("2031"));
}

#[test]
fn next_year_is_still_plausible() {
    let flags = flags_for("In press (Smith, 2026).", CitationStyle::Apa);
    assert!(flags.is_empty(), "{flags:?}");
}

#[test]
fn placeholder_author_is_malformed() {
    let flags = flags_for("A claim (Anonymous, 2024).", CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["placeholder_author"]);
    assert_eq!(flags[0].kind, FlagKind::MalformedAuthor);
}

#[test]
fn undated_citation_is_flagged_not_ignored() {
    let flags = flags_for("A claim (Smith, n.d.).", CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["missing_year"]);
    assert_eq!(flags[0].kind, FlagKind::MalformedAuthor);
}

#[test]
fn wrong_style_form_is_a_style_mismatch() {
    let flags = flags_for("Growth slowed (Mayer 2020).", CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["style_conformance"]);
    assert_eq!(flags[0].kind, FlagKind::StyleMismatch);
}

#[test]
fn in_text_citation_missing_from_reference_list_is_unverifiable() {
    let text = "Supported (Smith, 2023). Also (Garcia, 2024).\n\nReferences\nSmith, J. (2023). Sleep and memory. Journal of Sleep Research, 12(3), 45-67.";
    let flags = flags_for(text, CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["unresolved_reference"], "{flags:?}");
    assert_eq!(flags[0].citation, "(Garcia, 2024)");
    assert_eq!(flags[0].kind, FlagKind::Unverifiable);
}

#[test]
fn numbered_citation_without_entry_is_unverifiable() {
    let text = "Shown before [3].\n\nReferences\n1. Smith J, Lee K. Sleep and memory. Lancet Neurol. 2024;3:1-9.";
    let flags = flags_for(text, CitationStyle::Vancouver);
    assert_eq!(checks_raised(&flags), vec!["unresolved_reference"], "{flags:?}");
    assert!(flags[0].reason.contains("[3]"));
}

#[test]
fn repeated_reference_entry_is_flagged_once() {
    let entry = "Smith, J. (2024). Sleep study. Journal of Sleep Research, 1(2), 3-4.";
    let text = format!("{entry}\n{entry}");
    let flags = flags_for(&text, CitationStyle::Apa);
    assert_eq!(checks_raised(&flags), vec!["duplicate_entry"]);
    assert_eq!(flags[0].citation_index, 1);
}

#[test]
fn assertive_claims_without_citations_are_counted() {
    let text = "Studies have shown that sleep helps memory. Research suggests naps help too.";
    let signals = prose_signals(text, &[], &[]);
    assert_eq!(signals.unsupported_claims, 1);
    assert!(signals.no_citations);
}

#[test]
fn cited_claims_are_supported() {
    let text = "Studies have shown that sleep helps memory (Smith, 2023).";
    let citations = extract_citations(text, CitationStyle::Apa);
    let signals = prose_signals(text, &citations, &[]);
    assert_eq!(signals.unsupported_claims, 0);
    assert_eq!(signals.citation_count, 1);
}

#[test]
fn checks_are_deterministic() {
    let text = "A forecast (Smith, 2031). A claim (Anonymous, n.d.). See https://test.com/x.";
    assert_eq!(
        flags_for(text, CitationStyle::Apa),
        flags_for(text, CitationStyle::Apa)
    );
}

#[test]
fn authorless_numbered_entry_is_malformed() {
    let text = "1. Sleep and memory in adolescents. Nature Neuroscience. 2010;25:1-9.";
    let flags = flags_for(text, CitationStyle::Vancouver);
    assert_eq!(checks_raised(&flags), vec!["missing_author"]);
    assert_eq!(flags[0].kind, FlagKind::MalformedAuthor);
}
