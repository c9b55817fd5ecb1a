//! Hallucination heuristics.
//!
//! Every check is an independent `fn(&Citation, &DocumentContext) -> Option<HallucinationFlag>`;
//! [`CHECKS`] fixes their order so identical input always yields identical flags.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{Citation, CitationKind, CitationStyle, HallucinationFlag, ScoringOptions};

mod checks;
mod prose;

pub use prose::prose_signals;

pub type Check = fn(&Citation, &DocumentContext) -> Option<HallucinationFlag>;

/// Check ids paired with their functions, in evaluation order.
pub const CHECKS: &[(&str, Check)] = &[
    (checks::PLACEHOLDER_VENUE, checks::placeholder_venue),
    (checks::GENERIC_VENUE, checks::generic_venue),
    (checks::PLACEHOLDER_URL, checks::placeholder_url),
    (checks::YEAR_RANGE, checks::year_range),
    (checks::PLACEHOLDER_AUTHOR, checks::placeholder_author),
    (checks::AUTHOR_SHAPE, checks::author_shape),
    (checks::MISSING_AUTHOR, checks::missing_author),
    (checks::MISSING_YEAR, checks::missing_year),
    (checks::STYLE_CONFORMANCE, checks::style_conformance),
    (checks::UNRESOLVED_REFERENCE, checks::unresolved_reference),
    (checks::DUPLICATE_ENTRY, checks::duplicate_entry),
];

/// Read-only view of the whole document shared by all checks.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub style: CitationStyle,
    pub current_year: i32,
    /// Numbers of numbered reference entries (`1. Smith J ...`).
    pub reference_numbers: BTreeSet<u32>,
    /// `(surname, year)` of author-first reference entries; `None` year for "n.d.".
    pub reference_keys: BTreeSet<(String, Option<i32>)>,
    /// Normalised entry text -> index of its first occurrence.
    first_entry_index: BTreeMap<String, usize>,
}

impl DocumentContext {
    pub fn new(citations: &[Citation], options: &ScoringOptions) -> Self {
        let mut reference_numbers = BTreeSet::new();
        let mut reference_keys = BTreeSet::new();
        let mut first_entry_index = BTreeMap::new();

        for c in citations.iter().filter(|c| c.kind.is_reference_list()) {
            match c.kind {
                CitationKind::Footnote => {
                    if let Some(n) = c.locator.as_deref().and_then(|l| l.parse::<u32>().ok()) {
                        reference_numbers.insert(n);
                    }
                }
                _ => {
                    if let Some(surname) = c.lead_surname() {
                        reference_keys.insert((surname, c.year));
                    }
                }
            }
            first_entry_index
                .entry(normalize_entry(&c.raw))
                .or_insert(c.index);
        }

        Self {
            style: options.style,
            current_year: options.current_year,
            reference_numbers,
            reference_keys,
            first_entry_index,
        }
    }

    pub fn has_author_reference_list(&self) -> bool {
        !self.reference_keys.is_empty()
    }

    /// True when an identical entry appeared earlier in the list.
    pub fn is_repeated_entry(&self, citation: &Citation) -> bool {
        self.first_entry_index
            .get(&normalize_entry(&citation.raw))
            .is_some_and(|&first| first != citation.index)
    }
}

fn normalize_entry(raw: &str) -> String {
    let trimmed = raw
        .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '.' | '[' | ']' | '-' | '*' | '•'))
        .trim();
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Run every check against one citation.
pub fn evaluate_citation(citation: &Citation, ctx: &DocumentContext) -> Vec<HallucinationFlag> {
    CHECKS
        .iter()
        .filter_map(|(_, check)| check(citation, ctx))
        .collect()
}

/// Run every check against every citation; flags come out in citation order, then check order.
pub fn run_checks(citations: &[Citation], ctx: &DocumentContext) -> Vec<HallucinationFlag> {
    citations
        .iter()
        .flat_map(|c| evaluate_citation(c, ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_ids_are_unique() {
        let ids: BTreeSet<&str> = CHECKS.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), CHECKS.len());
        assert!(CHECKS.len() >= 8);
    }

    #[test]
    fn entry_normalisation_ignores_numbering_and_spacing() {
        assert_eq!(
            normalize_entry("1. Smith J.  Title. Venue. 2021."),
            normalize_entry("[4] smith j. title. venue. 2021.")
        );
    }
}
