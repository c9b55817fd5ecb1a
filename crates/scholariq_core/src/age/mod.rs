use crate::domain::{Citation, FlagKind, HallucinationFlag, ScoringOptions};

pub const RECENCY_WINDOW: &str = "recency_window";

/// Recency rule applied to every dated citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyPolicy {
    pub window_years: u32,
    pub current_year: i32,
    /// `false` when the request allows old citations; no stale flags are produced at all.
    pub enabled: bool,
}

impl RecencyPolicy {
    /// Oldest year that is still inside the window.
    pub fn oldest_allowed_year(&self) -> i32 {
        let window = i32::try_from(self.window_years).unwrap_or(i32::MAX);
        self.current_year.saturating_sub(window)
    }
}

impl From<&ScoringOptions> for RecencyPolicy {
    fn from(options: &ScoringOptions) -> Self {
        Self {
            window_years: options.recency_window_years,
            current_year: options.current_year,
            enabled: !options.allow_old_citations,
        }
    }
}

/// Flag a citation whose year is older than `current_year - window`.
///
/// Undated citations are left to the heuristics' missing-year check.
pub fn check_age(citation: &Citation, policy: &RecencyPolicy) -> Option<HallucinationFlag> {
    if !policy.enabled {
        return None;
    }
    let year = citation.year?;
    let oldest = policy.oldest_allowed_year();
    if year >= oldest {
        return None;
    }
    Some(HallucinationFlag::new(
        citation,
        FlagKind::StaleCitation,
        RECENCY_WINDOW,
        format!(
            "published {year}, older than the {}-year window (oldest allowed {oldest})",
            policy.window_years
        ),
    ))
}

pub fn validate_ages(citations: &[Citation], policy: &RecencyPolicy) -> Vec<HallucinationFlag> {
    citations
        .iter()
        .filter_map(|c| check_age(c, policy))
        .collect()
}
