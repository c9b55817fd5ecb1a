use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntactic shape a citation was matched in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CitationKind {
    /// `(Smith, 2020)` / `(Smith 2020)` / `(Smith 45)`
    Parenthetical,
    /// `Smith (2020)`
    Narrative,
    /// `[1]`, `[2-4]`
    Numbered,
    /// Author-first reference-list or bibliography line.
    ReferenceEntry,
    /// Numbered note or numbered reference line (`1. Smith J. ...`).
    Footnote,
    Url,
    /// Citation-like text that matched no structured pattern.
    Fragment,
}

impl CitationKind {
    pub fn is_reference_list(self) -> bool {
        matches!(self, CitationKind::ReferenceEntry | CitationKind::Footnote)
    }
}

/// A citation candidate extracted from generated text. Never mutated after extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    /// Position in extraction order (first occurrence in the text).
    pub index: usize,
    pub raw: String,
    /// Byte offsets of `raw` in the scored text.
    pub start: usize,
    pub end: usize,
    pub kind: CitationKind,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    /// Explicit "n.d." marker.
    pub undated: bool,
    pub venue: Option<String>,
    /// Page range for author-page citations, reference number for numbered ones.
    pub locator: Option<String>,
    pub style_conformant: bool,
}

impl Citation {
    /// Surname used to match in-text citations against reference entries.
    ///
    /// `Smith, J. A.` and `Smith JA` yield `smith`; `John Smith` yields `smith`.
    pub fn lead_surname(&self) -> Option<String> {
        let first = self.authors.first()?.trim();
        if let Some((surname, _)) = first.split_once(',') {
            let surname = surname.trim();
            return (!surname.is_empty()).then(|| surname.to_lowercase());
        }
        let tokens: Vec<&str> = first.split_whitespace().collect();
        let surname = match tokens.as_slice() {
            [] => return None,
            [only] => *only,
            [head, .., last] if is_initials(last) => *head,
            [.., last] => *last,
        };
        Some(surname.trim_end_matches('.').to_lowercase())
    }
}

fn is_initials(token: &str) -> bool {
    let letters = token.trim_end_matches('.');
    !letters.is_empty() && letters.len() <= 3 && letters.chars().all(|c| c.is_uppercase())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum FlagKind {
    FabricatedVenue,
    ImplausibleYear,
    MalformedAuthor,
    StaleCitation,
    Unverifiable,
    StyleMismatch,
}

impl FlagKind {
    pub const ALL: [FlagKind; 6] = [
        FlagKind::FabricatedVenue,
        FlagKind::ImplausibleYear,
        FlagKind::MalformedAuthor,
        FlagKind::StaleCitation,
        FlagKind::Unverifiable,
        FlagKind::StyleMismatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlagKind::FabricatedVenue => "fabricated-venue",
            FlagKind::ImplausibleYear => "implausible-year",
            FlagKind::MalformedAuthor => "malformed-author",
            FlagKind::StaleCitation => "stale-citation",
            FlagKind::Unverifiable => "unverifiable",
            FlagKind::StyleMismatch => "style-mismatch",
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One red flag raised against one citation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HallucinationFlag {
    pub citation_index: usize,
    pub citation: String,
    pub kind: FlagKind,
    /// Identifier of the check that raised the flag.
    pub check: String,
    pub reason: String,
    /// Points deducted from the score; set by the aggregator from the weight table.
    pub weight: u32,
}

impl HallucinationFlag {
    pub fn new(
        citation: &Citation,
        kind: FlagKind,
        check: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            citation_index: citation.index,
            citation: citation.raw.clone(),
            kind,
            check: check.to_string(),
            reason: reason.into(),
            weight: 0,
        }
    }
}

/// Document-level signals computed from prose rather than from single citations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProseSignals {
    pub citation_count: usize,
    pub unverifiable_citations: usize,
    /// `unverifiable_citations / citation_count`, 0.0 when there are no citations.
    pub unverifiable_ratio: f64,
    /// Sentences asserting research backing ("studies show") with no citation in them.
    pub unsupported_claims: usize,
    pub no_citations: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Pass,
    Warn,
    Fail,
}

impl ScoreBand {
    pub const PASS_MIN: u8 = 80;
    pub const WARN_MIN: u8 = 50;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::PASS_MIN {
            ScoreBand::Pass
        } else if score >= Self::WARN_MIN {
            ScoreBand::Warn
        } else {
            ScoreBand::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::Pass => "pass",
            ScoreBand::Warn => "warn",
            ScoreBand::Fail => "fail",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal scoring artifact returned with the generated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    /// 0 (certainly hallucinated) to 100 (no red flags).
    pub score: u8,
    pub band: ScoreBand,
    pub weight_table_version: String,
    pub flags: Vec<HallucinationFlag>,
    pub citations: Vec<Citation>,
    pub prose: ProseSignals,
    pub flagged_citations: usize,
    pub clean_citations: usize,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ScoreResult {
    pub fn flags_of(&self, kind: FlagKind) -> impl Iterator<Item = &HallucinationFlag> {
        self.flags.iter().filter(move |f| f.kind == kind)
    }

    pub fn count_of(&self, kind: FlagKind) -> usize {
        self.flags_of(kind).count()
    }
}
