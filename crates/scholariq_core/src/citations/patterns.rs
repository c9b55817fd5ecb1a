//! Compiled citation patterns. Each regex is built once and shared read-only.

use regex::Regex;
use std::sync::LazyLock;

/// Capitalised name token: `Smith`, `O'Neil`, `Müller-Lee`.
const NAME: &str = r"\p{Lu}[\p{L}'’\-]+";

const YEAR_OR_ND: &str = r"(?P<year>\d{4}[a-z]?|n\.\s?d\.)";

const LOCATOR: &str = r"(?P<loc>\d+(?:\s*[-–]\s*\d+)?)";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid citation pattern {pattern:?}: {e}"))
}

fn paren_authors() -> String {
    format!(r"{NAME}(?:(?:\s+|,\s+|,?\s+(?:&|and)\s+){NAME})*(?:,?\s+et\s+al\.?)?")
}

/// `Smith, J. A., & Lee, K. (2020). Title. Venue, 3(2), 1-9.` (APA) or without the dot after
/// the year (Harvard).
pub static AUTHOR_YEAR_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?m)^[ \t]*(?:[-*•][ \t]+)?(?P<authors>{NAME},\s+\p{{Lu}}\.[^()\n]{{0,200}}?)\s*\({YEAR_OR_ND}\)(?P<dot>\.?)[ \t]*(?P<rest>[^\n]*)$"
    ))
});

/// `Smith, John. "Title." Venue, vol. 3, 2020.` (MLA) or `Smith, John. Title. City: Press, 2020.`
/// (Chicago bibliography).
pub static BIBLIOGRAPHY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?m)^[ \t]*(?:[-*•][ \t]+)?(?P<authors>{NAME},\s+{NAME}(?:\s+\p{{Lu}}\.)?(?:,?\s+and\s+[^.\n]{{2,80}})?)\.\s+(?P<rest>[^\n]*\b(?P<year>1\d{{3}}|20\d{{2}})\b[^\n]*)$"
    ))
});

/// `American Psychological Association. (2010). Title. Publisher.` (group author).
pub static ORGANISATION_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?m)^[ \t]*(?:[-*•][ \t]+)?(?P<authors>{NAME}(?:\s+(?:of|for|and|on|in|the|&|{NAME})){{0,8}})\.\s+\({YEAR_OR_ND}\)(?P<dot>\.?)[ \t]*(?P<rest>[^\n]*)$"
    ))
});

/// `1. Smith J, Lee K. Title. Venue. 2020;3(2):1-9.` or `[1] Smith J ...` (Vancouver list,
/// numbered notes).
pub static NUMBERED_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?m)^[ \t]*(?:\[(?P<bracket>\d{1,3})\]|(?P<dotted>\d{1,3})\.)[ \t]+(?P<body>\p{Lu}[^\n]*)$",
    )
});

/// `Smith (2020)`, `Smith and Lee (2020)`, `Smith et al. (2020, p. 4)`.
pub static NARRATIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"(?P<authors>{NAME}(?:\s+{NAME})*(?:(?:,\s+|,?\s+(?:&|and)\s+){NAME}(?:\s+{NAME})*)?(?:\s+et\s+al\.?)?)\s+\({YEAR_OR_ND}(?:,\s*(?:pp?\.\s*)?{LOCATOR})?\)"
    ))
});

/// Any short parenthetical; its `;`-separated segments are classified below.
pub static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\((?P<inner>[^()\n]{2,240})\)"));

/// Segment `Smith, 2020` / `Smith & Lee, 2020, p. 4` / `Smith, n.d.`
pub static SEGMENT_AUTHOR_DATE_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^(?P<authors>{}),\s*{YEAR_OR_ND}(?:,\s*(?:pp?\.\s*)?{LOCATOR})?$",
        paren_authors()
    ))
});

/// Segment `Smith 2020` / `Smith 2020: 45`
pub static SEGMENT_AUTHOR_DATE_BARE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^(?P<authors>{})\s+{YEAR_OR_ND}(?:(?::\s*|,\s*(?:pp?\.\s*)?){LOCATOR})?$",
        paren_authors()
    ))
});

/// Segment `Smith 45` / `Smith 45-47` (MLA author-page).
pub static SEGMENT_AUTHOR_PAGE: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^(?P<authors>{}),?\s+(?P<loc>\d{{1,3}}(?:\s*[-–]\s*\d{{1,3}})?)$",
        paren_authors()
    ))
});

/// `[1]`, `[1, 3]`, `[2-4]`
pub static NUMBERED_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\[(?P<nums>\d{1,3}(?:\s*[,–-]\s*\d{1,3})*)\]"));

pub static URL: LazyLock<Regex> = LazyLock::new(|| compile(r#"https?://[^\s)\]>"'<]+"#));

pub static SEGMENT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^(?:see also|see|e\.g\.,?|i\.e\.,?|cf\.|as cited in|cited in)\s+")
});

pub static YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"\b(1\d{3}|2\d{3})\b"));

pub static UNDATED: LazyLock<Regex> = LazyLock::new(|| compile(r"n\.\s?d\."));

pub static CAPITALISED_WORD: LazyLock<Regex> = LazyLock::new(|| compile(r"\p{Lu}\p{Ll}"));

/// `2010` or `2010a` alone inside parentheses.
pub static BARE_YEAR: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d{4}[a-z]?$"));

/// Year positions typical of a reference line: `(2010)` or `2010;`.
pub static REFERENCE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\(\d{4}[a-z]?\)|\b\d{4}[a-z]?;"));

/// Cross-references to parts of the document: `Table 1`, `Fig. 2a`, `Appendix B`, `Part II`.
/// A four-digit number after the label is a year, so `(Box 1976)` stays a citation.
pub static CROSS_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(?:Tables?|Fig(?:ure)?s?\.?|Chapters?|Ch\.|Sections?|Sec\.|§|Appendix|Appendices|Parts?|Steps?|Phases?|Stages?|Equations?|Eqs?\.?|Box(?:es)?|Exhibits?|Items?|Study|Studies|Experiments?|Hypothes[ie]s|Questions?|Levels?|Grades?|Notes?|Panels?|Vol(?:ume)?s?\.?|Models?|Conditions?|Groups?|Trials?|Waves?|Sessions?|Tasks?|Cases?|Units?|Modules?|Lessons?|Weeks?)\s+(?:\d{1,3}[a-z]?\b|[IVXLC]+\b|\p{Lu}\b)",
    )
});

pub static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?:\d{1,2},?\s+)?\d{4}$",
    )
});

/// `Smith, J. A.` pieces of an author-year entry's author list.
pub static SURNAME_INITIALS: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"{NAME},\s+(?:\p{{Lu}}\.\s*)+")));

/// One author in a Vancouver or note entry: `Smith J`, `Smith JA`, `John Smith`.
pub static ENTRY_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(r"^{NAME}(?:\s+(?:{NAME}|\p{{Lu}}{{1,3}}\.?)){{0,3}}$"))
});
