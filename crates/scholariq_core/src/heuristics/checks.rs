use regex::Regex;
use std::sync::LazyLock;

use super::DocumentContext;
use crate::domain::{Citation, CitationKind, FlagKind, HallucinationFlag};

pub const PLACEHOLDER_VENUE: &str = "placeholder_venue";
pub const GENERIC_VENUE: &str = "generic_venue";
pub const PLACEHOLDER_URL: &str = "placeholder_url";
pub const YEAR_RANGE: &str = "year_range";
pub const PLACEHOLDER_AUTHOR: &str = "placeholder_author";
pub const AUTHOR_SHAPE: &str = "author_shape";
pub const MISSING_AUTHOR: &str = "missing_author";
pub const MISSING_YEAR: &str = "missing_year";
pub const STYLE_CONFORMANCE: &str = "style_conformance";
pub const UNRESOLVED_REFERENCE: &str = "unresolved_reference";
pub const DUPLICATE_ENTRY: &str = "duplicate_entry";

/// Earliest publication year accepted as plausible.
pub const MIN_PLAUSIBLE_YEAR: i32 = 1900;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid heuristic pattern {pattern:?}: {e}"))
}

static PLACEHOLDER_VENUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)\b(?:fake|mock|test|sample|example|placeholder|tbd|dummy|fictional|fictitious)\s+(?:university|press|journal|publications?|publishers?|institute|review|society)\b",
    )
});

static GENERIC_VENUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^(?:the\s+)?(?:(?:international|global|american|european)\s+)?(?:journal\s+of\s+(?:research|studies|science|knowledge|academic\s+research|advanced\s+studies|scholarly\s+work|information|general\s+research)|(?:academic|research|scholarly|science)\s+(?:journal|publications?|review))$",
    )
});

static PLACEHOLDER_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)https?://(?:www\.)?(?:example|test|fake|placeholder|sample|mock|dummy)\.(?:com|org|net|edu)\b",
    )
});

static PLACEHOLDER_AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"(?i)^(?:anonymous|anon\.?|unknown(?:\s+author)?|author(?:s|\s+name)?|researchers?|scholars?|various(?:\s+authors)?|et\s+al\.?|n/?a|tbd|someone|experts?|lastname|surname|firstname|name)$",
    )
});

fn flag(c: &Citation, kind: FlagKind, check: &str, reason: impl Into<String>) -> Option<HallucinationFlag> {
    Some(HallucinationFlag::new(c, kind, check, reason))
}

/// Kinds that are expected to name an author.
fn expects_author(kind: CitationKind) -> bool {
    !matches!(kind, CitationKind::Numbered | CitationKind::Url)
}

pub fn placeholder_venue(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    let candidates = c
        .venue
        .iter()
        .chain(c.authors.iter())
        .map(String::as_str)
        .chain(std::iter::once(c.raw.as_str()));
    for text in candidates {
        if let Some(m) = PLACEHOLDER_VENUE_RE.find(text) {
            return flag(
                c,
                FlagKind::FabricatedVenue,
                PLACEHOLDER_VENUE,
                format!("placeholder venue name \"{}\"", m.as_str()),
            );
        }
    }
    None
}

pub fn generic_venue(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    let venue = c.venue.as_deref()?;
    if GENERIC_VENUE_RE.is_match(venue.trim()) {
        return flag(
            c,
            FlagKind::FabricatedVenue,
            GENERIC_VENUE,
            format!("venue \"{venue}\" is a content-free title"),
        );
    }
    None
}

pub fn placeholder_url(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    let m = PLACEHOLDER_URL_RE.find(&c.raw)?;
    flag(
        c,
        FlagKind::FabricatedVenue,
        PLACEHOLDER_URL,
        format!("placeholder URL {}", m.as_str()),
    )
}

pub fn year_range(c: &Citation, ctx: &DocumentContext) -> Option<HallucinationFlag> {
    let year = c.year?;
    let latest = ctx.current_year + 1;
    if year > latest {
        return flag(
            c,
            FlagKind::ImplausibleYear,
            YEAR_RANGE,
            format!("year {year} is in the future (latest plausible {latest})"),
        );
    }
    if year < MIN_PLAUSIBLE_YEAR {
        return flag(
            c,
            FlagKind::ImplausibleYear,
            YEAR_RANGE,
            format!("year {year} is before {MIN_PLAUSIBLE_YEAR}"),
        );
    }
    None
}

pub fn placeholder_author(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    let author = c
        .authors
        .iter()
        .find(|a| PLACEHOLDER_AUTHOR_RE.is_match(a.trim()))?;
    flag(
        c,
        FlagKind::MalformedAuthor,
        PLACEHOLDER_AUTHOR,
        format!("placeholder author \"{author}\""),
    )
}

fn author_shape_problem(author: &str) -> Option<&'static str> {
    let author = author.trim();
    if author.starts_with("et al") {
        return None;
    }
    let first = author.chars().next()?;
    if author.chars().any(|ch| ch.is_ascii_digit()) {
        Some("contains digits")
    } else if first.is_lowercase() {
        Some("is not capitalised")
    } else if author.chars().filter(|ch| ch.is_alphabetic()).count() < 2 {
        Some("is a single letter")
    } else if author.split_whitespace().count() > 6 {
        Some("is too long to be a name")
    } else {
        None
    }
}

pub fn author_shape(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    if !expects_author(c.kind) {
        return None;
    }
    c.authors.iter().find_map(|a| {
        let problem = author_shape_problem(a)?;
        flag(
            c,
            FlagKind::MalformedAuthor,
            AUTHOR_SHAPE,
            format!("author \"{a}\" {problem}"),
        )
    })
}

pub fn missing_author(c: &Citation, _ctx: &DocumentContext) -> Option<HallucinationFlag> {
    if !expects_author(c.kind) || !c.authors.is_empty() {
        return None;
    }
    flag(c, FlagKind::MalformedAuthor, MISSING_AUTHOR, "no author could be parsed")
}

/// Missing years are reported in the malformed-author class so they never pass silently.
pub fn missing_year(c: &Citation, ctx: &DocumentContext) -> Option<HallucinationFlag> {
    if c.year.is_some() {
        return None;
    }
    if c.undated {
        return flag(
            c,
            FlagKind::MalformedAuthor,
            MISSING_YEAR,
            "citation is marked n.d. (no publication date)",
        );
    }
    let in_text_author_date = matches!(c.kind, CitationKind::Parenthetical | CitationKind::Narrative);
    if in_text_author_date && ctx.style.is_author_date() {
        return flag(
            c,
            FlagKind::MalformedAuthor,
            MISSING_YEAR,
            format!("{} citation has no publication year", ctx.style),
        );
    }
    None
}

pub fn style_conformance(c: &Citation, ctx: &DocumentContext) -> Option<HallucinationFlag> {
    if c.style_conformant {
        return None;
    }
    flag(
        c,
        FlagKind::StyleMismatch,
        STYLE_CONFORMANCE,
        format!("not a {} citation form", ctx.style),
    )
}

/// Expand `1, 3-5` into `[1, 3, 4, 5]`.
fn reference_numbers(locator: &str) -> Vec<u32> {
    let mut out = Vec::new();
    for part in locator.split(',') {
        let part = part.trim();
        let bounds: Vec<u32> = part
            .split(['-', '–'])
            .filter_map(|n| n.trim().parse().ok())
            .collect();
        match bounds.as_slice() {
            [n] => out.push(*n),
            [lo, hi] if lo <= hi && hi - lo < 100 => out.extend(*lo..=*hi),
            [lo, _] => out.push(*lo),
            _ => {}
        }
    }
    out
}

pub fn unresolved_reference(c: &Citation, ctx: &DocumentContext) -> Option<HallucinationFlag> {
    match c.kind {
        CitationKind::Numbered => {
            let numbers = reference_numbers(c.locator.as_deref().unwrap_or_default());
            if ctx.reference_numbers.is_empty() {
                return flag(
                    c,
                    FlagKind::Unverifiable,
                    UNRESOLVED_REFERENCE,
                    "numbered citation without a numbered reference list",
                );
            }
            let missing = numbers
                .iter()
                .find(|n| !ctx.reference_numbers.contains(*n))?;
            flag(
                c,
                FlagKind::Unverifiable,
                UNRESOLVED_REFERENCE,
                format!("reference [{missing}] has no entry in the reference list"),
            )
        }
        CitationKind::Parenthetical | CitationKind::Narrative => {
            if !ctx.has_author_reference_list() || (c.year.is_none() && !c.undated) {
                return None;
            }
            let surname = c.lead_surname()?;
            if ctx.reference_keys.contains(&(surname, c.year)) {
                return None;
            }
            flag(
                c,
                FlagKind::Unverifiable,
                UNRESOLVED_REFERENCE,
                "no matching entry in the reference list",
            )
        }
        _ => None,
    }
}

pub fn duplicate_entry(c: &Citation, ctx: &DocumentContext) -> Option<HallucinationFlag> {
    if !c.kind.is_reference_list() || !ctx.is_repeated_entry(c) {
        return None;
    }
    flag(
        c,
        FlagKind::Unverifiable,
        DUPLICATE_ENTRY,
        "reference entry repeats an earlier entry verbatim",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_locators_expand() {
        assert_eq!(reference_numbers("1, 3-5"), vec![1, 3, 4, 5]);
        assert_eq!(reference_numbers("7"), vec![7]);
        assert_eq!(reference_numbers("9-2"), vec![9]);
    }

    #[test]
    fn author_shapes() {
        assert_eq!(author_shape_problem("Smith"), None);
        assert_eq!(author_shape_problem("smith"), Some("is not capitalised"));
        assert_eq!(author_shape_problem("Smith2"), Some("contains digits"));
        assert_eq!(author_shape_problem("Q"), Some("is a single letter"));
        assert_eq!(author_shape_problem("et al."), None);
    }

    #[test]
    fn generic_venue_titles() {
        assert!(GENERIC_VENUE_RE.is_match("International Journal of Research"));
        assert!(GENERIC_VENUE_RE.is_match("Academic Journal"));
        assert!(!GENERIC_VENUE_RE.is_match("Academic Press"));
        assert!(!GENERIC_VENUE_RE.is_match("Journal of Applied Psychology"));
    }
}
