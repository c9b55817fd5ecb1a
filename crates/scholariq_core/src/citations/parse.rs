use super::patterns::{ENTRY_AUTHOR, SURNAME_INITIALS};

/// Capitalised words that open a sentence rather than name an author.
const LEADING_STOPWORDS: &[&str] = &[
    "A", "According", "Additionally", "Also", "Although", "An", "As", "At", "Both", "By",
    "Earlier", "Early", "Following", "For", "From", "Furthermore", "However", "In", "Later",
    "Like", "Moreover", "Notably", "Of", "On", "Per", "Recent", "Recently", "Research", "Similarly",
    "Since", "Studies", "That", "The", "These", "This", "Those", "To", "Unlike", "When", "While",
    "With", "Work",
];

pub(super) fn parse_year(raw: &str) -> Option<i32> {
    raw.get(..4)?.parse::<i32>().ok()
}

/// Drop sentence-opening words from a narrative author run ("According to Smith" never reaches
/// here, but "The Fake University Press" does). Returns bytes skipped and the remainder.
pub(super) fn strip_leading_stopwords(raw: &str) -> (usize, &str) {
    let mut rest = raw;
    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if word_end == rest.len() || !LEADING_STOPWORDS.contains(&word) {
            break;
        }
        rest = rest[word_end..].trim_start();
    }
    if LEADING_STOPWORDS.contains(&rest) {
        rest = "";
    }
    (raw.len() - rest.len(), rest)
}

/// `Smith & Lee`, `Smith, Jones, and Lee`, `Smith et al.` -> individual names.
pub(super) fn split_in_text_authors(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    if raw.starts_with("et al") {
        return vec![raw.to_string()];
    }
    let without_et_al = match raw.find(" et al") {
        Some(i) => raw[..i].trim_end().trim_end_matches(','),
        None => raw,
    };
    without_et_al
        .replace(" and ", " & ")
        .split(['&', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `Smith, J. A., & Lee, K.` -> [`Smith, J. A.`, `Lee, K.`]
pub(super) fn entry_authors(raw: &str) -> Vec<String> {
    let found: Vec<String> = SURNAME_INITIALS
        .find_iter(raw)
        .map(|m| m.as_str().trim().trim_end_matches(',').trim().to_string())
        .collect();
    if found.is_empty() {
        let whole = raw.trim().trim_end_matches(',').trim();
        if whole.is_empty() {
            return Vec::new();
        }
        return vec![whole.to_string()];
    }
    found
}

fn clean_venue(raw: &str) -> Option<String> {
    let venue = raw
        .split([',', ';'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(['*', '_', '.', ' '])
        .trim();
    if venue.is_empty() || venue.starts_with("http") || venue.chars().all(|c| !c.is_alphabetic()) {
        None
    } else {
        Some(venue.to_string())
    }
}

/// Venue from the tail of an author-year entry: `Title. Journal, 3(2), 1-9.` -> `Journal`.
pub(super) fn reference_venue(rest: &str) -> Option<String> {
    let parts: Vec<&str> = rest.split(". ").collect();
    parts.get(1).and_then(|p| clean_venue(p))
}

/// Venue from an MLA (`"Title." Venue, ...`) or Chicago (`Title. City: Publisher, 2020.`) tail.
pub(super) fn bibliography_venue(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let is_quote = |c: char| c == '"' || c == '“' || c == '”';
    if rest.starts_with(is_quote) {
        let opening = rest.chars().next().map_or(1, char::len_utf8);
        let after_open = &rest[opening..];
        if let Some(close) = after_open.find(is_quote) {
            let tail = after_open[close..]
                .trim_start_matches(is_quote)
                .trim_start_matches(['.', ',', ' ']);
            return clean_venue(tail);
        }
    }
    if let Some((_, publisher)) = rest.split_once(": ") {
        return clean_venue(publisher);
    }
    let parts: Vec<&str> = rest.split(". ").collect();
    parts.get(1).and_then(|p| clean_venue(p))
}

/// One comma-separated piece of a numbered entry's author run.
///
/// `Smith J`, `and Park S`, and `John Smith and Kara Lee` are names; `Memory and Sleep` is not,
/// since names joined by "and" must each have at least two words.
fn entry_author_names(piece: &str) -> Option<Vec<String>> {
    let piece = piece.trim();
    let piece = piece
        .strip_prefix("and ")
        .or_else(|| piece.strip_prefix("& "))
        .unwrap_or(piece)
        .trim();
    if ENTRY_AUTHOR.is_match(piece) {
        return Some(vec![piece.to_string()]);
    }
    let names: Vec<&str> = piece
        .split(" and ")
        .flat_map(|p| p.split(" & "))
        .map(str::trim)
        .collect();
    let all_full_names = names.len() > 1
        && names
            .iter()
            .all(|n| n.split_whitespace().count() >= 2 && ENTRY_AUTHOR.is_match(n));
    all_full_names.then(|| names.into_iter().map(str::to_string).collect())
}

/// Authors and venue of a numbered entry, or `None` when the line does not open with a name.
pub(super) fn numbered_entry_parts(body: &str) -> Option<(Vec<String>, Option<String>)> {
    let parts: Vec<&str> = body.split(". ").collect();
    let first = parts.first()?;

    let mut authors = Vec::new();
    for piece in first.split(',') {
        match entry_author_names(piece) {
            Some(names) => authors.extend(names),
            None => break,
        }
    }
    if authors.is_empty() {
        return None;
    }

    let venue = if parts.len() >= 3 {
        clean_venue(parts[2])
    } else {
        body.split_once(": ").and_then(|(_, tail)| clean_venue(tail))
    };
    Some((authors, venue))
}
