//! Citation pattern matching.
//!
//! Extraction never fails: text that looks citation-like but matches no structured pattern is
//! kept as a [`CitationKind::Fragment`] with missing fields so the heuristics can flag it.

use std::collections::BTreeMap;

use regex::Captures;

use crate::domain::{Citation, CitationKind, CitationStyle};

mod parse;
pub mod patterns;

use parse::{
    bibliography_venue, entry_authors, numbered_entry_parts, parse_year, reference_venue,
    split_in_text_authors, strip_leading_stopwords,
};
use patterns::*;

/// Concrete surface form a citation was matched in. Drives style conformance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    AuthorDateComma,
    AuthorDateBare,
    AuthorPage,
    Narrative,
    Numbered,
    NumberedEntry,
    AuthorYearEntry { dot_after_year: bool },
    BibliographyEntry,
    Url,
    Fragment,
}

impl Form {
    fn kind(self) -> CitationKind {
        match self {
            Form::AuthorDateComma | Form::AuthorDateBare | Form::AuthorPage => {
                CitationKind::Parenthetical
            }
            Form::Narrative => CitationKind::Narrative,
            Form::Numbered => CitationKind::Numbered,
            Form::NumberedEntry => CitationKind::Footnote,
            Form::AuthorYearEntry { .. } | Form::BibliographyEntry => CitationKind::ReferenceEntry,
            Form::Url => CitationKind::Url,
            Form::Fragment => CitationKind::Fragment,
        }
    }

    fn conforms_to(self, style: CitationStyle) -> bool {
        match (style, self) {
            (_, Form::Url) => true,
            (_, Form::Fragment) => false,
            (CitationStyle::Apa, f) => matches!(
                f,
                Form::AuthorDateComma
                    | Form::Narrative
                    | Form::AuthorYearEntry {
                        dot_after_year: true
                    }
            ),
            (CitationStyle::Harvard, f) => matches!(
                f,
                Form::AuthorDateComma
                    | Form::AuthorDateBare
                    | Form::Narrative
                    | Form::AuthorYearEntry { .. }
            ),
            (CitationStyle::Chicago, f) => matches!(
                f,
                Form::AuthorDateBare
                    | Form::Narrative
                    | Form::NumberedEntry
                    | Form::BibliographyEntry
            ),
            (CitationStyle::Mla, f) => matches!(f, Form::AuthorPage | Form::BibliographyEntry),
            (CitationStyle::Vancouver, f) => matches!(f, Form::Numbered | Form::NumberedEntry),
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    start: usize,
    end: usize,
    form: Form,
    authors: Vec<String>,
    year: Option<i32>,
    undated: bool,
    venue: Option<String>,
    locator: Option<String>,
}

impl Candidate {
    fn new(start: usize, end: usize, form: Form) -> Self {
        Self {
            start,
            end,
            form,
            authors: Vec::new(),
            year: None,
            undated: false,
            venue: None,
            locator: None,
        }
    }

    fn with_year_field(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            if UNDATED.is_match(raw) {
                self.undated = true;
            } else {
                self.year = parse_year(raw);
            }
        }
        self
    }
}

struct Matcher<'t> {
    text: &'t str,
    /// Disjoint claimed spans, `start -> end`.
    claimed: BTreeMap<usize, usize>,
    found: Vec<Candidate>,
}

impl<'t> Matcher<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            claimed: BTreeMap::new(),
            found: Vec::new(),
        }
    }

    /// Only the last span starting before `end` can overlap `start..end`.
    fn is_free(&self, start: usize, end: usize) -> bool {
        self.claimed
            .range(..end)
            .next_back()
            .map_or(true, |(_, &e)| e <= start)
    }

    /// Record a candidate unless a higher-priority pattern already owns any of its span.
    fn claim(&mut self, candidate: Candidate) -> bool {
        if !self.is_free(candidate.start, candidate.end) {
            return false;
        }
        self.claimed.insert(candidate.start, candidate.end);
        self.found.push(candidate);
        true
    }

    fn author_year_entries(&mut self) {
        for caps in AUTHOR_YEAR_ENTRY.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let authors = caps.name("authors").map_or("", |m| m.as_str());
            let rest = caps.name("rest").map_or("", |m| m.as_str());
            let dot_after_year = caps.name("dot").is_some_and(|m| !m.as_str().is_empty());

            let mut c = Candidate::new(
                whole.start(),
                whole.end(),
                Form::AuthorYearEntry { dot_after_year },
            )
            .with_year_field(caps.name("year").map(|m| m.as_str()));
            c.authors = entry_authors(authors);
            c.venue = reference_venue(rest);
            self.claim(trim_candidate(self.text, c));
        }
    }

    fn organisation_entries(&mut self) {
        for caps in ORGANISATION_ENTRY.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let authors = caps.name("authors").map_or("", |m| m.as_str()).trim();
            let rest = caps.name("rest").map_or("", |m| m.as_str());
            let dot_after_year = caps.name("dot").is_some_and(|m| !m.as_str().is_empty());

            let mut c = Candidate::new(
                whole.start(),
                whole.end(),
                Form::AuthorYearEntry { dot_after_year },
            )
            .with_year_field(caps.name("year").map(|m| m.as_str()));
            c.authors = vec![authors.to_string()];
            c.venue = reference_venue(rest);
            self.claim(trim_candidate(self.text, c));
        }
    }

    fn bibliography_entries(&mut self) {
        for caps in BIBLIOGRAPHY_ENTRY.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let authors = caps.name("authors").map_or("", |m| m.as_str());
            let rest = caps.name("rest").map_or("", |m| m.as_str());

            let mut c = Candidate::new(whole.start(), whole.end(), Form::BibliographyEntry)
                .with_year_field(caps.name("year").map(|m| m.as_str()));
            c.authors = split_bibliography_authors(authors);
            c.venue = bibliography_venue(rest);
            self.claim(trim_candidate(self.text, c));
        }
    }

    fn numbered_entries(&mut self) {
        for caps in NUMBERED_ENTRY.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let number = caps
                .name("bracket")
                .or_else(|| caps.name("dotted"))
                .map(|m| m.as_str().to_string());
            let body = caps.name("body").map_or("", |m| m.as_str());

            let Some(year) = YEAR.find_iter(body).last() else {
                continue;
            };
            // A line without a leading name is kept, authorless, only when its year sits where
            // references put it; otherwise it is a numbered prose line.
            let (authors, venue) = match numbered_entry_parts(body) {
                Some(parts) => parts,
                None if REFERENCE_YEAR.is_match(body) => (Vec::new(), None),
                None => continue,
            };

            let mut c = Candidate::new(whole.start(), whole.end(), Form::NumberedEntry)
                .with_year_field(Some(year.as_str()));
            c.authors = authors;
            c.venue = venue;
            c.locator = number;
            self.claim(trim_candidate(self.text, c));
        }
    }

    fn narratives(&mut self) {
        for caps in NARRATIVE.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(authors_m) = caps.name("authors") else { continue };

            let (skipped, authors) = strip_leading_stopwords(authors_m.as_str());
            if authors.is_empty() {
                continue;
            }
            let start = authors_m.start() + skipped;
            let mut c = Candidate::new(start, whole.end(), Form::Narrative)
                .with_year_field(caps.name("year").map(|m| m.as_str()));
            c.authors = split_in_text_authors(authors);
            c.locator = caps.name("loc").map(|m| m.as_str().to_string());
            self.claim(c);
        }
    }

    fn parentheticals(&mut self) {
        let mut pending = Vec::new();
        for caps in PARENTHETICAL.captures_iter(self.text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.name("inner")) else {
                continue;
            };
            if !self.is_free(whole.start(), whole.end()) {
                continue;
            }
            let segments = split_segments(inner.as_str(), inner.start());
            let single = segments.len() == 1;
            for (seg_start, seg) in segments {
                let Some(mut c) = classify_segment(seg, seg_start) else {
                    continue;
                };
                if single {
                    c.start = whole.start();
                    c.end = whole.end();
                }
                pending.push(c);
            }
        }
        for c in pending {
            self.claim(c);
        }
    }

    fn numbered_brackets(&mut self) {
        for caps in NUMBERED_BRACKET.captures_iter(self.text) {
            let Some(whole) = caps.get(0) else { continue };
            let mut c = Candidate::new(whole.start(), whole.end(), Form::Numbered);
            c.locator = caps.name("nums").map(|m| m.as_str().to_string());
            self.claim(c);
        }
    }

    fn urls(&mut self) {
        for m in URL.find_iter(self.text) {
            let url = m.as_str().trim_end_matches(['.', ',', ';', ':']);
            let mut c = Candidate::new(m.start(), m.start() + url.len(), Form::Url);
            c.venue = url_host(url);
            self.claim(c);
        }
    }

    fn finish(self, style: CitationStyle) -> Vec<Citation> {
        let text = self.text;
        let mut found = self.found;
        found.sort_by_key(|c| (c.start, c.end));
        found
            .into_iter()
            .enumerate()
            .map(|(index, c)| Citation {
                index,
                raw: text[c.start..c.end].to_string(),
                start: c.start,
                end: c.end,
                kind: c.form.kind(),
                authors: c.authors,
                year: c.year,
                undated: c.undated,
                venue: c.venue,
                locator: c.locator,
                style_conformant: c.form.conforms_to(style),
            })
            .collect()
    }
}

/// Extract citation candidates in order of first occurrence.
///
/// Patterns run in priority order (reference-list lines, narrative, parenthetical, numeric,
/// URLs); a span claimed by an earlier pattern is never re-matched by a later one.
pub fn extract_citations(text: &str, style: CitationStyle) -> Vec<Citation> {
    let mut m = Matcher::new(text);
    m.author_year_entries();
    m.organisation_entries();
    m.bibliography_entries();
    m.numbered_entries();
    m.narratives();
    m.parentheticals();
    m.numbered_brackets();
    m.urls();
    m.finish(style)
}

fn trim_candidate(text: &str, mut c: Candidate) -> Candidate {
    let raw = &text[c.start..c.end];
    let lead = raw.len() - raw.trim_start().len();
    let trail = raw.len() - raw.trim_end().len();
    c.start += lead;
    c.end -= trail;
    c
}

/// Split a parenthetical body on `;`, returning each trimmed segment with its byte offset.
fn split_segments(inner: &str, base: usize) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    for part in inner.split(';') {
        let lead = part.len() - part.trim_start().len();
        let trimmed = part.trim();
        if !trimmed.is_empty() {
            out.push((base + offset + lead, trimmed));
        }
        offset += part.len() + 1;
    }
    out
}

fn classify_segment(segment: &str, start: usize) -> Option<Candidate> {
    let prefix_len = SEGMENT_PREFIX.find(segment).map_or(0, |m| m.end());
    let body = &segment[prefix_len..];
    let body_start = start + prefix_len;
    let end = start + segment.len();
    if CALENDAR_DATE.is_match(body) || CROSS_REFERENCE.is_match(body) {
        return None;
    }

    let structured = [
        (&*SEGMENT_AUTHOR_DATE_COMMA, Form::AuthorDateComma),
        (&*SEGMENT_AUTHOR_DATE_BARE, Form::AuthorDateBare),
        (&*SEGMENT_AUTHOR_PAGE, Form::AuthorPage),
    ];
    for (re, form) in structured {
        if let Some(caps) = re.captures(body) {
            return Some(segment_candidate(&caps, body_start, end, form));
        }
    }

    if !looks_citation_like(body) {
        return None;
    }
    let mut c = Candidate::new(body_start, end, Form::Fragment);
    if UNDATED.is_match(body) {
        c.undated = true;
    } else {
        c.year = YEAR.find(body).and_then(|m| parse_year(m.as_str()));
    }
    let author_part = body.split(',').next().unwrap_or_default().trim();
    if author_part.chars().any(char::is_alphabetic) && !YEAR.is_match(author_part) {
        c.authors = vec![author_part.to_string()];
    }
    Some(c)
}

fn segment_candidate(caps: &Captures<'_>, start: usize, end: usize, form: Form) -> Candidate {
    let mut c = Candidate::new(start, end, form).with_year_field(caps.name("year").map(|m| m.as_str()));
    c.authors = split_in_text_authors(caps.name("authors").map_or("", |m| m.as_str()));
    c.locator = caps.name("loc").map(|m| m.as_str().to_string());
    c
}

/// A parenthetical that carries a year or "n.d." next to something name-like, or a lone year.
fn looks_citation_like(body: &str) -> bool {
    let dated = YEAR.is_match(body) || UNDATED.is_match(body);
    if !dated || CALENDAR_DATE.is_match(body) {
        return false;
    }
    if BARE_YEAR.is_match(body) {
        return true;
    }
    CAPITALISED_WORD.is_match(body) || body.contains(',') || UNDATED.is_match(body)
}

fn split_bibliography_authors(raw: &str) -> Vec<String> {
    // "Smith, John, and Jane Doe": first author inverted, later ones in natural order.
    let mut parts = raw.splitn(2, " and ");
    let first = parts
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches(',')
        .to_string();
    let mut out = vec![first];
    if let Some(rest) = parts.next() {
        let rest = rest.trim();
        if !rest.is_empty() {
            out.push(rest.to_string());
        }
    }
    out
}

fn url_host(url: &str) -> Option<String> {
    let after_scheme = url.split_once("://")?.1;
    let host = after_scheme.split(['/', '?', '#']).next()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}
