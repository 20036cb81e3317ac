//! Author-year citation parser.
//!
//! Extracts citations written with full-width punctuation, such as
//! `（Smith，2001）`, `（张三和李四，2019）` or `（Smith et al.，2001；王五，2020）`,
//! from body text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::normalize::ET_AL;

/// A full-width parenthetical group. Ends at the first closing `）`.
static GROUP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"（([^）]+)）").unwrap());

/// `<author-field>，<year>` at the start of a clause. The year must not run
/// on into a fifth digit.
static CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^，；]+)，([0-9]{4})(?:[^0-9]|$)").unwrap());

/// Any spelling of "et al" (case-insensitive). Word edges are checked
/// against ASCII letters only, so `张三Et al.` still matches.
static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)et\s+al").unwrap());

/// One author-year citation.
///
/// `authors` is never empty and keeps the order in which the names were
/// written. An author cited as "X et al." is stored as just "X".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CitationRecord {
    authors: Vec<String>,
    year: u16,
}

impl CitationRecord {
    /// Creates a record, or `None` when `authors` is empty.
    pub fn new(authors: Vec<String>, year: u16) -> Option<Self> {
        if authors.is_empty() {
            return None;
        }
        Some(Self { authors, year })
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn year(&self) -> u16 {
        self.year
    }
}

/// Extracts all citation records from the given text.
///
/// Every `；`-separated clause inside a `（...）` group yields at most one
/// record. Clauses without a `，<year>` part are skipped.
///
/// # Examples
///
/// ```
/// use cite_collate::extract_citations;
///
/// let records = extract_citations("如前所述（Smith，2001；Jones和Lee，2002）。");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].authors(), ["Jones", "Lee"]);
/// assert_eq!(records[1].year(), 2002);
/// ```
pub fn extract_citations(text: &str) -> Vec<CitationRecord> {
    let mut records = Vec::new();

    for cap in GROUP_RE.captures_iter(text) {
        let group = cap.get(1).map_or("", |m| m.as_str());

        for clause in group.split('；') {
            let clause = clause.trim();
            if clause.is_empty() {
                continue;
            }
            match parse_clause(clause) {
                Some(record) => records.push(record),
                None => trace!(clause, "skipping clause without author-year pattern"),
            }
        }
    }

    records
}

/// Parses a single clause like `Jones和Lee，2002`.
fn parse_clause(clause: &str) -> Option<CitationRecord> {
    let cap = CLAUSE_RE.captures(clause)?;
    let author_field = cap.get(1)?.as_str().trim();
    let year: u16 = cap.get(2)?.as_str().parse().ok()?;

    let author_field = canonicalize_et_al(author_field);

    let authors: Vec<String> = split_authors(&author_field)
        .into_iter()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .filter_map(|a| {
            let a = match a.find(ET_AL) {
                Some(pos) => a[..pos].trim(),
                None => a,
            };
            (!a.is_empty()).then(|| a.to_string())
        })
        .collect();

    CitationRecord::new(authors, year)
}

/// Rewrites every standalone "et al." variant to the canonical `et al`.
///
/// A trailing period is dropped. Matches inside a Latin word
/// (`Bennet Allen`) are left alone.
fn canonicalize_et_al(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut last = 0;

    for m in ET_AL_RE.find_iter(field) {
        let before = field[..m.start()].chars().next_back();
        let rest = &field[m.end()..];
        if is_ascii_letter(before) || is_ascii_letter(rest.chars().next()) {
            continue;
        }
        out.push_str(&field[last..m.start()]);
        out.push_str(ET_AL);
        last = m.end() + usize::from(rest.starts_with('.'));
    }
    out.push_str(&field[last..]);

    out
}

/// Splits an author field on `和`, `、`, and the standalone word `and`.
///
/// `and` inside a longer Latin word (`Anderson`, `Sandberg`) is not a
/// separator.
fn split_authors(field: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut iter = field.char_indices();

    while let Some((i, c)) = iter.next() {
        if c == '和' || c == '、' {
            parts.push(&field[start..i]);
            start = i + c.len_utf8();
            continue;
        }

        if field[i..].starts_with("and") && is_word_and(field, i) {
            parts.push(&field[start..i]);
            start = i + 3;
            // Skip the remaining "nd".
            iter.next();
            iter.next();
        }
    }
    parts.push(&field[start..]);

    parts
}

/// Whether the `and` at byte offset `i` stands on its own.
fn is_word_and(field: &str, i: usize) -> bool {
    let before = field[..i].chars().next_back();
    let after = field[i + 3..].chars().next();
    !is_ascii_letter(before) && !is_ascii_letter(after)
}

fn is_ascii_letter(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authors(record: &CitationRecord) -> Vec<&str> {
        record.authors().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_empty_text() {
        let records = extract_citations("");
        assert!(records.is_empty());
    }

    #[test]
    fn test_no_citations() {
        let records = extract_citations("这是一段没有引用的正文。");
        assert!(records.is_empty());
    }

    #[test]
    fn test_single_author_citation() {
        // Given: a simple single-author citation
        let text = "已有研究表明（A，1999）这一点。";

        // When: we extract citations
        let records = extract_citations(text);

        // Then: one record with the author and the year
        assert_eq!(records.len(), 1);
        assert_eq!(authors(&records[0]), ["A"]);
        assert_eq!(records[0].year(), 1999);
    }

    #[test]
    fn test_separators_are_equivalent() {
        // Given: the same two authors joined by each supported separator
        let texts = ["（甲和乙，2000）", "（甲、乙，2000）", "（甲 and 乙，2000）"];

        for text in texts {
            // When: we extract citations
            let records = extract_citations(text);

            // Then: both authors are split out identically
            assert_eq!(records.len(), 1, "text: {}", text);
            assert_eq!(authors(&records[0]), ["甲", "乙"], "text: {}", text);
            assert_eq!(records[0].year(), 2000);
        }
    }

    #[test]
    fn test_english_and_separator() {
        let records = extract_citations("（Jones and Lee，2002）");
        assert_eq!(authors(&records[0]), ["Jones", "Lee"]);
    }

    #[test]
    fn test_and_inside_name_is_not_a_separator() {
        // Given: names that contain the letters "and"
        let text = "（Anderson和Sandberg，2010）";

        // When: we extract citations
        let records = extract_citations(text);

        // Then: the names are kept whole
        assert_eq!(authors(&records[0]), ["Anderson", "Sandberg"]);
    }

    #[test]
    fn test_et_al_collapses_to_first_author() {
        let variants = [
            "（Smith et al.，2001）",
            "（Smith Et al.，2001）",
            "（Smith et al，2001）",
            "（Smith ET AL.，2001）",
        ];
        for text in variants {
            let records = extract_citations(text);
            assert_eq!(records.len(), 1, "text: {}", text);
            assert_eq!(authors(&records[0]), ["Smith"], "text: {}", text);
        }
    }

    #[test]
    fn test_et_al_attached_to_cjk_name() {
        // Given: "Et al." written directly after a CJK name
        let text = "（张三Et al.，2019）";

        // When: we extract citations
        let records = extract_citations(text);

        // Then: the suffix is still recognised and removed
        assert_eq!(authors(&records[0]), ["张三"]);
    }

    #[test]
    fn test_et_al_inside_latin_name_is_kept() {
        // "et Al" spans two words of one name here
        let records = extract_citations("（Bennet Allen，2005）");
        assert_eq!(authors(&records[0]), ["Bennet Allen"]);
    }

    #[test]
    fn test_canonicalize_et_al() {
        assert_eq!(canonicalize_et_al("Smith ET  AL."), "Smith et al");
        assert_eq!(canonicalize_et_al("王五et al和李四"), "王五et al和李四");
        assert_eq!(canonicalize_et_al("Smith Et al. and Jones"), "Smith et al and Jones");
    }

    #[test]
    fn test_multiple_clauses_in_one_group() {
        // Given: a group with two clauses
        let text = "（Smith，2001；Jones和Lee，2002）";

        // When: we extract citations
        let records = extract_citations(text);

        // Then: each clause yields an independent record, in order
        assert_eq!(records.len(), 2);
        assert_eq!(authors(&records[0]), ["Smith"]);
        assert_eq!(records[0].year(), 2001);
        assert_eq!(authors(&records[1]), ["Jones", "Lee"]);
        assert_eq!(records[1].year(), 2002);
    }

    #[test]
    fn test_multiple_groups_keep_duplicates() {
        let records = extract_citations("前文（王五，2020）。后文（王五，2020）。");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_clause_without_year_is_skipped() {
        // Given: an explanatory parenthetical and a malformed clause
        let text = "（见附录A）正文（Smith，2001；详见下文）";

        // When: we extract citations
        let records = extract_citations(text);

        // Then: only the well-formed clause is kept
        assert_eq!(records.len(), 1);
        assert_eq!(authors(&records[0]), ["Smith"]);
    }

    #[test]
    fn test_ascii_comma_is_not_a_year_separator() {
        let records = extract_citations("（Smith, 2001）");
        assert!(records.is_empty());
    }

    #[test]
    fn test_five_digit_number_is_not_a_year() {
        let records = extract_citations("（Smith，20011）");
        assert!(records.is_empty());
    }

    #[test]
    fn test_trailing_text_after_year_is_allowed() {
        // Given: a page locator after the year
        let records = extract_citations("（Smith，2001a）（李四，2019，第3页）");

        // Then: the year is still recognised
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year(), 2001);
        assert_eq!(records[1].year(), 2019);
    }

    #[test]
    fn test_empty_tokens_are_dropped() {
        let records = extract_citations("（甲和、乙 ，2000）");
        assert_eq!(authors(&records[0]), ["甲", "乙"]);
    }

    #[test]
    fn test_et_al_only_clause_is_skipped() {
        let records = extract_citations("（et al.，2000）");
        assert!(records.is_empty());
    }

    #[test]
    fn test_deng_suffix_is_kept_by_parser() {
        // The parser leaves 等 alone; the normalizer deals with it.
        let records = extract_citations("（张三等，2018）");
        assert_eq!(authors(&records[0]), ["张三等"]);
    }

    #[test]
    fn test_ascii_parentheses_are_ignored() {
        let records = extract_citations("(Smith，2001)");
        assert!(records.is_empty());
    }

    #[test]
    fn test_record_requires_authors() {
        assert!(CitationRecord::new(Vec::new(), 2001).is_none());
        assert!(CitationRecord::new(vec!["A".to_string()], 2001).is_some());
    }
}
