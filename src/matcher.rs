//! Matching citation records against the reference corpus.
//!
//! Matching is a first-match-wins linear scan in file order. The result for
//! a record depends only on that record and the corpus, never on the other
//! records.

use serde::Serialize;
use tracing::debug;

use crate::citations::CitationRecord;
use crate::normalize::normalize_author;
use crate::refs::ReferenceCorpus;

/// Authors longer than this (in characters) are parsing artifacts.
pub const MAX_AUTHOR_CHARS: usize = 30;

/// Records with more authors than this are parsing artifacts.
pub const MAX_AUTHORS: usize = 3;

/// The outcome of matching one citation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchResult {
    /// The reference line as written in the corpus (trimmed).
    Found { line: String },
    /// No line matched. Carries the record's authors and year for display.
    NotFound { authors: Vec<String>, year: u16 },
}

impl MatchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }
}

/// Matches every record against the corpus, one result per record.
pub fn match_citations(records: &[CitationRecord], corpus: &ReferenceCorpus) -> Vec<MatchResult> {
    records
        .iter()
        .map(|record| match_citation(record, corpus))
        .collect()
}

/// Matches a single record against the corpus.
///
/// 1. Records with an author over [`MAX_AUTHOR_CHARS`] characters, or more
///    than [`MAX_AUTHORS`] authors, are `NotFound` without searching.
/// 2. For each non-empty author key in order, the first line whose
///    normalized form contains the key wins.
/// 3. Otherwise, the first line that contains the year and whose normalized
///    form contains any author key wins. An author that normalizes to an
///    empty key (a bare `等`) is contained in every line, so it matches on
///    the year alone.
pub fn match_citation(record: &CitationRecord, corpus: &ReferenceCorpus) -> MatchResult {
    let not_found = || MatchResult::NotFound {
        authors: record.authors().to_vec(),
        year: record.year(),
    };

    if is_suspicious(record) {
        debug!(authors = ?record.authors(), year = record.year(), "rejected by pre-filter");
        return not_found();
    }

    let keys: Vec<String> = record
        .authors()
        .iter()
        .map(|a| normalize_author(a))
        .collect();

    if let Some(line) = find_by_author(&keys, corpus) {
        debug!(authors = ?record.authors(), year = record.year(), line, "matched by author");
        return MatchResult::Found {
            line: line.to_string(),
        };
    }

    if let Some(line) = find_by_year_and_author(record.year(), &keys, corpus) {
        debug!(
            authors = ?record.authors(),
            year = record.year(),
            line,
            "matched by year and author"
        );
        return MatchResult::Found {
            line: line.to_string(),
        };
    }

    debug!(authors = ?record.authors(), year = record.year(), "no matching reference");
    not_found()
}

fn is_suspicious(record: &CitationRecord) -> bool {
    record.authors().len() > MAX_AUTHORS
        || record
            .authors()
            .iter()
            .any(|a| a.chars().count() > MAX_AUTHOR_CHARS)
}

fn find_by_author<'c>(keys: &[String], corpus: &'c ReferenceCorpus) -> Option<&'c str> {
    keys.iter().filter(|key| !key.is_empty()).find_map(|key| {
        corpus
            .lines()
            .iter()
            .find(|line| line.normalized.contains(key.as_str()))
            .map(|line| line.text.as_str())
    })
}

fn find_by_year_and_author<'c>(
    year: u16,
    keys: &[String],
    corpus: &'c ReferenceCorpus,
) -> Option<&'c str> {
    let year = year.to_string();
    corpus
        .lines()
        .iter()
        .find(|line| {
            line.text.contains(&year)
                && keys.iter().any(|key| line.normalized.contains(key.as_str()))
        })
        .map(|line| line.text.as_str())
}
