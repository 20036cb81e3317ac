//! cite-collate: CLI for building a numbered reference list from the
//! author-year citations in a manuscript.
//!
//! This library provides functionality to:
//! - Parse full-width author-year citations (`（Smith，2001；张三等，2019）`)
//! - Normalize author names for loose comparison
//! - Match citations against a plain-text reference list
//! - Deduplicate, sort, clean, and number the matched references

pub mod citations;
pub mod collate;
pub mod matcher;
pub mod normalize;
pub mod output;
pub mod refs;

pub use citations::{extract_citations, CitationRecord};
pub use matcher::{match_citation, match_citations, MatchResult};
pub use normalize::normalize_author;
pub use output::{build_bibliography, render_json, render_text, OutputEntry, OutputOptions};
pub use refs::{load_refs, ReferenceCorpus};

use tracing::info;

/// Runs the whole pipeline over in-memory inputs.
///
/// # Examples
///
/// ```
/// use cite_collate::{collate, render_text, OutputOptions, ReferenceCorpus};
///
/// let corpus = ReferenceCorpus::from_text("[3] Smith, J. Title A. 2001.\n");
/// let entries = collate("正文（Smith，2001）。", &corpus, &OutputOptions::default());
/// assert_eq!(render_text(&entries), "[1] Smith, J. Title A. 2001.\n");
/// ```
pub fn collate(
    body: &str,
    corpus: &ReferenceCorpus,
    options: &OutputOptions<'_>,
) -> Vec<OutputEntry> {
    let records = extract_citations(body);
    let results = match_citations(&records, corpus);
    let found = results.iter().filter(|r| r.is_found()).count();
    info!(
        citations = records.len(),
        found,
        not_found = results.len() - found,
        "matched citations against {} reference line(s)",
        corpus.len()
    );
    build_bibliography(&results, options)
}
