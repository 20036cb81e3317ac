//! Output generation for the collected reference list.
//!
//! Turns match results into a numbered list: matched references first
//! (deduplicated, sorted, cleaned), then one placeholder per unmatched
//! citation.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::collate::{default_transliterator, sort_lines, Transliterate};
use crate::matcher::MatchResult;
use crate::normalize::is_cjk;

/// Prefix of the placeholder line written for an unmatched citation.
pub const DEFAULT_NOT_FOUND_PREFIX: &str = "未找到引用";

/// Leading `[12]`-style numbering copied along with a reference.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\[[0-9]+\]\s*)+").unwrap());

const DOI_MARKER: &str = "DOI:";

/// One numbered line of the final list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEntry {
    pub index: usize,
    pub text: String,
}

impl fmt::Display for OutputEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.text)
    }
}

/// Settings for [`build_bibliography`].
#[derive(Clone, Copy)]
pub struct OutputOptions<'a> {
    pub not_found_prefix: &'a str,
    /// Provides the phonetic key for CJK-initial lines.
    pub transliterator: &'a dyn Transliterate,
}

impl Default for OutputOptions<'static> {
    fn default() -> Self {
        Self {
            not_found_prefix: DEFAULT_NOT_FOUND_PREFIX,
            transliterator: default_transliterator(),
        }
    }
}

/// Builds the numbered reference list from match results.
///
/// Matched lines are deduplicated (first occurrence kept), sorted on their
/// raw text, then cleaned. Unmatched citations follow in discovery order.
/// Numbering starts at 1 and is contiguous.
pub fn build_bibliography(
    results: &[MatchResult],
    options: &OutputOptions<'_>,
) -> Vec<OutputEntry> {
    let mut seen = HashSet::new();
    let mut found: Vec<String> = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    for result in results {
        match result {
            MatchResult::Found { line } => {
                if seen.insert(line.as_str()) {
                    found.push(line.clone());
                }
            }
            MatchResult::NotFound { authors, year } => {
                missing.push(not_found_placeholder(options.not_found_prefix, authors, *year));
            }
        }
    }

    sort_lines(&mut found, options.transliterator);

    found
        .iter()
        .map(|line| clean_reference(line))
        .chain(missing)
        .enumerate()
        .map(|(i, text)| OutputEntry { index: i + 1, text })
        .collect()
}

/// Placeholder text for a citation that matched nothing.
///
/// The author list is rendered as written, without escaping.
pub fn not_found_placeholder(prefix: &str, authors: &[String], year: u16) -> String {
    format!("{}: [{}], {}", prefix, authors.join(", "), year)
}

/// Tidies a reference line for output.
///
/// Removes leading `[n]` markers and everything from `DOI:` on. For lines
/// starting with a CJK character, whitespace between two CJK characters is
/// removed as well.
///
/// # Examples
///
/// ```
/// use cite_collate::output::clean_reference;
///
/// assert_eq!(clean_reference("[3] Smith, J. Title A. 2001."), "Smith, J. Title A. 2001.");
/// assert_eq!(clean_reference("Jones, K. 2002. DOI:10.1/xyz"), "Jones, K. 2002.");
/// assert_eq!(clean_reference("王 小 明. 城市 研究 2019"), "王小明. 城市研究 2019");
/// ```
pub fn clean_reference(line: &str) -> String {
    let stripped = MARKER_RE.replace(line.trim(), "");
    let line = match stripped.find(DOI_MARKER) {
        Some(pos) => &stripped[..pos],
        None => &*stripped,
    };
    let line = line.trim();

    match line.chars().next() {
        Some(first) if is_cjk(first) => collapse_cjk_spacing(line),
        _ => line.to_string(),
    }
}

/// Removes whitespace runs that sit between two CJK characters.
fn collapse_cjk_spacing(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_whitespace() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let between_cjk =
            start > 0 && is_cjk(chars[start - 1]) && i < chars.len() && is_cjk(chars[i]);
        if !between_cjk {
            out.extend(&chars[start..i]);
        }
    }

    out
}

/// Renders entries as `[i] text` lines.
pub fn render_text(entries: &[OutputEntry]) -> String {
    entries.iter().map(|e| format!("{}\n", e)).collect()
}

/// Renders entries as a pretty-printed JSON array, newline-terminated like
/// [`render_text`].
pub fn render_json(entries: &[OutputEntry]) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(entries)?;
    json.push('\n');
    Ok(json)
}
