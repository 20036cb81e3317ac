//! Reference-list loading.
//!
//! The reference corpus is a plain UTF-8 file with one bibliography entry
//! per line. Lines are kept in file order together with their normalized
//! form, so matching never has to re-normalize a line.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::normalize::normalize_line;

/// Errors that can occur when loading references.
#[derive(Error, Debug)]
pub enum RefsError {
    /// Missing or unreadable file, or content that is not valid UTF-8.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// One line of the reference corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLine {
    /// The line as written, minus surrounding whitespace.
    pub text: String,
    /// `text` without whitespace, commas, or periods.
    pub normalized: String,
}

/// The reference corpus, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCorpus {
    lines: Vec<ReferenceLine>,
}

impl ReferenceCorpus {
    /// Builds a corpus from the full text of a reference file.
    ///
    /// # Examples
    ///
    /// ```
    /// use cite_collate::ReferenceCorpus;
    ///
    /// let corpus = ReferenceCorpus::from_text("Smith, J. 2001.\r\n\n王五. 2020.\n");
    /// assert_eq!(corpus.len(), 3);
    /// assert_eq!(corpus.lines()[0].normalized, "SmithJ2001");
    /// ```
    pub fn from_text(content: &str) -> Self {
        content.lines().collect()
    }

    pub fn lines(&self) -> &[ReferenceLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ReferenceCorpus {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let lines = iter
            .into_iter()
            .map(|line| ReferenceLine {
                text: line.trim().to_string(),
                normalized: normalize_line(line),
            })
            .collect();
        Self { lines }
    }
}

/// Loads a reference corpus from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_refs(path: &Path) -> Result<ReferenceCorpus, RefsError> {
    let content = fs::read_to_string(path)?;
    Ok(ReferenceCorpus::from_text(&content))
}
