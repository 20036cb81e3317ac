//! Author-name normalization.
//!
//! Produces dense comparison keys from author strings and reference lines so
//! that spacing, punctuation and "et al." conventions don't prevent a match.

/// Marker left by the citation parser for "first author only" citations.
pub(crate) const ET_AL: &str = "et al";

/// CJK suffix meaning "et al.".
const DENG: char = '等';

/// Returns true for characters in the CJK Unified Ideographs block.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Characters removed from comparison keys in addition to whitespace.
fn is_ignored_punct(c: char) -> bool {
    matches!(c, ',' | '，' | '.' | '。' | '．')
}

/// Strips whitespace and ASCII/full-width commas and periods.
///
/// This is the form reference lines are compared in.
///
/// # Examples
///
/// ```
/// use cite_collate::normalize::normalize_line;
///
/// assert_eq!(normalize_line("Smith, J. Title A. 2001."), "SmithJTitleA2001");
/// assert_eq!(normalize_line("王 小明，李 四。"), "王小明李四");
/// ```
pub fn normalize_line(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_whitespace() && !is_ignored_punct(*c))
        .collect()
}

/// Maps an author string to its comparison key.
///
/// Rules, in order: drop a trailing `等`, cut everything from `et al`
/// onwards, then remove whitespace and commas/periods. The rules are
/// re-applied until the key is stable, so the function is idempotent.
///
/// Matching on the key is case-sensitive.
///
/// # Examples
///
/// ```
/// use cite_collate::normalize::normalize_author;
///
/// assert_eq!(normalize_author("张三等"), "张三");
/// assert_eq!(normalize_author("Smith et al."), "Smith");
/// assert_eq!(normalize_author("van der Berg"), "vanderBerg");
/// ```
pub fn normalize_author(author: &str) -> String {
    let mut key = apply_rules(author);
    loop {
        let next = apply_rules(&key);
        if next == key {
            return key;
        }
        key = next;
    }
}

fn apply_rules(author: &str) -> String {
    let mut author = author.trim();
    if let Some(stripped) = author.strip_suffix(DENG) {
        author = stripped;
    }
    if let Some(pos) = author.find(ET_AL) {
        author = author[..pos].trim();
    }
    normalize_line(author)
}
