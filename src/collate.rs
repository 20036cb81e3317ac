//! Ordering of matched reference lines.
//!
//! Latin-initial lines come first, then CJK-initial lines ordered by the
//! transliteration of their first character, then everything else.

use crate::normalize::is_cjk;

/// Phonetic transliteration of a single character, used as a sort key.
pub trait Transliterate {
    /// Returns the transliteration of `c`, or `None` if it has none.
    fn transliterate(&self, c: char) -> Option<String>;
}

/// Leaves every character untransliterated. CJK lines then sort by code point.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransliteration;

impl Transliterate for NoTransliteration {
    fn transliterate(&self, _c: char) -> Option<String> {
        None
    }
}

/// Toneless Hanyu Pinyin (`张` → `zhang`).
#[cfg(feature = "pinyin")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Pinyin;

#[cfg(feature = "pinyin")]
impl Transliterate for Pinyin {
    fn transliterate(&self, c: char) -> Option<String> {
        use pinyin::ToPinyin;
        c.to_pinyin().map(|p| p.plain().to_string())
    }
}

/// The best transliterator compiled into this build.
pub fn default_transliterator() -> &'static dyn Transliterate {
    #[cfg(feature = "pinyin")]
    {
        &Pinyin
    }
    #[cfg(not(feature = "pinyin"))]
    {
        &NoTransliteration
    }
}

/// Sort tier of a line, decided by its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Latin,
    Cjk,
    Other,
}

/// Composite sort key: tier, then first-character key, then the full line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey<'a> {
    pub tier: Tier,
    pub initial: String,
    pub line: &'a str,
}

/// Computes the sort key of a raw reference line.
pub fn sort_key<'a>(line: &'a str, translit: &dyn Transliterate) -> SortKey<'a> {
    let Some(first) = line.chars().next() else {
        return SortKey {
            tier: Tier::Other,
            initial: String::new(),
            line,
        };
    };

    let (tier, initial) = if first.is_ascii_alphabetic() {
        (Tier::Latin, first.to_ascii_uppercase().to_string())
    } else if is_cjk(first) {
        let initial = translit
            .transliterate(first)
            .unwrap_or_else(|| first.to_string());
        (Tier::Cjk, initial)
    } else {
        (Tier::Other, first.to_string())
    };

    SortKey {
        tier,
        initial,
        line,
    }
}

/// Sorts lines in place. Each key is computed once.
pub fn sort_lines(lines: &mut [String], translit: &dyn Transliterate) {
    lines.sort_by_cached_key(|line| {
        let key = sort_key(line, translit);
        (key.tier, key.initial, line.clone())
    });
}
