//! Title Normalizer
//!
//! Turns a raw search-result title into a canonical product name by removing
//! storefront suffixes, SKU markers and packaging-quantity phrases.
//!
//! # Steps (in order)
//! 1. Drop a trailing `| tail` segment when the tail names a store
//! 2. Drop a trailing ` - tail` segment when the tail names a store
//! 3. Strip a trailing `SKU`/`Mã` code
//! 4. Strip a trailing packaging phrase ("hộp 10 vỉ x 10 viên", ...)
//! 5. Replace leftover pipes, collapse whitespace
//! 6. Trim trailing separators and punctuation
//!
//! The result may be empty; such candidates are discarded by the caller.

use once_cell::sync::Lazy;
use regex::Regex;

use super::tables::{PACKAGING_WORDS, STORE_WORDS};

static PIPE_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*([^|]+)$").expect("valid pipe tail regex"));

static DASH_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*([^-]+)$").expect("valid dash tail regex"));

static SKU_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?-u:\b)(?:SKU|MÃ)\s*[:#]?\s*[A-Za-z0-9_-]+$").expect("valid SKU regex")
});

static PACKAGING_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    let words = PACKAGING_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?-u:\b)(?:{})\s+[0-9].*$", words)).expect("valid packaging regex")
});

static MULTI_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("valid whitespace regex"));

/// Normalize a raw result title into a product name
pub fn normalize(raw_title: &str) -> String {
    let s = raw_title.trim();
    if s.is_empty() {
        return String::new();
    }

    let s = drop_store_tail(s, &PIPE_TAIL);
    let s = drop_store_tail(&s, &DASH_TAIL);
    let s = SKU_SUFFIX.replace(&s, "");
    let s = PACKAGING_SUFFIX.replace(&s, "");

    let s = s.replace('|', " ");
    let s = MULTI_SPACE.replace_all(&s, " ");

    s.trim()
        .trim_end_matches(is_trailing_separator)
        .trim()
        .to_string()
}

/// Remove the trailing segment matched by `tail_re` if it names a store.
fn drop_store_tail(s: &str, tail_re: &Regex) -> String {
    let Some(caps) = tail_re.captures(s) else {
        return s.to_string();
    };
    let (Some(whole), Some(tail)) = (caps.get(0), caps.get(1)) else {
        return s.to_string();
    };

    let tail = tail.as_str().to_lowercase();
    if is_store_name(&tail) {
        s[..whole.start()].to_string()
    } else {
        s.to_string()
    }
}

fn is_store_name(lower: &str) -> bool {
    STORE_WORDS.iter().any(|w| lower.contains(w))
}

fn is_trailing_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '–' | '—' | '|' | '.' | ',' | ':' | ';')
}
