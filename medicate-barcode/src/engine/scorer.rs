//! Candidate Scorer
//!
//! Computes how plausible it is that a search result names a genuine
//! pharmaceutical product listing. The score is additive and unbounded
//! (it may be negative):
//!
//! | Signal                                   | Effect                     |
//! |------------------------------------------|----------------------------|
//! | Trusted storefront host (first match)    | + table weight             |
//! | Dosage such as `500mg` in title/snippet  | +30                        |
//! | Dosage-form word in title                | +20                        |
//! | Combo / gift-pack word in title          | −15 (else +8)              |
//! | Medicine word in snippet                 | +5                         |
//! | Name length in 20..=80 UTF-16 units      | +8 (else −\|len−50\|/10)   |

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::tables::{
    COMBO_PENALTY, COMBO_WORDS, DOMAIN_WEIGHTS, DOSAGE_BONUS, DOSAGE_UNITS, FORM_BONUS,
    FORM_WORDS, GOOD_NAME_LENGTH, IDEAL_NAME_LENGTH, LENGTH_BONUS, LENGTH_PENALTY_DIVISOR,
    MEDICAL_SNIPPET_BONUS, MEDICAL_SNIPPET_WORDS, NON_COMBO_BONUS,
};
use super::{RawCandidate, ScoredCandidate};

static DOSAGE: Lazy<Regex> = Lazy::new(|| {
    let units = DOSAGE_UNITS
        .iter()
        .map(|u| regex::escape(u))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?-u:\b)[0-9]+(?:[.,][0-9]+)?\s*(?:{})(?-u:\b)", units))
        .expect("valid dosage regex")
});

/// Score one candidate against its normalized name
///
/// Returns `None` when `cleaned` is empty; such candidates never take part
/// in consensus.
pub fn score(candidate: &RawCandidate, cleaned: &str) -> Option<ScoredCandidate> {
    if cleaned.is_empty() {
        return None;
    }

    let hostname = extract_hostname(&candidate.link);
    let lower_title = candidate.title.to_lowercase();
    let lower_snippet = candidate.snippet.to_lowercase();

    let domain = domain_weight(&hostname);
    let dosage = if has_dosage(&candidate.title) || has_dosage(&candidate.snippet) {
        DOSAGE_BONUS
    } else {
        0.0
    };
    let form = if contains_any(&lower_title, FORM_WORDS) {
        FORM_BONUS
    } else {
        0.0
    };
    let combo = if contains_any(&lower_title, COMBO_WORDS) {
        COMBO_PENALTY
    } else {
        NON_COMBO_BONUS
    };
    let medical = if contains_any(&lower_snippet, MEDICAL_SNIPPET_WORDS) {
        MEDICAL_SNIPPET_BONUS
    } else {
        0.0
    };
    let length = length_adjustment(cleaned);

    let total = domain + dosage + form + combo + medical + length;

    debug!(
        name = %cleaned,
        host = %hostname,
        domain,
        dosage,
        form,
        combo,
        medical,
        length,
        total,
        "Scored candidate"
    );

    Some(ScoredCandidate {
        candidate: candidate.clone(),
        cleaned: cleaned.to_string(),
        hostname,
        score: total,
    })
}

/// Lowercase host of `link`, or the lowercased link itself when it does not
/// parse as an absolute URL.
pub fn extract_hostname(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => url.host_str().unwrap_or_default().to_lowercase(),
        Err(_) => link.to_lowercase(),
    }
}

/// Weight of the first trusted host substring found in `hostname`
pub fn domain_weight(hostname: &str) -> f64 {
    DOMAIN_WEIGHTS
        .iter()
        .find(|(host, _)| hostname.contains(*host))
        .map(|&(_, weight)| weight)
        .unwrap_or(0.0)
}

/// Whether `text` mentions a quantity with a dosage unit, e.g. `500mg`, `2,5 ml`
pub fn has_dosage(text: &str) -> bool {
    DOSAGE.is_match(text)
}

/// Length shaping: flat bonus inside the preferred range, otherwise a
/// penalty growing with the distance from the ideal length.
///
/// Length is measured in UTF-16 code units, so an emoji counts as 2.
pub fn length_adjustment(name: &str) -> f64 {
    let len = name.encode_utf16().count();
    if GOOD_NAME_LENGTH.contains(&len) {
        LENGTH_BONUS
    } else {
        -((len as f64 - IDEAL_NAME_LENGTH).abs() / LENGTH_PENALTY_DIVISOR)
    }
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(*w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, link: &str, snippet: &str) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            link: link.to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_empty_name_is_not_scored() {
        let c = candidate("| Nhà thuốc", "https://x.vn", "");
        assert!(score(&c, "").is_none());
    }

    #[test]
    fn test_hostname_from_url() {
        assert_eq!(
            extract_hostname("https://NhaThuocLongChau.com.vn/thuoc/abc?x=1"),
            "nhathuoclongchau.com.vn"
        );
    }

    #[test]
    fn test_hostname_fallback_for_unparseable_link() {
        assert_eq!(extract_hostname("Shopee.vn/abc"), "shopee.vn/abc");
        assert_eq!(extract_hostname(""), "");
    }

    #[test]
    fn test_domain_weight_first_match_only() {
        // Matches both "pharmacity" and "tiki.vn"; only the first entry counts
        assert_eq!(domain_weight("pharmacity.tiki.vn"), 35.0);
        assert_eq!(domain_weight("nhathuoclongchau.com.vn"), 40.0);
        assert_eq!(domain_weight("example.com"), 0.0);
    }

    #[test]
    fn test_dosage_detection() {
        assert!(has_dosage("Paracetamol 500mg"));
        assert!(has_dosage("Siro 2,5 ML"));
        assert!(has_dosage("Vitamin D3 1000 IU"));
        assert!(has_dosage("Vitamin B12 50 µg"));
        assert!(has_dosage("Men vi sinh 1.5g"));
        assert!(!has_dosage("Panadol Extra"));
        assert!(!has_dosage("500mgx"));
    }

    #[test]
    fn test_dosage_boundary_is_ascii_word_boundary() {
        // Non-ASCII letters are not word characters at the boundary
        assert!(has_dosage("Liềuđ500mg"));
        assert!(has_dosage("500mgđ"));
        assert!(!has_dosage("x500mg"));
    }

    #[test]
    fn test_dosage_detection_is_repeatable() {
        // Same input twice must give the same answer
        assert!(has_dosage("Ibuprofen 400mg"));
        assert!(has_dosage("Ibuprofen 400mg"));
    }

    #[test]
    fn test_length_adjustment() {
        assert_eq!(length_adjustment(&"a".repeat(20)), 8.0);
        assert_eq!(length_adjustment(&"a".repeat(80)), 8.0);
        assert_eq!(length_adjustment(&"a".repeat(10)), -4.0);
        assert_eq!(length_adjustment(&"a".repeat(100)), -5.0);
        // Code units, not bytes
        assert_eq!(length_adjustment("Thuốc nhỏ mắt Vrohto"), 8.0);
    }

    #[test]
    fn test_length_counts_emoji_as_two_units() {
        // 18 BMP chars + one astral emoji = 20 units, inside the range
        assert_eq!(length_adjustment("💊 Panadol Extra 50g"), 8.0);
        // 19 units: just below the range
        assert_eq!(length_adjustment("💊 Panadol Extra 5g"), -3.1);
    }

    #[test]
    fn test_paracetamol_example_scores_111() {
        let c = candidate(
            "Paracetamol 500mg viên nén | Nhà thuốc Long Châu",
            "https://nhathuoclongchau.com/abc",
            "Thuốc giảm đau paracetamol 500mg",
        );
        let scored = score(&c, "Paracetamol 500mg viên nén").unwrap();
        assert_eq!(scored.hostname, "nhathuoclongchau.com");
        assert_eq!(scored.score, 111.0);
    }

    #[test]
    fn test_combo_word_reduces_score() {
        let plain = candidate("Panadol Extra viên nén", "https://medigo.vn/p", "");
        let combo = candidate("Combo Panadol Extra viên nén", "https://medigo.vn/p", "");
        let a = score(&plain, "Panadol Extra viên nén").unwrap();
        let b = score(&combo, "Panadol Extra viên nén").unwrap();
        assert!(b.score < a.score);
        assert_eq!(a.score - b.score, 23.0);
    }
}
