//! Static heuristic tables for title cleanup and candidate scoring
//!
//! All tables are ordered. Order is significant for [`DOMAIN_WEIGHTS`]
//! (first matching host wins); the other tables are membership sets.

/// Trusted storefront host substrings and the score they contribute.
/// Only the first matching entry is applied.
pub const DOMAIN_WEIGHTS: &[(&str, f64)] = &[
    ("nhathuoclongchau", 40.0),
    ("nhathuocankhang", 35.0),
    ("pharmacity", 35.0),
    ("medigo", 30.0),
    ("centralpharmacy", 28.0),
    ("tiki.vn", 25.0),
    ("shopee.vn", 20.0),
    ("lazada.vn", 20.0),
];

/// Dosage-form words (tablet, ampoule, syrup, sachet, bottle, cream, eye/nose
/// drops, capsule, suspension, solution, spray). Matched against the
/// lowercased raw title.
pub const FORM_WORDS: &[&str] = &[
    "viên",
    "ống",
    "siro",
    "gói",
    "chai",
    "kem",
    "thuốc nhỏ mắt",
    "thuốc nhỏ mũi",
    "viên nang",
    "viên nén",
    "hỗn dịch",
    "dung dịch",
    "xịt",
];

/// Bundle / gift-pack markers. Matched against the lowercased raw title.
pub const COMBO_WORDS: &[&str] = &["combo", "set", "bộ", "tặng", "quà tặng", "kèm", "pack"];

/// Storefront markers. A trailing `| tail` or `- tail` title segment is
/// dropped when the lowercased tail contains one of these.
pub const STORE_WORDS: &[&str] = &[
    "nhà thuốc",
    "nhathuoc",
    "long châu",
    "an khang",
    "pharmacity",
    "medigo",
    "tiki",
    "shopee",
    "lazada",
    "central pharmacy",
];

/// Snippet words signalling a medicine context ("medicine", "pharma").
pub const MEDICAL_SNIPPET_WORDS: &[&str] = &["thuốc", "dược"];

/// Packaging-unit words (box, blister, sachet, bottle, vial, tube) that start
/// a trailing quantity phrase. Marked words appear both precomposed and
/// decomposed since scraped titles use either form.
pub const PACKAGING_WORDS: &[&str] = &[
    "hộp",
    "hop",
    "vỉ",
    "vi\u{0309}",
    "gói",
    "go\u{0301}i",
    "chai",
    "lọ",
    "lo\u{0323}",
    "tuýp",
    "tuyp",
];

/// Dosage unit abbreviations recognised after a number.
pub const DOSAGE_UNITS: &[&str] = &["mg", "mcg", "µg", "g", "kg", "ml", "iu"];

// Score components
pub const DOSAGE_BONUS: f64 = 30.0;
pub const FORM_BONUS: f64 = 20.0;
pub const COMBO_PENALTY: f64 = -15.0;
pub const NON_COMBO_BONUS: f64 = 8.0;
pub const MEDICAL_SNIPPET_BONUS: f64 = 5.0;

/// Names within this character range get [`LENGTH_BONUS`]; others are
/// penalised by their distance from [`IDEAL_NAME_LENGTH`].
pub const GOOD_NAME_LENGTH: std::ops::RangeInclusive<usize> = 20..=80;
pub const LENGTH_BONUS: f64 = 8.0;
pub const IDEAL_NAME_LENGTH: f64 = 50.0;
pub const LENGTH_PENALTY_DIVISOR: f64 = 10.0;

/// Per-member bonus added to a group's mean score
pub const REPETITION_BONUS: f64 = 3.0;

/// Number of ranked groups reported as alternatives
pub const MAX_ALTERNATIVES: usize = 5;
