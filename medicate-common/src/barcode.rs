//! Barcode normalization
//!
//! Scanners hand us codes with stray whitespace, BOMs and separators. Only the
//! digits are meaningful for EAN/UPC/GTIN style product codes.

/// Shortest accepted code (EAN-8)
pub const MIN_BARCODE_DIGITS: usize = 8;

/// Longest accepted code (GTIN-14)
pub const MAX_BARCODE_DIGITS: usize = 14;

/// Keep only ASCII digits from a raw scanned code.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that a normalized code has a plausible length (8-14 digits).
pub fn is_plausible(code: &str) -> bool {
    (MIN_BARCODE_DIGITS..=MAX_BARCODE_DIGITS).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_digit())
}
