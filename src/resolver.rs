use crate::whitelist::Whitelist;

/// Canonical name reported when no whitelist barcode matches exactly or at
/// Hamming distance 1.
pub const UNMATCHED: &str = "Cell_unmatched";

/// Compute the Hamming distance between two byte strings.
///
/// Returns `None` when the lengths differ; distances are only defined for
/// equal-length strings, and an incomparable pair must never be mistaken for
/// a near-match.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Option<usize> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).filter(|(x, y)| x != y).count())
}

/// Resolve an observed barcode to its canonical cell name.
///
/// Exact lookup first; this is the common O(1) path. Otherwise scan the
/// whitelist in insertion order and take the first barcode at Hamming
/// distance exactly 1. Ties at distance 1 are resolved by scan position,
/// not by any best-match rule; the pick-first policy is part of the
/// contract. If nothing matches, returns [`UNMATCHED`].
pub fn resolve<'w>(observed: &str, whitelist: &'w Whitelist) -> &'w str {
    if let Some(name) = whitelist.get(observed) {
        return name;
    }

    for barcode in whitelist.barcodes() {
        if hamming_distance(observed.as_bytes(), barcode.as_bytes()) == Some(1) {
            // get() cannot miss: barcode came from the whitelist itself.
            if let Some(name) = whitelist.get(barcode) {
                return name;
            }
        }
    }

    UNMATCHED
}
