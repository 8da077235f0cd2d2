// Cache-key normalization for raw user input

/// Canonicalize raw input into a stable cache key.
///
/// Lowercases, trims, and collapses every whitespace run to a single space,
/// so inputs that differ only in case or layout address the same cache entry.
/// Total for any string input; never fails.
pub fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
