use std::cmp::Ordering;

/// Name ordering for display: case-insensitive first, exact bytes as the
/// tie-breaker so the order is total.
///
/// This only approximates locale collation. There is no accent folding, so
/// `École` sorts after `zoo` rather than next to names starting with `E`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
