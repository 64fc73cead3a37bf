/// Points added per similarity step (exact = 2 steps, substring = 1 step).
pub const NAME_WEIGHT: f64 = 5.0;

/// Lowercase, trim and collapse internal whitespace. Blank names are absent.
pub fn normalize_name(name: Option<&str>) -> Option<String> {
    let normalized = name?
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Counterparty-name agreement between two normalized name sets.
///
/// * `2` some pair is identical
/// * `1` otherwise, some name contains the other
/// * `0` either side has no usable name
/// * `-1` both sides have names and none are compatible
pub fn name_similarity(target: &[String], candidate: &[String]) -> i8 {
    if target.is_empty() || candidate.is_empty() {
        return 0;
    }

    let pairs = || target.iter().flat_map(|t| candidate.iter().map(move |c| (t, c)));

    if pairs().any(|(t, c)| t == c) {
        2
    } else if pairs().any(|(t, c)| t.contains(c.as_str()) || c.contains(t.as_str())) {
        1
    } else {
        -1
    }
}
