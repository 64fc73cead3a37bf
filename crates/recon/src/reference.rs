//! Reference-number canonicalization and exact lookup.
//!
//! A reference match is authoritative: the pair is linked without looking at
//! amount, dates or names.

use crate::model::MatchRecord;

/// Canonical form of a payment reference.
///
/// Uppercases, removes all whitespace, strips one leading `RF` prefix and then
/// every leading zero. Returns `None` when nothing is left, so blank and
/// all-zero placeholders never match each other.
pub fn normalize_reference(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let compact: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let without_prefix = compact.strip_prefix("RF").unwrap_or(&compact);
    let canonical = without_prefix.trim_start_matches('0');

    if canonical.is_empty() {
        None
    } else {
        Some(canonical.to_string())
    }
}

/// First candidate, in slice order, whose normalized reference equals the
/// target's. No scan happens when the target has no usable reference.
pub fn find_by_reference<'a, T, C>(target: &T, candidates: &'a [C]) -> Option<(usize, &'a C)>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord,
{
    let wanted = normalize_reference(target.reference())?;
    candidates
        .iter()
        .enumerate()
        .find(|(_, candidate)| {
            normalize_reference(candidate.reference()).as_deref() == Some(wanted.as_str())
        })
}
