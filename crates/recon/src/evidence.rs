use std::collections::HashMap;

use crate::model::{
    DuplicateReference, Link, MatchMethod, MatchRecord, Pool, ReconSummary, SideSummary,
};
use crate::reference::normalize_reference;

/// Compute summary statistics from both link directions.
pub fn compute_summary(event_links: &[Link], document_links: &[Link]) -> ReconSummary {
    // event id -> document id, for checking that the reverse lookup agrees
    let forward: HashMap<&str, &str> = event_links
        .iter()
        .filter_map(|l| Some((l.id.as_str(), l.matched_id.as_deref()?)))
        .collect();

    let mutual_pairs = document_links
        .iter()
        .filter(|l| {
            l.matched_id
                .as_deref()
                .and_then(|event_id| forward.get(event_id))
                .is_some_and(|doc_id| *doc_id == l.id)
        })
        .count();

    ReconSummary {
        events: side_summary(event_links),
        documents: side_summary(document_links),
        mutual_pairs,
    }
}

fn side_summary(links: &[Link]) -> SideSummary {
    let mut summary = SideSummary { total: links.len(), ..SideSummary::default() };
    for link in links {
        match link.method {
            Some(MatchMethod::Reference) => summary.by_reference += 1,
            Some(MatchMethod::Heuristic) => summary.by_heuristic += 1,
            None => summary.unmatched += 1,
        }
    }
    summary
}

/// Normalized references carried by more than one record of a pool, in
/// first-seen order.
pub fn duplicate_references<T: MatchRecord>(pool: Pool, records: &[T]) -> Vec<DuplicateReference> {
    let mut order: Vec<String> = Vec::new();
    let mut ids: HashMap<String, Vec<String>> = HashMap::new();

    for record in records {
        let Some(reference) = normalize_reference(record.reference()) else {
            continue;
        };
        let entry = ids.entry(reference.clone()).or_default();
        if entry.is_empty() {
            order.push(reference);
        }
        entry.push(record.id().to_string());
    }

    order
        .into_iter()
        .filter_map(|reference| {
            let ids = ids.remove(&reference)?;
            (ids.len() > 1).then(|| DuplicateReference { pool, reference, ids })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Event;

    fn link(id: &str, matched: Option<&str>, method: Option<MatchMethod>) -> Link {
        Link {
            id: id.into(),
            matched_id: matched.map(Into::into),
            method,
            score: None,
        }
    }

    fn event(id: &str, reference: Option<&str>) -> Event {
        Event {
            id: id.into(),
            amount: None,
            date: None,
            reference: reference.map(Into::into),
            contact: None,
        }
    }

    #[test]
    fn summary_counts() {
        let events = vec![
            link("e1", Some("d1"), Some(MatchMethod::Reference)),
            link("e2", Some("d1"), Some(MatchMethod::Heuristic)),
            link("e3", None, None),
        ];
        let documents = vec![
            link("d1", Some("e1"), Some(MatchMethod::Reference)),
            link("d2", Some("e2"), Some(MatchMethod::Heuristic)),
        ];
        let summary = compute_summary(&events, &documents);
        assert_eq!(
            summary.events,
            SideSummary { total: 3, by_reference: 1, by_heuristic: 1, unmatched: 1 }
        );
        assert_eq!(
            summary.documents,
            SideSummary { total: 2, by_reference: 1, by_heuristic: 1, unmatched: 0 }
        );
        // d2 -> e2 but e2 -> d1, so only e1/d1 agree.
        assert_eq!(summary.mutual_pairs, 1);
    }

    #[test]
    fn duplicates_in_first_seen_order() {
        let events = vec![
            event("a", Some("RF 0007")),
            event("b", Some("9")),
            event("c", Some("7")),
            event("d", Some("09")),
            event("e", None),
            event("f", Some("000")),
            event("g", Some("0")),
        ];
        let dups = duplicate_references(Pool::Events, &events);
        assert_eq!(dups.len(), 2);
        assert_eq!(dups[0].reference, "7");
        assert_eq!(dups[0].ids, vec!["a", "c"]);
        assert_eq!(dups[1].reference, "9");
        assert_eq!(dups[1].ids, vec!["b", "d"]);
    }

    #[test]
    fn unique_references_have_no_duplicates() {
        let events = vec![event("a", Some("1")), event("b", Some("2"))];
        assert!(duplicate_references(Pool::Events, &events).is_empty());
    }
}
