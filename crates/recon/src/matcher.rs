use crate::config::MatchConfig;
use crate::model::{
    CandidateOutcome, Document, Event, Explanation, MatchMethod, MatchRecord, ScoreBreakdown,
    Selection,
};
use crate::reference::{find_by_reference, normalize_reference};
use crate::scorer::score;

/// Pick the best candidate for `target`.
///
/// A reference match returns immediately. Otherwise every candidate is scored
/// in slice order and the highest total wins; a later candidate must score
/// strictly higher to displace an earlier one. A best total of zero means no
/// candidate survived the hard filters, and nothing is returned.
pub fn select<T, C>(target: &T, candidates: &[C], config: &MatchConfig) -> Option<Selection>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord,
{
    if let Some((index, candidate)) = find_by_reference(target, candidates) {
        log::debug!("{}: reference match with {}", target.id(), candidate.id());
        return Some(Selection { index, method: MatchMethod::Reference, score: None });
    }

    let (best_score, best) = candidates.iter().enumerate().fold(
        (0.0_f64, None::<(usize, ScoreBreakdown)>),
        |(best_score, best), (index, candidate)| match score(target, candidate, config) {
            Ok(breakdown) if breakdown.total > best_score => {
                (breakdown.total, Some((index, breakdown)))
            }
            Ok(_) => (best_score, best),
            Err(rejection) => {
                log::trace!("{} vs {}: rejected, {rejection}", target.id(), candidate.id());
                (best_score, best)
            }
        },
    );

    match best {
        Some((index, breakdown)) if best_score > 0.0 => {
            log::debug!(
                "{}: heuristic match with {} (score {:.1})",
                target.id(),
                candidates[index].id(),
                best_score
            );
            Some(Selection { index, method: MatchMethod::Heuristic, score: Some(breakdown) })
        }
        _ => {
            log::debug!(
                "{}: no confident match among {} candidates",
                target.id(),
                candidates.len()
            );
            None
        }
    }
}

/// Best supporting document for a payment event, with default settings.
pub fn find_attachment<'a>(event: &Event, documents: &'a [Document]) -> Option<&'a Document> {
    find_attachment_with(event, documents, &MatchConfig::default())
}

pub fn find_attachment_with<'a>(
    event: &Event,
    documents: &'a [Document],
    config: &MatchConfig,
) -> Option<&'a Document> {
    select_attachment(event, documents, config).map(|s| &documents[s.index])
}

pub fn select_attachment(
    event: &Event,
    documents: &[Document],
    config: &MatchConfig,
) -> Option<Selection> {
    select(event, documents, config)
}

/// Best payment event for a supporting document, with default settings.
pub fn find_transaction<'a>(document: &Document, events: &'a [Event]) -> Option<&'a Event> {
    find_transaction_with(document, events, &MatchConfig::default())
}

pub fn find_transaction_with<'a>(
    document: &Document,
    events: &'a [Event],
    config: &MatchConfig,
) -> Option<&'a Event> {
    select_transaction(document, events, config).map(|s| &events[s.index])
}

pub fn select_transaction(
    document: &Document,
    events: &[Event],
    config: &MatchConfig,
) -> Option<Selection> {
    select(document, events, config)
}

/// Per-candidate outcomes for one target, plus the selection `select` makes.
pub fn explain<T, C>(target: &T, candidates: &[C], config: &MatchConfig) -> Explanation
where
    T: MatchRecord + ?Sized,
    C: MatchRecord,
{
    let wanted = normalize_reference(target.reference());
    let outcomes = candidates
        .iter()
        .map(|candidate| {
            let reference_match = wanted.is_some()
                && normalize_reference(candidate.reference()) == wanted;
            let (score, rejection) = match score(target, candidate, config) {
                Ok(breakdown) => (Some(breakdown), None),
                Err(rejection) => (None, Some(rejection)),
            };
            CandidateOutcome {
                id: candidate.id().to_string(),
                reference_match,
                score,
                rejection,
            }
        })
        .collect();

    let selection = select(target, candidates, config);
    Explanation {
        target_id: target.id().to_string(),
        candidates: outcomes,
        selected_id: selection.map(|s| candidates[s.index].id().to_string()),
        method: selection.map(|s| s.method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentData, Rejection};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(
        id: &str,
        amount: Option<Decimal>,
        date: Option<&str>,
        contact: Option<&str>,
    ) -> Event {
        Event {
            id: id.into(),
            amount,
            date: date.map(d),
            reference: None,
            contact: contact.map(Into::into),
        }
    }

    fn doc(id: &str, amount: Option<Decimal>, data: DocumentData) -> Document {
        Document {
            id: id.into(),
            kind: Some("invoice".into()),
            data: DocumentData { total_amount: amount, ..data },
        }
    }

    #[test]
    fn picks_scored_candidate_over_out_of_window_one() {
        let e = event("e1", Some(dec!(250.0)), Some("2024-03-01"), Some("Jane Smith"));
        let docs = vec![
            doc("a", Some(dec!(250.0)), DocumentData {
                due_date: Some(d("2024-03-03")),
                issuer: Some("Jane Smith".into()),
                ..DocumentData::default()
            }),
            doc("b", Some(dec!(250.0)), DocumentData {
                invoicing_date: Some(d("2024-01-01")),
                issuer: Some("Acme".into()),
                ..DocumentData::default()
            }),
        ];
        let selection = select_attachment(&e, &docs, &MatchConfig::default()).unwrap();
        assert_eq!(selection.index, 0);
        assert_eq!(selection.method, MatchMethod::Heuristic);
        assert_eq!(selection.score.unwrap().total, 28.0);
        assert_eq!(find_attachment(&e, &docs).unwrap().id, "a");
    }

    #[test]
    fn reference_match_ignores_other_signals() {
        let e = Event {
            reference: Some("RF 0000 0539".into()),
            ..event("e1", Some(dec!(999.0)), Some("2020-01-01"), Some("John Doe"))
        };
        let docs = vec![
            doc("scored", Some(dec!(999.0)), DocumentData {
                due_date: Some(d("2020-01-01")),
                issuer: Some("John Doe".into()),
                ..DocumentData::default()
            }),
            doc("by-ref", Some(dec!(1.0)), DocumentData {
                reference: Some("0000000539".into()),
                invoicing_date: Some(d("2024-12-31")),
                issuer: Some("Mary Jones".into()),
                ..DocumentData::default()
            }),
        ];
        let selection = select_attachment(&e, &docs, &MatchConfig::default()).unwrap();
        assert_eq!(selection.index, 1);
        assert_eq!(selection.method, MatchMethod::Reference);
        assert_eq!(selection.score, None);
    }

    #[test]
    fn amount_alone_is_enough() {
        let e = event("e1", Some(dec!(100.0)), None, None);
        let docs = vec![doc("a", Some(dec!(100.0)), DocumentData::default())];
        let selection = select_attachment(&e, &docs, &MatchConfig::default()).unwrap();
        assert_eq!(selection.score.unwrap().total, 10.0);
    }

    #[test]
    fn name_conflict_leaves_no_match() {
        let e = event("e1", Some(dec!(100.0)), Some("2024-01-01"), Some("John Doe"));
        let docs = vec![doc("a", Some(dec!(100.0)), DocumentData {
            invoicing_date: Some(d("2024-01-01")),
            issuer: Some("Mary Jones".into()),
            ..DocumentData::default()
        })];
        assert!(find_attachment(&e, &docs).is_none());
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let e = event("e1", Some(dec!(40.0)), Some("2024-02-10"), None);
        let same =
            DocumentData { invoicing_date: Some(d("2024-02-10")), ..DocumentData::default() };
        let docs = vec![
            doc("first", Some(dec!(40.0)), same.clone()),
            doc("second", Some(dec!(40.0)), same),
        ];
        let selection = select_attachment(&e, &docs, &MatchConfig::default()).unwrap();
        assert_eq!(selection.score.unwrap().total, 20.0);
        assert_eq!(docs[selection.index].id, "first");
    }

    #[test]
    fn higher_later_candidate_wins() {
        let e = event("e1", Some(dec!(40.0)), Some("2024-02-10"), Some("Good Supplier Oy"));
        let docs = vec![
            doc("far", Some(dec!(40.0)), DocumentData {
                due_date: Some(d("2024-02-15")),
                ..DocumentData::default()
            }),
            doc("near", Some(dec!(40.0)), DocumentData {
                due_date: Some(d("2024-02-15")),
                supplier: Some("Good Supplier Oy".into()),
                ..DocumentData::default()
            }),
        ];
        assert_eq!(find_attachment(&e, &docs).unwrap().id, "near");
    }

    #[test]
    fn empty_pool_has_no_match() {
        let e = event("e1", Some(dec!(40.0)), None, None);
        assert!(find_attachment(&e, &[]).is_none());
        let document = doc("a", Some(dec!(1.0)), DocumentData::default());
        assert!(find_transaction(&document, &[]).is_none());
    }

    #[test]
    fn reverse_lookup_mirrors_forward() {
        let document = doc("inv", Some(dec!(-500.0)), DocumentData {
            invoicing_date: Some(d("2024-05-05")),
            due_date: Some(d("2024-05-20")),
            issuer: Some("Example Company Oy".into()),
            recipient: Some("Real Customer Oy".into()),
            ..DocumentData::default()
        });
        let events = vec![
            event("other", Some(dec!(500.0)), Some("2024-05-10"), Some("Someone Else")),
            event("right", Some(dec!(500.0)), Some("2024-05-10"), Some("Real Customer Oy")),
        ];
        let found = find_transaction(&document, &events).unwrap();
        assert_eq!(found.id, "right");
        assert_eq!(find_attachment(found, std::slice::from_ref(&document)).unwrap().id, "inv");
    }

    #[test]
    fn repeated_calls_are_identical() {
        let e = event("e1", Some(dec!(40.0)), Some("2024-02-10"), Some("Acme"));
        let docs = vec![
            doc("a", Some(dec!(40.0)), DocumentData {
                due_date: Some(d("2024-02-12")),
                ..DocumentData::default()
            }),
            doc("b", Some(dec!(40.0)), DocumentData {
                supplier: Some("ACME".into()),
                ..DocumentData::default()
            }),
        ];
        let config = MatchConfig::default();
        let first = select_attachment(&e, &docs, &config);
        for _ in 0..10 {
            assert_eq!(select_attachment(&e, &docs, &config), first);
        }
    }

    #[test]
    fn explain_reports_each_candidate() {
        let e = event("e1", Some(dec!(100.0)), Some("2024-01-01"), Some("John Doe"));
        let docs = vec![
            doc("cheap", Some(dec!(1.0)), DocumentData::default()),
            doc("conflict", Some(dec!(100.0)), DocumentData {
                issuer: Some("Mary Jones".into()),
                ..DocumentData::default()
            }),
            doc("ok", Some(dec!(100.0)), DocumentData {
                due_date: Some(d("2024-01-04")),
                ..DocumentData::default()
            }),
        ];
        let explanation = explain(&e, &docs, &MatchConfig::default());
        assert_eq!(explanation.target_id, "e1");
        assert!(matches!(
            explanation.candidates[0].rejection,
            Some(Rejection::AmountMismatch { .. })
        ));
        assert_eq!(explanation.candidates[1].rejection, Some(Rejection::NameConflict));
        assert_eq!(explanation.candidates[2].score.unwrap().total, 17.0);
        assert_eq!(explanation.selected_id.as_deref(), Some("ok"));
        assert_eq!(explanation.method, Some(MatchMethod::Heuristic));
        assert!(explanation.candidates.iter().all(|c| !c.reference_match));
    }
}
