use crate::config::ToleranceConfig;
use crate::model::{MatchRecord, Rejection};

/// Bonus for a same-day pair. Each day of distance costs one point.
pub const MAX_DATE_BONUS: f64 = 10.0;

/// Smallest absolute day distance between any target date and any candidate
/// date. `None` when either side has no usable date.
pub fn min_day_distance<T, C>(target: &T, candidate: &C) -> Option<i64>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord + ?Sized,
{
    let candidate_dates = candidate.dates();
    target
        .dates()
        .into_iter()
        .flat_map(|t| candidate_dates.iter().map(move |c| (t - *c).num_days().abs()))
        .min()
}

/// Date proximity bonus in `[0, 10]`.
///
/// Missing dates are neutral (`0.0`). A nearest distance beyond the window
/// rejects the pair; inside it, the bonus is `10 - days`, floored at zero.
pub fn date_bonus<T, C>(
    target: &T,
    candidate: &C,
    tolerance: &ToleranceConfig,
) -> Result<f64, Rejection>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord + ?Sized,
{
    let Some(min_diff_days) = min_day_distance(target, candidate) else {
        return Ok(0.0);
    };

    if min_diff_days > i64::from(tolerance.date_window_days) {
        return Err(Rejection::DateOutOfWindow { min_diff_days });
    }

    Ok((MAX_DATE_BONUS - min_diff_days as f64).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Document, DocumentData, Event};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(date: Option<&str>) -> Event {
        Event { id: "e".into(), amount: None, date: date.map(d), reference: None, contact: None }
    }

    fn doc(invoicing: Option<&str>, due: Option<&str>, receiving: Option<&str>) -> Document {
        Document {
            id: "d".into(),
            kind: None,
            data: DocumentData {
                invoicing_date: invoicing.map(d),
                due_date: due.map(d),
                receiving_date: receiving.map(d),
                ..DocumentData::default()
            },
        }
    }

    fn bonus(e: &Event, doc: &Document) -> Result<f64, Rejection> {
        date_bonus(e, doc, &ToleranceConfig::default())
    }

    #[test]
    fn same_day_scores_ten() {
        let same_day = doc(Some("2024-03-01"), None, None);
        assert_eq!(bonus(&event(Some("2024-03-01")), &same_day), Ok(10.0));
    }

    #[test]
    fn nearest_of_three_dates_wins() {
        let e = event(Some("2024-03-01"));
        let document = doc(Some("2024-01-01"), Some("2024-03-03"), Some("2024-04-15"));
        assert_eq!(min_day_distance(&e, &document), Some(2));
        assert_eq!(bonus(&e, &document), Ok(8.0));
    }

    #[test]
    fn bonus_decreases_per_day() {
        let e = event(Some("2024-03-10"));
        assert_eq!(bonus(&e, &doc(Some("2024-03-09"), None, None)), Ok(9.0));
        assert_eq!(bonus(&e, &doc(None, Some("2024-03-19"), None)), Ok(1.0));
        assert_eq!(bonus(&e, &doc(None, None, Some("2024-03-20"))), Ok(0.0));
    }

    #[test]
    fn thirty_days_is_allowed_without_credit() {
        let e = event(Some("2024-01-01"));
        assert_eq!(bonus(&e, &doc(Some("2024-01-31"), None, None)), Ok(0.0));
    }

    #[test]
    fn thirty_one_days_is_rejected() {
        let e = event(Some("2024-01-01"));
        assert_eq!(
            bonus(&e, &doc(Some("2024-02-01"), None, None)),
            Err(Rejection::DateOutOfWindow { min_diff_days: 31 })
        );
    }

    #[test]
    fn date_before_event_counts_the_same() {
        let e = event(Some("2024-02-01"));
        assert_eq!(bonus(&e, &doc(Some("2024-01-29"), None, None)), Ok(7.0));
    }

    #[test]
    fn missing_dates_are_neutral() {
        assert_eq!(bonus(&event(None), &doc(Some("2024-01-01"), None, None)), Ok(0.0));
        assert_eq!(bonus(&event(Some("2024-01-01")), &doc(None, None, None)), Ok(0.0));
        assert_eq!(min_day_distance(&event(None), &doc(None, None, None)), None);
    }

    #[test]
    fn distance_is_symmetric_between_roles() {
        let e = event(Some("2024-05-10"));
        let document = doc(Some("2024-05-05"), Some("2024-05-20"), None);
        assert_eq!(min_day_distance(&e, &document), min_day_distance(&document, &e));
    }
}
