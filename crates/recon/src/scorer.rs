use crate::amount::amount_base_score;
use crate::config::MatchConfig;
use crate::date::date_bonus;
use crate::model::{MatchRecord, Rejection, ScoreBreakdown};
use crate::name::{name_similarity, NAME_WEIGHT};

/// Heuristic score for a pair without a reference match.
///
/// Signals are evaluated in order (amount gate, date window, name veto) and
/// the first rejection short-circuits. Accepted totals lie in `[10, 30]`.
pub fn score<T, C>(
    target: &T,
    candidate: &C,
    config: &MatchConfig,
) -> Result<ScoreBreakdown, Rejection>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord + ?Sized,
{
    let amount = amount_base_score(target, candidate, &config.tolerance)?;
    let date = date_bonus(target, candidate, &config.tolerance)?;

    let name = name_similarity(
        &target.counterparty_names(config),
        &candidate.counterparty_names(config),
    );
    // -1 implies the target has a usable name that conflicts with every candidate name.
    if name < 0 {
        return Err(Rejection::NameConflict);
    }

    Ok(ScoreBreakdown {
        amount,
        date,
        name,
        total: amount + date + f64::from(name) * NAME_WEIGHT,
    })
}
