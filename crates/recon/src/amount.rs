use rust_decimal::Decimal;

use crate::config::ToleranceConfig;
use crate::model::{MatchRecord, Rejection};

/// Base score for a pair whose amounts agree.
pub const AMOUNT_BASE_SCORE: f64 = 10.0;

/// Hard gate on amount agreement, compared by absolute value.
///
/// Both sides must carry an amount. Returns [`AMOUNT_BASE_SCORE`] when the
/// absolute amounts are within `tolerance.amount` of each other. Amounts are
/// decimal, so the boundary is exact at any magnitude.
pub fn amount_base_score<T, C>(
    target: &T,
    candidate: &C,
    tolerance: &ToleranceConfig,
) -> Result<f64, Rejection>
where
    T: MatchRecord + ?Sized,
    C: MatchRecord + ?Sized,
{
    let (Some(left), Some(right)) = (target.amount(), candidate.amount()) else {
        return Err(Rejection::MissingAmount);
    };

    let difference: Decimal = (left.abs() - right.abs()).abs();
    if difference > tolerance.amount {
        return Err(Rejection::AmountMismatch { difference });
    }

    Ok(AMOUNT_BASE_SCORE)
}
