//! Point transfer between the winning and losing side of a match.
//!
//! All functions here are pure. The transfer curve is exponential in the
//! rating gap, so an upset (winners rated below losers) moves noticeably
//! more points than an expected result, and the goal balance scales the
//! transfer between 0.5x and 1.5x.

use crate::error::ArithmeticError;

/// Rating gap that shifts the curve base by one
pub const DIFF_SCALE: f64 = 2720.0;

/// Curve base for an even match
pub const BASE_OFFSET: f64 = 1.7;

/// Exponent of the transfer curve
pub const EXPONENT: f64 = 7.25;

/// Share of `a` in the combined rating of `a` and `b`.
pub fn ratio(a: f64, b: f64) -> Result<f64, ArithmeticError> {
    let total = a + b;
    if total == 0.0 {
        return Err(ArithmeticError::DivisionByZero { a, b });
    }
    finite(a / total)
}

/// Combined rating of the losers minus combined rating of the winners.
///
/// Positive when the winners were the weaker side.
pub fn diff(win_a: f64, win_b: f64, lose_a: f64, lose_b: f64) -> f64 {
    (lose_a + lose_b) - (win_a + win_b)
}

/// Total rating mass moved from the losers to the winners.
///
/// A gap below `-BASE_OFFSET * DIFF_SCALE` would raise a negative base to
/// a fractional power; that is rejected rather than clamped.
pub fn moved_points(diff: f64, goal_balance: u8) -> Result<f64, ArithmeticError> {
    let base = diff / DIFF_SCALE + BASE_OFFSET;
    if base.is_nan() {
        return Err(ArithmeticError::NonFinite);
    }
    if base < 0.0 {
        return Err(ArithmeticError::NegativeBase { diff });
    }
    finite(base.powf(EXPONENT) * (goal_balance as f64 / 10.0 + 0.5))
}

/// Splits a team's point change between its two members.
///
/// Returns `(share_a, share_b)` where `share_b = ratio(a, b)` and
/// `share_a = 1 - share_b`, so each member's share is proportional to the
/// *other* member's rating. Winners and losers are split the same way.
pub fn team_split(member_a: f64, member_b: f64) -> Result<(f64, f64), ArithmeticError> {
    let share_b = ratio(member_a, member_b)?;
    Ok((1.0 - share_b, share_b))
}

fn finite(value: f64) -> Result<f64, ArithmeticError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ArithmeticError::NonFinite)
    }
}

#[cfg(test)]
#[path = "rating_tests.rs"]
mod rating_tests;
