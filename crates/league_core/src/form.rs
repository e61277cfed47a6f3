//! Windowed "recent form" scores.
//!
//! Form is computed on demand from the ledger and never cached. Only the
//! last `window` qualifying matches count. Scores are averaged per
//! opponent first and then across opponents, so one opponent played over
//! and over cannot dominate the result.

use std::collections::BTreeMap;

use crate::error::{LeagueError, LeagueResult, ValidationError};
use crate::ledger::MatchLedger;
use crate::roster::Roster;
use crate::types::{round2, Order, Side};

/// Default number of recent matches that count towards form
pub const DEFAULT_FORM_WINDOW: usize = 10;

/// Half of the sign of the goal balance: 0 for a level result, 0.5 otherwise.
pub fn half_sign(goal_balance: u8) -> f64 {
    match goal_balance {
        0 => 0.0,
        _ => 0.5,
    }
}

/// Score of one single league win.
pub fn won_score(goal_balance: u8, player_factor: f64, opponent_factor: f64) -> f64 {
    goal_balance as f64 / 10.0 + 1.0 - (player_factor - opponent_factor) + half_sign(goal_balance)
        - 0.5
}

/// Score of one single league loss.
pub fn lost_score(goal_balance: u8, player_factor: f64, opponent_factor: f64) -> f64 {
    -(goal_balance as f64) / 10.0 + (opponent_factor - player_factor) - half_sign(goal_balance)
        + 0.5
}

/// Single league form of `name` over their last `window` matches.
///
/// Returns 0 when the player has no matches in the window.
pub fn recent_form(
    roster: &Roster,
    ledger: &MatchLedger,
    name: &str,
    window: usize,
) -> LeagueResult<f64> {
    let player = roster.require(name)?;
    let mut per_opponent = ScoreBook::<String>::default();

    for m in ledger.single_matches_for(name, Some(window)) {
        let Some(opponent_name) = m.opponent_of(name) else {
            continue;
        };
        let opponent = roster.get(opponent_name).ok_or_else(|| {
            LeagueError::consistency(format!(
                "single match {} references {opponent_name}, who is not on the roster",
                m.id
            ))
        })?;
        let score = if m.winning_player == name {
            won_score(m.goal_balance, player.form_factor, opponent.form_factor)
        } else {
            lost_score(m.goal_balance, player.form_factor, opponent.form_factor)
        };
        per_opponent.record(opponent_name.to_string(), score);
    }

    Ok(per_opponent.overall())
}

/// Double league form of the pair `a` + `b` over their last `window`
/// matches played together on the same side.
///
/// Opposing pairs are grouped regardless of the order their members were
/// entered in. Form factors play no part here.
pub fn team_form(
    roster: &Roster,
    ledger: &MatchLedger,
    a: &str,
    b: &str,
    window: usize,
) -> LeagueResult<f64> {
    roster.require(a)?;
    roster.require(b)?;
    if a == b {
        return Err(ValidationError::DuplicatePlayer(a.to_string()).into());
    }

    let mut per_opponent = ScoreBook::<(String, String)>::default();
    let together = ledger
        .list_double(None, Order::Desc)
        .into_iter()
        .filter_map(|m| m.team_side(a, b).map(|side| (m, side)))
        .take(window);

    for (m, side) in together {
        let hs = half_sign(m.goal_balance);
        let gb = m.goal_balance as f64 / 10.0;
        let (opponents, score) = match side {
            Side::Winners => (m.losers(), gb + 1.0 + hs - 0.5),
            Side::Losers => (m.winners(), -gb - hs + 0.5),
        };
        let [x, y] = opponents;
        let pair = if x <= y { (x, y) } else { (y, x) };
        per_opponent.record((pair.0.to_string(), pair.1.to_string()), score);
    }

    Ok(per_opponent.overall())
}

/// Running sums per opponent: a name for singles, a sorted pair for teams.
struct ScoreBook<K> {
    entries: BTreeMap<K, (f64, usize)>,
}

impl<K> Default for ScoreBook<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord> ScoreBook<K> {
    fn record(&mut self, opponent: K, score: f64) {
        let entry = self.entries.entry(opponent).or_insert((0.0, 0));
        entry.0 += score;
        entry.1 += 1;
    }

    /// Mean of per-opponent means, scaled to percent and rounded.
    fn overall(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .entries
            .values()
            .map(|&(total, count)| total / count as f64)
            .sum();
        round2(sum / self.entries.len() as f64 * 100.0)
    }
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod form_tests;
