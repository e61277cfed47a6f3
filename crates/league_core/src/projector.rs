//! Double league rating snapshot and the replay that derives it.
//!
//! The snapshot is never written directly. It is either produced by
//! [`rebuild`] from the roster's starting ratings and the full match
//! history, or advanced by exactly one freshly appended match.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{ArithmeticError, LeagueError, LeagueResult};
use crate::rating::{diff, moved_points, team_split};
use crate::roster::Roster;
use crate::types::{DoubleLeagueMatch, MatchId};

/// Current double league rating of every registered player.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingSnapshot {
    ratings: HashMap<String, f64>,
}

/// Rating movement of one player caused by one match.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerDelta {
    pub name: String,
    pub before: f64,
    pub after: f64,
}

impl PlayerDelta {
    pub fn change(&self) -> f64 {
        self.after - self.before
    }
}

/// Everything a single match does to the snapshot, computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingChange {
    pub match_id: MatchId,
    pub moved_points: f64,
    /// Winners first, then losers, in match order
    pub deltas: [PlayerDelta; 4],
}

impl RatingSnapshot {
    /// Every roster player at their starting rating.
    pub fn from_roster(roster: &Roster) -> Self {
        Self {
            ratings: roster
                .iter()
                .map(|p| (p.name.clone(), p.starting_rating))
                .collect(),
        }
    }

    pub fn rating(&self, name: &str) -> Option<f64> {
        self.ratings.get(name).copied()
    }

    /// Work out what `m` would do to the snapshot without touching it.
    pub fn compute(&self, m: &DoubleLeagueMatch) -> LeagueResult<RatingChange> {
        let players = m.players();
        for (i, name) in players.iter().enumerate() {
            if players[..i].contains(name) {
                return Err(LeagueError::consistency(format!(
                    "match {} lists {name} twice",
                    m.id
                )));
            }
        }
        let [w1, w2, l1, l2] = players.map(|name| self.lookup(name, m.id));
        let (w1, w2, l1, l2) = (w1?, w2?, l1?, l2?);

        let (w1_share, w2_share) = team_split(w1, w2)?;
        let (l1_share, l2_share) = team_split(l1, l2)?;
        let points = moved_points(diff(w1, w2, l1, l2), m.goal_balance)?;

        let delta = |name: &str, before: f64, after: f64| -> LeagueResult<PlayerDelta> {
            if !after.is_finite() {
                return Err(ArithmeticError::NonFinite.into());
            }
            Ok(PlayerDelta {
                name: name.to_string(),
                before,
                after,
            })
        };

        Ok(RatingChange {
            match_id: m.id,
            moved_points: points,
            deltas: [
                delta(players[0], w1, w1 + w1_share * points)?,
                delta(players[1], w2, w2 + w2_share * points)?,
                delta(players[2], l1, l1 - l1_share * points)?,
                delta(players[3], l2, l2 - l2_share * points)?,
            ],
        })
    }

    /// Write a change produced by [`RatingSnapshot::compute`].
    pub fn commit(&mut self, change: &RatingChange) {
        for d in &change.deltas {
            self.ratings.insert(d.name.clone(), d.after);
        }
    }

    /// Advance the snapshot by one match. Only the four participants move.
    pub fn apply(&mut self, m: &DoubleLeagueMatch) -> LeagueResult<RatingChange> {
        let change = self.compute(m)?;
        self.commit(&change);
        debug!(
            match_id = m.id,
            moved_points = change.moved_points,
            "applied double league match"
        );
        Ok(change)
    }

    pub(crate) fn insert_player(&mut self, name: &str, rating: f64) {
        self.ratings.insert(name.to_string(), rating);
    }

    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        if let Some(rating) = self.ratings.remove(old) {
            self.ratings.insert(new.to_string(), rating);
        }
    }

    /// Players ordered by rating, best first. Equal ratings sort by name.
    pub fn standings(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<_> = self
            .ratings
            .iter()
            .map(|(name, &rating)| (name.clone(), rating))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    fn lookup(&self, name: &str, match_id: MatchId) -> LeagueResult<f64> {
        self.rating(name).ok_or_else(|| {
            LeagueError::consistency(format!(
                "match {match_id} references {name}, who is not on the roster"
            ))
        })
    }
}

/// Snapshot after applying `m` to `snapshot`, leaving the input untouched.
pub fn apply_match(snapshot: &RatingSnapshot, m: &DoubleLeagueMatch) -> LeagueResult<RatingSnapshot> {
    let mut next = snapshot.clone();
    next.apply(m)?;
    Ok(next)
}

/// Replay the whole double league history from the starting ratings.
///
/// Matches are applied in ascending id order whatever order they are
/// passed in, so two rebuilds of the same ledger agree bit for bit.
pub fn rebuild(roster: &Roster, matches: &[DoubleLeagueMatch]) -> LeagueResult<RatingSnapshot> {
    let mut ordered: Vec<&DoubleLeagueMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| m.id);

    let mut snapshot = RatingSnapshot::from_roster(roster);
    for m in ordered {
        let change = snapshot.compute(m)?;
        snapshot.commit(&change);
    }
    info!(
        players = snapshot.len(),
        matches = matches.len(),
        "rebuilt double league ratings"
    );
    Ok(snapshot)
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod projector_tests;
