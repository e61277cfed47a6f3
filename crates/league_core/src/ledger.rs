//! Ordered record of every match played in both leagues.
//!
//! The ledger is the source of truth for replays. Each league has its own
//! strictly increasing id sequence; ids of deleted matches are not handed
//! out again while the ledger lives.

use crate::error::{LeagueError, LeagueResult, ValidationError};
use crate::roster::Roster;
use crate::types::{
    DoubleLeagueMatch, DoubleResult, LeagueKind, MatchId, Order, SingleLeagueMatch, SingleResult,
    MAX_GOAL_BALANCE,
};

#[derive(Debug, Clone)]
pub struct MatchLedger {
    /// Ascending by id
    singles: Vec<SingleLeagueMatch>,
    /// Ascending by id
    doubles: Vec<DoubleLeagueMatch>,
    next_single_id: MatchId,
    next_double_id: MatchId,
}

impl Default for MatchLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchLedger {
    pub fn new() -> Self {
        Self {
            singles: Vec::new(),
            doubles: Vec::new(),
            next_single_id: 1,
            next_double_id: 1,
        }
    }

    /// Rebuild a ledger from stored rows in any order.
    ///
    /// Fails if two rows of the same league share an id.
    pub fn from_matches(
        mut singles: Vec<SingleLeagueMatch>,
        mut doubles: Vec<DoubleLeagueMatch>,
    ) -> LeagueResult<Self> {
        singles.sort_by_key(|m| m.id);
        doubles.sort_by_key(|m| m.id);
        if let Some(pair) = singles.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LeagueError::consistency(format!(
                "duplicate single match id {}",
                pair[0].id
            )));
        }
        if let Some(pair) = doubles.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(LeagueError::consistency(format!(
                "duplicate double match id {}",
                pair[0].id
            )));
        }
        let next_single_id = next_id(singles.last().map(|m| m.id), LeagueKind::Single)?;
        let next_double_id = next_id(doubles.last().map(|m| m.id), LeagueKind::Double)?;
        Ok(Self {
            singles,
            doubles,
            next_single_id,
            next_double_id,
        })
    }

    /// Validate a single league result and build the row it would become.
    pub fn prepare_single(
        &self,
        roster: &Roster,
        result: SingleResult,
    ) -> Result<SingleLeagueMatch, ValidationError> {
        check_participants(roster, &[&result.winner, &result.loser], result.goal_balance)?;
        Ok(SingleLeagueMatch {
            id: self.next_single_id,
            winning_player: result.winner,
            losing_player: result.loser,
            goal_balance: result.goal_balance,
        })
    }

    /// Validate a double league result and build the row it would become.
    pub fn prepare_double(
        &self,
        roster: &Roster,
        result: DoubleResult,
    ) -> Result<DoubleLeagueMatch, ValidationError> {
        let [w1, w2] = result.winners;
        let [l1, l2] = result.losers;
        check_participants(roster, &[&w1, &w2, &l1, &l2], result.goal_balance)?;
        Ok(DoubleLeagueMatch {
            id: self.next_double_id,
            winning_player1: w1,
            winning_player2: w2,
            losing_player1: l1,
            losing_player2: l2,
            goal_balance: result.goal_balance,
        })
    }

    pub fn insert_single(
        &mut self,
        roster: &Roster,
        result: SingleResult,
    ) -> Result<SingleLeagueMatch, ValidationError> {
        let record = self.prepare_single(roster, result)?;
        self.push_single(record.clone());
        Ok(record)
    }

    pub fn insert_double(
        &mut self,
        roster: &Roster,
        result: DoubleResult,
    ) -> Result<DoubleLeagueMatch, ValidationError> {
        let record = self.prepare_double(roster, result)?;
        self.push_double(record.clone());
        Ok(record)
    }

    /// Append a prepared row. Ids must keep increasing.
    pub(crate) fn push_single(&mut self, record: SingleLeagueMatch) {
        debug_assert!(record.id >= self.next_single_id);
        self.next_single_id = record.id.saturating_add(1);
        self.singles.push(record);
    }

    /// Append a prepared row. Ids must keep increasing.
    pub(crate) fn push_double(&mut self, record: DoubleLeagueMatch) {
        debug_assert!(record.id >= self.next_double_id);
        self.next_double_id = record.id.saturating_add(1);
        self.doubles.push(record);
    }

    pub fn single(&self, id: MatchId) -> Option<&SingleLeagueMatch> {
        let idx = self.singles.binary_search_by_key(&id, |m| m.id).ok()?;
        Some(&self.singles[idx])
    }

    pub fn double(&self, id: MatchId) -> Option<&DoubleLeagueMatch> {
        let idx = self.doubles.binary_search_by_key(&id, |m| m.id).ok()?;
        Some(&self.doubles[idx])
    }

    pub fn delete_single(&mut self, id: MatchId) -> Result<SingleLeagueMatch, ValidationError> {
        let idx = self
            .singles
            .binary_search_by_key(&id, |m| m.id)
            .map_err(|_| ValidationError::UnknownMatch(LeagueKind::Single, id))?;
        Ok(self.singles.remove(idx))
    }

    pub fn delete_double(&mut self, id: MatchId) -> Result<DoubleLeagueMatch, ValidationError> {
        let idx = self
            .doubles
            .binary_search_by_key(&id, |m| m.id)
            .map_err(|_| ValidationError::UnknownMatch(LeagueKind::Double, id))?;
        Ok(self.doubles.remove(idx))
    }

    /// Double matches in the order a replay must apply them.
    pub fn doubles_ascending(&self) -> &[DoubleLeagueMatch] {
        &self.doubles
    }

    pub fn singles_ascending(&self) -> &[SingleLeagueMatch] {
        &self.singles
    }

    pub fn list_single(&self, limit: Option<usize>, order: Order) -> Vec<&SingleLeagueMatch> {
        ordered(&self.singles, order, limit, |_| true)
    }

    pub fn list_double(&self, limit: Option<usize>, order: Order) -> Vec<&DoubleLeagueMatch> {
        ordered(&self.doubles, order, limit, |_| true)
    }

    /// Single matches the player took part in, newest first.
    pub fn single_matches_for(&self, name: &str, limit: Option<usize>) -> Vec<&SingleLeagueMatch> {
        ordered(&self.singles, Order::Desc, limit, |m| m.involves(name))
    }

    /// Double matches the player took part in, newest first.
    pub fn double_matches_for(&self, name: &str, limit: Option<usize>) -> Vec<&DoubleLeagueMatch> {
        ordered(&self.doubles, Order::Desc, limit, |m| m.involves(name))
    }

    /// Rewrite every reference to `old` in both leagues.
    pub fn rename_player(&mut self, old: &str, new: &str) {
        for m in &mut self.singles {
            m.rename(old, new);
        }
        for m in &mut self.doubles {
            m.rename(old, new);
        }
    }

    pub fn single_count(&self) -> usize {
        self.singles.len()
    }

    pub fn double_count(&self) -> usize {
        self.doubles.len()
    }

    pub fn next_single_id(&self) -> MatchId {
        self.next_single_id
    }

    pub fn next_double_id(&self) -> MatchId {
        self.next_double_id
    }

    /// First player referenced by any match but missing from the roster.
    pub fn find_unknown_player(&self, roster: &Roster) -> Option<&str> {
        let singles = self
            .singles
            .iter()
            .flat_map(|m| [m.winning_player.as_str(), m.losing_player.as_str()]);
        let doubles = self.doubles.iter().flat_map(|m| m.players());
        singles.chain(doubles).find(|name| !roster.contains(name))
    }
}

fn check_participants(
    roster: &Roster,
    names: &[&String],
    goal_balance: u8,
) -> Result<(), ValidationError> {
    if names.iter().any(|n| n.is_empty()) {
        return Err(ValidationError::EmptyName);
    }
    if goal_balance > MAX_GOAL_BALANCE {
        return Err(ValidationError::GoalBalanceOutOfRange(goal_balance as i64));
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(ValidationError::DuplicatePlayer((*name).clone()));
        }
    }
    for name in names {
        roster.require(name)?;
    }
    Ok(())
}

/// Id following the highest stored one, or 1 for an empty league.
fn next_id(last: Option<MatchId>, league: LeagueKind) -> LeagueResult<MatchId> {
    match last {
        None => Ok(1),
        Some(id) => id.checked_add(1).ok_or_else(|| {
            LeagueError::consistency(format!(
                "{league} match id {id} leaves no room for new matches"
            ))
        }),
    }
}

fn ordered<T>(
    rows: &[T],
    order: Order,
    limit: Option<usize>,
    keep: impl Fn(&T) -> bool,
) -> Vec<&T> {
    let limit = limit.unwrap_or(usize::MAX);
    match order {
        Order::Asc => rows.iter().filter(|m| keep(m)).take(limit).collect(),
        Order::Desc => rows.iter().rev().filter(|m| keep(m)).take(limit).collect(),
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;
