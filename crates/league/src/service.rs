//! The operations a front end calls.
//!
//! [`LeagueService`] owns a store and the in-memory [`League`]. Each
//! mutation is staged against the league, written to the store, and only
//! then committed, so the store and the league never disagree.

use league_core::{
    goal_balance, Change, DoubleLeagueMatch, DoubleResult, League, LeagueError, LeagueKind,
    MatchId, Order, Player, RatingChange, SingleLeagueMatch, SingleResult, Staged, Standing,
};
use tracing::info;

use crate::config::LeagueConfig;
use crate::error::ServiceResult;
use crate::store::LeagueStore;

/// A match from either league.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRecord {
    Single(SingleLeagueMatch),
    Double(DoubleLeagueMatch),
}

impl MatchRecord {
    pub fn id(&self) -> MatchId {
        match self {
            MatchRecord::Single(m) => m.id,
            MatchRecord::Double(m) => m.id,
        }
    }
}

pub struct LeagueService<S> {
    store: S,
    league: League,
    config: LeagueConfig,
}

impl<S: LeagueStore> LeagueService<S> {
    /// Load everything from `store` and replay the double league.
    pub fn open(store: S, config: LeagueConfig) -> ServiceResult<Self> {
        let players = store.load_players()?;
        let singles = store.load_single_matches()?;
        let doubles = store.load_double_matches()?;
        let league = League::from_parts(players, singles, doubles)?;
        info!(
            players = league.roster().len(),
            singles = league.ledger().single_count(),
            doubles = league.ledger().double_count(),
            "opened league"
        );
        Ok(Self {
            store,
            league,
            config,
        })
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ---------------------------------------------------------------------
    // Roster
    // ---------------------------------------------------------------------

    /// Register a player; missing values fall back to the configured defaults.
    pub fn register_player(
        &mut self,
        name: &str,
        starting_rating: Option<f64>,
        form_factor: Option<f64>,
    ) -> ServiceResult<()> {
        let player = Player::new(
            name,
            starting_rating.unwrap_or(self.config.default_starting_rating),
            form_factor.unwrap_or(self.config.default_form_factor),
        );
        let staged = self.league.stage_register(player)?;
        self.persist(staged)
    }

    pub fn rename_player(&mut self, old: &str, new: &str) -> ServiceResult<()> {
        let staged = self.league.stage_rename(old, new)?;
        self.persist(staged)
    }

    pub fn set_starting_rating(&mut self, name: &str, value: f64) -> ServiceResult<()> {
        let staged = self.league.stage_starting_rating(name, value)?;
        self.persist(staged)
    }

    pub fn set_form_factor(&mut self, name: &str, value: f64) -> ServiceResult<()> {
        let staged = self.league.stage_form_factor(name, value)?;
        self.persist(staged)
    }

    pub fn player_names(&self) -> Vec<String> {
        self.league.roster().names()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.league.roster().contains(name)
    }

    // ---------------------------------------------------------------------
    // Matches
    // ---------------------------------------------------------------------

    pub fn submit_single_match(
        &mut self,
        winner: &str,
        loser: &str,
        goal_balance_raw: i64,
    ) -> ServiceResult<SingleLeagueMatch> {
        let gb = goal_balance(goal_balance_raw)?;
        let staged = self.league.stage_single(SingleResult::new(winner, loser, gb))?;
        let Change::AppendSingle(record) = staged.change() else {
            return Err(LeagueError::consistency("unexpected staged change").into());
        };
        let record = record.clone();
        self.persist(staged)?;
        Ok(record)
    }

    pub fn submit_double_match(
        &mut self,
        winner1: &str,
        winner2: &str,
        loser1: &str,
        loser2: &str,
        goal_balance_raw: i64,
    ) -> ServiceResult<(DoubleLeagueMatch, RatingChange)> {
        let gb = goal_balance(goal_balance_raw)?;
        let result = DoubleResult::new([winner1, winner2], [loser1, loser2], gb);
        let staged = self.league.stage_double(result)?;
        let Change::AppendDouble { record, rating } = staged.change() else {
            return Err(LeagueError::consistency("unexpected staged change").into());
        };
        let outcome = (record.clone(), rating.clone());
        self.persist(staged)?;
        Ok(outcome)
    }

    pub fn delete_match(&mut self, id: MatchId, league: LeagueKind) -> ServiceResult<()> {
        let staged = self.league.stage_delete(league, id)?;
        self.persist(staged)
    }

    /// Write a staged change to the store, then commit it to the league.
    /// A store failure drops the staged change and the league is unchanged.
    fn persist(&mut self, staged: Staged) -> ServiceResult<()> {
        match staged.change() {
            Change::RegisterPlayer(player) => self.store.insert_player(player)?,
            Change::RenamePlayer { old, new } => self.store.rename_player(old, new)?,
            Change::SetStartingRating { name, value, .. } => {
                self.store.update_player_starting_rating(name, *value)?
            }
            Change::SetFormFactor { name, value } => {
                self.store.update_player_form_factor(name, *value)?
            }
            Change::AppendSingle(record) => self.store.append_single_match(record)?,
            Change::AppendDouble { record, .. } => self.store.append_double_match(record)?,
            Change::DeleteSingle(id) => self.store.delete_single_match(*id)?,
            Change::DeleteDouble { id, .. } => self.store.delete_double_match(*id)?,
        }
        self.league.commit(staged)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn standings(&self, league: LeagueKind) -> ServiceResult<Vec<Standing>> {
        Ok(self.league.standings(league, self.config.form_window)?)
    }

    pub fn recent_form(&self, name: &str) -> ServiceResult<f64> {
        Ok(self.league.recent_form(name, self.config.form_window)?)
    }

    pub fn team_form(&self, a: &str, b: &str) -> ServiceResult<f64> {
        Ok(self.league.team_form(a, b, self.config.team_form_window)?)
    }

    pub fn current_rating(&self, name: &str, league: LeagueKind) -> ServiceResult<f64> {
        Ok(self
            .league
            .current_rating(name, league, self.config.form_window)?)
    }

    /// Newest matches first.
    pub fn matches(&self, league: LeagueKind, limit: Option<usize>) -> Vec<MatchRecord> {
        let ledger = self.league.ledger();
        match league {
            LeagueKind::Single => ledger
                .list_single(limit, Order::Desc)
                .into_iter()
                .cloned()
                .map(MatchRecord::Single)
                .collect(),
            LeagueKind::Double => ledger
                .list_double(limit, Order::Desc)
                .into_iter()
                .cloned()
                .map(MatchRecord::Double)
                .collect(),
        }
    }

    /// Newest matches involving `name` first.
    pub fn matches_for_player(
        &self,
        name: &str,
        league: LeagueKind,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<MatchRecord>> {
        self.league.roster().require(name)?;
        let ledger = self.league.ledger();
        Ok(match league {
            LeagueKind::Single => ledger
                .single_matches_for(name, limit)
                .into_iter()
                .cloned()
                .map(MatchRecord::Single)
                .collect(),
            LeagueKind::Double => ledger
                .double_matches_for(name, limit)
                .into_iter()
                .cloned()
                .map(MatchRecord::Double)
                .collect(),
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
