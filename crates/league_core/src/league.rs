//! The league context: roster, ledger and rating snapshot kept in step.
//!
//! Every mutation happens in two steps. `stage_*` validates the request
//! and does all the arithmetic (including any replay) without touching
//! the league, returning a [`Staged`] change. [`League::commit`] then
//! writes it. A caller that has to persist the change somewhere else can
//! do so between the two steps and simply drop the staged change if that
//! fails, so readers never observe a half-applied update.

use tracing::info;

use crate::error::{LeagueError, LeagueResult, ValidationError};
use crate::form::{recent_form, team_form};
use crate::ledger::MatchLedger;
use crate::projector::{rebuild, RatingChange, RatingSnapshot};
use crate::roster::Roster;
use crate::types::{
    round2, validate_form_factor, DoubleLeagueMatch, DoubleResult, LeagueKind, MatchId, Player,
    SingleLeagueMatch, SingleResult,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub name: String,
    /// Double league rating or single league form, rounded to two decimals
    pub value: f64,
}

/// A validated change waiting to be committed.
#[derive(Debug, Clone)]
#[must_use = "a staged change does nothing until committed"]
pub struct Staged {
    revision: u64,
    change: Change,
}

impl Staged {
    pub fn change(&self) -> &Change {
        &self.change
    }
}

#[derive(Debug, Clone)]
pub enum Change {
    RegisterPlayer(Player),
    RenamePlayer {
        old: String,
        new: String,
    },
    SetStartingRating {
        name: String,
        value: f64,
        snapshot: RatingSnapshot,
    },
    SetFormFactor {
        name: String,
        value: f64,
    },
    AppendSingle(SingleLeagueMatch),
    AppendDouble {
        record: DoubleLeagueMatch,
        rating: RatingChange,
    },
    DeleteSingle(MatchId),
    DeleteDouble {
        id: MatchId,
        snapshot: RatingSnapshot,
    },
}

#[derive(Debug, Clone, Default)]
pub struct League {
    roster: Roster,
    ledger: MatchLedger,
    snapshot: RatingSnapshot,
    /// Bumped on every commit so stale staged changes are refused
    revision: u64,
}

impl League {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a league from stored players and matches and replay the
    /// double league history.
    pub fn from_parts(
        players: Vec<Player>,
        singles: Vec<SingleLeagueMatch>,
        doubles: Vec<DoubleLeagueMatch>,
    ) -> LeagueResult<Self> {
        let roster = Roster::from_players(players)?;
        let ledger = MatchLedger::from_matches(singles, doubles)?;
        if let Some(name) = ledger.find_unknown_player(&roster) {
            return Err(LeagueError::consistency(format!(
                "stored matches reference {name}, who is not on the roster"
            )));
        }
        let snapshot = rebuild(&roster, ledger.doubles_ascending())?;
        Ok(Self {
            roster,
            ledger,
            snapshot,
            revision: 0,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &MatchLedger {
        &self.ledger
    }

    pub fn snapshot(&self) -> &RatingSnapshot {
        &self.snapshot
    }

    // ---------------------------------------------------------------------
    // Staging
    // ---------------------------------------------------------------------

    pub fn stage_register(&self, player: Player) -> LeagueResult<Staged> {
        self.roster.check_new(&player)?;
        Ok(self.staged(Change::RegisterPlayer(player)))
    }

    pub fn stage_rename(&self, old: &str, new: &str) -> LeagueResult<Staged> {
        self.roster.check_rename(old, new)?;
        Ok(self.staged(Change::RenamePlayer {
            old: old.to_string(),
            new: new.to_string(),
        }))
    }

    /// Changing a replay root invalidates every derived rating, so the
    /// whole history is replayed here.
    pub fn stage_starting_rating(&self, name: &str, value: f64) -> LeagueResult<Staged> {
        let mut roster = self.roster.clone();
        roster.set_starting_rating(name, value)?;
        let snapshot = rebuild(&roster, self.ledger.doubles_ascending())?;
        Ok(self.staged(Change::SetStartingRating {
            name: name.to_string(),
            value,
            snapshot,
        }))
    }

    pub fn stage_form_factor(&self, name: &str, value: f64) -> LeagueResult<Staged> {
        validate_form_factor(value)?;
        self.roster.require(name)?;
        Ok(self.staged(Change::SetFormFactor {
            name: name.to_string(),
            value,
        }))
    }

    pub fn stage_single(&self, result: SingleResult) -> LeagueResult<Staged> {
        let record = self.ledger.prepare_single(&self.roster, result)?;
        Ok(self.staged(Change::AppendSingle(record)))
    }

    /// A new match lands at the end of history, so only its own effect on
    /// the current snapshot has to be computed.
    pub fn stage_double(&self, result: DoubleResult) -> LeagueResult<Staged> {
        let record = self.ledger.prepare_double(&self.roster, result)?;
        let rating = self.snapshot.compute(&record)?;
        Ok(self.staged(Change::AppendDouble { record, rating }))
    }

    /// Removing a double match shifts every later pre-match rating, so
    /// the remaining history is replayed from scratch.
    pub fn stage_delete(&self, league: LeagueKind, id: MatchId) -> LeagueResult<Staged> {
        match league {
            LeagueKind::Single => {
                self.ledger
                    .single(id)
                    .ok_or(ValidationError::UnknownMatch(league, id))?;
                Ok(self.staged(Change::DeleteSingle(id)))
            }
            LeagueKind::Double => {
                self.ledger
                    .double(id)
                    .ok_or(ValidationError::UnknownMatch(league, id))?;
                let remaining: Vec<DoubleLeagueMatch> = self
                    .ledger
                    .doubles_ascending()
                    .iter()
                    .filter(|m| m.id != id)
                    .cloned()
                    .collect();
                let snapshot = rebuild(&self.roster, &remaining)?;
                Ok(self.staged(Change::DeleteDouble { id, snapshot }))
            }
        }
    }

    fn staged(&self, change: Change) -> Staged {
        Staged {
            revision: self.revision,
            change,
        }
    }

    // ---------------------------------------------------------------------
    // Commit
    // ---------------------------------------------------------------------

    /// Apply a staged change. Fails only if the league moved on since the
    /// change was staged.
    pub fn commit(&mut self, staged: Staged) -> LeagueResult<()> {
        if staged.revision != self.revision {
            return Err(LeagueError::consistency(format!(
                "change staged at revision {} but league is at {}",
                staged.revision, self.revision
            )));
        }

        match staged.change {
            Change::RegisterPlayer(player) => {
                info!(player = %player.name, rating = player.starting_rating, "registered player");
                let (name, rating) = (player.name.clone(), player.starting_rating);
                self.roster.register(player)?;
                self.snapshot.insert_player(&name, rating);
            }
            Change::RenamePlayer { old, new } => {
                info!(%old, %new, "renamed player");
                self.roster.rename(&old, &new)?;
                self.ledger.rename_player(&old, &new);
                self.snapshot.rename(&old, &new);
            }
            Change::SetStartingRating {
                name,
                value,
                snapshot,
            } => {
                info!(player = %name, value, "changed starting rating");
                self.roster.set_starting_rating(&name, value)?;
                self.snapshot = snapshot;
            }
            Change::SetFormFactor { name, value } => {
                info!(player = %name, value, "changed form factor");
                self.roster.set_form_factor(&name, value)?;
            }
            Change::AppendSingle(record) => {
                info!(id = record.id, "recorded single league match");
                self.ledger.push_single(record);
            }
            Change::AppendDouble { record, rating } => {
                info!(id = record.id, moved_points = rating.moved_points, "recorded double league match");
                self.snapshot.commit(&rating);
                self.ledger.push_double(record);
            }
            Change::DeleteSingle(id) => {
                info!(id, "deleted single league match");
                self.ledger.delete_single(id)?;
            }
            Change::DeleteDouble { id, snapshot } => {
                info!(id, "deleted double league match");
                self.ledger.delete_double(id)?;
                self.snapshot = snapshot;
            }
        }

        self.revision += 1;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // One-step mutations for callers without an external store
    // ---------------------------------------------------------------------

    pub fn register_player(&mut self, player: Player) -> LeagueResult<()> {
        let staged = self.stage_register(player)?;
        self.commit(staged)
    }

    pub fn rename_player(&mut self, old: &str, new: &str) -> LeagueResult<()> {
        let staged = self.stage_rename(old, new)?;
        self.commit(staged)
    }

    pub fn set_starting_rating(&mut self, name: &str, value: f64) -> LeagueResult<()> {
        let staged = self.stage_starting_rating(name, value)?;
        self.commit(staged)
    }

    pub fn set_form_factor(&mut self, name: &str, value: f64) -> LeagueResult<()> {
        let staged = self.stage_form_factor(name, value)?;
        self.commit(staged)
    }

    pub fn submit_single(&mut self, result: SingleResult) -> LeagueResult<SingleLeagueMatch> {
        let record = self.ledger.prepare_single(&self.roster, result)?;
        self.commit(self.staged(Change::AppendSingle(record.clone())))?;
        Ok(record)
    }

    pub fn submit_double(
        &mut self,
        result: DoubleResult,
    ) -> LeagueResult<(DoubleLeagueMatch, RatingChange)> {
        let record = self.ledger.prepare_double(&self.roster, result)?;
        let rating = self.snapshot.compute(&record)?;
        self.commit(self.staged(Change::AppendDouble {
            record: record.clone(),
            rating: rating.clone(),
        }))?;
        Ok((record, rating))
    }

    pub fn delete_match(&mut self, league: LeagueKind, id: MatchId) -> LeagueResult<()> {
        let staged = self.stage_delete(league, id)?;
        self.commit(staged)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn recent_form(&self, name: &str, window: usize) -> LeagueResult<f64> {
        recent_form(&self.roster, &self.ledger, name, window)
    }

    pub fn team_form(&self, a: &str, b: &str, window: usize) -> LeagueResult<f64> {
        team_form(&self.roster, &self.ledger, a, b, window)
    }

    /// Double league rating, or single league form, rounded for display.
    pub fn current_rating(
        &self,
        name: &str,
        league: LeagueKind,
        form_window: usize,
    ) -> LeagueResult<f64> {
        match league {
            LeagueKind::Double => {
                self.roster.require(name)?;
                let rating = self.snapshot.rating(name).ok_or_else(|| {
                    LeagueError::consistency(format!("{name} has no double league rating"))
                })?;
                Ok(round2(rating))
            }
            LeagueKind::Single => self.recent_form(name, form_window),
        }
    }

    /// Every player, best first. Equal values sort by name.
    pub fn standings(&self, league: LeagueKind, form_window: usize) -> LeagueResult<Vec<Standing>> {
        match league {
            LeagueKind::Double => Ok(self
                .snapshot
                .standings()
                .into_iter()
                .map(|(name, rating)| Standing {
                    name,
                    value: round2(rating),
                })
                .collect()),
            LeagueKind::Single => {
                let mut rows = self
                    .roster
                    .iter()
                    .map(|p| {
                        Ok(Standing {
                            name: p.name.clone(),
                            value: self.recent_form(&p.name, form_window)?,
                        })
                    })
                    .collect::<LeagueResult<Vec<_>>>()?;
                rows.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
                Ok(rows)
            }
        }
    }
}

#[cfg(test)]
#[path = "league_tests.rs"]
mod league_tests;
