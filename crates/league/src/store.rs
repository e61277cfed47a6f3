//! Persistence seam for the league.
//!
//! The service only ever talks to a [`LeagueStore`]. A store holds the
//! roster and both match tables; ratings are never stored, they are
//! replayed from the double league table on load.

use league_core::{DoubleLeagueMatch, MatchId, Player, SingleLeagueMatch};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

pub trait LeagueStore {
    fn load_players(&self) -> StoreResult<Vec<Player>>;
    fn load_single_matches(&self) -> StoreResult<Vec<SingleLeagueMatch>>;
    fn load_double_matches(&self) -> StoreResult<Vec<DoubleLeagueMatch>>;

    fn insert_player(&mut self, player: &Player) -> StoreResult<()>;
    /// Rename a player everywhere, including every stored match.
    fn rename_player(&mut self, old: &str, new: &str) -> StoreResult<()>;
    fn update_player_starting_rating(&mut self, name: &str, value: f64) -> StoreResult<()>;
    fn update_player_form_factor(&mut self, name: &str, value: f64) -> StoreResult<()>;

    fn append_single_match(&mut self, record: &SingleLeagueMatch) -> StoreResult<()>;
    fn append_double_match(&mut self, record: &DoubleLeagueMatch) -> StoreResult<()>;
    fn delete_single_match(&mut self, id: MatchId) -> StoreResult<()>;
    fn delete_double_match(&mut self, id: MatchId) -> StoreResult<()>;
}

/// Everything a store persists, in the shape written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueDocument {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub single_matches: Vec<SingleLeagueMatch>,
    #[serde(default)]
    pub double_matches: Vec<DoubleLeagueMatch>,
}

impl LeagueDocument {
    pub fn insert_player(&mut self, player: &Player) -> StoreResult<()> {
        if self.players.iter().any(|p| p.name == player.name) {
            return Err(StoreError::Duplicate(format!("player {}", player.name)));
        }
        self.players.push(player.clone());
        Ok(())
    }

    pub fn rename_player(&mut self, old: &str, new: &str) -> StoreResult<()> {
        self.player_mut(old)?.name = new.to_string();

        let swap = |slot: &mut String| {
            if *slot == old {
                *slot = new.to_string();
            }
        };
        for m in &mut self.single_matches {
            swap(&mut m.winning_player);
            swap(&mut m.losing_player);
        }
        for m in &mut self.double_matches {
            swap(&mut m.winning_player1);
            swap(&mut m.winning_player2);
            swap(&mut m.losing_player1);
            swap(&mut m.losing_player2);
        }
        Ok(())
    }

    pub fn update_starting_rating(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.player_mut(name)?.starting_rating = value;
        Ok(())
    }

    pub fn update_form_factor(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.player_mut(name)?.form_factor = value;
        Ok(())
    }

    pub fn append_single(&mut self, record: &SingleLeagueMatch) {
        self.single_matches.push(record.clone());
    }

    pub fn append_double(&mut self, record: &DoubleLeagueMatch) {
        self.double_matches.push(record.clone());
    }

    pub fn delete_single(&mut self, id: MatchId) -> StoreResult<()> {
        let index = self
            .single_matches
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::Missing(format!("single league match {id}")))?;
        self.single_matches.remove(index);
        Ok(())
    }

    pub fn delete_double(&mut self, id: MatchId) -> StoreResult<()> {
        let index = self
            .double_matches
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::Missing(format!("double league match {id}")))?;
        self.double_matches.remove(index);
        Ok(())
    }

    fn player_mut(&mut self, name: &str) -> StoreResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::Missing(format!("player {name}")))
    }
}

/// Store kept entirely in memory. Used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: LeagueDocument,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &LeagueDocument {
        &self.document
    }
}

impl LeagueStore for MemoryStore {
    fn load_players(&self) -> StoreResult<Vec<Player>> {
        Ok(self.document.players.clone())
    }

    fn load_single_matches(&self) -> StoreResult<Vec<SingleLeagueMatch>> {
        Ok(self.document.single_matches.clone())
    }

    fn load_double_matches(&self) -> StoreResult<Vec<DoubleLeagueMatch>> {
        Ok(self.document.double_matches.clone())
    }

    fn insert_player(&mut self, player: &Player) -> StoreResult<()> {
        self.document.insert_player(player)
    }

    fn rename_player(&mut self, old: &str, new: &str) -> StoreResult<()> {
        self.document.rename_player(old, new)
    }

    fn update_player_starting_rating(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.document.update_starting_rating(name, value)
    }

    fn update_player_form_factor(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.document.update_form_factor(name, value)
    }

    fn append_single_match(&mut self, record: &SingleLeagueMatch) -> StoreResult<()> {
        self.document.append_single(record);
        Ok(())
    }

    fn append_double_match(&mut self, record: &DoubleLeagueMatch) -> StoreResult<()> {
        self.document.append_double(record);
        Ok(())
    }

    fn delete_single_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.document.delete_single(id)
    }

    fn delete_double_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.document.delete_double(id)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
