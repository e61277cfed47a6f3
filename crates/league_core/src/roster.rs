//! Registered players of the club.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::types::{validate_form_factor, validate_name, validate_starting_rating, Player};

/// Players keyed by name. Players are never removed.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: BTreeMap<String, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from stored players, rejecting duplicates and bad values.
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Result<Self, ValidationError> {
        let mut roster = Self::new();
        for player in players {
            roster.register(player)?;
        }
        Ok(roster)
    }

    pub fn check_new(&self, player: &Player) -> Result<(), ValidationError> {
        validate_name(&player.name)?;
        validate_starting_rating(player.starting_rating)?;
        validate_form_factor(player.form_factor)?;
        if self.contains(&player.name) {
            return Err(ValidationError::PlayerExists(player.name.clone()));
        }
        Ok(())
    }

    pub fn register(&mut self, player: Player) -> Result<(), ValidationError> {
        self.check_new(&player)?;
        self.players.insert(player.name.clone(), player);
        Ok(())
    }

    pub fn check_rename(&self, old: &str, new: &str) -> Result<(), ValidationError> {
        self.require(old)?;
        validate_name(new)?;
        if old != new && self.contains(new) {
            return Err(ValidationError::PlayerExists(new.to_string()));
        }
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        self.check_rename(old, new)?;
        if let Some(mut player) = self.players.remove(old) {
            player.name = new.to_string();
            self.players.insert(new.to_string(), player);
        }
        Ok(())
    }

    pub fn set_starting_rating(&mut self, name: &str, value: f64) -> Result<(), ValidationError> {
        validate_starting_rating(value)?;
        self.require_mut(name)?.starting_rating = value;
        Ok(())
    }

    pub fn set_form_factor(&mut self, name: &str, value: f64) -> Result<(), ValidationError> {
        validate_form_factor(value)?;
        self.require_mut(name)?.form_factor = value;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&Player, ValidationError> {
        self.get(name)
            .ok_or_else(|| ValidationError::UnknownPlayer(name.to_string()))
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut Player, ValidationError> {
        self.players
            .get_mut(name)
            .ok_or_else(|| ValidationError::UnknownPlayer(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players.contains_key(name)
    }

    /// Players in name order
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
