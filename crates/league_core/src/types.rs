use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Surrogate key of a recorded match. Single and double league ids are
/// independent sequences.
pub type MatchId = u64;

/// Largest winning margin a match can be recorded with.
pub const MAX_GOAL_BALANCE: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeagueKind {
    Single,
    Double,
}

impl fmt::Display for LeagueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeagueKind::Single => write!(f, "single"),
            LeagueKind::Double => write!(f, "double"),
        }
    }
}

impl FromStr for LeagueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "sl" | "1v1" => Ok(LeagueKind::Single),
            "double" | "dl" | "2v2" => Ok(LeagueKind::Double),
            other => Err(format!("unknown league: {other}")),
        }
    }
}

/// Presentation order for match listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Double league baseline that every replay starts from
    pub starting_rating: f64,
    /// How seriously the player takes single league games
    pub form_factor: f64,
}

impl Player {
    pub fn new(name: impl Into<String>, starting_rating: f64, form_factor: f64) -> Self {
        Self {
            name: name.into(),
            starting_rating,
            form_factor,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleLeagueMatch {
    pub id: MatchId,
    pub winning_player: String,
    pub losing_player: String,
    pub goal_balance: u8,
}

impl SingleLeagueMatch {
    pub fn involves(&self, name: &str) -> bool {
        self.winning_player == name || self.losing_player == name
    }

    /// The other participant, if `name` played in this match.
    pub fn opponent_of(&self, name: &str) -> Option<&str> {
        if self.winning_player == name {
            Some(&self.losing_player)
        } else if self.losing_player == name {
            Some(&self.winning_player)
        } else {
            None
        }
    }

    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        for slot in [&mut self.winning_player, &mut self.losing_player] {
            if slot == old {
                *slot = new.to_string();
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleLeagueMatch {
    pub id: MatchId,
    pub winning_player1: String,
    pub winning_player2: String,
    pub losing_player1: String,
    pub losing_player2: String,
    pub goal_balance: u8,
}

/// Which side of a double match a player or pair was on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Winners,
    Losers,
}

impl DoubleLeagueMatch {
    pub fn winners(&self) -> [&str; 2] {
        [&self.winning_player1, &self.winning_player2]
    }

    pub fn losers(&self) -> [&str; 2] {
        [&self.losing_player1, &self.losing_player2]
    }

    pub fn players(&self) -> [&str; 4] {
        [
            &self.winning_player1,
            &self.winning_player2,
            &self.losing_player1,
            &self.losing_player2,
        ]
    }

    pub fn involves(&self, name: &str) -> bool {
        self.players().contains(&name)
    }

    /// Side on which `a` and `b` played together, if they were teammates.
    pub fn team_side(&self, a: &str, b: &str) -> Option<Side> {
        let same_pair = |pair: [&str; 2]| {
            (pair[0] == a && pair[1] == b) || (pair[0] == b && pair[1] == a)
        };
        if same_pair(self.winners()) {
            Some(Side::Winners)
        } else if same_pair(self.losers()) {
            Some(Side::Losers)
        } else {
            None
        }
    }

    pub(crate) fn rename(&mut self, old: &str, new: &str) {
        for slot in [
            &mut self.winning_player1,
            &mut self.winning_player2,
            &mut self.losing_player1,
            &mut self.losing_player2,
        ] {
            if slot == old {
                *slot = new.to_string();
            }
        }
    }
}

/// A single league result as submitted, before the ledger assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleResult {
    pub winner: String,
    pub loser: String,
    pub goal_balance: u8,
}

impl SingleResult {
    pub fn new(winner: impl Into<String>, loser: impl Into<String>, goal_balance: u8) -> Self {
        Self {
            winner: winner.into(),
            loser: loser.into(),
            goal_balance,
        }
    }
}

/// A double league result as submitted, before the ledger assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoubleResult {
    pub winners: [String; 2],
    pub losers: [String; 2],
    pub goal_balance: u8,
}

impl DoubleResult {
    pub fn new<W: Into<String>, L: Into<String>>(
        winners: [W; 2],
        losers: [L; 2],
        goal_balance: u8,
    ) -> Self {
        Self {
            winners: winners.map(Into::into),
            losers: losers.map(Into::into),
            goal_balance,
        }
    }
}

/// Checks a raw goal balance and narrows it to the stored width.
pub fn goal_balance(value: i64) -> Result<u8, ValidationError> {
    if (0..=MAX_GOAL_BALANCE as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::GoalBalanceOutOfRange(value))
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub fn validate_starting_rating(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidRating(value))
    }
}

pub fn validate_form_factor(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormFactor(value))
    }
}

/// Rounds a presented score or rating to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
