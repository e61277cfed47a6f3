//! Rating engine for a table-soccer club league.
//!
//! This crate holds everything with real invariants:
//! - Point transfer between the winning and losing pair of a double match
//! - The ordered match ledger for both leagues
//! - Replaying the double league history into a rating snapshot
//! - Windowed "recent form" scores for the single league
//!
//! Storage and presentation live elsewhere and talk to this crate through
//! [`League`].

pub mod error;
pub mod form;
pub mod league;
pub mod ledger;
pub mod projector;
pub mod rating;
pub mod roster;
pub mod types;

pub use error::*;
pub use form::{recent_form, team_form, DEFAULT_FORM_WINDOW};
pub use league::*;
pub use ledger::MatchLedger;
pub use projector::*;
pub use roster::Roster;
pub use types::*;
