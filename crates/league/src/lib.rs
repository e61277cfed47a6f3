//! Club league service for table-soccer leagues
//!
//! This crate wraps the rating engine in `league_core` with:
//! - A storage seam and a JSON file store
//! - TOML configuration
//! - Bulk import of double league results
//! - Plain-text standings and match reports
//!
//! # Usage
//!
//! ```bash
//! # Create a league and record a double match
//! cargo run -p league -- init
//! cargo run -p league -- add-player Alice
//! cargo run -p league -- double Alice Bob Carol Dave 5
//!
//! # Show the double league table
//! cargo run -p league -- standings double
//! ```

mod config;
mod error;
mod import;
mod json_store;
mod report;
mod service;
mod store;

pub use config::*;
pub use error::*;
pub use import::*;
pub use json_store::*;
pub use report::*;
pub use service::*;
pub use store::*;
