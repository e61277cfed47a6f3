//! League store backed by a single pretty-printed JSON file.
//!
//! Every mutation rewrites the whole document. The new document is written
//! to a sibling temp file and renamed over the old one, so a failed write
//! leaves both the file and the in-memory copy as they were.

use std::fs;
use std::path::{Path, PathBuf};

use league_core::{DoubleLeagueMatch, MatchId, Player, SingleLeagueMatch};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{LeagueDocument, LeagueStore};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: LeagueDocument,
}

impl JsonFileStore {
    /// Create a new, empty league file. Refuses to overwrite an existing one.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }
        let store = Self {
            path,
            document: LeagueDocument::default(),
        };
        store.write(&store.document)?;
        Ok(store)
    }

    /// Open an existing league file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let document = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, document })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &LeagueDocument {
        &self.document
    }

    fn write(&self, document: &LeagueDocument) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(document).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "wrote league file");
        Ok(())
    }

    /// Apply `edit` to a copy of the document, persist it, then keep it.
    fn update<F>(&mut self, edit: F) -> StoreResult<()>
    where
        F: FnOnce(&mut LeagueDocument) -> StoreResult<()>,
    {
        let mut next = self.document.clone();
        edit(&mut next)?;
        self.write(&next)?;
        self.document = next;
        Ok(())
    }
}

impl LeagueStore for JsonFileStore {
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
        self.update(|doc| doc.insert_player(player))
    }

    fn rename_player(&mut self, old: &str, new: &str) -> StoreResult<()> {
        self.update(|doc| doc.rename_player(old, new))
    }

    fn update_player_starting_rating(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.update(|doc| doc.update_starting_rating(name, value))
    }

    fn update_player_form_factor(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.update(|doc| doc.update_form_factor(name, value))
    }

    fn append_single_match(&mut self, record: &SingleLeagueMatch) -> StoreResult<()> {
        self.update(|doc| {
            doc.append_single(record);
            Ok(())
        })
    }

    fn append_double_match(&mut self, record: &DoubleLeagueMatch) -> StoreResult<()> {
        self.update(|doc| {
            doc.append_double(record);
            Ok(())
        })
    }

    fn delete_single_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.update(|doc| doc.delete_single(id))
    }

    fn delete_double_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.update(|doc| doc.delete_double(id))
    }
}

#[cfg(test)]
#[path = "json_store_tests.rs"]
mod json_store_tests;
