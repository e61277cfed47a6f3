//! League service running against a real JSON file
//!
//! Covers:
//! - Initializing a league file and refusing to overwrite it
//! - Every mutation surviving a reopen
//! - Ratings replayed from disk matching the live snapshot
//! - Importing results from a text file

use std::fs;

use league::{JsonFileStore, LeagueConfig, LeagueService, ServiceError, StoreError};
use league_core::LeagueKind;
use tempfile::tempdir;

fn open(path: &std::path::Path) -> LeagueService<JsonFileStore> {
    let config = LeagueConfig {
        data_file: path.to_path_buf(),
        ..LeagueConfig::default()
    };
    LeagueService::open(JsonFileStore::open(path).unwrap(), config).unwrap()
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_then_open_gives_an_empty_league() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("league.json");
    JsonFileStore::create(&path).unwrap();

    let service = open(&path);

    assert!(service.player_names().is_empty());
    assert!(service.standings(LeagueKind::Double).unwrap().is_empty());
    assert!(matches!(
        JsonFileStore::create(&path),
        Err(StoreError::AlreadyExists(_))
    ));
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_history_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("league.json");
    JsonFileStore::create(&path).unwrap();

    let snapshot = {
        let mut service = open(&path);
        for name in ["Alice", "Bob", "Carol", "Dave", "Eve"] {
            service.register_player(name, None, None).unwrap();
        }
        service.set_starting_rating("Eve", 1100.0).unwrap();
        service.submit_double_match("Alice", "Bob", "Carol", "Dave", 5).unwrap();
        service.submit_double_match("Eve", "Carol", "Alice", "Dave", 2).unwrap();
        let (third, _) = service
            .submit_double_match("Bob", "Dave", "Eve", "Alice", 8)
            .unwrap();
        service.submit_single_match("Carol", "Bob", 4).unwrap();
        service.delete_match(third.id, LeagueKind::Double).unwrap();
        service.rename_player("Dave", "David").unwrap();
        service.league().snapshot().clone()
    };

    let reopened = open(&path);

    assert_eq!(reopened.league().snapshot(), &snapshot);
    assert!(reopened.contains("David"));
    assert!(!reopened.contains("Dave"));
    assert_eq!(reopened.league().ledger().next_double_id(), 3);
    assert_eq!(reopened.recent_form("Carol").unwrap(), 140.0);
}

#[test]
fn test_rejected_match_is_not_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("league.json");
    JsonFileStore::create(&path).unwrap();
    let mut service = open(&path);
    for name in ["A", "B"] {
        service.register_player(name, None, None).unwrap();
    }
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(
        service.submit_single_match("A", "A", 3),
        Err(ServiceError::League(_))
    ));
    assert!(service.submit_single_match("A", "Ghost", 3).is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_import_file_into_file_league() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("league.json");
    let results = dir.path().join("results.txt");
    JsonFileStore::create(&path).unwrap();
    fs::write(&results, "A B C D 3\nbroken line\nC D A B 6\n").unwrap();

    let mut service = open(&path);
    for name in ["A", "B", "C", "D"] {
        service.register_player(name, None, None).unwrap();
    }
    let report = service.import_double_matches(&results).unwrap();
    let snapshot = service.league().snapshot().clone();

    assert_eq!(report.imported, vec![1, 2]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 2);
    assert_eq!(open(&path).league().snapshot(), &snapshot);
}
