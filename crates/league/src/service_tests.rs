use super::*;
use crate::error::{ServiceError, StoreError, StoreResult};
use crate::store::MemoryStore;
use league_core::{ValidationError, MatchId};

/// Memory store that can be told to refuse the next write.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
}

impl FlakyStore {
    fn check(&self) -> StoreResult<()> {
        if self.fail_writes {
            Err(StoreError::Io {
                path: "flaky".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        } else {
            Ok(())
        }
    }
}

impl LeagueStore for FlakyStore {
    fn load_players(&self) -> StoreResult<Vec<Player>> {
        self.inner.load_players()
    }
    fn load_single_matches(&self) -> StoreResult<Vec<SingleLeagueMatch>> {
        self.inner.load_single_matches()
    }
    fn load_double_matches(&self) -> StoreResult<Vec<DoubleLeagueMatch>> {
        self.inner.load_double_matches()
    }
    fn insert_player(&mut self, player: &Player) -> StoreResult<()> {
        self.check()?;
        self.inner.insert_player(player)
    }
    fn rename_player(&mut self, old: &str, new: &str) -> StoreResult<()> {
        self.check()?;
        self.inner.rename_player(old, new)
    }
    fn update_player_starting_rating(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.check()?;
        self.inner.update_player_starting_rating(name, value)
    }
    fn update_player_form_factor(&mut self, name: &str, value: f64) -> StoreResult<()> {
        self.check()?;
        self.inner.update_player_form_factor(name, value)
    }
    fn append_single_match(&mut self, record: &SingleLeagueMatch) -> StoreResult<()> {
        self.check()?;
        self.inner.append_single_match(record)
    }
    fn append_double_match(&mut self, record: &DoubleLeagueMatch) -> StoreResult<()> {
        self.check()?;
        self.inner.append_double_match(record)
    }
    fn delete_single_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.check()?;
        self.inner.delete_single_match(id)
    }
    fn delete_double_match(&mut self, id: MatchId) -> StoreResult<()> {
        self.check()?;
        self.inner.delete_double_match(id)
    }
}

fn service() -> LeagueService<MemoryStore> {
    let mut service = LeagueService::open(MemoryStore::new(), LeagueConfig::default()).unwrap();
    for name in ["A", "B", "C", "D"] {
        service.register_player(name, None, None).unwrap();
    }
    service
}

// =============================================================================
// Submitting and deleting
// =============================================================================

#[test]
fn test_register_uses_configured_defaults() {
    let config = LeagueConfig {
        default_starting_rating: 1200.0,
        default_form_factor: 0.25,
        ..LeagueConfig::default()
    };
    let mut service = LeagueService::open(MemoryStore::new(), config).unwrap();

    service.register_player("A", None, None).unwrap();
    service.register_player("B", Some(900.0), None).unwrap();

    let players = service.store().load_players().unwrap();
    assert_eq!(players[0], Player::new("A", 1200.0, 0.25));
    assert_eq!(players[1], Player::new("B", 900.0, 0.25));
    assert_eq!(service.player_names(), vec!["A".to_string(), "B".to_string()]);
    assert!(service.contains("B"));
}

#[test]
fn test_submit_double_writes_store_and_snapshot() {
    let mut service = service();

    let (record, change) = service.submit_double_match("A", "B", "C", "D", 5).unwrap();

    assert_eq!(record.id, 1);
    assert!(change.moved_points > 0.0);
    assert_eq!(service.store().load_double_matches().unwrap(), vec![record]);
    assert_eq!(service.current_rating("A", LeagueKind::Double).unwrap(), 1023.43);
}

#[test]
fn test_invalid_goal_balance_is_rejected_before_anything_happens() {
    let mut service = service();

    let err = service.submit_single_match("A", "B", 11).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::League(league_core::LeagueError::Validation(
            ValidationError::GoalBalanceOutOfRange(11)
        ))
    ));
    assert!(service.submit_double_match("A", "B", "C", "D", -1).is_err());
    assert!(service.store().load_single_matches().unwrap().is_empty());
    assert!(service.store().load_double_matches().unwrap().is_empty());
}

#[test]
fn test_delete_removes_from_store_and_replays() {
    let mut service = service();
    service.submit_double_match("A", "B", "C", "D", 5).unwrap();
    let before = service.league().snapshot().clone();
    let (second, _) = service.submit_double_match("C", "B", "A", "D", 2).unwrap();

    service.delete_match(second.id, LeagueKind::Double).unwrap();

    assert_eq!(service.league().snapshot(), &before);
    assert_eq!(service.store().load_double_matches().unwrap().len(), 1);
}

#[test]
fn test_reopen_replays_the_same_snapshot() {
    let mut service = service();
    service.submit_double_match("A", "B", "C", "D", 5).unwrap();
    service.submit_double_match("D", "B", "A", "C", 9).unwrap();
    service.submit_single_match("A", "B", 3).unwrap();
    let snapshot = service.league().snapshot().clone();

    let reopened = LeagueService::open(service.into_store(), LeagueConfig::default()).unwrap();

    assert_eq!(reopened.league().snapshot(), &snapshot);
    assert_eq!(reopened.league().ledger().next_double_id(), 3);
    assert_eq!(reopened.league().ledger().next_single_id(), 2);
}

#[test]
fn test_rename_reaches_the_store() {
    let mut service = service();
    service.submit_single_match("A", "B", 3).unwrap();

    service.rename_player("A", "Anna").unwrap();

    let stored = service.store().load_single_matches().unwrap();
    assert_eq!(stored[0].winning_player, "Anna");
    assert_eq!(service.recent_form("Anna").unwrap(), 130.0);
}

#[test]
fn test_form_factor_edit_changes_form() {
    let mut service = service();
    service.submit_single_match("A", "B", 0).unwrap();
    let before = service.recent_form("A").unwrap();

    service.set_form_factor("A", 0.5).unwrap();

    assert_eq!(service.recent_form("A").unwrap(), before - 50.0);
}

// =============================================================================
// Store failures
// =============================================================================

#[test]
fn test_store_failure_leaves_league_unchanged() {
    let mut service = LeagueService::open(FlakyStore::default(), LeagueConfig::default()).unwrap();
    for name in ["A", "B", "C", "D"] {
        service.register_player(name, None, None).unwrap();
    }
    service.submit_double_match("A", "B", "C", "D", 5).unwrap();
    let snapshot = service.league().snapshot().clone();

    service.store.fail_writes = true;

    assert!(matches!(
        service.submit_double_match("A", "C", "B", "D", 4),
        Err(ServiceError::Store(_))
    ));
    assert!(service.delete_match(1, LeagueKind::Double).is_err());
    assert!(service.set_starting_rating("A", 1500.0).is_err());
    assert!(service.rename_player("A", "Z").is_err());

    assert_eq!(service.league().snapshot(), &snapshot);
    assert_eq!(service.league().ledger().double_count(), 1);
    assert_eq!(service.league().ledger().next_double_id(), 2);
    assert!(service.contains("A"));

    service.store.fail_writes = false;
    let (record, _) = service.submit_double_match("A", "C", "B", "D", 4).unwrap();
    assert_eq!(record.id, 2);
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_match_listings_are_newest_first() {
    let mut service = service();
    service.submit_single_match("A", "B", 1).unwrap();
    service.submit_single_match("C", "D", 2).unwrap();
    service.submit_single_match("B", "C", 3).unwrap();

    let ids: Vec<_> = service
        .matches(LeagueKind::Single, Some(2))
        .iter()
        .map(MatchRecord::id)
        .collect();
    assert_eq!(ids, vec![3, 2]);

    let for_b: Vec<_> = service
        .matches_for_player("B", LeagueKind::Single, None)
        .unwrap()
        .iter()
        .map(MatchRecord::id)
        .collect();
    assert_eq!(for_b, vec![3, 1]);
    assert!(service.matches_for_player("Ghost", LeagueKind::Single, None).is_err());
    assert!(service.matches(LeagueKind::Double, None).is_empty());
}

#[test]
fn test_team_form_and_standings() {
    let mut service = service();
    service.submit_double_match("A", "B", "C", "D", 10).unwrap();

    assert_eq!(service.team_form("B", "A").unwrap(), 200.0);
    assert_eq!(service.team_form("C", "D").unwrap(), -100.0);

    let standings = service.standings(LeagueKind::Double).unwrap();
    assert_eq!(standings[0].name, "A");
    assert_eq!(standings[1].name, "B");
    assert_eq!(standings[3].name, "D");
}
