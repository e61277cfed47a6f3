use super::*;
use crate::types::Player;

fn roster() -> Roster {
    Roster::from_players(
        ["A", "B", "C", "D", "E"]
            .into_iter()
            .map(|n| Player::new(n, 1000.0, 0.0)),
    )
    .unwrap()
}

#[test]
fn test_ids_increase_per_league() {
    let roster = roster();
    let mut ledger = MatchLedger::new();

    let s1 = ledger.insert_single(&roster, SingleResult::new("A", "B", 3)).unwrap();
    let s2 = ledger.insert_single(&roster, SingleResult::new("B", "A", 1)).unwrap();
    let d1 = ledger
        .insert_double(&roster, DoubleResult::new(["A", "B"], ["C", "D"], 5))
        .unwrap();

    assert_eq!(s1.id, 1);
    assert_eq!(s2.id, 2);
    // Double league has its own sequence
    assert_eq!(d1.id, 1);
}

#[test]
fn test_deleted_ids_are_not_reused() {
    let roster = roster();
    let mut ledger = MatchLedger::new();
    ledger.insert_single(&roster, SingleResult::new("A", "B", 3)).unwrap();
    let last = ledger.insert_single(&roster, SingleResult::new("A", "C", 3)).unwrap();

    ledger.delete_single(last.id).unwrap();
    let next = ledger.insert_single(&roster, SingleResult::new("A", "D", 3)).unwrap();

    assert_eq!(next.id, 3);
}

#[test]
fn test_validation_rejects_bad_submissions() {
    let roster = roster();
    let mut ledger = MatchLedger::new();

    assert_eq!(
        ledger.insert_single(&roster, SingleResult::new("A", "A", 3)),
        Err(ValidationError::DuplicatePlayer("A".to_string()))
    );
    assert_eq!(
        ledger.insert_single(&roster, SingleResult::new("A", "Z", 3)),
        Err(ValidationError::UnknownPlayer("Z".to_string()))
    );
    assert_eq!(
        ledger.insert_single(&roster, SingleResult::new("", "B", 3)),
        Err(ValidationError::EmptyName)
    );
    assert_eq!(
        ledger.insert_double(&roster, DoubleResult::new(["A", "B"], ["C", "D"], 11)),
        Err(ValidationError::GoalBalanceOutOfRange(11))
    );
    assert_eq!(
        ledger.insert_double(&roster, DoubleResult::new(["A", "B"], ["C", "B"], 4)),
        Err(ValidationError::DuplicatePlayer("B".to_string()))
    );

    // Nothing was recorded and no id was consumed
    assert_eq!(ledger.single_count(), 0);
    assert_eq!(ledger.double_count(), 0);
    assert_eq!(ledger.next_single_id(), 1);
    assert_eq!(ledger.next_double_id(), 1);
}

#[test]
fn test_delete_unknown_id() {
    let mut ledger = MatchLedger::new();
    assert_eq!(
        ledger.delete_double(7),
        Err(ValidationError::UnknownMatch(LeagueKind::Double, 7))
    );
}

#[test]
fn test_listing_order_and_limit() {
    let roster = roster();
    let mut ledger = MatchLedger::new();
    for loser in ["B", "C", "D", "E"] {
        ledger.insert_single(&roster, SingleResult::new("A", loser, 2)).unwrap();
    }

    let newest: Vec<_> = ledger.list_single(Some(2), Order::Desc).iter().map(|m| m.id).collect();
    assert_eq!(newest, vec![4, 3]);

    let oldest: Vec<_> = ledger.list_single(None, Order::Asc).iter().map(|m| m.id).collect();
    assert_eq!(oldest, vec![1, 2, 3, 4]);
}

#[test]
fn test_matches_for_player_newest_first() {
    let roster = roster();
    let mut ledger = MatchLedger::new();
    ledger.insert_double(&roster, DoubleResult::new(["A", "B"], ["C", "D"], 1)).unwrap();
    ledger.insert_double(&roster, DoubleResult::new(["C", "D"], ["B", "E"], 1)).unwrap();
    ledger.insert_double(&roster, DoubleResult::new(["C", "E"], ["A", "D"], 1)).unwrap();

    let ids: Vec<_> = ledger.double_matches_for("A", None).iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 1]);

    let ids: Vec<_> = ledger.double_matches_for("D", Some(2)).iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn test_rename_cascades_into_every_role() {
    let roster = roster();
    let mut ledger = MatchLedger::new();
    ledger.insert_single(&roster, SingleResult::new("A", "B", 2)).unwrap();
    ledger.insert_single(&roster, SingleResult::new("B", "A", 2)).unwrap();
    ledger.insert_double(&roster, DoubleResult::new(["B", "A"], ["C", "D"], 1)).unwrap();
    ledger.insert_double(&roster, DoubleResult::new(["C", "D"], ["E", "A"], 1)).unwrap();

    ledger.rename_player("A", "Alicia");

    assert!(ledger.single_matches_for("A", None).is_empty());
    assert!(ledger.double_matches_for("A", None).is_empty());
    assert_eq!(ledger.single_matches_for("Alicia", None).len(), 2);
    assert_eq!(ledger.double_matches_for("Alicia", None).len(), 2);
}

#[test]
fn test_from_matches_sorts_and_continues_sequence() {
    let rows = vec![
        SingleLeagueMatch {
            id: 9,
            winning_player: "A".into(),
            losing_player: "B".into(),
            goal_balance: 1,
        },
        SingleLeagueMatch {
            id: 4,
            winning_player: "B".into(),
            losing_player: "A".into(),
            goal_balance: 1,
        },
    ];
    let ledger = MatchLedger::from_matches(rows, Vec::new()).unwrap();

    assert_eq!(ledger.singles_ascending()[0].id, 4);
    assert_eq!(ledger.next_single_id(), 10);
    assert_eq!(ledger.next_double_id(), 1);
}

#[test]
fn test_from_matches_rejects_duplicate_ids() {
    let row = SingleLeagueMatch {
        id: 1,
        winning_player: "A".into(),
        losing_player: "B".into(),
        goal_balance: 1,
    };
    let result = MatchLedger::from_matches(vec![row.clone(), row], Vec::new());
    assert!(matches!(result, Err(LeagueError::Consistency(_))));
}

#[test]
fn test_from_matches_rejects_exhausted_id_space() {
    let row = DoubleLeagueMatch {
        id: MatchId::MAX,
        winning_player1: "A".into(),
        winning_player2: "B".into(),
        losing_player1: "C".into(),
        losing_player2: "D".into(),
        goal_balance: 2,
    };
    let result = MatchLedger::from_matches(Vec::new(), vec![row]);
    assert!(matches!(result, Err(LeagueError::Consistency(_))));

    let row = SingleLeagueMatch {
        id: MatchId::MAX - 1,
        winning_player: "A".into(),
        losing_player: "B".into(),
        goal_balance: 1,
    };
    let ledger = MatchLedger::from_matches(vec![row], Vec::new()).unwrap();
    assert_eq!(ledger.next_single_id(), MatchId::MAX);
}
