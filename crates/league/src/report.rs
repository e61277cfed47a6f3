//! Plain-text reports for the terminal

use league_core::{LeagueKind, Standing};

use crate::service::MatchRecord;

/// Standings table, best first
pub fn standings_report(league: LeagueKind, standings: &[Standing]) -> String {
    let heading = match league {
        LeagueKind::Double => "Rating",
        LeagueKind::Single => "Form",
    };

    let mut report = String::new();
    report.push_str(&format!("=== {} league standings ===\n", league));
    report.push_str(&format!("{:>4}  {:<24} {:>10}\n", "#", "Player", heading));
    report.push_str(&"-".repeat(40));
    report.push('\n');

    for (rank, row) in standings.iter().enumerate() {
        report.push_str(&format!(
            "{:>4}  {:<24} {:>10.2}\n",
            rank + 1,
            row.name,
            row.value
        ));
    }

    report
}

/// Match listing in the order given
pub fn matches_report(league: LeagueKind, matches: &[MatchRecord]) -> String {
    let mut report = String::new();
    report.push_str(&format!("=== {} league matches ===\n", league));
    if matches.is_empty() {
        report.push_str("(none)\n");
        return report;
    }

    for record in matches {
        let outcome = match record {
            MatchRecord::Single(m) => format!(
                "{} beat {} by {}",
                m.winning_player, m.losing_player, m.goal_balance
            ),
            MatchRecord::Double(m) => format!(
                "{} & {} beat {} & {} by {}",
                m.winning_player1,
                m.winning_player2,
                m.losing_player1,
                m.losing_player2,
                m.goal_balance
            ),
        };
        report.push_str(&format!("{:>5}  {}\n", record.id(), outcome));
    }

    report
}
