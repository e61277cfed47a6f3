//! Bulk import of double league results from plain text.
//!
//! One match per line: `winner1 winner2 loser1 loser2 goal_balance`,
//! separated by whitespace. Blank lines are ignored. Lines that cannot be
//! recorded are skipped with a warning and listed in the [`ImportReport`].

use std::fs;
use std::path::Path;

use league_core::MatchId;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::service::LeagueService;
use crate::store::LeagueStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the source
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids assigned to the imported matches, in file order
    pub imported: Vec<MatchId>,
    pub skipped: Vec<SkippedLine>,
}

/// A syntactically valid import line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLine<'a> {
    pub winners: [&'a str; 2],
    pub losers: [&'a str; 2],
    pub goal_balance: i64,
}

pub fn parse_line(line: &str) -> Result<ImportLine<'_>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [w1, w2, l1, l2, gb] = fields[..] else {
        return Err(format!("expected 5 fields, found {}", fields.len()));
    };
    let goal_balance = gb
        .parse::<i64>()
        .map_err(|_| format!("goal balance {gb:?} is not a number"))?;
    Ok(ImportLine {
        winners: [w1, w2],
        losers: [l1, l2],
        goal_balance,
    })
}

impl<S: LeagueStore> LeagueService<S> {
    /// Import double league results from a text file.
    pub fn import_double_matches(&mut self, path: &Path) -> ServiceResult<ImportReport> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let report = self.import_double_text(&text)?;
        info!(
            path = %path.display(),
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "imported double league matches"
        );
        Ok(report)
    }

    /// Import from already loaded text. Lines are submitted in order; a
    /// storage failure aborts the import, anything else skips the line.
    pub fn import_double_text(&mut self, text: &str) -> ServiceResult<ImportReport> {
        let mut report = ImportReport::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let parsed = match parse_line(raw) {
                Ok(parsed) => parsed,
                Err(reason) => {
                    warn!(line, %reason, "skipping import line");
                    report.skipped.push(SkippedLine { line, reason });
                    continue;
                }
            };

            let [w1, w2] = parsed.winners;
            let [l1, l2] = parsed.losers;
            match self.submit_double_match(w1, w2, l1, l2, parsed.goal_balance) {
                Ok((record, _)) => report.imported.push(record.id),
                Err(ServiceError::League(err)) => {
                    let reason = err.to_string();
                    warn!(line, %reason, "skipping import line");
                    report.skipped.push(SkippedLine { line, reason });
                }
                Err(err) => return Err(err),
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod import_tests;
