//! League CLI
//!
//! Record matches, manage the roster and print standings.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use league::{
    matches_report, standings_report, JsonFileStore, LeagueConfig, LeagueService, ServiceResult,
    DEFAULT_CONFIG_FILE,
};
use league_core::{LeagueKind, MatchId};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Table-soccer club league: ratings, form and standings")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// League file, overriding the configured one
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty league file
    Init,
    /// Register a player
    AddPlayer {
        name: String,
        #[arg(long)]
        starting_rating: Option<f64>,
        #[arg(long)]
        form_factor: Option<f64>,
    },
    /// Rename a player everywhere
    RenamePlayer { old: String, new: String },
    /// Change a player's starting rating and replay the double league
    SetStartingRating { name: String, value: f64 },
    /// Change a player's form factor
    SetFormFactor {
        name: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Record a single league match
    Single {
        winner: String,
        loser: String,
        goal_balance: i64,
    },
    /// Record a double league match
    Double {
        winner1: String,
        winner2: String,
        loser1: String,
        loser2: String,
        goal_balance: i64,
    },
    /// Delete a match
    Delete { league: LeagueKind, id: MatchId },
    /// Print the standings table
    Standings { league: LeagueKind },
    /// Print a player's current rating (double) or form (single)
    Rating { name: String, league: LeagueKind },
    /// Print a player's recent single league form
    Form { name: String },
    /// Print a pair's recent double league form
    TeamForm { first: String, second: String },
    /// List recent matches, newest first
    Matches {
        league: LeagueKind,
        /// Only matches involving this player
        #[arg(long)]
        player: Option<String>,
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Import double league results from a text file
    Import { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match LeagueConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open(config: LeagueConfig) -> ServiceResult<LeagueService<JsonFileStore>> {
    let store = JsonFileStore::open(&config.data_file)?;
    LeagueService::open(store, config)
}

fn run(command: Commands, config: LeagueConfig) -> ServiceResult<()> {
    if let Commands::Init = command {
        return init(&config.data_file);
    }

    let mut service = open(config)?;
    match command {
        Commands::Init => {}
        Commands::AddPlayer {
            name,
            starting_rating,
            form_factor,
        } => {
            service.register_player(&name, starting_rating, form_factor)?;
            println!("Registered {name}");
        }
        Commands::RenamePlayer { old, new } => {
            service.rename_player(&old, &new)?;
            println!("Renamed {old} to {new}");
        }
        Commands::SetStartingRating { name, value } => {
            service.set_starting_rating(&name, value)?;
            println!("{name} now starts at {value}");
        }
        Commands::SetFormFactor { name, value } => {
            service.set_form_factor(&name, value)?;
            println!("{name} form factor is now {value}");
        }
        Commands::Single {
            winner,
            loser,
            goal_balance,
        } => {
            let record = service.submit_single_match(&winner, &loser, goal_balance)?;
            println!("Recorded single league match #{}", record.id);
        }
        Commands::Double {
            winner1,
            winner2,
            loser1,
            loser2,
            goal_balance,
        } => {
            let (record, change) =
                service.submit_double_match(&winner1, &winner2, &loser1, &loser2, goal_balance)?;
            println!(
                "Recorded double league match #{} ({:.2} points moved)",
                record.id, change.moved_points
            );
            for delta in &change.deltas {
                println!(
                    "  {:<24} {:>10.2} -> {:>10.2} ({:+.2})",
                    delta.name,
                    delta.before,
                    delta.after,
                    delta.change()
                );
            }
        }
        Commands::Delete { league, id } => {
            service.delete_match(id, league)?;
            println!("Deleted {league} league match #{id}");
        }
        Commands::Standings { league } => {
            let standings = service.standings(league)?;
            print!("{}", standings_report(league, &standings));
        }
        Commands::Rating { name, league } => {
            println!("{:.2}", service.current_rating(&name, league)?);
        }
        Commands::Form { name } => {
            println!("{:.2}", service.recent_form(&name)?);
        }
        Commands::TeamForm { first, second } => {
            println!("{:.2}", service.team_form(&first, &second)?);
        }
        Commands::Matches {
            league,
            player,
            limit,
        } => {
            let matches = match player {
                Some(name) => service.matches_for_player(&name, league, Some(limit))?,
                None => service.matches(league, Some(limit)),
            };
            print!("{}", matches_report(league, &matches));
        }
        Commands::Import { path } => {
            let report = service.import_double_matches(&path)?;
            println!("Imported {} matches", report.imported.len());
            for skipped in &report.skipped {
                println!("  skipped line {}: {}", skipped.line, skipped.reason);
            }
        }
    }
    Ok(())
}

fn init(path: &Path) -> ServiceResult<()> {
    JsonFileStore::create(path)?;
    println!("Created {}", path.display());
    Ok(())
}
