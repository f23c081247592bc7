//! Command-line front end for the Pokedex record service.
//!
//! # Responsibility
//! - Parse commands into service calls against a local database file.
//! - Print records as JSON and map service errors to non-zero exits.

use clap::{Parser, Subcommand};
use log::error;
use pokedex_core::db::open_db;
use pokedex_core::{
    core_version, default_log_level, init_logging, NewPokemon, PaginationQuery, PokemonConfig,
    PokemonPatch, PokemonService, PokemonServiceError, SqlitePokemonRepository,
};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about = "Manage Pokemon records")]
struct Cli {
    /// SQLite database file.
    #[arg(long, default_value = "pokedex.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error). Needs `--log-dir`; defaults
    /// to `debug` in debug builds and `info` otherwise.
    #[arg(long, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Insert a new record.
    Create {
        #[arg(long)]
        no: i64,
        #[arg(long)]
        name: String,
    },
    /// List records ordered by number.
    List {
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
    },
    /// Look up one record by number, id or name.
    Get { term: String },
    /// Patch the record a term resolves to.
    Update {
        term: String,
        #[arg(long)]
        no: Option<i64>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a record by id.
    Remove { id: String },
    /// Print the core library version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PokemonServiceError>() {
                Some(service_err) => {
                    eprintln!("error[{}]: {service_err}", service_err.status_code())
                }
                None => {
                    error!("event=cli_run module=cli status=error error={err}");
                    eprintln!("error: {err}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Version = cli.command {
        println!("pokedex_core {}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db)?;
    let config = PokemonConfig::from_env()?;
    let service = PokemonService::with_config(SqlitePokemonRepository::new(&conn), config);

    match cli.command {
        Command::Create { no, name } => print_json(&service.create(NewPokemon::new(no, name))?),
        Command::List { limit, offset } => {
            print_json(&service.find_all(&PaginationQuery { limit, offset })?)
        }
        Command::Get { term } => print_json(&service.find_one(&term)?),
        Command::Update { term, no, name } => {
            print_json(&service.update(&term, PokemonPatch { no, name })?)
        }
        Command::Remove { id } => {
            service.remove(&id)?;
            Ok(())
        }
        Command::Version => Ok(()),
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
