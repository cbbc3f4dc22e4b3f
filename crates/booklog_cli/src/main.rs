//! Text menu entry point for the book catalog.
//!
//! # Responsibility
//! - Parse flags, start logging and open the catalog store once.
//! - Seed an empty store from the mirror file, then run the menu loop.

use booklog_core::db::open_db;
use booklog_core::{default_log_level, init_logging, CatalogService, MirrorFile, SqliteBookRepository};
use clap::Parser;
use std::error::Error;
use std::io;
use std::path::PathBuf;

mod menu;
mod prompt;

use menu::MenuShell;

const LOG_DIR_NAME: &str = "booklog-logs";

#[derive(Debug, Parser)]
#[command(name = "booklog", version)]
#[command(about = "Personal library manager", long_about = None)]
struct Cli {
    /// SQLite database holding the catalog
    #[arg(long, default_value = "library.db")]
    db: PathBuf,
    /// JSON mirror written after every change
    #[arg(long, default_value = "library.json")]
    mirror: PathBuf,
    /// Absolute directory for rolling log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let log_dir = cli
        .log_dir
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_DIR_NAME));
    let log_level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(log_level, &log_dir.to_string_lossy()) {
        eprintln!("Warning: file logging disabled: {err}");
    }

    let conn = open_db(&cli.db)?;
    let repo = SqliteBookRepository::try_new(&conn)?;
    let service = CatalogService::with_mirror(repo, MirrorFile::new(cli.mirror));
    service.seed_from_mirror()?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    MenuShell::new(&service, stdin.lock(), stdout.lock()).run()?;
    Ok(())
}
