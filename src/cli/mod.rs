use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod display;
pub mod serve;

pub use display::{print_board, print_stats};
pub use serve::run_serve;

use crate::db::Database;
use crate::models::TaskCategory;

/// Default port for the HTTP server.
const DEFAULT_PORT: u16 = 3001;

#[derive(Parser)]
#[command(name = "contactdesk")]
#[command(about = "Personal CRM: contacts, ordered task lists and reminders")]
#[command(version)]
pub struct Cli {
    /// SQLite database file (default: <config dir>/contactdesk/crm.db)
    #[arg(long, env = "CONTACTDESK_DB", global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Replace all data with a demo data set
    Seed(SeedArgs),
    /// Show dashboard counters
    Stats,
    /// Show the task board
    Tasks(TasksArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "CONTACTDESK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory with a built UI to serve alongside the API
    #[arg(long, env = "CONTACTDESK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Skip the confirmation, existing data is deleted
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Only show one category (work, people, personal)
    #[arg(short, long)]
    pub category: Option<TaskCategory>,
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let db = match cli.db {
        Some(ref path) => Database::open(Some(path.as_path()))?,
        None => {
            let path = Database::default_path()?;
            log::info!("using database {}", path.display());
            Database::open(Some(path.as_path()))?
        }
    };

    match cli.command {
        Commands::Serve(args) => run_serve(db, &args.host, args.port, args.static_dir)?,
        Commands::Seed(args) => run_seed(&db, args.yes)?,
        Commands::Stats => print_stats(&db.dashboard_stats()?),
        Commands::Tasks(args) => print_board(&db.task_board()?, args.category),
    }

    Ok(())
}

fn run_seed(db: &Database, yes: bool) -> Result<()> {
    if !yes && db.count_contacts()? > 0 {
        anyhow::bail!("database already has data; pass --yes to replace it");
    }
    let summary = db.seed_demo_data(Utc::now())?;
    println!("Database seeded:");
    println!("  {} contacts", summary.contacts);
    println!("  {} tasks", summary.tasks);
    println!("  {} reminders", summary.reminders);
    Ok(())
}
