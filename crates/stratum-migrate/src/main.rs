//! stratum-migrate CLI
//!
//! Command-line tool for dumping a database schema into a new migration class.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stratum_migrate::command::{DumpSchemaCommand, DumpSchemaOptions};
use stratum_migrate::config::Configuration;
use stratum_migrate::console::Console;
use stratum_migrate::dumper::{SqliteSchemaDumper, DEFAULT_LINE_LENGTH};
use stratum_migrate::generator::TimestampClassNameGenerator;
use stratum_migrate::source::SqliteMigrationSource;

/// Schema dumping for Rust database migrations.
#[derive(Parser)]
#[command(name = "stratum-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Migrations directories as NAMESPACE=PATH pairs (ordered; the first
    /// namespace is the default for interactive selection).
    #[arg(short, long = "migrations-dir")]
    migrations_dir: Vec<String>,

    /// JSON configuration file holding an ordered list of
    /// {"namespace": ..., "path": ...} entries.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the current database schema into a new migration class.
    DumpSchema {
        /// Keep only tables matching these patterns (all tables if not specified).
        #[arg(long = "filter-tables")]
        filter_tables: Vec<String>,

        /// Maximum line length of the generated code.
        #[arg(long, default_value_t = DEFAULT_LINE_LENGTH)]
        line_length: usize,

        /// Render one builder call per line.
        #[arg(long)]
        formatted: bool,
    },

    /// Initialize the migrations system (create the recorded-migrations table).
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Build the configuration: file entries first, then CLI pairs
    let mut configuration = match &cli.config {
        Some(path) => Configuration::from_json_file(path)?,
        None => Configuration::new(),
    };
    for spec in &cli.migrations_dir {
        configuration.add_directory_spec(spec)?;
    }
    if configuration.is_empty() {
        configuration.add_migrations_directory("App", "migrations");
    }

    // Connect to database
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&cli.database)
        .await?;

    let source = Arc::new(SqliteMigrationSource::new(pool.clone()));

    match cli.command {
        Commands::Init => {
            info!("Initializing migrations system...");
            source.ensure_table().await?;
            info!("Recorded-migrations table created successfully.");
        }

        Commands::DumpSchema {
            filter_tables,
            line_length,
            formatted,
        } => {
            source.ensure_table().await?;

            let command = DumpSchemaCommand::new(
                configuration.clone(),
                source,
                Arc::new(TimestampClassNameGenerator),
                Arc::new(SqliteSchemaDumper::new(pool, configuration)),
            );
            let options = DumpSchemaOptions {
                filter_tables,
                line_length,
                formatted,
            };

            let stdin = io::stdin();
            let mut console = Console::new(stdin.lock(), io::stdout());
            command.execute(&options, &mut console).await?;
        }
    }

    Ok(())
}
