//! Records CLI Entry Point
//!
//! Runs the interactive records session by default. Two subcommands support it:
//! - `connect` - Save a data source configuration
//! - `check` - Validate connectivity and report which tables exist
//!
//! stdout carries the console protocol. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use records::engine::sqlite::validate_connection;
use records::{
    resolve_config, save_config, ConfigLocation, ConfigOverrides, DataSourceConfig, Dispatcher,
    Session, SqliteProvider,
};

/// Records - university records administration
#[derive(Parser)]
#[command(name = "records")]
#[command(about = "Interactive administration tool for a university records store")]
#[command(version)]
struct Cli {
    /// Data source config file (overrides local and global config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config files)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Log dispatcher activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu session (default)
    Shell,

    /// Save a data source configuration
    Connect {
        /// Username stored with the data source
        #[arg(long)]
        username: Option<String>,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Save to the global config instead of `.records/config.json`
        #[arg(long)]
        global: bool,
    },

    /// Validate the data source and list missing tables
    Check,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "records=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = ConfigOverrides { config_file: cli.config, database: cli.database };

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => shell(&overrides),
        Commands::Connect { username, password_env, global } => {
            connect(overrides.database, username, password_env, global)
        }
        Commands::Check => check(&overrides),
    }
}

fn provider(overrides: &ConfigOverrides) -> Result<SqliteProvider> {
    let config = resolve_config(overrides)?;
    Ok(SqliteProvider::new(&config)?)
}

fn shell(overrides: &ConfigOverrides) -> Result<()> {
    let dispatcher = Dispatcher::new(provider(overrides)?);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(dispatcher, stdin.lock(), stdout.lock());
    session.run().context("session ended with a fatal error")?;

    let (_, _, mut out) = session.into_parts();
    writeln!(out)?;
    Ok(())
}

fn connect(
    database: Option<PathBuf>,
    username: Option<String>,
    password_env: Option<String>,
    global: bool,
) -> Result<()> {
    let database = match database {
        Some(path) => path,
        None => dialoguer::Input::<String>::new()
            .with_prompt("SQLite database file")
            .interact_text()
            .context("could not read database path")?
            .into(),
    };

    let config = DataSourceConfig {
        username: username.unwrap_or_default(),
        password_env,
        ..DataSourceConfig::sqlite(database)
    };

    let location = if global { ConfigLocation::Global } else { ConfigLocation::Local };
    let path = location.path()?;
    save_config(&path, &config)?;

    info!(path = %path.display(), "saved data source configuration");
    println!("Saved data source to {}", path.display());
    Ok(())
}

fn check(overrides: &ConfigOverrides) -> Result<()> {
    let provider = provider(overrides)?;
    let info = validate_connection(&provider)?;

    println!("Connected to {} (SQLite {})", info.connected_database, info.database_version);
    for table in &info.tables_present {
        println!("  found   {table}");
    }
    for table in &info.tables_missing {
        println!("  missing {table}");
    }

    if !info.tables_missing.is_empty() {
        anyhow::bail!("{} records table(s) missing", info.tables_missing.len());
    }
    Ok(())
}
