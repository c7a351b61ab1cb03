use std::path::PathBuf;

use anyhow::{Context, bail};
use asr_cli::app;
use asr_cli::config::AsrConfig;
use asr_cli::csv_loader;
use asr_core::autosave::AutosaveOutcome;
use asr_core::models::{FieldUpdate, RequestId};
use asr_core::workflow::WorkflowError;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Additional Salary Request calculator.
///
/// Creates, edits and submits requests against the configured database and
/// prints the derived totals, deductions and cap status.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database backend to use; overrides the configuration file.
    #[arg(long)]
    backend: Option<String>,

    /// Database connection string; overrides the configuration file.
    /// For SQLite this is a file path (e.g. `asr.db`) or `:memory:`.
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a new request for an account.
    New { account: String },

    /// Print a request with its totals and cap status.
    Show { id: i64 },

    /// Save one field, e.g. `set 3 adoption 2000`.
    Set { id: i64, field: String, value: String },

    /// Save every row of a `field,value` CSV file.
    Import { id: i64, file: PathBuf },

    /// Validate and submit a request.
    Submit { id: i64 },

    /// Delete a request.
    Delete { id: i64 },

    /// List the requests of an account.
    List { account: String },
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info` so normal runs are quiet.
/// * Strips timestamps and target names to keep CLI output clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn print_outcome(
    field: &str,
    outcome: &AutosaveOutcome,
) {
    match outcome {
        AutosaveOutcome::Saved(total) => println!("{field}: saved, total {total}"),
        AutosaveOutcome::SkippedNoRequest => println!("{field}: skipped"),
        AutosaveOutcome::Rejected(error) => println!("{field}: rejected, {}", error.kind),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AsrConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AsrConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.database.backend = backend;
    }
    if let Some(db) = cli.db {
        config.database.connection_string = db;
    }
    let rates = config.rates()?;

    debug!("connecting to {} backend", config.database.backend);
    let registry = app::build_registry();
    let store = app::open_store(&registry, &config.database).await?;

    match cli.command {
        Command::New { account } => {
            let id = app::new_request(&store, &account).await?;
            info!(%id, %account, "created salary request");
            println!("{id}");
        }
        Command::Show { id } => {
            let report = app::show_request(&store, RequestId(id), &rates).await?;
            print!("{report}");
        }
        Command::Set { id, field, value } => {
            let Some(update) = FieldUpdate::from_key_value(&field, &value) else {
                bail!("unknown field '{field}' or invalid value '{value}'");
            };
            let outcome = app::set_field(&store, RequestId(id), update).await?;
            print_outcome(&field, &outcome);
        }
        Command::Import { id, file } => {
            let updates = csv_loader::load_from_file(&file)
                .with_context(|| format!("failed to load {}", file.display()))?;
            for row in app::import_fields(&store, RequestId(id), updates).await? {
                print_outcome(row.field, &row.outcome);
            }
        }
        Command::Submit { id } => match app::submit_request(&store, RequestId(id)).await {
            Ok(_) => println!("request {id} submitted"),
            Err(WorkflowError::Invalid(report)) => {
                for error in &report.errors {
                    warn!(field = error.field, "{}", error.kind);
                }
                bail!("request {id} has {} validation error(s)", report.errors.len());
            }
            Err(err) => return Err(err.into()),
        },
        Command::Delete { id } => {
            app::delete_request(&store, RequestId(id)).await?;
            println!("request {id} deleted");
        }
        Command::List { account } => {
            for record in app::list_requests(&store, &account).await? {
                println!(
                    "{:>6}  {:<16} {:>12}",
                    record.id.0,
                    record.status.as_str(),
                    record.total_additional_salary_requested
                );
            }
        }
    }

    Ok(())
}
