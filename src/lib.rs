pub mod areas;
pub mod cli;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod filter;
pub mod heuristics;
pub mod ingest;
pub mod io_utils;
pub mod query;
pub mod record;
pub mod schema;
pub mod series;
pub mod session;
pub mod store;
pub mod summary;
pub mod table;
pub mod value;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error, info};
use uuid::Uuid;

use crate::{
    cli::{Cli, Commands, HeuristicsArgs},
    error::InsightError,
    heuristics::Heuristics,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("estate_insight", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Columns(args) => schema::execute(&args),
        Commands::Areas(args) => areas::execute(&args),
        Commands::Query(args) => query::execute(&args),
        Commands::Export(args) => export::execute(&args),
        Commands::Inspect(args) => diagnostics::execute(&args),
        Commands::Session(args) => session::execute(&args),
        Commands::Heuristics(args) => handle_heuristics(&args),
    };
    outcome.map_err(conceal_internal)
}

/// Keeps caller-facing errors intact and replaces anything else with a
/// generic failure carrying a correlation id; the full chain is logged.
fn conceal_internal(err: anyhow::Error) -> anyhow::Error {
    let user_facing = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<InsightError>())
        .any(InsightError::is_user_facing);
    if user_facing {
        return err;
    }
    let correlation_id = Uuid::new_v4().to_string();
    error!("Unexpected failure [{correlation_id}]: {err:?}");
    InsightError::Internal { correlation_id }.into()
}

fn handle_heuristics(args: &HeuristicsArgs) -> Result<()> {
    let heuristics = match &args.heuristics {
        Some(path) => {
            Heuristics::load(path).with_context(|| format!("Loading heuristics from {path:?}"))?
        }
        None => Heuristics::default(),
    };
    let yaml = heuristics.to_yaml()?;
    io_utils::write_output(args.output.as_deref(), yaml.as_bytes())?;
    info!(
        "Wrote heuristics with {} price, {} demand and {} locality token(s)",
        heuristics.price_tokens.len(),
        heuristics.demand_tokens.len(),
        heuristics.locality_tokens.len()
    );
    Ok(())
}
