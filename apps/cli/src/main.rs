#![deny(warnings)]

//! Headless CLI: load a catalog and run one valuation mode over a container.

mod render;

use anyhow::{Context, Result};
use case_core::{ContainerId, Currency, InMemoryCatalog};
use case_econ::parse_text;
use case_sim::{CumulativeTable, Engine, EngineConfig};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "casecalc", version, about = "Case value calculator and simulator")]
struct Cli {
    /// Catalog file (.json, .yaml or .yml)
    #[arg(long, default_value = "catalog.json")]
    catalog: PathBuf,

    /// Engine config file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List containers and their reward odds
    List,
    /// Expected value without randomness
    Theoretical {
        #[arg(long = "case")]
        case_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u64,
    },
    /// Open a container N times
    Realistic {
        #[arg(long = "case")]
        case_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u64,
    },
    /// Open until the rarest reward drops
    UntilBest {
        #[arg(long = "case")]
        case_id: String,
    },
    /// Running return sampled every STEP openings up to MAX
    ProfitGraph {
        #[arg(long = "case")]
        case_id: String,
        #[arg(long, default_value_t = 10)]
        step: u64,
        #[arg(long, default_value_t = 100)]
        max: u64,
    },
    /// Distribution of results over independent realistic runs
    Ensemble {
        #[arg(long = "case")]
        case_id: String,
        #[arg(short, long, default_value_t = 100)]
        quantity: u64,
        #[arg(long, default_value_t = 1_000)]
        runs: u32,
    },
    /// Express a base value (e.g. "1.5T") in another currency
    Convert {
        value: String,
        #[arg(long, default_value = "diamonds")]
        currency: String,
    },
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let catalog = InMemoryCatalog::load(&cli.catalog)
        .with_context(|| format!("loading catalog {}", cli.catalog.display()))?;
    info!(containers = catalog.len(), seed = ?config.rng_seed, "starting CLI");

    let engine = Engine::new(&catalog, config).context("invalid engine config")?;
    let mut rng = engine.config().rng();

    match cli.command {
        Command::List => {
            for c in catalog.containers() {
                let odds = CumulativeTable::prepare(c)
                    .map(|t| t.probabilities())
                    .unwrap_or_default();
                println!("{}", render::container_line(c, &odds));
            }
        }
        Command::Theoretical { case_id, quantity } => {
            let r = engine.compute_theoretical(quantity, &ContainerId(case_id))?;
            emit(cli.json, &r, || render::totals(&r.summary()))?;
        }
        Command::Realistic { case_id, quantity } => {
            let r = engine.compute_realistic(quantity, &ContainerId(case_id), &mut rng)?;
            emit(cli.json, &r, || render::realistic(&r))?;
        }
        Command::UntilBest { case_id } => {
            let r = engine.compute_until_best(&ContainerId(case_id), &mut rng)?;
            emit(cli.json, &r, || render::until_best(&r))?;
        }
        Command::ProfitGraph { case_id, step, max } => {
            let pts = engine.compute_profit_series(step, max, &ContainerId(case_id), &mut rng)?;
            emit(cli.json, &pts, || render::profit_series(&pts))?;
        }
        Command::Ensemble {
            case_id,
            quantity,
            runs,
        } => {
            let seed = engine.config().rng_seed.unwrap_or(0);
            let stats =
                engine.compute_realistic_ensemble(quantity, runs, &ContainerId(case_id), seed)?;
            emit(cli.json, &stats, || render::ensemble(&stats))?;
        }
        Command::Convert { value, currency } => {
            let base = parse_text(&value).estimate();
            let currency = Currency::from(currency);
            let units = engine.convert_base_value_to_currency(base, &currency);
            emit(cli.json, &units, || {
                format!(
                    "{} base value ≈ {} {}",
                    case_econ::format_value(base),
                    case_econ::format_value(units),
                    currency
                )
            })?;
        }
    }

    Ok(())
}
