//! Tournament simulator CLI.
//!
//! Usage:
//!   cargo run --release --bin bigeast-sim -- --trials 100000 --method calibrated_rating_differential
//!   cargo run --release --bin bigeast-sim -- --all-methods --format csv
//!   cargo run --release --bin bigeast-sim -- --exact --sensitivity 1.0

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use bigeast_sim::config::load_config;
use bigeast_sim::error::ConfigError;
use bigeast_sim::exact::calculate_odds_exact;
use bigeast_sim::monte_carlo::run_seeded;
use bigeast_sim::report::{render_csv, render_deltas, render_json, render_table};
use bigeast_sim::sensitivity::all_team_deltas;
use bigeast_sim::win_prob::{PredictionMethod, Predictor};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(name = "bigeast-sim", about = "Monte Carlo odds for the Big East tournament")]
struct Cli {
    /// Prediction method: rating_differential, record_based or calibrated_rating_differential
    #[arg(short, long)]
    method: Option<String>,

    /// Number of simulated tournaments
    #[arg(short, long)]
    trials: Option<usize>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Path to a team registry TOML file (default: built-in 2025 field)
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Path to bigeast.toml (default: ./bigeast.toml if present)
    #[arg(long, env = "BIGEAST_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Compute odds analytically instead of sampling
    #[arg(long)]
    exact: bool,

    /// Also report title-odds sensitivity to a rating shift of this many points
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Run every prediction method, each from the same seed
    #[arg(long)]
    all_methods: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(method) = &cli.method {
        config.method = method.parse()?;
    }
    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.registry.is_some() {
        config.registry_path = cli.registry.clone();
    }
    config.validate()?;
    if let Some(points) = cli.sensitivity.filter(|p| !p.is_finite()) {
        return Err(ConfigError::InvalidValue {
            key: "--sensitivity",
            value: points.to_string(),
        }
        .into());
    }

    let registry = config.load_registry()?;
    let methods: Vec<PredictionMethod> = if cli.all_methods {
        PredictionMethod::ALL.to_vec()
    } else {
        vec![config.method]
    };

    for method in methods {
        let predictor = Predictor::with_params(method, config.params)?;
        let started = Instant::now();

        let report = if cli.exact {
            calculate_odds_exact(&registry, &predictor)
        } else {
            run_seeded(&registry, &predictor, config.trials, config.seed)?
        };
        tracing::info!(
            %method,
            trials = report.trials,
            seed = config.seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "finished"
        );

        match cli.format {
            OutputFormat::Table => println!("{}", render_table(&report)),
            OutputFormat::Csv => print!("{}", render_csv(&report)),
            OutputFormat::Json => println!("{}", render_json(&report)?),
        }

        if let Some(points) = cli.sensitivity {
            let deltas = all_team_deltas(&registry, &predictor, points);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&deltas)?),
                _ => println!("{}", render_deltas(&deltas, points)),
            }
        }
    }

    Ok(())
}
