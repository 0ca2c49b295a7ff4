//! Contagion CLI - simulate SIR epidemics and compare them against country data.

mod output;
mod source;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use contagion_core::data::{CountryTable, DataSource};
use contagion_core::fit::{self, GridSearch};
use contagion_core::model::{Scenario, SirParameters, SirState};
use contagion_core::{plot, simulate};

use source::CsvSource;

#[derive(Parser)]
#[command(name = "contagion")]
#[command(version, about = "SIR epidemic simulator with per-country case data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulation and write the S/I/R curves as CSV
    Simulate(SimulateArgs),

    /// Fit β and γ to an observed case series by grid search
    Fit(FitArgs),

    /// List the countries with built-in data
    Countries,
}

#[derive(Args)]
struct SimulateArgs {
    /// Country whose β, population, and current cases seed the run
    #[arg(short, long)]
    country: Option<String>,

    /// Transmission rate β (ignored when --country is given)
    #[arg(long, default_value_t = 0.5)]
    beta: f64,

    /// Recovery rate γ
    #[arg(long, default_value_t = 0.25)]
    gamma: f64,

    /// Population size N (ignored when --country is given)
    #[arg(long, default_value_t = 10_000.0)]
    population: f64,

    /// Initially infected individuals (ignored when --country is given)
    #[arg(long, default_value_t = 1.0)]
    infected: f64,

    /// Percentage of the population immune before the outbreak
    #[arg(long, default_value_t = 0.0)]
    immune_percent: f64,

    /// Simulation horizon in days
    #[arg(long, default_value_t = 160.0)]
    t_end: f64,

    /// Step size in days
    #[arg(long, default_value_t = 1.0)]
    dt: f64,

    /// Display window start in days (defaults to 0)
    #[arg(long)]
    from: Option<f64>,

    /// Display window end in days (defaults to the last recorded day)
    #[arg(long)]
    to: Option<f64>,

    /// Output CSV path
    #[arg(short, long, default_value = "trajectory.csv")]
    output: PathBuf,
}

#[derive(Args)]
struct FitArgs {
    /// CSV file of day,cases observations
    observed: PathBuf,

    /// Region label for the series
    #[arg(long, default_value = "observed")]
    region: String,

    /// Population size N
    #[arg(long, default_value_t = 10_000.0)]
    population: f64,

    /// Initially infected individuals
    #[arg(long, default_value_t = 1.0)]
    infected: f64,

    /// β search range
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"], default_values_t = [0.05, 0.6])]
    beta_range: Vec<f64>,

    /// γ search range
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"], default_values_t = [0.02, 0.5])]
    gamma_range: Vec<f64>,

    /// Lattice points per axis
    #[arg(long, default_value_t = 25)]
    samples: usize,

    /// Step size in days
    #[arg(long, default_value_t = 1.0)]
    dt: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    match cli.command {
        Commands::Simulate(args) => simulate_command(args),
        Commands::Fit(args) => fit_command(args),
        Commands::Countries => countries_command(),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn simulate_command(args: SimulateArgs) -> Result<()> {
    let (params, initial) = match &args.country {
        Some(name) => {
            let record = CountryTable::lookup(name)?;
            let scenario = Scenario::for_country(record, args.gamma)?;
            info!(
                "{}: beta={}, population={}, current cases={}",
                record.name, record.beta, record.population, record.current_cases
            );
            (scenario.params, scenario.initial)
        }
        None => (
            SirParameters::new(args.beta, args.gamma, args.population)?,
            SirState::outbreak(args.population, args.infected),
        ),
    };
    let initial = initial.with_innate_immune_percent(args.immune_percent)?;

    let trajectory = simulate::run(initial, &params, args.t_end, args.dt)?;
    let start = args.from.unwrap_or(0.0);
    let end = args.to.unwrap_or_else(|| trajectory.end_time());
    let series = plot::curves(&trajectory, start, end)?;
    output::write_series(&args.output, &series)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "simulated {} days in {} steps; wrote window [{start}, {end}] to {}",
        trajectory.end_time(),
        trajectory.len() - 1,
        args.output.display()
    );
    Ok(())
}

fn fit_command(args: FitArgs) -> Result<()> {
    let observed = CsvSource::new(&args.observed).observed(&args.region)?;
    info!(
        "loaded {} observations for {} (day 0 to {})",
        observed.len(),
        observed.region(),
        observed.last_day()
    );

    let initial = SirState::outbreak(args.population, args.infected);
    let search = GridSearch {
        beta: (args.beta_range[0], args.beta_range[1]),
        gamma: (args.gamma_range[0], args.gamma_range[1]),
        samples: args.samples,
    };
    let result = fit::fit(&search, initial, &observed, args.dt)?;
    println!(
        "best fit: beta={:.4} gamma={:.4} (sse={:.3e})",
        result.params.beta, result.params.gamma, result.sse
    );
    Ok(())
}

fn countries_command() -> Result<()> {
    for record in CountryTable::all() {
        println!(
            "{:<16} beta={:<7} population={:<12} current cases={}",
            record.name, record.beta, record.population, record.current_cases
        );
    }
    Ok(())
}
