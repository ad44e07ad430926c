//! `memsim`: sweep module counts and write the average access time series as CSV.

use clap::{Args, Parser, Subcommand};
use shared_memory_contention::config::{SimulationConfig, DEFAULT_MAX_CYCLES, DEFAULT_SEED};
use shared_memory_contention::convergence::DEFAULT_TOLERANCE;
use shared_memory_contention::driver::run_sweep;
use shared_memory_contention::error::SimError;
use shared_memory_contention::report::{series_file_name, write_detailed, write_series, write_series_file};
use shared_memory_contention::scheduler::PriorityPolicy;
use shared_memory_contention::workload::{RequestDistribution, DEFAULT_CLUSTER_STDEV};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "memsim",
    version,
    about = "Average memory access time vs. shared module count under contention"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sweep module counts 1..=N for one processor count and distribution
    Run(RunArgs),
    /// Sweep every processor count under both distributions, one CSV per combination
    Grid(GridArgs),
}

#[derive(Args)]
struct SweepArgs {
    /// Largest number of memory modules
    #[arg(short = 'm', long, default_value = "512")]
    modules: usize,

    /// Priority rotation policy
    #[arg(long, value_enum, default_value_t = PriorityPolicy::FirstDenied)]
    policy: PriorityPolicy,

    /// Random seed
    #[arg(short = 's', long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Cycle budget per module count
    #[arg(long, default_value_t = DEFAULT_MAX_CYCLES)]
    max_cycles: u64,

    /// Relative convergence tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Standard deviation of the clustered distribution, in modules
    #[arg(long, default_value_t = DEFAULT_CLUSTER_STDEV)]
    stdev: f64,

    /// Run module counts in parallel
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Number of processors
    #[arg(short = 'p', long)]
    procs: usize,

    /// Request distribution: u (uniform) or n (normal/clustered)
    #[arg(short = 'd', long, default_value = "u")]
    dist: RequestDistribution,

    /// Output file; stdout when omitted
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Write a header and per-run outcome columns
    #[arg(long)]
    detailed: bool,

    #[command(flatten)]
    sweep: SweepArgs,
}

#[derive(Args)]
struct GridArgs {
    /// Directory receiving `{uniform,normal}_{procs}.csv`
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Processor counts to sweep
    #[arg(short = 'p', long, value_delimiter = ',', default_value = "2,4,8,16,32,64")]
    procs: Vec<usize>,

    #[command(flatten)]
    sweep: SweepArgs,
}

impl SweepArgs {
    fn config(&self, processors: usize, distribution: RequestDistribution) -> SimulationConfig {
        SimulationConfig::new(processors, self.modules)
            .with_distribution(distribution)
            .with_policy(self.policy)
            .with_seed(self.seed)
            .with_max_cycles(self.max_cycles)
            .with_tolerance(self.tolerance)
            .with_clustered_stdev(self.stdev)
            .with_parallel(self.parallel)
    }
}

fn run(args: &RunArgs) -> Result<(), SimError> {
    let series = run_sweep(&args.sweep.config(args.procs, args.dist))?;
    match (&args.output, args.detailed) {
        (Some(path), false) => write_series_file(&series, path)?,
        (Some(path), true) => write_detailed(&series, io::BufWriter::new(std::fs::File::create(path)?))?,
        (None, false) => write_series(&series, io::stdout().lock())?,
        (None, true) => write_detailed(&series, io::stdout().lock())?,
    }
    Ok(())
}

fn grid(args: &GridArgs) -> Result<(), SimError> {
    std::fs::create_dir_all(&args.out_dir)?;
    for distribution in [RequestDistribution::Uniform, RequestDistribution::Clustered] {
        for &procs in &args.procs {
            let series = run_sweep(&args.sweep.config(procs, distribution))?;
            let path = args.out_dir.join(series_file_name(distribution, procs));
            write_series_file(&series, &path)?;
            info!(path = %path.display(), "wrote series");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Run(args) => run(args),
        Command::Grid(args) => grid(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
