use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use evppi::config::config_to_yaml;
use evppi::{
    ResultsDocument, format_evppi_table, format_outcome_table, init_logging, load_config,
    run_with_progress_log,
};
use evppi_core::estimate_evppi;
use evppi_core::smoothing::{BinnedMeans, PenalizedSpline, SmootherConfig};

#[derive(Parser, Debug)]
#[command(name = "evppi")]
#[command(about = "Per-parameter EVPPI for a PM2.5 health-burden model")]
struct Args {
    /// YAML run configuration (default: built-in example)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of Monte Carlo draws (overrides the configuration)
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Base random seed (overrides the configuration)
    #[arg(long)]
    seed: Option<u64>,

    /// Smoother used for the regressions, with default settings
    #[arg(long, value_enum)]
    smoother: Option<SmootherChoice>,

    /// Write a YAML results document to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to `evppi.log` in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Worker threads for sampling and estimation (default: all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SmootherChoice {
    Pspline,
    Binned,
}

impl From<SmootherChoice> for SmootherConfig {
    fn from(choice: SmootherChoice) -> Self {
        match choice {
            SmootherChoice::Pspline => SmootherConfig::PenalizedSpline(PenalizedSpline::default()),
            SmootherChoice::Binned => SmootherConfig::BinnedMeans(BinnedMeans::default()),
        }
    }
}

fn configure_threads(threads: Option<usize>) -> color_eyre::Result<()> {
    #[cfg(feature = "parallel")]
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()?;
        tracing::debug!(threads = n, "Configured worker pool");
    }
    #[cfg(not(feature = "parallel"))]
    if threads.is_some() {
        tracing::warn!("Built without the parallel feature; --threads is ignored");
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let _log_guard = init_logging(args.log_dir.as_deref(), &args.log_level)?;
    configure_threads(args.threads)?;

    let mut config = load_config(args.config.as_deref())?;
    if let Some(n) = args.samples {
        config.n_samples = n;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(choice) = args.smoother {
        config.smoother = choice.into();
    }

    if args.print_config {
        print!("{}", config_to_yaml(&config)?);
        return Ok(());
    }

    config.validate()?;
    tracing::info!(
        n_samples = config.n_samples,
        seed = config.seed,
        smoother = config.smoother.name(),
        "Starting run"
    );

    let result = run_with_progress_log(&config)?;
    let evppi = estimate_evppi(&result, &config.smoother);

    println!("{}", format_outcome_table(&result.outcome_summaries()));
    print!("{}", format_evppi_table(&evppi));

    if let Some(path) = args.output {
        ResultsDocument::new(&config, &result, &evppi).write(&path)?;
        tracing::info!(path = %path.display(), "Wrote results");
    }

    if !evppi.is_complete() {
        tracing::warn!(
            failed = evppi.errors().count(),
            "Some EVPPI cells could not be estimated"
        );
    }
    Ok(())
}
