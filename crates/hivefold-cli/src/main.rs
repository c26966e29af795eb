mod cli;
mod config;
mod error;
mod logging;
mod output;
mod progress;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use hivefold::core::models::sequence::HpSequence;
use hivefold::engine::progress::ProgressReporter;
use hivefold::workflows::predict;
use indicatif::ProgressBar;
use std::time::Instant;
use tracing::{debug, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("hivefold v{} starting up", env!("CARGO_PKG_VERSION"));
    debug!("full CLI arguments parsed: {:?}", &cli);

    let file_config = config::FileConfig::load_or_default(cli.config.as_deref())?;
    let search_config = config::build_search_config(&cli, &file_config)?;

    // Validation happens before any search work; failures exit non-zero
    // with a diagnostic and produce no partial results.
    let sequence = HpSequence::parse(&config::resolve_sequence(&cli, &file_config)?)?;

    if let Some(num_threads) = cli.threads {
        info!("setting the scoring thread pool to {num_threads} threads");
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("failed to build global thread pool: {e}"))
            })?;
    }

    let reporter = if cli.quiet {
        ProgressReporter::new()
    } else {
        progress::cycle_bar_reporter(ProgressBar::new(search_config.n_cycles as u64))
    };

    let started = Instant::now();
    let prediction = if search_config.processes > 1 {
        predict::run_distributed(&sequence, &search_config, &reporter)?
    } else {
        predict::run(&sequence, &search_config, &reporter)?
    };
    let wall_time = started.elapsed().as_secs_f64();

    println!("Fitness: {:.6}", prediction.fitness);
    println!("Hcontacts: {}", prediction.h_contacts);
    println!("Collisions: {}", prediction.collisions);
    println!("BBGyration: {:.6}", prediction.bb_gyration);
    println!("Wall_Time: {wall_time:.6}");

    output::write_conformation(&cli.output, &prediction.chain, &sequence)?;
    Ok(())
}
