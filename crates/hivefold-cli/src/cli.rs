use clap::Parser;
use hivefold::fitness::energy::ScorerBackend;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

fn parse_backend(value: &str) -> Result<ScorerBackend, String> {
    match value {
        "lattice" => Ok(ScorerBackend::Lattice),
        "threaded" => Ok(ScorerBackend::Threaded),
        "deferred" => Ok(ScorerBackend::Deferred),
        other => Err(format!(
            "unknown backend '{other}'; expected lattice, threaded or deferred"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "The hivefold developers",
    version,
    about = "hivefold - distributed Artificial-Bee-Colony search for low-energy 3D conformations of HP-model lattice proteins.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// The HP bead sequence to fold (e.g. "HHPPHHPH"). Falls back to the
    /// configuration file's `hp_chain` when omitted.
    #[arg(value_name = "SEQUENCE")]
    pub sequence: Option<String>,

    /// Number of search cycles to run.
    #[arg(short = 'n', long, value_name = "NUM")]
    pub cycles: Option<usize>,

    /// Path for the predicted-conformation output file.
    #[arg(short, long, value_name = "PATH", default_value = "output.txt")]
    pub output: PathBuf,

    /// Path to a TOML configuration file. Defaults to ./hivefold.toml when
    /// that file exists.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fitness-scoring backend.
    #[arg(long, value_name = "BACKEND", value_parser = parse_backend)]
    pub backend: Option<ScorerBackend>,

    /// Number of independent islands (hives).
    #[arg(long, value_name = "NUM")]
    pub islands: Option<usize>,

    /// Total number of cooperating ranks across all islands. Must be a
    /// multiple of the island count.
    #[arg(long, value_name = "NUM")]
    pub processes: Option<usize>,

    /// Fixed random seed for reproducible runs.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Set the number of threads for parallel scoring.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
