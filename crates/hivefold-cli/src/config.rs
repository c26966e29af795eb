use crate::cli::Cli;
use crate::error::{CliError, Result};
use hivefold::engine::config::SearchConfig;
use hivefold::fitness::energy::{EnergyWeights, ScorerBackend};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "hivefold.toml";

/// The on-disk configuration model. Every field is optional; command-line
/// flags override whatever the file provides.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub hp_chain: Option<String>,
    pub colony_size: Option<usize>,
    pub forager_ratio: Option<f64>,
    pub idle_limit: Option<u32>,
    pub n_cycles: Option<usize>,
    pub islands: Option<usize>,
    pub processes: Option<usize>,
    pub seed: Option<u64>,
    pub backend: Option<ScorerBackend>,
    #[serde(default)]
    pub energy: EnergyWeights,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e),
        })?;
        debug!(path = %path.display(), "configuration file loaded");
        Ok(config)
    }

    /// Loads the explicit config file, or the default one when present, or
    /// an empty configuration.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    info!("using configuration file {DEFAULT_CONFIG_FILE}");
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Merges the configuration file under the command-line flags into the
/// engine's search configuration.
pub fn build_search_config(cli: &Cli, file: &FileConfig) -> Result<SearchConfig> {
    let mut builder = SearchConfig::builder().weights(file.energy);

    if let Some(colony_size) = file.colony_size {
        builder = builder.colony_size(colony_size);
    }
    if let Some(forager_ratio) = file.forager_ratio {
        builder = builder.forager_ratio(forager_ratio);
    }
    if let Some(idle_limit) = file.idle_limit {
        builder = builder.idle_limit(idle_limit);
    }
    if let Some(n_cycles) = cli.cycles.or(file.n_cycles) {
        builder = builder.n_cycles(n_cycles);
    }
    if let Some(islands) = cli.islands.or(file.islands) {
        builder = builder.islands(islands);
    }
    if let Some(processes) = cli.processes.or(file.processes) {
        builder = builder.processes(processes);
    }
    if let Some(backend) = cli.backend.or(file.backend) {
        builder = builder.backend(backend);
    }

    builder = builder.seed(cli.seed.or(file.seed));

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// The sequence to fold: the positional argument, or the file's `hp_chain`.
pub fn resolve_sequence(cli: &Cli, file: &FileConfig) -> Result<String> {
    cli.sequence
        .clone()
        .or_else(|| file.hp_chain.clone())
        .ok_or_else(|| {
            CliError::Config(
                "no HP sequence given: pass one as an argument or set `hp_chain` in the configuration file"
                    .into(),
            )
        })
}
