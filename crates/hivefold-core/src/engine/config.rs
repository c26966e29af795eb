use crate::fitness::energy::{EnergyWeights, ScorerBackend};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    #[error("island count ({islands}) cannot exceed the process count ({processes})")]
    IslandsExceedProcesses { islands: usize, processes: usize },

    #[error("island count ({islands}) must evenly divide the process count ({processes})")]
    IslandsDontDivideProcesses { islands: usize, processes: usize },
}

/// Immutable search parameters, consumed once at startup.
///
/// Defaults match the reference parameterization: a colony of 250 bees split
/// evenly between foragers and onlookers, 600 cycles, staleness limit 100,
/// one island.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub weights: EnergyWeights,
    pub colony_size: usize,
    pub forager_ratio: f64,
    pub idle_limit: u32,
    pub n_cycles: usize,
    pub islands: usize,
    pub processes: usize,
    pub seed: Option<u64>,
    pub backend: ScorerBackend,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Number of population slots per hive: ⌊colony_size × forager_ratio⌋.
    pub fn population_size(&self) -> usize {
        (self.colony_size as f64 * self.forager_ratio).floor() as usize
    }

    /// Number of onlooker visits distributed per cycle:
    /// colony_size − round(colony_size × forager_ratio).
    pub fn onlooker_count(&self) -> usize {
        self.colony_size - (self.colony_size as f64 * self.forager_ratio).round() as usize
    }

    /// Validates the island/process topology for a distributed run.
    pub fn validate_topology(&self) -> Result<(), ConfigError> {
        if self.islands > self.processes {
            return Err(ConfigError::IslandsExceedProcesses {
                islands: self.islands,
                processes: self.processes,
            });
        }
        if self.processes % self.islands != 0 {
            return Err(ConfigError::IslandsDontDivideProcesses {
                islands: self.islands,
                processes: self.processes,
            });
        }
        Ok(())
    }
}

pub struct SearchConfigBuilder {
    weights: EnergyWeights,
    colony_size: usize,
    forager_ratio: f64,
    idle_limit: u32,
    n_cycles: usize,
    islands: usize,
    processes: Option<usize>,
    seed: Option<u64>,
    backend: ScorerBackend,
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self {
            weights: EnergyWeights::default(),
            colony_size: 250,
            forager_ratio: 0.5,
            idle_limit: 100,
            n_cycles: 600,
            islands: 1,
            processes: None,
            seed: None,
            backend: ScorerBackend::Lattice,
        }
    }
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(mut self, weights: EnergyWeights) -> Self {
        self.weights = weights;
        self
    }
    pub fn colony_size(mut self, size: usize) -> Self {
        self.colony_size = size;
        self
    }
    pub fn forager_ratio(mut self, ratio: f64) -> Self {
        self.forager_ratio = ratio;
        self
    }
    pub fn idle_limit(mut self, limit: u32) -> Self {
        self.idle_limit = limit;
        self
    }
    pub fn n_cycles(mut self, cycles: usize) -> Self {
        self.n_cycles = cycles;
        self
    }
    pub fn islands(mut self, islands: usize) -> Self {
        self.islands = islands;
        self
    }
    pub fn processes(mut self, processes: usize) -> Self {
        self.processes = Some(processes);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn backend(mut self, backend: ScorerBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let config = SearchConfig {
            weights: self.weights,
            colony_size: self.colony_size,
            forager_ratio: self.forager_ratio,
            idle_limit: self.idle_limit,
            n_cycles: self.n_cycles,
            islands: self.islands,
            // One hive of one process unless told otherwise.
            processes: self.processes.unwrap_or(self.islands),
            seed: self.seed,
            backend: self.backend,
        };

        if !(config.forager_ratio > 0.0 && config.forager_ratio < 1.0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "forager_ratio",
                reason: format!("{} is not within (0, 1)", config.forager_ratio),
            });
        }
        if config.population_size() < 2 {
            return Err(ConfigError::InvalidParameter {
                parameter: "colony_size",
                reason: format!(
                    "colony of {} at ratio {} yields fewer than 2 population slots",
                    config.colony_size, config.forager_ratio
                ),
            });
        }
        if config.n_cycles == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "n_cycles",
                reason: "at least one cycle is required".into(),
            });
        }
        if config.islands == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "islands",
                reason: "at least one island is required".into(),
            });
        }
        config.validate_topology()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_parameterization() {
        let config = SearchConfig::builder().build().unwrap();
        assert_eq!(config.colony_size, 250);
        assert_eq!(config.forager_ratio, 0.5);
        assert_eq!(config.idle_limit, 100);
        assert_eq!(config.n_cycles, 600);
        assert_eq!(config.islands, 1);
        assert_eq!(config.processes, 1);
        assert_eq!(config.population_size(), 125);
        assert_eq!(config.onlooker_count(), 125);
    }

    #[test]
    fn population_size_floors_and_onlookers_round() {
        let config = SearchConfig::builder()
            .colony_size(5)
            .forager_ratio(0.5)
            .build()
            .unwrap();
        assert_eq!(config.population_size(), 2);
        assert_eq!(config.onlooker_count(), 3);
    }

    #[test]
    fn rejects_degenerate_populations() {
        let err = SearchConfig::builder()
            .colony_size(2)
            .forager_ratio(0.5)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
    }

    #[test]
    fn rejects_more_islands_than_processes() {
        let err = SearchConfig::builder()
            .islands(4)
            .processes(2)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::IslandsExceedProcesses {
                islands: 4,
                processes: 2
            }
        );
    }

    #[test]
    fn rejects_islands_that_do_not_divide_processes() {
        let err = SearchConfig::builder()
            .islands(2)
            .processes(5)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::IslandsDontDivideProcesses {
                islands: 2,
                processes: 5
            }
        );
    }
}
