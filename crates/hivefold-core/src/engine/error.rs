use thiserror::Error;

use crate::comm::error::CommError;
use crate::core::models::movement::MovementError;
use crate::core::models::sequence::SequenceError;
use crate::engine::config::ConfigError;
use crate::fitness::error::FitnessError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid HP sequence: {0}")]
    Sequence(#[from] SequenceError),

    #[error("fitness evaluation failed: {0}")]
    Fitness(#[from] FitnessError),

    #[error("collective communication failed: {0}")]
    Comm(#[from] CommError),

    #[error("malformed movement data on the wire: {0}")]
    Movement(#[from] MovementError),

    #[error("internal logic error: {0}")]
    Internal(String),
}
