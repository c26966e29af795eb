use thiserror::Error;

#[derive(Debug, Error)]
pub enum FitnessError {
    #[error(
        "scratch lattice of {requested_bytes} bytes exceeds the {ceiling_bytes}-byte memory ceiling"
    )]
    GridTooLarge {
        requested_bytes: u64,
        ceiling_bytes: u64,
    },

    #[error("coordinate buffers disagree in length: {backbone} backbone vs {sidechain} side-chain beads")]
    CoordinateMismatch { backbone: usize, sidechain: usize },

    #[error("deferred counting backend dropped a result channel: {0}")]
    BackendUnavailable(String),
}
