use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("rank {peer} disconnected during a collective operation")]
    Disconnected { peer: usize },

    #[error("message size mismatch: expected {expected} elements, received {received}")]
    SizeMismatch { expected: usize, received: usize },

    #[error("received a frame of the wrong payload type")]
    FrameMismatch,

    #[error("local buffer holds {len} elements but the operation spans {needed}")]
    BufferTooSmall { needed: usize, len: usize },
}
