use super::error::CommError;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// One message between two ranks.
#[derive(Debug, Clone)]
pub(crate) enum Frame {
    Bytes(Vec<u8>),
    Scalars(Vec<f64>),
}

/// An element type the mesh can carry. Implemented for `u8` (packed chains
/// and solutions) and `f64` (fitness values).
pub trait Payload: Copy + Send + 'static {
    fn into_frame(items: Vec<Self>) -> Frame;
    fn from_frame(frame: Frame) -> Result<Vec<Self>, CommError>;
}

impl Payload for u8 {
    fn into_frame(items: Vec<Self>) -> Frame {
        Frame::Bytes(items)
    }

    fn from_frame(frame: Frame) -> Result<Vec<Self>, CommError> {
        match frame {
            Frame::Bytes(items) => Ok(items),
            Frame::Scalars(_) => Err(CommError::FrameMismatch),
        }
    }
}

impl Payload for f64 {
    fn into_frame(items: Vec<Self>) -> Frame {
        Frame::Scalars(items)
    }

    fn from_frame(frame: Frame) -> Result<Vec<Self>, CommError> {
        match frame {
            Frame::Scalars(items) => Ok(items),
            Frame::Bytes(_) => Err(CommError::FrameMismatch),
        }
    }
}

/// Builder for a fully wired group of communicating ranks.
pub struct RankMesh;

impl RankMesh {
    /// Wires `size` ranks with one dedicated FIFO channel per ordered pair
    /// and returns the endpoints in rank order.
    ///
    /// Per-pair channels give MPI-like point-to-point semantics: a receive
    /// names its source, and traffic from different sources can never be
    /// observed out of order.
    pub fn build(size: usize) -> Vec<Endpoint> {
        let mut senders: Vec<Vec<Sender<Frame>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<Receiver<Frame>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();

        for from in 0..size {
            for to in 0..size {
                let (tx, rx) = unbounded();
                senders[from].push(tx);
                receivers[to].push(rx);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| Endpoint {
                rank,
                size,
                senders,
                receivers,
            })
            .collect()
    }
}

/// One rank's side of the mesh: senders indexed by destination, receivers
/// indexed by source.
pub struct Endpoint {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Frame>>,
    receivers: Vec<Receiver<Frame>>,
}

impl Endpoint {
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn send<T: Payload>(&self, to: usize, items: Vec<T>) -> Result<(), CommError> {
        self.senders[to]
            .send(T::into_frame(items))
            .map_err(|_| CommError::Disconnected { peer: to })
    }

    /// Blocks for the next frame from `from` and checks its element count.
    pub(crate) fn recv<T: Payload>(&self, from: usize, expected: usize) -> Result<Vec<T>, CommError> {
        let frame = self.receivers[from]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: from })?;
        let items = T::from_frame(frame)?;
        if items.len() != expected {
            return Err(CommError::SizeMismatch {
                expected,
                received: items.len(),
            });
        }
        Ok(items)
    }
}
