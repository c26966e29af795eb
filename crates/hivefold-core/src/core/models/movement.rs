use rand::Rng;
use thiserror::Error;

/// One relative turn of the chain, drawn from the five-direction alphabet.
///
/// Turns are interpreted against the predecessor displacement of the bead
/// being placed; see [`crate::core::geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Turn {
    Straight = 0,
    Left = 1,
    Right = 2,
    Up = 3,
    Down = 4,
}

impl Turn {
    /// Number of turns in the alphabet.
    pub const COUNT: u8 = 5;

    fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Turn::Straight),
            1 => Some(Turn::Left),
            2 => Some(Turn::Right),
            3 => Some(Turn::Up),
            4 => Some(Turn::Down),
            _ => None,
        }
    }

    /// Single-letter display form (`F`, `L`, `R`, `U`, `D`).
    pub fn letter(self) -> char {
        match self {
            Turn::Straight => 'F',
            Turn::Left => 'L',
            Turn::Right => 'R',
            Turn::Up => 'U',
            Turn::Down => 'D',
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MovementError {
    #[error("movement byte {0:#04x} is outside the encodable range [0, 24]")]
    InvalidByte(u8),

    #[error("packed movement data is truncated at {0} bytes")]
    Truncated(usize),
}

/// One element of a movement chain: a backbone turn paired with a side-chain
/// turn.
///
/// Every pair maps bijectively onto an index in `[0, 24]`
/// (`backbone * 5 + side_chain`). The index defines the total order used for
/// perturbation distances and is the one-byte wire encoding of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovePair {
    pub backbone: Turn,
    pub side_chain: Turn,
}

impl MovePair {
    /// Number of distinct movement pairs.
    pub const COUNT: u8 = Turn::COUNT * Turn::COUNT;

    pub fn new(backbone: Turn, side_chain: Turn) -> Self {
        Self {
            backbone,
            side_chain,
        }
    }

    /// Position of this pair in the total order over the movement alphabet.
    pub fn index(self) -> u8 {
        self.backbone as u8 * Turn::COUNT + self.side_chain as u8
    }

    /// Inverse of [`MovePair::index`].
    pub fn from_index(index: u8) -> Result<Self, MovementError> {
        if index >= Self::COUNT {
            return Err(MovementError::InvalidByte(index));
        }
        // Both quotient and remainder are < Turn::COUNT here.
        let backbone = Turn::from_index(index / Turn::COUNT).ok_or(MovementError::InvalidByte(index))?;
        let side_chain = Turn::from_index(index % Turn::COUNT).ok_or(MovementError::InvalidByte(index))?;
        Ok(Self {
            backbone,
            side_chain,
        })
    }

    /// Returns a uniformly random movement pair.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let index = rng.gen_range(0..Self::COUNT);
        Self::from_index(index).unwrap_or(Self {
            backbone: Turn::Straight,
            side_chain: Turn::Straight,
        })
    }
}

/// An ordered sequence of movement pairs: the sole mutable genome of a
/// candidate conformation.
///
/// A protein of `hp_size` beads is described by `hp_size - 1` movement pairs;
/// 3D coordinates are derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveChain {
    pairs: Vec<MovePair>,
}

impl MoveChain {
    pub fn new(pairs: Vec<MovePair>) -> Self {
        Self { pairs }
    }

    /// Returns a chain of `len` uniformly random movement pairs.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            pairs: (0..len).map(|_| MovePair::random(rng)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[MovePair] {
        &self.pairs
    }

    pub fn get(&self, position: usize) -> Option<MovePair> {
        self.pairs.get(position).copied()
    }

    pub fn set(&mut self, position: usize, pair: MovePair) {
        self.pairs[position] = pair;
    }

    /// Encodes the chain as one index byte per movement pair.
    pub fn encode(&self, out: &mut [u8]) {
        for (slot, pair) in out.iter_mut().zip(&self.pairs) {
            *slot = pair.index();
        }
    }

    /// Decodes a chain from its one-byte-per-pair wire form.
    pub fn decode(bytes: &[u8]) -> Result<Self, MovementError> {
        let pairs = bytes
            .iter()
            .map(|&b| MovePair::from_index(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pairs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn index_round_trips_over_the_whole_alphabet() {
        for index in 0..MovePair::COUNT {
            let pair = MovePair::from_index(index).unwrap();
            assert_eq!(pair.index(), index);
        }
    }

    #[test]
    fn index_order_matches_backbone_major_layout() {
        let pair = MovePair::new(Turn::Right, Turn::Down);
        assert_eq!(pair.index(), 2 * 5 + 4);
    }

    #[test]
    fn from_index_rejects_out_of_range_bytes() {
        assert_eq!(
            MovePair::from_index(25),
            Err(MovementError::InvalidByte(25))
        );
        assert_eq!(
            MovePair::from_index(0xFE),
            Err(MovementError::InvalidByte(0xFE))
        );
    }

    #[test]
    fn random_pairs_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(MovePair::random(&mut rng).index() < MovePair::COUNT);
        }
    }

    #[test]
    fn chain_encode_decode_round_trips() {
        let mut rng = StdRng::seed_from_u64(11);
        let chain = MoveChain::random(9, &mut rng);
        let mut bytes = vec![0u8; chain.len()];
        chain.encode(&mut bytes);
        assert_eq!(MoveChain::decode(&bytes).unwrap(), chain);
    }

    #[test]
    fn chain_decode_rejects_sentinel_bytes() {
        assert!(MoveChain::decode(&[0, 3, 0xFF]).is_err());
    }
}
