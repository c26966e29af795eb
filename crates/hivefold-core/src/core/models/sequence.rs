use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Classification of one monomer unit of the modeled protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeadType {
    Hydrophobic,
    Polar,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("HP sequence must not be empty")]
    Empty,

    #[error("HP sequence must contain at least 2 beads, got {0}")]
    TooShort(usize),

    #[error("unrecognized symbol '{symbol}' at position {position}; only 'H' and 'P' are allowed")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("HP sequence must contain at least one hydrophobic ('H') bead")]
    NoHydrophobic,
}

/// An immutable, validated HP bead-type sequence.
///
/// Fixed for the whole run; used only to classify beads when scoring. A valid
/// sequence is non-empty, contains only `H` and `P` symbols, and has at least
/// one hydrophobic bead. Sequences of a single bead are rejected as well,
/// since they admit no movement chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HpSequence {
    beads: Vec<BeadType>,
}

impl HpSequence {
    pub fn parse(text: &str) -> Result<Self, SequenceError> {
        if text.is_empty() {
            return Err(SequenceError::Empty);
        }

        let mut beads = Vec::with_capacity(text.len());
        for (position, symbol) in text.chars().enumerate() {
            match symbol {
                'H' => beads.push(BeadType::Hydrophobic),
                'P' => beads.push(BeadType::Polar),
                _ => return Err(SequenceError::InvalidSymbol { symbol, position }),
            }
        }

        if beads.len() < 2 {
            return Err(SequenceError::TooShort(beads.len()));
        }
        if !beads.contains(&BeadType::Hydrophobic) {
            return Err(SequenceError::NoHydrophobic);
        }

        Ok(Self { beads })
    }

    /// Number of chain positions (`hp_size`).
    pub fn len(&self) -> usize {
        self.beads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beads.is_empty()
    }

    /// Length of the movement chain describing this protein.
    pub fn chain_len(&self) -> usize {
        self.beads.len() - 1
    }

    pub fn bead(&self, index: usize) -> BeadType {
        self.beads[index]
    }

    pub fn beads(&self) -> &[BeadType] {
        &self.beads
    }

    pub fn hydrophobic_count(&self) -> usize {
        self.beads
            .iter()
            .filter(|&&b| b == BeadType::Hydrophobic)
            .count()
    }

    pub fn polar_count(&self) -> usize {
        self.beads.len() - self.hydrophobic_count()
    }
}

impl FromStr for HpSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HpSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bead in &self.beads {
            match bead {
                BeadType::Hydrophobic => write!(f, "H")?,
                BeadType::Polar => write!(f, "P")?,
            }
        }
        Ok(())
    }
}
