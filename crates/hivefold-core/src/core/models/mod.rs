//! Data models for the lattice protein: lattice coordinates, the movement
//! alphabet, and HP bead sequences.

pub mod movement;
pub mod point;
pub mod sequence;
