//! # Core Module
//!
//! Stateless foundation types for the lattice protein model: integer lattice
//! coordinates, the relative-movement alphabet, validated HP bead sequences,
//! and the deterministic reconstruction of 3D coordinates from a movement
//! chain.

pub mod geometry;
pub mod models;
