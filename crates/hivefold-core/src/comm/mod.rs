//! # Collective Communication Module
//!
//! Tree-structured scatter/gather and ring point-to-point exchange over a
//! fixed ordered set of cooperating ranks.
//!
//! ## Overview
//!
//! A [`mesh::RankMesh`] wires `comm_size` ranks with one dedicated FIFO
//! channel per ordered rank pair; each rank holds an [`mesh::Endpoint`]. The
//! collectives follow a binomial-tree pattern: scatter halves a "control"
//! stride from the smallest power of two ≥ `comm_size` down to 1, forwarding
//! the upper half of each rank's span to its partner; gather runs the exact
//! inverse. Ring operations connect the ranks in a cycle with an even/odd
//! send-first ordering that avoids deadlock on synchronous transports.
//!
//! All participants must call matching operations in lockstep; a dropped
//! peer or a frame of unexpected size is a fatal [`error::CommError`], never
//! recovered mid-operation.

pub mod error;
pub mod mesh;
mod ring;
mod tree;
