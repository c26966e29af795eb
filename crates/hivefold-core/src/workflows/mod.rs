//! # Workflows Module
//!
//! The public, user-facing layer: complete prediction runs that wire the
//! engine, fitness and communication layers together.

pub mod predict;
