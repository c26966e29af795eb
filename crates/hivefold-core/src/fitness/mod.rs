//! # Fitness Module
//!
//! Scoring kernels for candidate conformations: contact/collision measures
//! and the folding-energy combination.
//!
//! ## Overview
//!
//! A conformation is scored from its raw bead measures — six contact
//! sub-counts (H–H, P–P, H–P, backbone–backbone, H–backbone, P–backbone) plus
//! a collision count — combined with square-root damping, a collision penalty
//! and two gyration-ratio correction factors into a single fitness value.
//!
//! Measures can be produced by several interchangeable backends behind the
//! [`measures::MeasureBackend`] trait:
//!
//! - [`measures::LatticeMeasures`] — the O(n) spatial-hash backend, counting
//!   same-cell and axis-neighbor bead pairs on a scratch lattice grid.
//! - [`reference::ReferenceMeasures`] — the O(n²) brute-force reference the
//!   fast backends are validated against.
//! - [`threaded::ThreadedMeasures`] — fans the seven independent sub-counts
//!   across a thread pool, one private scratch grid per worker.
//! - [`deferred::DeferredMeasures`] — the asynchronous launch/fetch contract
//!   (the shape of an accelerator backend), with typed one-shot handles.
//!
//! The backend is selected once at configuration time through
//! [`energy::ScorerBackend`]; every caller depends only on
//! [`energy::FitnessKernel`].

pub mod deferred;
pub mod energy;
pub mod error;
pub mod gyration;
pub(crate) mod grid;
pub mod measures;
pub mod reference;
pub mod threaded;
