//! # Engine Module
//!
//! The stateful logic core of the ABC search: population state, the
//! forager/onlooker/scout cycle, batch fitness evaluation, and inter-island
//! migration.
//!
//! ## Overview
//!
//! A [`hive::Hive`] owns one population of candidate [`solution::Solution`]s
//! and advances it one cycle at a time. Every phase prices its batch of
//! perturbed or replacement candidates through a
//! [`evaluator::BatchEvaluator`], which is either in-process
//! ([`evaluator::LocalEvaluator`]) or fanned across a group of cooperating
//! ranks ([`evaluator::DistributedEvaluator`]) — the hive never knows which.
//! In island mode a [`migration::MigrationRing`] periodically exchanges
//! solutions between hives and gathers every island's best at the end.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - search parameters, energy weights,
//!   topology validation, and the builder
//! - **Candidate State** ([`solution`]) - movement chain, cached fitness,
//!   staleness, and the wire form
//! - **Evaluation** ([`evaluator`]) - batch pricing, local and distributed
//! - **Population** ([`hive`]) - the three-phase search cycle
//! - **Migration** ([`migration`]) - ring exchange and the final gather
//! - **Progress Monitoring** ([`progress`]) - callback-based reporting
//! - **Error Handling** ([`error`]) - engine-specific error types

pub mod config;
pub mod error;
pub mod evaluator;
pub mod hive;
pub mod migration;
pub mod progress;
pub mod solution;
