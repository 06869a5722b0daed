//! Domain model for the fantaroster team optimizer.
//!
//! This crate defines the types the optimizer searches over: [`Player`]
//! records grouped into a pool, the closed [`Role`] set, the [`Formation`]
//! quota table, relative [`ObjectiveWeights`], and the [`Roster`] genome with
//! its feasibility rules and bounded repair procedure. It also provides
//! [`OptimizerSeed`] so that every optimization run draws randomness from an
//! explicitly seeded generator.
//!
//! The pool is read-only input: players are validated upstream (at the
//! ingestion boundary) and never mutated here. A [`Roster`] stores pool
//! indices rather than owned players, so candidates stay cheap to clone
//! during evolution.

pub use self::{formation::*, player::*, role::*, roster::*, seed::*, weights::*};

pub mod formation;
pub mod player;
pub mod role;
pub mod roster;
pub mod seed;
pub mod weights;
