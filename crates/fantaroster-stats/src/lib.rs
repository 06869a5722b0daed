//! Small statistics helpers for the roster optimizer.
//!
//! The optimizer normalizes every objective within the current population
//! (min–max scaling) and reports per-generation fitness distributions while
//! evolving. Both of those only need a handful of descriptive measures, which
//! this crate provides without any external dependencies.

pub use self::descriptive::SampleStats;

pub mod descriptive;
