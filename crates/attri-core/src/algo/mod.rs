//! Sampling algorithms feeding embedding training.

/// Uniform random walks.
pub mod random_walk;

/// Degree-based negative sampling.
pub mod negative;
