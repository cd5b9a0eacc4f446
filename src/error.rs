// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for melody generation.
//!
//! Malformed musical input never produces an error; it is logged and
//! degraded. These variants signal broken invariants inside the pipeline.

use thiserror::Error;

/// Generation pipeline errors
#[derive(Debug, Error, PartialEq)]
pub enum MelodyError {
    /// Weighted choice over nothing
    #[error("Cannot choose from an empty candidate set")]
    EmptyCandidates,

    /// Candidates and weights disagree in length
    #[error("Candidate/weight length mismatch: {candidates} candidates, {weights} weights")]
    WeightMismatch { candidates: usize, weights: usize },

    /// Weights sum to zero, a negative value or NaN
    #[error("Weights do not form a distribution (total {0})")]
    DegenerateWeights(f64),
}

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, MelodyError>;
