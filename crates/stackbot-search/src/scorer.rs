//! Linear cost of a candidate.
//!
//! The cost of a valid candidate is the dot product of its field's heuristic feature vector
//! with a weight vector:
//!
//! ```text
//! cost = w₁·f₁ + w₂·f₂ + ... + w₈·f₈
//! ```
//!
//! Every feature is "lower is better", so non-negative weights make the cost monotone in
//! each feature. An invalid candidate costs `f32::INFINITY`.

use std::{fmt, iter};

use serde::{Deserialize, Serialize};
use stackbot_engine::HeuristicFeature;

use crate::{candidate::Candidate, error::SearchError};

/// Weights for the heuristic features, in [`HeuristicFeature`] order.
///
/// The default is the operational model used when no other weights are configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector(Vec<f32>);

impl Default for WeightVector {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl From<Vec<f32>> for WeightVector {
    fn from(weights: Vec<f32>) -> Self {
        Self(weights)
    }
}

impl WeightVector {
    const DEFAULT: [f32; HeuristicFeature::LEN] = [
        0.51, // aggregate_height
        0.76, // holes
        0.18, // bumpiness
        0.10, // max_height
        0.12, // row_transitions
        0.25, // column_transitions
        0.08, // well_depth
        0.20, // hole_depth
    ];

    #[must_use]
    pub fn new(weights: Vec<f32>) -> Self {
        Self(weights)
    }

    /// All weights equal to 1, so the cost is the plain feature sum.
    #[must_use]
    pub fn unit() -> Self {
        Self(vec![1.0; HeuristicFeature::LEN])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        Self(self.0.iter().map(|w| w * factor).collect())
    }

    /// Checks that the vector has one finite weight per heuristic feature.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.0.len() != HeuristicFeature::LEN {
            return Err(SearchError::ConfigurationMismatch {
                expected: HeuristicFeature::LEN,
                actual: self.0.len(),
            });
        }
        if let Some(index) = self.0.iter().position(|w| !w.is_finite()) {
            return Err(SearchError::NonFiniteWeight { index });
        }
        Ok(())
    }
}

/// Assigns a cost to a candidate. Lower is better.
pub trait CandidateScorer: fmt::Debug + Send + Sync {
    fn score(&self, candidate: &Candidate) -> f32;
}

/// Scores candidates with a validated [`WeightVector`].
#[derive(Debug, Clone, Copy)]
pub struct LinearScorer<'a> {
    weights: &'a WeightVector,
}

impl<'a> LinearScorer<'a> {
    /// Fails with [`SearchError::ConfigurationMismatch`] if the weights do not match the
    /// feature vector length.
    pub fn new(weights: &'a WeightVector) -> Result<Self, SearchError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        self.weights
    }
}

impl CandidateScorer for LinearScorer<'_> {
    #[inline]
    fn score(&self, candidate: &Candidate) -> f32 {
        let Some(field) = candidate.field() else {
            return f32::INFINITY;
        };
        iter::zip(field.heuristics(), self.weights.as_slice())
            .map(|(f, w)| f * w)
            .sum()
    }
}

/// Scores a single candidate.
///
/// Invalid candidates score `f32::INFINITY` without looking at the weights.
pub fn score(candidate: &Candidate, weights: &WeightVector) -> Result<f32, SearchError> {
    if !candidate.is_valid() {
        return Ok(f32::INFINITY);
    }
    Ok(LinearScorer::new(weights)?.score(candidate))
}

/// A candidate together with its cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    candidate: Candidate,
    score: f32,
}

impl ScoredCandidate {
    #[must_use]
    pub fn new(candidate: Candidate, score: f32) -> Self {
        Self { candidate, score }
    }

    #[must_use]
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    #[must_use]
    pub fn score(&self) -> f32 {
        self.score
    }

    #[must_use]
    pub fn into_candidate(self) -> Candidate {
        self.candidate
    }
}
