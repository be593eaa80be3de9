//! Search configuration and weight model files.
//!
//! [`SearchConfig`] decides which weights each search call uses. [`WeightModel`] is the
//! on-disk form of a trained weight vector, keyed by feature id so that files stay readable
//! and survive reordering.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackbot_engine::HeuristicFeature;

use crate::{error::SearchError, scorer::WeightVector};

/// How a [`MoveSearcher`](crate::MoveSearcher) is driven.
///
/// Every field has a default, so `{}` is a valid configuration file.
///
/// # Example
///
/// ```
/// use stackbot_search::SearchConfig;
///
/// let config: SearchConfig = serde_json::from_str(r#"{ "num_threads": 2 }"#).unwrap();
/// assert_eq!(config.num_threads, 2);
/// assert!(config.use_weighted_scoring);
/// assert!(!config.training_mode);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Score with weights. When off, every feature counts once.
    pub use_weighted_scoring: bool,
    /// Require the caller to pass weights on every call, as a trainer does.
    pub training_mode: bool,
    /// Weights for operational play.
    pub fixed_weight_vector: WeightVector,
    /// Worker pool size.
    pub num_threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_weighted_scoring: true,
            training_mode: false,
            fixed_weight_vector: WeightVector::default(),
            num_threads: 4,
        }
    }
}

impl SearchConfig {
    /// Picks the weights for one search call.
    ///
    /// - weighted scoring off: unit weights, `per_call` is ignored
    /// - training mode: `per_call`, which must be present
    /// - otherwise: the fixed weight vector
    ///
    /// The result is validated against the feature vector length.
    pub fn weights_for_call<'a>(
        &'a self,
        per_call: Option<&'a WeightVector>,
    ) -> Result<Cow<'a, WeightVector>, SearchError> {
        let weights = if !self.use_weighted_scoring {
            Cow::Owned(WeightVector::unit())
        } else if self.training_mode {
            Cow::Borrowed(per_call.ok_or(SearchError::MissingTrainingWeights)?)
        } else {
            Cow::Borrowed(&self.fixed_weight_vector)
        };
        weights.validate()?;
        Ok(weights)
    }
}

/// Failure converting a [`WeightModel`] into a [`WeightVector`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WeightModelError {
    #[display("unknown feature id `{id}` in weight model")]
    UnknownFeature { id: String },
    #[display("feature `{id}` appears more than once in weight model")]
    DuplicateFeature { id: String },
    #[display("weight model has no weight for feature `{id}`")]
    MissingFeature { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub features: Vec<FeatureWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub id: String,
    pub weight: f32,
}

impl WeightModel {
    /// Wraps a positional weight vector, naming each entry by its feature id.
    ///
    /// Fails if `weights` does not pass [`WeightVector::validate`].
    pub fn from_weights(
        name: impl Into<String>,
        weights: &WeightVector,
    ) -> Result<Self, SearchError> {
        weights.validate()?;
        let features = HeuristicFeature::ALL
            .iter()
            .zip(weights.as_slice())
            .map(|(feature, &weight)| FeatureWeight {
                id: feature.id(),
                weight,
            })
            .collect();
        Ok(Self {
            name: name.into(),
            trained_at: Utc::now(),
            features,
        })
    }

    /// Arranges the weights in feature-vector order.
    pub fn to_weight_vector(&self) -> Result<WeightVector, WeightModelError> {
        let mut weights = [None; HeuristicFeature::LEN];
        for fw in &self.features {
            let feature = HeuristicFeature::from_id(&fw.id).ok_or_else(|| {
                WeightModelError::UnknownFeature { id: fw.id.clone() }
            })?;
            let slot = &mut weights[feature.index()];
            if slot.is_some() {
                return Err(WeightModelError::DuplicateFeature { id: fw.id.clone() });
            }
            *slot = Some(fw.weight);
        }
        HeuristicFeature::ALL
            .iter()
            .zip(weights)
            .map(|(feature, weight)| {
                weight.ok_or_else(|| WeightModelError::MissingFeature { id: feature.id() })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(WeightVector::new)
    }
}
