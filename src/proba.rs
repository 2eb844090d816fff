//! Component availability lookup.
//!
//! [`ProbabilityMap`] stores, for every component id, the probability that
//! the component is up. Lookups are signed: `get(i)` returns `P(i)` for a
//! positive literal and `1 - P(|i|)` for a negative one, so the pipelines
//! can multiply literal probabilities without branching on sign at every
//! call site. Internally two dense arrays indexed by `|i|` hold `P` and
//! `1 - P`; index 0 is reserved and never read.

use crate::error::RbdError;
use crate::types::NodeId;

/// Dense probability table for signed literal lookup.
#[derive(Debug, Clone)]
pub struct ProbabilityMap {
    pos: Vec<f64>,
    neg: Vec<f64>,
}

impl ProbabilityMap {
    /// Builds a map from `(id, probability)` pairs.
    ///
    /// Ids are 1-indexed; the arrays are sized to the largest id seen.
    /// Ids not covered by the input default to probability 0.
    ///
    /// # Panics
    ///
    /// Panics if an id is not positive. Supplying well-formed ids is the
    /// caller's contract; a non-positive id here is a bug, not an input
    /// error.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (NodeId, f64)>) -> Self {
        let pairs: Vec<(NodeId, f64)> = pairs.into_iter().collect();
        let max_id = pairs.iter().map(|&(id, _)| id).max().unwrap_or(0);
        assert!(
            pairs.iter().all(|&(id, _)| id > 0),
            "probability map ids must be >= 1"
        );

        let mut pos = vec![0.0; max_id as usize + 1];
        let mut neg = vec![1.0; max_id as usize + 1];
        for (id, p) in pairs {
            debug_assert!((0.0..=1.0).contains(&p), "probability out of [0, 1]: {}", p);
            pos[id as usize] = p;
            neg[id as usize] = 1.0 - p;
        }
        ProbabilityMap { pos, neg }
    }

    /// Builds a map where components `1..=max_id` all have probability `p`.
    pub fn from_uniform(max_id: NodeId, p: f64) -> Self {
        Self::from_pairs((1..=max_id).map(|id| (id, p)))
    }

    /// Largest component id this map covers.
    pub fn max_id(&self) -> usize {
        self.pos.len() - 1
    }

    /// Probability of a single literal: `P(|id|)` if positive, `1 - P(|id|)`
    /// if negative.
    ///
    /// # Panics
    ///
    /// Panics on `id == 0`; 0 is reserved and validated out of every term
    /// before lookups run.
    pub fn get(&self, id: NodeId) -> Result<f64, RbdError> {
        assert_ne!(id, 0, "node id 0 is reserved");
        let index = id.unsigned_abs() as usize;
        if index >= self.pos.len() {
            return Err(RbdError::OutOfRange {
                id,
                max: self.max_id(),
            });
        }
        Ok(if id > 0 {
            self.pos[index]
        } else {
            self.neg[index]
        })
    }

    /// Product of literal probabilities over a term (1.0 for the empty term).
    pub fn term_proba(&self, term: &[NodeId]) -> Result<f64, RbdError> {
        let mut product = 1.0;
        for &lit in term {
            product *= self.get(lit)?;
        }
        Ok(product)
    }
}
