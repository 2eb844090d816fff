//! Core data model: signed node ids, terms, and term lists.
//!
//! A component is identified by a positive integer id (1-indexed, 0 is
//! reserved). A signed id is a *literal*: `+i` asserts "component `i` is
//! up", `-i` asserts "component `i` is down". A [`Term`] is a conjunction
//! of literals; a term list is a disjunction of terms. Order inside a term
//! is insertion order and carries no probabilistic meaning; order of terms
//! in a list matters, because every pipeline selects the front term as its
//! pivot.

use std::collections::BTreeMap;

use crate::error::RbdError;

/// A signed component id. Positive means "up", negative means "down".
///
/// # Invariants
///
/// - The magnitude is a 1-indexed component id; 0 never appears in a term.
/// - A term never contains both `+i` and `-i`.
pub type NodeId = i32;

/// A conjunction of literals, e.g. `[1, 3, -2]` for "1 up, 3 up, 2 down".
pub type Term = Vec<NodeId>;

/// Minimal path sets: each term connects source and destination when all
/// its components are up. Callers supply positive literals only.
pub type PathSets = Vec<Term>;

/// Minimal cut sets: each term disconnects source and destination when all
/// its components are down. Callers supply positive literals only.
pub type MinCutSets = Vec<Term>;

/// Mutually exclusive terms whose probabilities may be summed directly.
pub type ProbaSets = Vec<Term>;

/// Terms emitted by one disjointing step, pairwise disjoint from the pivot.
pub type DisjointSets = Vec<Term>;

/// A `(source, destination)` pair of component ids.
pub type NodePair = (NodeId, NodeId);

/// The pairs of a topology, in evaluation order.
pub type NodePairs = Vec<NodePair>;

/// One evaluated pair: `(source, destination, availability)`.
pub type AvailTriple = (NodeId, NodeId, f64);

/// Per-iteration diagnostics of the disjointing loop:
/// iteration index to (accumulated probability-set size, elapsed seconds).
pub type DebugInfo = BTreeMap<usize, (usize, f64)>;

/// Checks that a term contains no zero literal and no contradictory pair.
pub fn validate_term(term: &[NodeId]) -> Result<(), RbdError> {
    for &lit in term {
        if lit == 0 {
            return Err(RbdError::ZeroLiteral);
        }
        if term.contains(&-lit) {
            return Err(RbdError::Contradiction { id: lit.abs() });
        }
    }
    Ok(())
}

/// Validates every term of a list. Pipelines call this once, up front,
/// before any rewriting runs.
pub fn validate_sets(sets: &[Term]) -> Result<(), RbdError> {
    for term in sets {
        validate_term(term)?;
    }
    Ok(())
}
