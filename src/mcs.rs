//! Availability from minimal cut sets.
//!
//! A cut set disconnects the terminals when all of its components are
//! *down*, so the pipeline works on the complemented literals: every cut
//! set is negated before disjointing, the summed term probabilities give
//! the unavailability, and the result is folded back into an availability.
//!
//! The trivial endpoint cuts `{src}` and `{dst}` are struck out first and
//! compensated by multiplying the final availability with `P(src)·P(dst)`.

use rayon::prelude::*;

use crate::disjoint::{to_disjoint_form, to_disjoint_form_debug};
use crate::error::RbdError;
use crate::proba::ProbabilityMap;
use crate::types::{
    validate_sets, AvailTriple, DebugInfo, MinCutSets, NodeId, NodePair, ProbaSets,
};

fn strip_and_invert(src: NodeId, dst: NodeId, mut min_cut_sets: MinCutSets) -> MinCutSets {
    min_cut_sets.retain(|set| *set != [src] && *set != [dst]);
    for set in &mut min_cut_sets {
        for lit in set.iter_mut() {
            *lit = -*lit;
        }
    }
    min_cut_sets
}

/// Converts minimal cut sets into a probability set of mutually exclusive
/// failure terms.
///
/// The endpoint singletons `{src}` and `{dst}` are removed, the remaining
/// cut literals are negated (cut events are failure events), and the
/// shared disjointing loop runs. Consumes its input.
pub fn to_proba_set(src: NodeId, dst: NodeId, min_cut_sets: MinCutSets) -> ProbaSets {
    let min_cut_sets = strip_and_invert(src, dst, min_cut_sets);
    if min_cut_sets.is_empty() {
        return ProbaSets::new();
    }
    to_disjoint_form(min_cut_sets)
}

/// Instrumented variant of [`to_proba_set`] for performance studies.
/// Single-threaded; must not be called from inside parallel regions.
pub fn to_proba_set_debug(src: NodeId, dst: NodeId, min_cut_sets: MinCutSets) -> DebugInfo {
    let min_cut_sets = strip_and_invert(src, dst, min_cut_sets);
    if min_cut_sets.is_empty() {
        return DebugInfo::new();
    }
    to_disjoint_form_debug(min_cut_sets)
}

/// Folds a failure probability set back into an availability:
/// `P(src) · P(dst) · (1 − Σ ∏)`.
///
/// The endpoint factors compensate for the singleton cuts removed by
/// [`to_proba_set`]. An empty set means no cut beyond the endpoints can
/// occur, so the result is `P(src) · P(dst)`.
pub fn proba_set_to_avail(
    src: NodeId,
    dst: NodeId,
    proba_map: &ProbabilityMap,
    proba_sets: &ProbaSets,
) -> Result<f64, RbdError> {
    let mut unavail = 0.0;
    for term in proba_sets {
        unavail += proba_map.term_proba(term)?;
    }
    Ok(proba_map.get(src)? * proba_map.get(dst)? * (1.0 - unavail))
}

/// Two-terminal availability from minimal cut sets.
pub fn eval_avail(
    src: NodeId,
    dst: NodeId,
    proba_map: &ProbabilityMap,
    min_cut_sets: MinCutSets,
) -> Result<f64, RbdError> {
    validate_sets(&min_cut_sets)?;
    let proba_sets = to_proba_set(src, dst, min_cut_sets);
    proba_set_to_avail(src, dst, proba_map, &proba_sets)
}

/// Evaluates every `(src, dst)` pair of a topology, in order.
///
/// # Panics
///
/// Panics if `pairs` and `cutsets_list` differ in length.
pub fn eval_avail_topo(
    pairs: &[NodePair],
    proba_map: &ProbabilityMap,
    cutsets_list: Vec<MinCutSets>,
) -> Result<Vec<AvailTriple>, RbdError> {
    assert_eq!(
        pairs.len(),
        cutsets_list.len(),
        "one cut-set list per node pair"
    );
    pairs
        .iter()
        .zip(cutsets_list)
        .map(|(&(src, dst), sets)| eval_avail(src, dst, proba_map, sets).map(|a| (src, dst, a)))
        .collect()
}

/// Parallel variant of [`eval_avail_topo`]; pairs are processed
/// concurrently, output order matches input order. Do not combine with
/// [`crate::sdp`]'s intra-evaluation parallelism.
pub fn eval_avail_topo_parallel(
    pairs: &[NodePair],
    proba_map: &ProbabilityMap,
    cutsets_list: Vec<MinCutSets>,
) -> Result<Vec<AvailTriple>, RbdError> {
    assert_eq!(
        pairs.len(),
        cutsets_list.len(),
        "one cut-set list per node pair"
    );
    pairs
        .par_iter()
        .zip(cutsets_list)
        .map(|(&(src, dst), sets)| eval_avail(src, dst, proba_map, sets).map(|a| (src, dst, a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_chain() {
        // Series 1-2-3: cuts {1}, {3}, {2}. Availability is 0.9^3.
        let map = ProbabilityMap::from_uniform(3, 0.9);
        let avail = eval_avail(1, 3, &map, vec![vec![1], vec![3], vec![2]]).unwrap();
        assert!((avail - 0.729).abs() < 1e-12);
    }

    #[test]
    fn test_endpoint_only_cuts() {
        // Nothing but the endpoint cuts: availability is P(src) * P(dst).
        let map = ProbabilityMap::from_pairs([(1, 0.9), (2, 0.8)]);
        let avail = eval_avail(1, 2, &map, vec![vec![1], vec![2]]).unwrap();
        assert!((avail - 0.9 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let map = ProbabilityMap::from_pairs([(1, 0.9), (2, 0.8)]);
        let avail = eval_avail(1, 2, &map, Vec::new()).unwrap();
        assert!((avail - 0.72).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_middle_pair() {
        // 1 -> {2 | 3} -> 4: cuts {1}, {4}, {2,3}.
        // Availability = p1 * p4 * (1 - (1-p2)(1-p3)).
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let avail = eval_avail(1, 4, &map, vec![vec![1], vec![4], vec![2, 3]]).unwrap();
        let expected = 0.9 * 0.9 * (1.0 - 0.1 * 0.1);
        assert!((avail - expected).abs() < 1e-12);
    }

    #[test]
    fn test_matches_pathset_on_shared_network() {
        // Same 1 -> {2 | 3} -> 4 network through the path-set pipeline.
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let from_cuts = eval_avail(1, 4, &map, vec![vec![1], vec![4], vec![2, 3]]).unwrap();
        let from_paths =
            crate::pathset::eval_avail(1, 4, &map, vec![vec![1, 2, 4], vec![1, 3, 4]]).unwrap();
        assert!((from_cuts - from_paths).abs() < 1e-9);
    }

    #[test]
    fn test_debug_variant_runs() {
        let info = to_proba_set_debug(1, 4, vec![vec![1], vec![4], vec![2, 3], vec![2, 4]]);
        println!("mcs debug info: {:?}", info);
        assert!(!info.is_empty());
    }

    #[test]
    fn test_invalid_term_rejected() {
        let map = ProbabilityMap::from_uniform(3, 0.9);
        assert_eq!(
            eval_avail(1, 3, &map, vec![vec![2, -2]]),
            Err(RbdError::Contradiction { id: 2 })
        );
    }
}
