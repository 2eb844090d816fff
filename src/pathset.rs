//! Availability from minimal path sets.
//!
//! Each path set is a conjunction of "up" literals that connects the source
//! to the destination; the union of all path sets is the connection event.
//! The pipeline disjoints the path sets against each other (see
//! [`crate::disjoint`]), after which the availability is the plain sum of
//! term probabilities.

use rayon::prelude::*;

use crate::disjoint::{to_disjoint_form, to_disjoint_form_debug};
use crate::error::RbdError;
use crate::proba::ProbabilityMap;
use crate::types::{validate_sets, AvailTriple, DebugInfo, NodeId, NodePair, PathSets, ProbaSets};

/// Converts path sets into a probability set of mutually exclusive terms.
///
/// Consumes its input; callers must not reuse the path sets afterwards.
pub fn to_proba_set(path_sets: PathSets) -> ProbaSets {
    to_disjoint_form(path_sets)
}

/// Instrumented variant of [`to_proba_set`] for performance studies.
/// Single-threaded; must not be called from inside parallel regions.
pub fn to_proba_set_debug(path_sets: PathSets) -> DebugInfo {
    to_disjoint_form_debug(path_sets)
}

/// Sums the term probabilities of a probability set.
///
/// The terms are mutually exclusive by construction, so the sum is the
/// availability directly. An empty set yields 0.
pub fn proba_set_to_avail(
    proba_map: &ProbabilityMap,
    proba_sets: &ProbaSets,
) -> Result<f64, RbdError> {
    let mut avail = 0.0;
    for term in proba_sets {
        avail += proba_map.term_proba(term)?;
    }
    Ok(avail)
}

/// Two-terminal availability from minimal path sets.
///
/// Empty input yields 0: with no path, the terminals never connect.
pub fn eval_avail(
    src: NodeId,
    dst: NodeId,
    proba_map: &ProbabilityMap,
    path_sets: PathSets,
) -> Result<f64, RbdError> {
    proba_map.get(src)?;
    proba_map.get(dst)?;
    validate_sets(&path_sets)?;

    let proba_sets = to_proba_set(path_sets);
    proba_set_to_avail(proba_map, &proba_sets)
}

/// Evaluates every `(src, dst)` pair of a topology, in order.
///
/// # Panics
///
/// Panics if `pairs` and `pathsets_list` differ in length.
pub fn eval_avail_topo(
    pairs: &[NodePair],
    proba_map: &ProbabilityMap,
    pathsets_list: Vec<PathSets>,
) -> Result<Vec<AvailTriple>, RbdError> {
    assert_eq!(
        pairs.len(),
        pathsets_list.len(),
        "one path-set list per node pair"
    );
    pairs
        .iter()
        .zip(pathsets_list)
        .map(|(&(src, dst), sets)| eval_avail(src, dst, proba_map, sets).map(|a| (src, dst, a)))
        .collect()
}

/// Parallel variant of [`eval_avail_topo`]; pairs are processed
/// concurrently, output order matches input order. Do not combine with
/// [`crate::sdp`]'s intra-evaluation parallelism.
pub fn eval_avail_topo_parallel(
    pairs: &[NodePair],
    proba_map: &ProbabilityMap,
    pathsets_list: Vec<PathSets>,
) -> Result<Vec<AvailTriple>, RbdError> {
    assert_eq!(
        pairs.len(),
        pathsets_list.len(),
        "one path-set list per node pair"
    );
    pairs
        .par_iter()
        .zip(pathsets_list)
        .map(|(&(src, dst), sets)| eval_avail(src, dst, proba_map, sets).map(|a| (src, dst, a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_path() {
        let map = ProbabilityMap::from_uniform(2, 0.9);
        let avail = eval_avail(1, 2, &map, vec![vec![1, 2]]).unwrap();
        assert!((avail - 0.81).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_paths_with_certain_endpoints() {
        // Two parallel routes between certain endpoints: availability 1.
        let map = ProbabilityMap::from_pairs([(1, 1.0), (2, 0.5), (3, 1.0)]);
        let avail = eval_avail(1, 3, &map, vec![vec![1, 3], vec![1, 2, 3]]).unwrap();
        assert!((avail - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_is_zero() {
        let map = ProbabilityMap::from_uniform(3, 0.9);
        assert_eq!(eval_avail(1, 3, &map, Vec::new()), Ok(0.0));
    }

    #[test]
    fn test_two_route_network() {
        // Routes {1,2,4} and {1,3,4}: avail = p1*p4*(1 - (1-p2)(1-p3)).
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let avail = eval_avail(1, 4, &map, vec![vec![1, 2, 4], vec![1, 3, 4]]).unwrap();
        let expected = 0.9 * 0.9 * (1.0 - 0.1 * 0.1);
        assert!((avail - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_term_rejected() {
        let map = ProbabilityMap::from_uniform(3, 0.9);
        assert_eq!(
            eval_avail(1, 3, &map, vec![vec![1, 0, 3]]),
            Err(RbdError::ZeroLiteral)
        );
    }

    #[test]
    fn test_unknown_id_rejected() {
        let map = ProbabilityMap::from_uniform(3, 0.9);
        assert_eq!(
            eval_avail(1, 3, &map, vec![vec![1, 9, 3]]),
            Err(RbdError::OutOfRange { id: 9, max: 3 })
        );
    }

    #[test]
    fn test_topo_preserves_order() {
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let pairs = vec![(1, 2), (1, 4)];
        let lists = vec![vec![vec![1, 2]], vec![vec![1, 2, 4], vec![1, 3, 4]]];
        let triples = eval_avail_topo(&pairs, &map, lists).unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!((triples[0].0, triples[0].1), (1, 2));
        assert_eq!((triples[1].0, triples[1].1), (1, 4));
    }

    #[test]
    fn test_topo_parallel_matches_serial() {
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let pairs = vec![(1, 2), (1, 4), (2, 4)];
        let lists = vec![
            vec![vec![1, 2]],
            vec![vec![1, 2, 4], vec![1, 3, 4]],
            vec![vec![2, 4], vec![2, 3, 4]],
        ];
        let serial = eval_avail_topo(&pairs, &map, lists.clone()).unwrap();
        let parallel = eval_avail_topo_parallel(&pairs, &map, lists).unwrap();
        for (s, p) in serial.iter().zip(&parallel) {
            assert_eq!((s.0, s.1), (p.0, p.1));
            assert!((s.2 - p.2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_topo_batch_fails_as_whole() {
        let map = ProbabilityMap::from_uniform(4, 0.9);
        let pairs = vec![(1, 2), (1, 4)];
        let lists = vec![vec![vec![1, 2]], vec![vec![1, 0, 4]]];
        assert!(eval_avail_topo(&pairs, &map, lists).is_err());
    }
}
