//! Pairwise disjointing of conjunction terms.
//!
//! The primitive of every pipeline in this crate: given a pivot term `A`
//! that has already been committed to the result, rewrite a term `B` into
//! terms covering `B ∧ ¬A`, each of which contradicts `A` in at least one
//! literal. The probabilities of the rewritten terms can then be summed
//! alongside `A`'s without double counting.
//!
//! # Example
//!
//! With `A = {1, 2, 3, 4, 5}` and `B = {2, 4}` the residual complement is
//! `RC = A \ B = [1, 3, 5]`, and the rewrite emits
//!
//! ```text
//! {2, 4, -1}
//! {2, 4, 1, -3}
//! {2, 4, 1, 3, -5}
//! ```
//!
//! which is `B` intersected with the disjoint expansion
//! `¬1 ∨ (1 ∧ ¬3) ∨ (1 ∧ 3 ∧ ¬5)` of `¬A`.

use std::time::Instant;

use crate::types::{DebugInfo, DisjointSets, NodeId, ProbaSets, Term};

/// Rewrites `subject` into terms disjoint from `pivot`.
///
/// Returns:
/// - `[subject]` unchanged when some literal of `pivot` appears negated in
///   `subject` (the two terms are already mutually exclusive);
/// - the empty list when `subject` contains all of `pivot`'s literals
///   (`subject ⊆ pivot` as events, so `subject ∧ ¬pivot` is empty and the
///   term is absorbed);
/// - otherwise one term per residual literal, each extending `subject` with
///   the previous residuals positive and the current one negated.
pub fn make_disjoint(pivot: &[NodeId], subject: Term) -> DisjointSets {
    // Residual complement: literals of the pivot absent from the subject.
    let mut rc = Term::new();
    for &lit in pivot {
        if subject.contains(&-lit) {
            return vec![subject];
        }
        if !subject.contains(&lit) {
            rc.push(lit);
        }
    }

    if rc.is_empty() {
        return DisjointSets::new();
    }

    let mut result = DisjointSets::with_capacity(rc.len());
    for (k, &lit) in rc.iter().enumerate() {
        let mut term = Term::with_capacity(subject.len() + k + 1);
        term.extend_from_slice(&subject);
        term.extend_from_slice(&rc[..k]);
        term.push(-lit);
        result.push(term);
    }
    result
}

/// Iterated disjointing of a whole term list.
///
/// Repeatedly commits the front term as pivot and rewrites every remaining
/// term against it, until the list is exhausted. The committed pivots form
/// a probability set: mutually exclusive terms whose probabilities sum.
pub fn to_disjoint_form(mut sets: Vec<Term>) -> ProbaSets {
    // Each rewrite emits up to 3 terms per input on average.
    let mut proba_sets = ProbaSets::with_capacity(sets.len() * 3);

    while !sets.is_empty() {
        if sets.len() == 1 {
            proba_sets.push(sets.swap_remove(0));
            break;
        }

        let mut remaining = std::mem::take(&mut sets);
        let pivot = remaining.remove(0);
        sets.reserve(remaining.len() * 3);
        for subject in remaining {
            sets.extend(make_disjoint(&pivot, subject));
        }
        proba_sets.push(pivot);
    }

    proba_sets
}

/// Instrumented variant of [`to_disjoint_form`] for performance studies:
/// records, per outer iteration, the accumulated probability-set size and
/// the iteration's elapsed seconds.
///
/// Single-threaded; not for use inside parallel regions.
pub fn to_disjoint_form_debug(mut sets: Vec<Term>) -> DebugInfo {
    let mut debug_info = DebugInfo::new();
    let mut proba_sets = ProbaSets::with_capacity(sets.len() * 3);
    let mut iteration = 0;

    while !sets.is_empty() {
        let start = Instant::now();

        if sets.len() == 1 {
            proba_sets.push(sets.swap_remove(0));
            debug_info.insert(iteration, (proba_sets.len(), start.elapsed().as_secs_f64()));
            break;
        }

        let mut remaining = std::mem::take(&mut sets);
        let pivot = remaining.remove(0);
        sets.reserve(remaining.len() * 3);
        for subject in remaining {
            sets.extend(make_disjoint(&pivot, subject));
        }
        proba_sets.push(pivot);

        debug_info.insert(iteration, (proba_sets.len(), start.elapsed().as_secs_f64()));
        iteration += 1;
    }

    debug_info
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::proba::ProbabilityMap;

    #[test]
    fn test_residual_expansion() {
        let pivot = vec![1, 2, 3, 4, 5];
        let result = make_disjoint(&pivot, vec![2, 4]);
        assert_eq!(
            result,
            vec![vec![2, 4, -1], vec![2, 4, 1, -3], vec![2, 4, 1, 3, -5]]
        );
    }

    #[test]
    fn test_already_disjoint() {
        let result = make_disjoint(&[1, 2], vec![-1, 3]);
        assert_eq!(result, vec![vec![-1, 3]]);
    }

    #[test]
    fn test_subject_absorbed() {
        // Subject carries every pivot literal: nothing of B ∧ ¬A remains.
        let result = make_disjoint(&[1, 3], vec![1, 2, 3]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_residual() {
        let result = make_disjoint(&[1, 2, 4], vec![1, 3, 4]);
        assert_eq!(result, vec![vec![1, 3, 4, -2]]);
    }

    #[test]
    fn test_outputs_disjoint_from_pivot() {
        let pivot = vec![1, 2, 3, 4, 5];
        for term in make_disjoint(&pivot, vec![2, 4]) {
            assert!(
                pivot.iter().any(|&lit| term.contains(&-lit)),
                "term {:?} does not contradict the pivot",
                term
            );
        }
    }

    #[test]
    fn test_probability_conservation() {
        // Σ Pr(emitted) must equal Pr(B) − Pr(A ∧ B) for independent
        // components: the emitted terms partition B ∧ ¬A.
        let map = ProbabilityMap::from_pairs([(1, 0.9), (2, 0.8), (3, 0.7), (4, 0.6), (5, 0.5)]);
        let pivot = vec![1, 2, 3, 4, 5];
        let subject = vec![2, 4];

        let pr_b = map.term_proba(&subject).unwrap();
        let pr_ab = map.term_proba(&[1, 2, 3, 4, 5]).unwrap();

        let total: f64 = make_disjoint(&pivot, subject)
            .iter()
            .map(|term| map.term_proba(term).unwrap())
            .sum();

        assert!((total - (pr_b - pr_ab)).abs() < 1e-12);
    }

    #[test]
    fn test_to_disjoint_form_single() {
        assert_eq!(to_disjoint_form(vec![vec![1, 2]]), vec![vec![1, 2]]);
    }

    #[test]
    fn test_to_disjoint_form_empty() {
        assert!(to_disjoint_form(Vec::new()).is_empty());
    }

    #[test]
    fn test_to_disjoint_form_two_paths() {
        let result = to_disjoint_form(vec![vec![1, 2, 4], vec![1, 3, 4]]);
        assert_eq!(result, vec![vec![1, 2, 4], vec![1, 3, 4, -2]]);
    }

    #[test]
    fn test_debug_info_records_iterations() {
        let info = to_disjoint_form_debug(vec![vec![1, 2], vec![1, 3], vec![2, 3]]);
        assert!(!info.is_empty());
        let sizes: Vec<usize> = info.values().map(|&(size, _)| size).collect();
        // Accumulated size never shrinks.
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        println!("debug info: {:?}", info);
    }
}
