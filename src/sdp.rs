//! Sum of Disjoint Products from minimal path sets.
//!
//! Where the pipelines in [`crate::pathset`] and [`crate::mcs`] iterate the
//! pairwise disjointing primitive until fixpoint, this engine produces a
//! flat sum of disjoint products in the Abraham/Singh/Xing family: the path
//! sets are ordered by a locality heuristic, each path is made disjoint
//! from its predecessors by appending *complementary* terms (whole
//! conjunctions taken as `1 − ∏ P`), and products whose complementary terms
//! still overlap are split until every product is a valid disjoint product.
//!
//! The result is an [`SdpForest`]: a list of mutually exclusive products
//! whose probabilities add up to the two-terminal availability.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use log::debug;
use rayon::prelude::*;

use crate::error::RbdError;
use crate::proba::ProbabilityMap;
use crate::types::{validate_sets, AvailTriple, NodeId, NodePair, PathSets, Term};
use crate::utils::{has_common_element, is_subset};

/// Path-set count at and above which [`to_sdp_set_parallel`] actually runs
/// in parallel; below it the serial driver is used. Heuristic, tunable via
/// [`to_sdp_set_parallel_with_threshold`].
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 200;

/// One factor of a disjoint product: a conjunction of literals, taken
/// either directly (`∏ P(ℓ)`) or complemented (`1 − ∏ P(ℓ)`).
///
/// A complementary `Sdp` negates the *conjunction*, not the individual
/// literals: `-{a b}` reads "not (a up and b up)".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sdp {
    complementary: bool,
    term: Term,
}

impl Sdp {
    pub fn new(complementary: bool, term: Term) -> Self {
        Sdp {
            complementary,
            term,
        }
    }

    /// A non-complementary factor contributing `∏ P(ℓ)`.
    pub fn pos(term: Term) -> Self {
        Self::new(false, term)
    }

    /// A complementary factor contributing `1 − ∏ P(ℓ)`.
    pub fn neg(term: Term) -> Self {
        Self::new(true, term)
    }

    pub fn is_complementary(&self) -> bool {
        self.complementary
    }

    pub fn term(&self) -> &[NodeId] {
        &self.term
    }

    pub fn into_term(self) -> Term {
        self.term
    }

    pub fn len(&self) -> usize {
        self.term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }
}

impl fmt::Display for Sdp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complementary {
            write!(f, "-")?;
        }
        write!(f, "{{")?;
        for (i, lit) in self.term.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", lit)?;
        }
        write!(f, "}}")
    }
}

/// A product expression: the probabilities of its factors multiply.
pub type SdpSet = Vec<Sdp>;

/// A sum of disjoint products: the probabilities of its members add.
pub type SdpForest = Vec<SdpSet>;

/// Literals of `a` that are absent from `b`, in `a`'s order.
fn difference(a: &[NodeId], b: &[NodeId]) -> Term {
    a.iter().filter(|&lit| !b.contains(lit)).copied().collect()
}

/// Literals common to `a` and `b`, in `a`'s order.
fn intersection(a: &[NodeId], b: &[NodeId]) -> Term {
    a.iter().filter(|&lit| b.contains(lit)).copied().collect()
}

/// Orders path sets for minimal downstream disjointing work.
///
/// Literals are sorted ascending within each set, the sets are stable-sorted
/// by `(size, lexicographic content)`, and within each size class the sets
/// are re-ordered by increasing maximum overlap with the already-placed
/// prefix: the set sharing fewest literals with its predecessors comes
/// first. Ties keep their relative order.
pub fn sort_paths(mut path_sets: PathSets) -> PathSets {
    if path_sets.is_empty() {
        return path_sets;
    }

    for set in &mut path_sets {
        set.sort_unstable();
    }
    path_sets.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut by_size: BTreeMap<usize, Vec<Term>> = BTreeMap::new();
    for set in path_sets {
        by_size.entry(set.len()).or_default().push(set);
    }

    let mut classes = by_size.into_values();
    let mut sorted = classes.next().unwrap_or_default();
    for class in classes {
        // Overlap is measured against the prefix placed so far, frozen
        // before any member of this class is appended.
        let mut keyed: Vec<(usize, Term)> = class
            .into_iter()
            .map(|set| (max_overlap(&set, &sorted), set))
            .collect();
        keyed.sort_by_key(|&(overlap, _)| overlap);
        sorted.extend(keyed.into_iter().map(|(_, set)| set));
    }

    sorted
}

fn max_overlap(set: &[NodeId], placed: &[Term]) -> usize {
    placed
        .iter()
        .map(|prev| set.iter().filter(|&lit| prev.contains(lit)).count())
        .max()
        .unwrap_or(0)
}

/// Removes duplicates and supersets within one complementarity class.
///
/// A factor that is a superset of another factor with the same flag is
/// implied by it and dropped; exact duplicates collapse to the first
/// occurrence. Factors of opposite complementarity are never compared.
pub fn absorb(sdp_set: SdpSet) -> SdpSet {
    let mut absorbed = vec![false; sdp_set.len()];

    for i in 0..sdp_set.len() {
        if absorbed[i] {
            continue;
        }
        for j in i + 1..sdp_set.len() {
            if absorbed[j] {
                continue;
            }
            if sdp_set[i] == sdp_set[j] {
                absorbed[j] = true;
            } else if is_subset(&sdp_set[i], &sdp_set[j]) {
                absorbed[j] = true;
            } else if is_subset(&sdp_set[j], &sdp_set[i]) {
                absorbed[i] = true;
                break;
            }
        }
    }

    sdp_set
        .into_iter()
        .zip(absorbed)
        .filter(|&(_, gone)| !gone)
        .map(|(sdp, _)| sdp)
        .collect()
}

/// Strips pinned literals out of complementary factors.
///
/// Within one product the non-complementary factors already fix their
/// literals to "up"; re-asserting "any of them down" inside a sibling
/// complementary conjunction is vacuous. The product is stable-partitioned
/// with non-complementary factors first, their literal union is
/// accumulated, and every complementary factor is reduced to the literals
/// outside that union. Factors emptied by the reduction are dropped.
pub fn eliminate(mut sdp_set: SdpSet) -> SdpSet {
    sdp_set.sort_by_key(Sdp::is_complementary);

    let mut pinned: Vec<NodeId> = Vec::new();
    let mut result = SdpSet::with_capacity(sdp_set.len());

    for sdp in sdp_set {
        if !sdp.is_complementary() {
            pinned.extend_from_slice(sdp.term());
            result.push(sdp);
        } else {
            let remaining = difference(sdp.term(), &pinned);
            if !remaining.is_empty() {
                result.push(Sdp::neg(remaining));
            }
        }
    }

    result
}

/// First pair of complementary factors sharing a literal, with the shared
/// literals, or `None` if the product is already a valid disjoint product.
fn find_common_pair(sdp_set: &[Sdp]) -> Option<(usize, usize, Term)> {
    let comp: Vec<usize> = (0..sdp_set.len())
        .filter(|&k| sdp_set[k].is_complementary())
        .collect();
    for (a, &i) in comp.iter().enumerate() {
        for &j in &comp[a + 1..] {
            let common = intersection(sdp_set[i].term(), sdp_set[j].term());
            if !common.is_empty() {
                return Some((i, j, common));
            }
        }
    }
    None
}

/// Splits a product whose complementary factors overlap into mutually
/// exclusive products with independent factors.
///
/// For the first overlapping pair `-B`, `-C` with shared literals `K` and
/// remaining context `N`, the identity
///
/// ```text
/// ¬B · ¬C  =  ¬K  +  K · ¬(B\K) · ¬(C\K)
/// ```
///
/// yields two children, `N ∪ {-K}` and `N ∪ {+K, -(B\K), -(C\K)}` (empty
/// residues drop their factor). Each child is re-eliminated and
/// re-absorbed, then re-examined; children without overlap are final.
///
/// Iterative via a work queue: deep path-set lists produce decompositions
/// with branching factor 2 that would otherwise exhaust the stack.
pub fn decompose(sdp_set: SdpSet) -> SdpForest {
    let mut results = SdpForest::new();
    let mut queue: VecDeque<SdpSet> = VecDeque::new();
    queue.push_back(sdp_set);

    while let Some(current) = queue.pop_front() {
        let Some((i, j, common)) = find_common_pair(&current) else {
            results.push(current);
            continue;
        };

        debug!(
            "decompose: splitting on {} / {} over shared {:?}",
            current[i], current[j], common
        );

        let mut context = SdpSet::with_capacity(current.len() + 2);
        let mut first = Term::new();
        let mut second = Term::new();
        for (k, sdp) in current.into_iter().enumerate() {
            if k == i {
                first = sdp.into_term();
            } else if k == j {
                second = sdp.into_term();
            } else {
                context.push(sdp);
            }
        }
        first.retain(|lit| !common.contains(lit));
        second.retain(|lit| !common.contains(lit));

        let mut child1 = context.clone();
        child1.push(Sdp::neg(common.clone()));

        let mut child2 = context;
        child2.push(Sdp::pos(common));
        if !first.is_empty() {
            child2.push(Sdp::neg(first));
        }
        if !second.is_empty() {
            child2.push(Sdp::neg(second));
        }

        queue.push_back(absorb(eliminate(child1)));
        queue.push_back(absorb(eliminate(child2)));
    }

    results
}

/// Builds the disjoint product for `sorted[i]` against its frozen prefix.
fn disjoint_against_prefix(sorted: &[Term], i: usize) -> SdpForest {
    let current = &sorted[i];

    let mut result: SdpSet = Vec::with_capacity(i + 1);
    result.push(Sdp::pos(current.clone()));
    for preceding in &sorted[..i] {
        let rc = difference(preceding, current);
        if !rc.is_empty() {
            result.push(Sdp::neg(rc));
        }
    }

    let result = absorb(result);
    if has_common_element(&result) {
        decompose(result)
    } else {
        vec![result]
    }
}

/// Converts path sets into a sum of disjoint products.
///
/// The sets are ordered by [`sort_paths`]; the first becomes the sole
/// factor of the first product; every later set is extended with the
/// complemented residuals of all its predecessors, absorbed, and
/// decomposed if its complementary factors overlap. Consumes its input.
pub fn to_sdp_set(path_sets: PathSets) -> SdpForest {
    let sorted = sort_paths(path_sets);
    debug!("to_sdp_set: sorted {} path sets", sorted.len());

    let Some(front) = sorted.first() else {
        return SdpForest::new();
    };

    let mut forest: SdpForest = vec![vec![Sdp::pos(front.clone())]];
    for i in 1..sorted.len() {
        forest.extend(disjoint_against_prefix(&sorted, i));
    }
    forest
}

/// Parallel [`to_sdp_set`] with the default threshold of
/// [`DEFAULT_PARALLEL_THRESHOLD`] path sets.
pub fn to_sdp_set_parallel(path_sets: PathSets) -> SdpForest {
    to_sdp_set_parallel_with_threshold(path_sets, DEFAULT_PARALLEL_THRESHOLD)
}

/// Parallel [`to_sdp_set`] with an explicit switch-over threshold.
///
/// Below `threshold` path sets the serial driver runs. Above it, the outer
/// driver iterations are processed concurrently: each consumes only the
/// frozen sorted prefix, so they are independent, and the per-index results
/// are concatenated in index order, giving the same forest as the serial
/// driver. Do not combine with the topology-level parallel evaluators.
pub fn to_sdp_set_parallel_with_threshold(path_sets: PathSets, threshold: usize) -> SdpForest {
    if path_sets.len() < threshold {
        return to_sdp_set(path_sets);
    }

    let sorted = sort_paths(path_sets);
    let Some(front) = sorted.first() else {
        return SdpForest::new();
    };

    let mut forest: SdpForest = vec![vec![Sdp::pos(front.clone())]];
    let chunks: Vec<SdpForest> = (1..sorted.len())
        .into_par_iter()
        .map(|i| disjoint_against_prefix(&sorted, i))
        .collect();
    for chunk in chunks {
        forest.extend(chunk);
    }
    forest
}

/// Sums the product probabilities of a forest.
///
/// Each factor contributes `∏ P(ℓ)` or `1 − ∏ P(ℓ)` depending on its
/// complementarity; products across distinct members are disjoint events
/// by construction, so their probabilities add.
pub fn sdp_to_avail(proba_map: &ProbabilityMap, forest: &SdpForest) -> Result<f64, RbdError> {
    let mut avail = 0.0;
    for sdp_set in forest {
        let mut product = 1.0;
        for sdp in sdp_set {
            let term_proba = proba_map.term_proba(sdp.term())?;
            product *= if sdp.is_complementary() {
                1.0 - term_proba
            } else {
                term_proba
            };
        }
        avail += product;
    }
    Ok(avail)
}

/// Two-terminal availability from minimal path sets via SDP.
pub fn eval_avail(
    src: NodeId,
    dst: NodeId,
    proba_map: &ProbabilityMap,
    path_sets: PathSets,
) -> Result<f64, RbdError> {
    proba_map.get(src)?;
    proba_map.get(dst)?;
    validate_sets(&path_sets)?;

    let forest = to_sdp_set(path_sets);
    sdp_to_avail(proba_map, &forest)
}

/// [`eval_avail`] with the intra-evaluation parallel driver. Intended for
/// large single path-set lists; do not combine with the topology-level
/// parallel evaluators.
pub fn eval_avail_parallel(
    src: NodeId,
    dst: NodeId,
    proba_map: &ProbabilityMap,
    path_sets: PathSets,
) -> Result<f64, RbdError> {
    proba_map.get(src)?;
    proba_map.get(dst)?;
    validate_sets(&path_sets)?;

    let forest = to_sdp_set_parallel(path_sets);
    sdp_to_avail(proba_map, &forest)
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
/// concurrently with the *serial* per-pair driver, so the two parallel
/// levels never nest. Output order matches input order.
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
