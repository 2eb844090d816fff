//! # rbd-rs: Reliability Block Diagram availability in Rust
//!
//! **`rbd-rs`** computes the two-terminal availability of a Reliability
//! Block Diagram: the probability that a source component `s` reaches a
//! destination component `d`, given an independent up-probability per
//! component.
//!
//! ## How it works
//!
//! The connection between `s` and `d` is described combinatorially, either
//! by **minimal cut sets** (component sets whose joint failure disconnects
//! the terminals) or by **minimal path sets** (component sets whose joint
//! operation connects them). Neither description can be summed directly:
//! the terms overlap. Every algorithm here rewrites the description into
//! *disjoint* terms, mutually exclusive by construction, whose
//! probabilities add:
//!
//! - **MCS** ([`mcs`]): disjoints the complemented cut sets and folds the
//!   summed unavailability back into an availability.
//! - **PathSet** ([`pathset`]): disjoints the path sets; the summed term
//!   probabilities are the availability directly.
//! - **SDP** ([`sdp`]): produces a flat Sum of Disjoint Products in the
//!   Abraham/Singh/Xing family, with whole complemented conjunctions as
//!   factors. More compact results, and readable with [`crate::utils::write_sdp_sets_to_file`].
//!
//! ## Quick start
//!
//! ```rust
//! use rbd_rs::proba::ProbabilityMap;
//! use rbd_rs::{mcs, pathset};
//!
//! // Series system 1 - 2 - 3, every component up with probability 0.9.
//! let map = ProbabilityMap::from_uniform(3, 0.9);
//!
//! // From minimal cut sets {1}, {3}, {2}:
//! let a = mcs::eval_avail(1, 3, &map, vec![vec![1], vec![3], vec![2]]).unwrap();
//! assert!((a - 0.729).abs() < 1e-9);
//!
//! // From the single minimal path set {1, 2, 3}:
//! let b = pathset::eval_avail(1, 3, &map, vec![vec![1, 2, 3]]).unwrap();
//! assert!((a - b).abs() < 1e-9);
//! ```
//!
//! ## Components
//!
//! - **[`types`]**: signed node ids, terms, term lists, validation.
//! - **[`proba`]**: dense signed probability lookup.
//! - **[`disjoint`]**: the pairwise disjointing primitive shared by the
//!   MCS and PathSet pipelines.
//! - **[`sdp`]**: ordering heuristic, absorption, elimination, recursive
//!   decomposition, and the SDP driver.
//! - **[`mcs`]**, **[`pathset`]**: the two probability-set pipelines, each
//!   with serial and parallel topology evaluators.
//! - **[`utils`]**: predicates, pretty-printing, plaintext persistence.
//!
//! ## Parallelism
//!
//! Topology evaluators fan `(s, d)` pairs out across a [`rayon`] pool;
//! [`sdp::to_sdp_set_parallel`] additionally parallelizes a single large
//! conversion internally. Pick one level per call: the topology-parallel
//! evaluators run the serial per-pair driver so the levels never nest.
//!
//! All inputs to parallel regions are read-only; results are written to
//! position-stable slots, so parallel output equals serial output.

pub mod disjoint;
pub mod error;
pub mod mcs;
pub mod pathset;
pub mod proba;
pub mod sdp;
pub mod types;
pub mod utils;
