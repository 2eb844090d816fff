//! Shared predicates, pretty-printing, and plaintext persistence.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::RbdError;
use crate::sdp::{Sdp, SdpSet};
use crate::types::{NodeId, PathSets, Term};

/// Whether every literal of `a` appears in `b`.
///
/// Only factors of the same complementarity are comparable; across
/// complementarities the subset relation is not meaningful here and the
/// predicate returns false.
pub fn is_subset(a: &Sdp, b: &Sdp) -> bool {
    if a.is_complementary() != b.is_complementary() {
        return false;
    }
    a.term().iter().all(|lit| b.term().contains(lit))
}

/// Whether any two complementary factors of the product share a literal.
///
/// A product with shared complementary literals is not yet a valid
/// disjoint product and must be decomposed.
pub fn has_common_element(sdp_set: &[Sdp]) -> bool {
    let comp: Vec<&Sdp> = sdp_set.iter().filter(|s| s.is_complementary()).collect();
    for (i, a) in comp.iter().enumerate() {
        for b in &comp[i + 1..] {
            if a.term().iter().any(|lit| b.term().contains(lit)) {
                return true;
            }
        }
    }
    false
}

/// `[1, 2, 4]`-style rendering of a term.
pub fn term_to_string(term: &[NodeId]) -> String {
    let mut out = String::from("[");
    for (i, lit) in term.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}", lit);
    }
    out.push(']');
    out
}

/// One line per term rendering of a term list.
pub fn terms_to_string(sets: &[Term]) -> String {
    let mut out = String::new();
    for (i, term) in sets.iter().enumerate() {
        let _ = writeln!(out, "  {}: {}", i, term_to_string(term));
    }
    out
}

/// Reads path sets from a plaintext file: one term per line,
/// whitespace-separated integers. Blank lines are skipped.
pub fn read_pathsets_from_file(path: impl AsRef<Path>) -> Result<PathSets, RbdError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut pathsets = PathSets::new();
    for line in reader.lines() {
        let line = line?;
        let mut term = Term::new();
        for token in line.split_whitespace() {
            let lit: NodeId = token
                .parse()
                .map_err(|_| RbdError::Io(format!("invalid literal {:?}", token)))?;
            term.push(lit);
        }
        if !term.is_empty() {
            pathsets.push(term);
        }
    }
    Ok(pathsets)
}

/// Writes an SDP forest to a plaintext file, one product per line:
///
/// ```text
/// SDPSet 0 (size: 1): {2 7}
/// SDPSet 1 (size: 2): {1 4 6} -{2 7}
/// ```
pub fn write_sdp_sets_to_file(
    forest: &[SdpSet],
    path: impl AsRef<Path>,
) -> Result<(), RbdError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    for (i, sdp_set) in forest.iter().enumerate() {
        write!(writer, "SDPSet {} (size: {}): ", i, sdp_set.len())?;
        for (j, sdp) in sdp_set.iter().enumerate() {
            if j > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{}", sdp)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
