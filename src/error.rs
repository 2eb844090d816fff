use thiserror::Error;

use crate::types::NodeId;

/// Failures surfaced by the availability pipelines.
///
/// Arithmetic on well-formed inputs is infallible; these cover malformed
/// terms, probability lookups outside the known id range, and file I/O in
/// the utility layer. A failing member of a topology batch fails the whole
/// batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbdError {
    #[error("node id {id} is outside the probability map (largest known id: {max})")]
    OutOfRange { id: NodeId, max: usize },
    #[error("term contains the reserved node id 0")]
    ZeroLiteral,
    #[error("term contains both {id} and -{id}")]
    Contradiction { id: NodeId },
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RbdError {
    fn from(err: std::io::Error) -> Self {
        RbdError::Io(err.to_string())
    }
}
