use thiserror::Error;

use crate::model::NodeKind;

/// Rejected engine operations. None of these leave the model modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("node {0:?} does not exist")]
    UnknownNode(String),
    #[error("arc {0:?} does not exist")]
    UnknownArc(String),
    #[error("node {id:?} is a {actual:?}, expected a {expected:?}")]
    KindMismatch {
        id: String,
        expected: NodeKind,
        actual: NodeKind,
    },
    #[error("arcs must join a place and a transition, got {source_kind:?} -> {target_kind:?}")]
    SameKindArc {
        source_kind: NodeKind,
        target_kind: NodeKind,
    },
    #[error("an arc from {from:?} to {to:?} already exists")]
    DuplicateArc { from: String, to: String },
    #[error("transition {0:?} is not enabled under the current marking")]
    NotEnabled(String),
    #[error("transition {0:?} is still waiting to deposit its tokens")]
    AlreadyWaiting(String),
    #[error("no initial state has been saved")]
    NoSnapshot,
    #[error("the node id counter is exhausted")]
    IdsExhausted,
}

/// Failures while reading or writing a model document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid model document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid model document: {0}")]
    Invalid(String),
    #[error("failed to encode model document: {0}")]
    Encode(serde_json::Error),
}
