//! Error taxonomy for patch editing.
//!
//! Every variant is a local, recoverable condition reported back to the host
//! UI; none is fatal to the editor. Duplicate connection attempts are *not*
//! errors — [`PatchGraph::add_connection`](crate::graph::PatchGraph::add_connection)
//! treats them as idempotent no-ops.

use crate::graph::NodeId;
use crate::registry::{NodeKind, PortDirection};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatchError {
    /// The kind is not present in the session's registry.
    #[error("node kind `{0}` is not registered")]
    UnknownKind(NodeKind),

    /// A node id that is not (or no longer) in the graph.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// The port name is not declared by the node's kind in that direction.
    #[error("`{port}` is not an {direction} port of `{kind}`")]
    InvalidPort {
        kind: NodeKind,
        port: String,
        direction: PortDirection,
    },

    /// Source and target of a connection are the same node.
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),

    /// An imported document failed validation; nothing was applied.
    #[error("malformed patch document: {0}")]
    MalformedDocument(String),
}
