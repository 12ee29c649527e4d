//! The live patch: node instances and the connections between them.
//!
//! [`PatchGraph`] owns both collections exclusively and enforces the
//! structural invariants on every mutation:
//!
//! 1. every node's kind resolves to a registered descriptor;
//! 2. every connection endpoint names a declared port in the right direction;
//! 3. no two connections share the same (source node, source port, target
//!    node, target port) 4-tuple;
//! 4. removing a node cascades to every connection touching it;
//! 5. connection endpoints always reference present nodes.
//!
//! Fan-in and fan-out are unrestricted: an output may feed many connections
//! and an input may receive many.
//!
//! Nodes and connections are stored in insertion order. Hit testing relies on
//! this: overlap ties resolve to the first (oldest) node, a deliberate rule
//! rather than an accident of map iteration.

use crate::error::PatchError;
use crate::registry::{NodeKind, NodeTypeRegistry, ParamValue, PortDirection};
use crate::view::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Unique identifier of a node instance within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unique identifier of a connection within one graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Default node body extent, world units.
pub const NODE_WIDTH: f32 = 120.0;
pub const NODE_HEIGHT: f32 = 80.0;

/// A placed node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInstance {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Top-left corner, world coordinates.
    pub position: Point,
    pub size: Size,
    pub parameters: BTreeMap<String, ParamValue>,
    /// Transient UI state; not persisted.
    pub selected: bool,
}

impl NodeInstance {
    /// Axis-aligned bounds check, world coordinates.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.width
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.height
    }
}

/// A directed edge from an output port to an input port.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub source_node: NodeId,
    pub source_port: String,
    pub target_node: NodeId,
    pub target_port: String,
}

impl Connection {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source_node == node || self.target_node == node
    }
}

/// The editable patch graph.
#[derive(Clone, Debug, Default)]
pub struct PatchGraph {
    nodes: Vec<NodeInstance>,
    connections: Vec<Connection>,
    next_node_id: u64,
    next_connection_id: u64,
}

impl PatchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Connections incident to `node`, as source or target.
    pub fn connections_of(&self, node: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.touches(node))
    }

    // === Mutations ===

    /// Create a node of `kind` at `position` (world coordinates).
    ///
    /// Fails with [`PatchError::UnknownKind`] if the registry does not carry
    /// the kind. Parameters start from the descriptor's defaults.
    pub fn add_node(
        &mut self,
        registry: &NodeTypeRegistry,
        kind: NodeKind,
        position: Point,
    ) -> Result<&NodeInstance, PatchError> {
        let descriptor = registry.get(kind).ok_or(PatchError::UnknownKind(kind))?;

        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let index = self.nodes.len();
        self.nodes.push(NodeInstance {
            id,
            kind,
            position,
            size: Size::new(NODE_WIDTH, NODE_HEIGHT),
            parameters: descriptor.default_parameters(),
            selected: false,
        });

        debug!(node = %id, %kind, x = position.x, y = position.y, "added node");
        Ok(&self.nodes[index])
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the ids of the removed connections so callers can invalidate
    /// caches. No-op (empty vec) if the node is absent.
    pub fn remove_node(&mut self, id: NodeId) -> Vec<ConnectionId> {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return Vec::new();
        };
        self.nodes.remove(index);

        let removed: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|c| c.touches(id))
            .map(|c| c.id)
            .collect();
        self.connections.retain(|c| !c.touches(id));

        debug!(node = %id, cascaded = removed.len(), "removed node");
        removed
    }

    /// Connect an output port to an input port.
    ///
    /// Validation order: both nodes must exist ([`PatchError::UnknownNode`]),
    /// the endpoints must be different nodes ([`PatchError::SelfLoop`]), and
    /// each port must be declared by its node's kind in the right direction
    /// ([`PatchError::InvalidPort`]). A connection that already exists with
    /// the identical 4-tuple is returned as-is — reapplying an edit is safe.
    pub fn add_connection(
        &mut self,
        registry: &NodeTypeRegistry,
        source_node: NodeId,
        source_port: &str,
        target_node: NodeId,
        target_port: &str,
    ) -> Result<&Connection, PatchError> {
        let source = self
            .node(source_node)
            .ok_or(PatchError::UnknownNode(source_node))?;
        let target = self
            .node(target_node)
            .ok_or(PatchError::UnknownNode(target_node))?;

        if source_node == target_node {
            return Err(PatchError::SelfLoop(source_node));
        }

        // Kinds of present nodes always resolve (invariant 1); descriptors can
        // only be missing if the host swapped registries mid-session.
        let source_desc = registry
            .get(source.kind)
            .ok_or(PatchError::UnknownKind(source.kind))?;
        let target_desc = registry
            .get(target.kind)
            .ok_or(PatchError::UnknownKind(target.kind))?;

        if source_desc.output_index(source_port).is_none() {
            return Err(PatchError::InvalidPort {
                kind: source.kind,
                port: source_port.to_string(),
                direction: PortDirection::Output,
            });
        }
        if target_desc.input_index(target_port).is_none() {
            return Err(PatchError::InvalidPort {
                kind: target.kind,
                port: target_port.to_string(),
                direction: PortDirection::Input,
            });
        }

        if let Some(index) = self.connections.iter().position(|c| {
            c.source_node == source_node
                && c.source_port == source_port
                && c.target_node == target_node
                && c.target_port == target_port
        }) {
            debug!(
                source = %source_node, target = %target_node,
                "duplicate connection attempt, returning existing"
            );
            return Ok(&self.connections[index]);
        }

        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;

        let index = self.connections.len();
        self.connections.push(Connection {
            id,
            source_node,
            source_port: source_port.to_string(),
            target_node,
            target_port: target_port.to_string(),
        });

        debug!(
            connection = %id,
            source = %source_node, source_port,
            target = %target_node, target_port,
            "added connection"
        );
        Ok(&self.connections[index])
    }

    /// Remove a connection by id. Returns whether anything was removed.
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        let Some(index) = self.connections.iter().position(|c| c.id == id) else {
            return false;
        };
        self.connections.remove(index);
        debug!(connection = %id, "removed connection");
        true
    }

    /// Remove every node and connection.
    ///
    /// Irreversible; confirmation is the caller's responsibility.
    pub fn clear(&mut self) {
        let nodes = self.nodes.len();
        let connections = self.connections.len();
        self.nodes.clear();
        self.connections.clear();
        info!(nodes, connections, "cleared patch");
    }

    /// Mark `id` as the sole selected node; `None` deselects everything.
    pub fn select_only(&mut self, id: Option<NodeId>) {
        for node in &mut self.nodes {
            node.selected = Some(node.id) == id;
        }
    }

    /// Rebuild a graph from parts that have already been validated
    /// (importer use). Id allocation continues above the highest id present.
    pub(crate) fn from_parts(nodes: Vec<NodeInstance>, connections: Vec<Connection>) -> Self {
        let next_node_id = nodes.iter().map(|n| n.id.0 + 1).max().unwrap_or(0);
        let next_connection_id = connections.iter().map(|c| c.id.0 + 1).max().unwrap_or(0);
        Self {
            nodes,
            connections,
            next_node_id,
            next_connection_id,
        }
    }
}
