//! Patch persistence.
//!
//! [`export`] snapshots a graph and view into a [`PatchDocument`], a plain
//! serde value the host can store wherever it likes; [`to_json`]/[`from_json`]
//! wrap the common JSON case. [`import`] is the inverse and validates the
//! whole document before constructing anything, so a bad document can never
//! leave the editor half-updated.
//!
//! Selection state is deliberately not persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::PatchError;
use crate::graph::{Connection, ConnectionId, NodeId, NodeInstance, PatchGraph};
use crate::graph::{NODE_HEIGHT, NODE_WIDTH};
use crate::registry::{NodeKind, NodeTypeRegistry, ParamValue};
use crate::view::{Point, Size, ViewTransform};

/// Persisted form of one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: NodeKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

/// Persisted form of one connection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: ConnectionId,
    pub source_node: NodeId,
    pub source_port: String,
    pub target_node: NodeId,
    pub target_port: String,
}

/// A complete saved patch: graph content plus the view the user left it in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchDocument {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub pan: Point,
    pub zoom: f32,
}

impl PatchDocument {
    /// Pretty-printed JSON, the on-disk format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a document from JSON. Syntactic failures become
    /// [`PatchError::MalformedDocument`]; semantic validation happens in
    /// [`import`].
    pub fn from_json(json: &str) -> Result<Self, PatchError> {
        serde_json::from_str(json).map_err(|e| PatchError::MalformedDocument(e.to_string()))
    }
}

/// Snapshot the graph and view. Never fails: a live graph is always
/// serializable.
pub fn export(graph: &PatchGraph, view: &ViewTransform) -> PatchDocument {
    PatchDocument {
        nodes: graph
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                id: node.id,
                kind: node.kind,
                x: node.position.x,
                y: node.position.y,
                parameters: node.parameters.clone(),
            })
            .collect(),
        connections: graph
            .connections()
            .iter()
            .map(|connection| ConnectionRecord {
                id: connection.id,
                source_node: connection.source_node,
                source_port: connection.source_port.clone(),
                target_node: connection.target_node,
                target_port: connection.target_port.clone(),
            })
            .collect(),
        pan: view.pan,
        zoom: view.zoom(),
    }
}

/// Rebuild a graph and view from a document.
///
/// All-or-nothing: every record is validated against the registry and the
/// document's own node set before any graph state is built. Any problem is
/// reported as [`PatchError::MalformedDocument`] naming the offending record.
/// Parameters a record omits are filled from the kind's defaults; parameter
/// names the kind does not declare are rejected.
pub fn import(
    registry: &NodeTypeRegistry,
    document: &PatchDocument,
) -> Result<(PatchGraph, ViewTransform), PatchError> {
    let mut nodes: Vec<NodeInstance> = Vec::with_capacity(document.nodes.len());
    for record in &document.nodes {
        let descriptor = registry.get(record.kind).ok_or_else(|| {
            PatchError::MalformedDocument(format!(
                "node {} has unregistered kind `{}`",
                record.id, record.kind
            ))
        })?;
        if nodes.iter().any(|n| n.id == record.id) {
            return Err(PatchError::MalformedDocument(format!(
                "duplicate node id {}",
                record.id
            )));
        }
        for name in record.parameters.keys() {
            if !descriptor.parameters.contains(&name.as_str()) {
                return Err(PatchError::MalformedDocument(format!(
                    "node {} has unknown parameter `{name}` for kind `{}`",
                    record.id, record.kind
                )));
            }
        }

        let mut parameters = descriptor.default_parameters();
        for (name, value) in &record.parameters {
            parameters.insert(name.clone(), value.clone());
        }
        nodes.push(NodeInstance {
            id: record.id,
            kind: record.kind,
            position: Point::new(record.x, record.y),
            size: Size::new(NODE_WIDTH, NODE_HEIGHT),
            parameters,
            selected: false,
        });
    }

    let mut connections: Vec<Connection> = Vec::with_capacity(document.connections.len());
    for record in &document.connections {
        if connections.iter().any(|c| c.id == record.id) {
            return Err(PatchError::MalformedDocument(format!(
                "duplicate connection id {}",
                record.id
            )));
        }
        if record.source_node == record.target_node {
            return Err(PatchError::MalformedDocument(format!(
                "connection {} loops node {} onto itself",
                record.id, record.source_node
            )));
        }
        let source = nodes.iter().find(|n| n.id == record.source_node).ok_or_else(|| {
            PatchError::MalformedDocument(format!(
                "connection {} references missing node {}",
                record.id, record.source_node
            ))
        })?;
        let target = nodes.iter().find(|n| n.id == record.target_node).ok_or_else(|| {
            PatchError::MalformedDocument(format!(
                "connection {} references missing node {}",
                record.id, record.target_node
            ))
        })?;

        // Kinds were resolved above, so these lookups cannot fail.
        let valid_source = registry
            .get(source.kind)
            .map(|d| d.output_index(&record.source_port).is_some())
            .unwrap_or(false);
        if !valid_source {
            return Err(PatchError::MalformedDocument(format!(
                "connection {}: `{}` is not an output of `{}`",
                record.id, record.source_port, source.kind
            )));
        }
        let valid_target = registry
            .get(target.kind)
            .map(|d| d.input_index(&record.target_port).is_some())
            .unwrap_or(false);
        if !valid_target {
            return Err(PatchError::MalformedDocument(format!(
                "connection {}: `{}` is not an input of `{}`",
                record.id, record.target_port, target.kind
            )));
        }

        if connections.iter().any(|c| {
            c.source_node == record.source_node
                && c.source_port == record.source_port
                && c.target_node == record.target_node
                && c.target_port == record.target_port
        }) {
            return Err(PatchError::MalformedDocument(format!(
                "duplicate connection {} -> {} ({} -> {})",
                record.source_node, record.target_node, record.source_port, record.target_port
            )));
        }

        connections.push(Connection {
            id: record.id,
            source_node: record.source_node,
            source_port: record.source_port.clone(),
            target_node: record.target_node,
            target_port: record.target_port.clone(),
        });
    }

    if !document.zoom.is_finite() || document.zoom <= 0.0 {
        return Err(PatchError::MalformedDocument(format!(
            "zoom {} is not a positive finite number",
            document.zoom
        )));
    }

    let graph = PatchGraph::from_parts(nodes, connections);
    let mut view = ViewTransform::new();
    view.pan = document.pan;
    view.set_zoom(document.zoom);

    info!(
        nodes = graph.nodes().len(),
        connections = graph.connections().len(),
        "imported patch"
    );
    Ok((graph, view))
}
