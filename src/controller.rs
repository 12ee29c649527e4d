//! Pointer interaction state machine and the top-level editor facade.
//!
//! [`InteractionController`] turns raw pointer events into graph mutations:
//! selecting and dragging nodes, and dragging new connections out of ports.
//! It never panics on stale state; if the node under a drag disappears the
//! drag is silently abandoned.
//!
//! [`PatchEditor`] bundles the graph, view transform, registry and controller
//! into the single object a host embeds.

use tracing::{debug, warn};

use crate::error::PatchError;
use crate::graph::{ConnectionId, NodeId, PatchGraph};
use crate::hit_test::{self, PortRef};
use crate::registry::{NodeKind, NodeTypeRegistry, PortDirection};
use crate::render::{self, DrawCommand};
use crate::serialize::{self, PatchDocument};
use crate::view::{Point, Size, ViewTransform};

/// What the pointer is currently doing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    /// Moving a node; `grab_offset` is pointer minus node origin at grab
    /// time, in world units, so the node does not jump under the cursor.
    DraggingNode { node: NodeId, grab_offset: Point },
    /// Dragging a new connection out of a port. `pointer` is the current
    /// pointer position in world coordinates, for preview rendering.
    DraggingConnection {
        origin_node: NodeId,
        origin_port: PortRef,
        pointer: Point,
    },
}

/// Translates pointer events into graph edits.
#[derive(Clone, Debug)]
pub struct InteractionController {
    drag: DragState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            drag: DragState::Idle,
        }
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn is_idle(&self) -> bool {
        self.drag == DragState::Idle
    }

    /// Abandon any drag in progress. Called after imports and clears, when
    /// the state the drag referred to no longer exists.
    pub fn reset(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Pointer pressed at `screen`.
    ///
    /// Hit-tests ports before the node body: a press on a port starts a
    /// connection drag, a press elsewhere on a node starts a node drag and
    /// selects it, and a press on empty canvas clears the selection.
    pub fn pointer_down(
        &mut self,
        graph: &mut PatchGraph,
        registry: &NodeTypeRegistry,
        view: &ViewTransform,
        screen: Point,
    ) {
        let world = view.to_world(screen);

        let Some(node) = hit_test::node_at(graph, world) else {
            graph.select_only(None);
            self.drag = DragState::Idle;
            return;
        };
        let node_id = node.id;
        let position = node.position;
        let port = registry
            .get(node.kind)
            .and_then(|descriptor| hit_test::port_at(node, descriptor, world, view.zoom()));

        graph.select_only(Some(node_id));

        self.drag = match port {
            Some(origin_port) => {
                debug!(node = %node_id, port = origin_port.name, "start connection drag");
                DragState::DraggingConnection {
                    origin_node: node_id,
                    origin_port,
                    pointer: world,
                }
            }
            None => DragState::DraggingNode {
                node: node_id,
                grab_offset: world - position,
            },
        };
    }

    /// Pointer moved to `screen` while pressed.
    pub fn pointer_move(&mut self, graph: &mut PatchGraph, view: &ViewTransform, screen: Point) {
        let world = view.to_world(screen);
        match self.drag {
            DragState::Idle => {}
            DragState::DraggingNode { node, grab_offset } => {
                match graph.node_mut(node) {
                    Some(instance) => instance.position = world - grab_offset,
                    // Node was deleted mid-drag.
                    None => self.drag = DragState::Idle,
                }
            }
            DragState::DraggingConnection {
                origin_node,
                origin_port,
                ..
            } => {
                if graph.contains_node(origin_node) {
                    self.drag = DragState::DraggingConnection {
                        origin_node,
                        origin_port,
                        pointer: world,
                    };
                } else {
                    self.drag = DragState::Idle;
                }
            }
        }
    }

    /// Pointer released at `screen`.
    ///
    /// Completes a connection drag if the release lands on a compatible port
    /// of another node; otherwise the drag is dropped without effect. Returns
    /// the id of the connection made, if any.
    pub fn pointer_up(
        &mut self,
        graph: &mut PatchGraph,
        registry: &NodeTypeRegistry,
        view: &ViewTransform,
        screen: Point,
    ) -> Option<ConnectionId> {
        let drag = std::mem::replace(&mut self.drag, DragState::Idle);
        let DragState::DraggingConnection {
            origin_node,
            origin_port,
            ..
        } = drag
        else {
            return None;
        };

        let world = view.to_world(screen);
        let target = hit_test::node_at(graph, world)?;
        if target.id == origin_node {
            return None;
        }
        let descriptor = registry.get(target.kind)?;
        let target_port = hit_test::port_at(target, descriptor, world, view.zoom())?;
        if target_port.direction != origin_port.direction.opposite() {
            debug!(
                from = origin_port.name,
                to = target_port.name,
                "connection drag released on same-direction port"
            );
            return None;
        }
        let target_id = target.id;

        // Normalize so the output side is always the source.
        let (source_node, source_port, target_node, target_port) =
            if origin_port.direction == PortDirection::Output {
                (origin_node, origin_port.name, target_id, target_port.name)
            } else {
                (target_id, target_port.name, origin_node, origin_port.name)
            };

        match graph.add_connection(registry, source_node, source_port, target_node, target_port) {
            Ok(connection) => Some(connection.id),
            Err(err) => {
                warn!(%err, "connection drag rejected");
                None
            }
        }
    }
}

/// The complete editor: graph, view, registry and interaction state.
///
/// Hosts forward pointer and wheel events, call [`PatchEditor::render`] each
/// frame, and use [`PatchEditor::export`]/[`PatchEditor::import`] for
/// persistence.
#[derive(Clone, Debug)]
pub struct PatchEditor {
    registry: NodeTypeRegistry,
    graph: PatchGraph,
    view: ViewTransform,
    controller: InteractionController,
}

impl PatchEditor {
    /// Empty editor over the given registry.
    pub fn new(registry: NodeTypeRegistry) -> Self {
        Self {
            registry,
            graph: PatchGraph::new(),
            view: ViewTransform::new(),
            controller: InteractionController::new(),
        }
    }

    /// Editor pre-populated with the starter patch: an oscillator into a
    /// filter into the output.
    pub fn with_default_patch(registry: NodeTypeRegistry) -> Result<Self, PatchError> {
        let mut editor = Self::new(registry);
        let osc = editor
            .graph
            .add_node(&editor.registry, NodeKind::Oscillator, Point::new(100.0, 100.0))?
            .id;
        let filter = editor
            .graph
            .add_node(&editor.registry, NodeKind::Filter, Point::new(300.0, 100.0))?
            .id;
        let output = editor
            .graph
            .add_node(&editor.registry, NodeKind::Output, Point::new(500.0, 100.0))?
            .id;
        editor
            .graph
            .add_connection(&editor.registry, osc, "audio_out", filter, "audio_in")?;
        editor
            .graph
            .add_connection(&editor.registry, filter, "audio_out", output, "audio_in")?;
        Ok(editor)
    }

    pub fn registry(&self) -> &NodeTypeRegistry {
        &self.registry
    }

    pub fn graph(&self) -> &PatchGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut PatchGraph {
        &mut self.graph
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// The selected node, if any.
    pub fn selected_node(&self) -> Option<NodeId> {
        self.graph.nodes().iter().find(|n| n.selected).map(|n| n.id)
    }

    // === Node and connection edits ===

    /// Place a node of `kind` at a screen position (palette drop).
    pub fn add_node_at(&mut self, kind: NodeKind, screen: Point) -> Result<NodeId, PatchError> {
        let world = self.view.to_world(screen);
        Ok(self.graph.add_node(&self.registry, kind, world)?.id)
    }

    /// Remove a node and everything wired to it.
    pub fn remove_node(&mut self, id: NodeId) -> Vec<ConnectionId> {
        if let DragState::DraggingNode { node, .. }
        | DragState::DraggingConnection {
            origin_node: node, ..
        } = *self.controller.drag()
        {
            if node == id {
                self.controller.reset();
            }
        }
        self.graph.remove_node(id)
    }

    /// Remove a single connection (host UI, e.g. a context menu on a wire).
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        self.graph.remove_connection(id)
    }

    /// Empty the patch and drop all interaction state.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.controller.reset();
    }

    // === View ===

    pub fn pan_by(&mut self, delta: Point) {
        self.view.pan_by(delta);
    }

    /// Multiply the zoom by `factor` (wheel events), clamped to the legal
    /// range.
    pub fn zoom_by(&mut self, factor: f32) {
        self.view.zoom_by(factor);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    // === Pointer events (screen coordinates) ===

    pub fn pointer_down(&mut self, screen: Point) {
        self.controller
            .pointer_down(&mut self.graph, &self.registry, &self.view, screen);
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.controller.pointer_move(&mut self.graph, &self.view, screen);
    }

    pub fn pointer_up(&mut self, screen: Point) -> Option<ConnectionId> {
        self.controller
            .pointer_up(&mut self.graph, &self.registry, &self.view, screen)
    }

    // === Rendering and persistence ===

    /// Draw commands for one frame on a surface of the given size.
    pub fn render(&self, surface: Size) -> Vec<DrawCommand> {
        render::render(&self.graph, &self.registry, &self.view, &self.controller, surface)
    }

    /// Snapshot of the patch and view for persistence.
    pub fn export(&self) -> PatchDocument {
        serialize::export(&self.graph, &self.view)
    }

    /// Replace the patch from a document.
    ///
    /// Validation is all-or-nothing: on error the current patch is left
    /// untouched.
    pub fn import(&mut self, document: &PatchDocument) -> Result<(), PatchError> {
        let (graph, view) = serialize::import(&self.registry, document)?;
        self.graph = graph;
        self.view = view;
        self.controller.reset();
        Ok(())
    }
}
