//! Shared helpers for the integration tests.

use patchbay::{
    NodeId, NodeKind, NodeTypeRegistry, PatchEditor, Point, PortDirection,
};

/// Vertical offset of the first port below a node's top edge.
pub const PORT_TOP: f32 = 20.0;
/// Vertical pitch between stacked ports.
pub const PORT_STEP: f32 = 15.0;

/// Editor over the standard palette with the given nodes placed at world
/// positions (zoom 1, no pan, so screen == world at setup time).
pub fn editor_with_nodes(nodes: &[(NodeKind, f32, f32)]) -> (PatchEditor, Vec<NodeId>) {
    let mut editor = PatchEditor::new(NodeTypeRegistry::standard());
    let ids = nodes
        .iter()
        .map(|(kind, x, y)| {
            editor
                .add_node_at(*kind, Point::new(*x, *y))
                .expect("standard registry contains all kinds")
        })
        .collect();
    (editor, ids)
}

/// World position of a port on a node, derived from its current position.
pub fn port_point(
    editor: &PatchEditor,
    node: NodeId,
    direction: PortDirection,
    index: usize,
) -> Point {
    let instance = editor.graph().node(node).expect("node exists");
    let x = match direction {
        PortDirection::Input => instance.position.x,
        PortDirection::Output => instance.position.x + instance.size.width,
    };
    Point::new(x, instance.position.y + PORT_TOP + index as f32 * PORT_STEP)
}

/// Drag a connection from an output port to an input port, screen == world.
pub fn wire(editor: &mut PatchEditor, from: NodeId, to: NodeId, input_index: usize) {
    let start = port_point(editor, from, PortDirection::Output, 0);
    let end = port_point(editor, to, PortDirection::Input, input_index);
    editor.pointer_down(start);
    editor.pointer_move(end);
    editor
        .pointer_up(end)
        .expect("drag between compatible ports connects");
}
