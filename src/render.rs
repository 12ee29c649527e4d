//! Pure frame description.
//!
//! [`render`] walks the graph and view and emits a flat list of
//! [`DrawCommand`]s in back-to-front paint order. The crate never touches a
//! drawing surface; hosts replay the commands on whatever canvas they own.
//! All geometry in the output is in screen coordinates, and stroke widths,
//! port radii and font sizes are screen-constant so they do not fatten or
//! vanish with zoom.

use crate::controller::{DragState, InteractionController};
use crate::graph::PatchGraph;
use crate::grid::{grid_lines, GRID_SPACING};
use crate::hit_test::port_anchor;
use crate::path::{CubicBezier, BEZIER_MIN_OFFSET};
use crate::registry::{Color, NodeTypeRegistry, PortDirection};
use crate::view::{Point, Size, ViewTransform};

/// Canvas background.
pub const BACKGROUND_COLOR: Color = Color::rgb(0x1a, 0x1a, 0x1a);
/// Background grid lines.
pub const GRID_COLOR: Color = Color::rgb(0x2a, 0x2a, 0x2a);
/// Established connection wires.
pub const CONNECTION_COLOR: Color = Color::rgb(100, 180, 255);
/// In-progress connection preview.
pub const PREVIEW_COLOR: Color = Color::rgb(0xa0, 0xa0, 0xa0);
/// Unselected node border.
pub const BORDER_COLOR: Color = Color::rgb(0x44, 0x44, 0x44);
/// Selected node border; matches the wire accent.
pub const SELECTED_BORDER_COLOR: Color = CONNECTION_COLOR;
/// Input port dots.
pub const INPUT_PORT_COLOR: Color = Color::rgb(0xff, 0x44, 0x44);
/// Output port dots.
pub const OUTPUT_PORT_COLOR: Color = Color::rgb(0x44, 0xff, 0x44);

const CONNECTION_WIDTH: f32 = 2.0;
const PORT_RADIUS: f32 = 4.0;
const TITLE_FONT_SIZE: f32 = 12.0;
const LABEL_FONT_SIZE: f32 = 10.0;

/// One primitive for the host to draw. Coordinates are screen-space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear { color: Color },
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
        dashed: bool,
    },
    Rect {
        origin: Point,
        size: Size,
        fill: Color,
    },
    RectOutline {
        origin: Point,
        size: Size,
        width: f32,
        color: Color,
    },
    /// Cubic bezier stroke through the four control points.
    Curve {
        p0: Point,
        p1: Point,
        p2: Point,
        p3: Point,
        width: f32,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Color,
    },
    Text {
        origin: Point,
        size: f32,
        color: Color,
        text: String,
    },
}

/// Describe one frame.
///
/// Paint order: background, grid, connection wires, nodes (oldest first, so
/// newer nodes draw on top), then the dashed connection preview if a drag is
/// in progress.
pub fn render(
    graph: &PatchGraph,
    registry: &NodeTypeRegistry,
    view: &ViewTransform,
    controller: &InteractionController,
    surface: Size,
) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        color: BACKGROUND_COLOR,
    }];

    let pan_screen = Point::new(view.pan.x * view.zoom(), view.pan.y * view.zoom());
    for (from, to) in grid_lines(surface, view.zoom(), pan_screen.x, pan_screen.y, GRID_SPACING) {
        commands.push(DrawCommand::Line {
            from,
            to,
            width: 1.0,
            color: GRID_COLOR,
            dashed: false,
        });
    }

    for connection in graph.connections() {
        let anchors = connection_anchors(graph, registry, connection);
        let Some((start, end)) = anchors else { continue };
        let curve = CubicBezier::from_endpoints(start, end, BEZIER_MIN_OFFSET);
        commands.push(DrawCommand::Curve {
            p0: view.to_screen(curve.p0),
            p1: view.to_screen(curve.p1),
            p2: view.to_screen(curve.p2),
            p3: view.to_screen(curve.p3),
            width: CONNECTION_WIDTH,
            color: CONNECTION_COLOR,
        });
    }

    for node in graph.nodes() {
        let Some(descriptor) = registry.get(node.kind) else {
            continue;
        };
        let text_color = descriptor.color.contrast_text();
        let origin = view.to_screen(node.position);
        let size = Size::new(node.size.width * view.zoom(), node.size.height * view.zoom());

        commands.push(DrawCommand::Rect {
            origin,
            size,
            fill: descriptor.color,
        });
        commands.push(DrawCommand::RectOutline {
            origin,
            size,
            width: if node.selected { 3.0 } else { 1.0 },
            color: if node.selected {
                SELECTED_BORDER_COLOR
            } else {
                BORDER_COLOR
            },
        });
        commands.push(DrawCommand::Text {
            origin: view.to_screen(node.position + Point::new(8.0, 16.0)),
            size: TITLE_FONT_SIZE,
            color: text_color,
            text: descriptor.name.to_string(),
        });

        for (index, name) in descriptor.inputs.iter().enumerate() {
            let anchor = port_anchor(node, PortDirection::Input, index);
            commands.push(DrawCommand::Circle {
                center: view.to_screen(anchor),
                radius: PORT_RADIUS,
                fill: INPUT_PORT_COLOR,
            });
            commands.push(DrawCommand::Text {
                origin: view.to_screen(Point::new(node.position.x + 12.0, anchor.y + 3.0)),
                size: LABEL_FONT_SIZE,
                color: text_color,
                text: name.to_string(),
            });
        }
        for (index, name) in descriptor.outputs.iter().enumerate() {
            let anchor = port_anchor(node, PortDirection::Output, index);
            commands.push(DrawCommand::Circle {
                center: view.to_screen(anchor),
                radius: PORT_RADIUS,
                fill: OUTPUT_PORT_COLOR,
            });
            commands.push(DrawCommand::Text {
                origin: view.to_screen(Point::new(
                    node.position.x + node.size.width - 50.0,
                    anchor.y + 3.0,
                )),
                size: LABEL_FONT_SIZE,
                color: text_color,
                text: name.to_string(),
            });
        }
    }

    if let DragState::DraggingConnection {
        origin_node,
        origin_port,
        pointer,
    } = *controller.drag()
    {
        if let Some(node) = graph.node(origin_node) {
            let anchor = port_anchor(node, origin_port.direction, origin_port.index);
            commands.push(DrawCommand::Line {
                from: view.to_screen(anchor),
                to: view.to_screen(pointer),
                width: CONNECTION_WIDTH,
                color: PREVIEW_COLOR,
                dashed: true,
            });
        }
    }

    commands
}

/// World-space wire endpoints for a connection: source output anchor to
/// target input anchor. `None` if either endpoint cannot be resolved.
fn connection_anchors(
    graph: &PatchGraph,
    registry: &NodeTypeRegistry,
    connection: &crate::graph::Connection,
) -> Option<(Point, Point)> {
    let source = graph.node(connection.source_node)?;
    let target = graph.node(connection.target_node)?;
    let source_index = registry
        .get(source.kind)?
        .output_index(&connection.source_port)?;
    let target_index = registry
        .get(target.kind)?
        .input_index(&connection.target_port)?;
    Some((
        port_anchor(source, PortDirection::Output, source_index),
        port_anchor(target, PortDirection::Input, target_index),
    ))
}
