//! Level 4: Rendering Tests
//!
//! Frame description through the editor facade: paint order, screen-space
//! geometry and the connection drag preview.

mod common;

use common::harness::{editor_with_nodes, port_point};
use patchbay::{DrawCommand, NodeKind, Point, PortDirection, Size};

const SURFACE: Size = Size {
    width: 800.0,
    height: 600.0,
};

fn kind_index(commands: &[DrawCommand], f: impl Fn(&DrawCommand) -> bool) -> Option<usize> {
    commands.iter().position(f)
}

#[test]
fn test_paint_order_background_grid_wires_nodes() {
    let (mut editor, ids) = editor_with_nodes(&[
        (NodeKind::Oscillator, 100.0, 100.0),
        (NodeKind::Filter, 350.0, 100.0),
    ]);
    common::harness::wire(&mut editor, ids[0], ids[1], 0);

    let commands = editor.render(SURFACE);

    let clear = kind_index(&commands, |c| matches!(c, DrawCommand::Clear { .. })).unwrap();
    let grid = kind_index(&commands, |c| matches!(c, DrawCommand::Line { dashed: false, .. }))
        .unwrap();
    let curve = kind_index(&commands, |c| matches!(c, DrawCommand::Curve { .. })).unwrap();
    let body = kind_index(&commands, |c| matches!(c, DrawCommand::Rect { .. })).unwrap();

    assert_eq!(clear, 0);
    assert!(grid < curve, "grid paints under wires");
    assert!(curve < body, "wires paint under nodes");
}

#[test]
fn test_each_node_contributes_body_title_and_port_dots() {
    let (editor, _ids) = editor_with_nodes(&[(NodeKind::Mixer, 100.0, 100.0)]);
    let commands = editor.render(SURFACE);

    let bodies = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Rect { .. }))
        .count();
    let circles = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Circle { .. }))
        .count();
    let texts: Vec<&String> = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        })
        .collect();

    assert_eq!(bodies, 1);
    // 4 inputs + 1 output.
    assert_eq!(circles, 5);
    // Title plus 5 port labels.
    assert_eq!(texts.len(), 6);
    assert!(texts.iter().any(|t| t.as_str() == "Mixer"));
    assert!(texts.iter().any(|t| t.as_str() == "audio_in_3"));
}

#[test]
fn test_geometry_is_screen_space() {
    let (mut editor, _ids) = editor_with_nodes(&[(NodeKind::Oscillator, 100.0, 100.0)]);
    editor.zoom_by(2.0);
    editor.pan_by(Point::new(10.0, 0.0));

    let commands = editor.render(SURFACE);
    let (origin, size) = commands
        .iter()
        .find_map(|c| match c {
            DrawCommand::Rect { origin, size, .. } => Some((*origin, *size)),
            _ => None,
        })
        .unwrap();

    // world (100, 100) with pan (10, 0) at zoom 2 -> screen (220, 200).
    assert_eq!(origin, Point::new(220.0, 200.0));
    assert_eq!(size.width, 240.0);
    assert_eq!(size.height, 160.0);
}

#[test]
fn test_preview_line_tracks_pointer_during_connection_drag() {
    let (mut editor, ids) = editor_with_nodes(&[(NodeKind::Oscillator, 100.0, 100.0)]);

    let start = port_point(&editor, ids[0], PortDirection::Output, 0);
    editor.pointer_down(start);
    editor.pointer_move(Point::new(500.0, 320.0));

    let commands = editor.render(SURFACE);
    let preview = commands.iter().find_map(|c| match c {
        DrawCommand::Line {
            dashed: true,
            from,
            to,
            ..
        } => Some((*from, *to)),
        _ => None,
    });

    let (from, to) = preview.expect("dashed preview while dragging a wire");
    assert_eq!(from, start);
    assert_eq!(to, Point::new(500.0, 320.0));
}

#[test]
fn test_no_preview_after_release() {
    let (mut editor, ids) = editor_with_nodes(&[(NodeKind::Oscillator, 100.0, 100.0)]);

    let start = port_point(&editor, ids[0], PortDirection::Output, 0);
    editor.pointer_down(start);
    editor.pointer_up(Point::new(500.0, 320.0));

    let commands = editor.render(SURFACE);
    assert!(!commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Line { dashed: true, .. })));
}

#[test]
fn test_zoomed_out_frame_drops_the_grid() {
    let (mut editor, _ids) = editor_with_nodes(&[(NodeKind::Oscillator, 100.0, 100.0)]);
    editor.set_zoom(0.1);

    let commands = editor.render(SURFACE);
    assert!(!commands
        .iter()
        .any(|c| matches!(c, DrawCommand::Line { dashed: false, .. })));
    // The node itself still renders, tiny.
    assert!(commands.iter().any(|c| matches!(c, DrawCommand::Rect { .. })));
}
