//! Headless core for node-based audio patching editors.
//!
//! `patchbay` owns the data model and interaction logic of a modular-synth
//! patching surface and leaves the pixels to the host: every frame is
//! described as a list of [`DrawCommand`]s for the embedding UI to replay on
//! its own canvas.
//!
//! # Core components
//!
//! - [`NodeTypeRegistry`] — the palette of available node archetypes and
//!   their ports, colors and parameter defaults
//! - [`PatchGraph`] — nodes and connections with validated mutation
//! - [`ViewTransform`] — pan/zoom mapping between screen and world space
//! - [`InteractionController`] — pointer state machine for dragging nodes
//!   and wiring connections
//! - [`PatchEditor`] — the facade bundling all of the above
//! - [`PatchDocument`] — serde-backed persistence with validated import
//!
//! # Example
//!
//! ```
//! use patchbay::{NodeKind, NodeTypeRegistry, PatchEditor, Point, Size};
//!
//! let mut editor = PatchEditor::with_default_patch(NodeTypeRegistry::standard())?;
//! editor.add_node_at(NodeKind::Reverb, Point::new(400.0, 300.0))?;
//!
//! // Forward pointer events from the host UI...
//! editor.pointer_down(Point::new(160.0, 140.0));
//! editor.pointer_up(Point::new(160.0, 140.0));
//!
//! // ...and replay the frame however you draw.
//! for command in editor.render(Size::new(800.0, 600.0)) {
//!     let _ = command;
//! }
//!
//! let saved = editor.export().to_json().map_err(|e| {
//!     patchbay::PatchError::MalformedDocument(e.to_string())
//! })?;
//! # let _ = saved;
//! # Ok::<(), patchbay::PatchError>(())
//! ```

pub mod controller;
pub mod error;
pub mod graph;
pub mod grid;
pub mod path;
pub mod registry;
pub mod render;
pub mod serialize;
pub mod view;

pub use controller::{DragState, InteractionController, PatchEditor};
pub use error::PatchError;
pub use graph::{
    Connection, ConnectionId, NodeId, NodeInstance, PatchGraph, NODE_HEIGHT, NODE_WIDTH,
};
pub use hit_test::{node_at, port_anchor, port_at, PortRef, PORT_HIT_RADIUS};
pub use path::CubicBezier;
pub use registry::{
    Category, Color, NodeKind, NodeTypeDescriptor, NodeTypeRegistry, ParamValue, PortDirection,
    STANDARD_NODE_TYPES,
};
pub use render::{render, DrawCommand};
pub use serialize::{export, import, ConnectionRecord, NodeRecord, PatchDocument};
pub use view::{Point, Size, ViewTransform, MAX_ZOOM, MIN_ZOOM};
