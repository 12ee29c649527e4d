//! Static catalog of node archetypes.
//!
//! The host supplies a [`NodeTypeRegistry`] at startup; [`NodeTypeRegistry::standard`]
//! registers the full modular-synth palette. Descriptors are never mutated after
//! registration, and node kinds form a closed enum so graph code can match on
//! them exhaustively while the registry itself stays data-driven.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The archetype of a node instance.
///
/// Closed set: every kind the editor can ever place is listed here. Whether a
/// kind is *available* in a given session is decided by the registry the host
/// supplies, which may be a subset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Oscillator,
    Filter,
    Envelope,
    Lfo,
    Mixer,
    Delay,
    Reverb,
    Output,
}

impl NodeKind {
    /// All kinds, in palette order.
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Oscillator,
        NodeKind::Filter,
        NodeKind::Envelope,
        NodeKind::Lfo,
        NodeKind::Mixer,
        NodeKind::Delay,
        NodeKind::Reverb,
        NodeKind::Output,
    ];

    /// Stable identifier used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Oscillator => "oscillator",
            NodeKind::Filter => "filter",
            NodeKind::Envelope => "envelope",
            NodeKind::Lfo => "lfo",
            NodeKind::Mixer => "mixer",
            NodeKind::Delay => "delay",
            NodeKind::Reverb => "reverb",
            NodeKind::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Palette grouping for node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Generators,
    Effects,
    Control,
}

/// Whether a port accepts or produces signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    pub fn opposite(&self) -> PortDirection {
        match self {
            PortDirection::Input => PortDirection::Output,
            PortDirection::Output => PortDirection::Input,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => f.write_str("input"),
            PortDirection::Output => f.write_str("output"),
        }
    }
}

/// Opaque RGB color carried by descriptors and draw commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black or white, whichever reads better against this color.
    ///
    /// Uses the perceived-brightness weighting (299/587/114) so node titles
    /// and port labels stay legible on any body color.
    pub fn contrast_text(&self) -> Color {
        let brightness =
            (self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000;
        if brightness > 128 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

/// A parameter value: numeric, or one of an enumerated set of choices
/// (waveform names, filter types).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Choice(String),
}

impl ParamValue {
    pub fn number(n: f64) -> Self {
        ParamValue::Number(n)
    }

    pub fn choice(s: &str) -> Self {
        ParamValue::Choice(s.to_string())
    }
}

/// Default value for a parameter name.
///
/// Shared across kinds; unknown names fall back to 0.5.
pub fn default_parameter_value(name: &str) -> ParamValue {
    match name {
        "frequency" => ParamValue::Number(440.0),
        "waveform" => ParamValue::choice("sine"),
        "amplitude" => ParamValue::Number(0.5),
        "resonance" => ParamValue::Number(1.0),
        "type" => ParamValue::choice("lowpass"),
        "attack" => ParamValue::Number(0.01),
        "decay" => ParamValue::Number(0.1),
        "sustain" => ParamValue::Number(0.5),
        "release" => ParamValue::Number(0.5),
        "time" => ParamValue::Number(0.3),
        "feedback" => ParamValue::Number(0.4),
        "mix" => ParamValue::Number(0.5),
        "size" => ParamValue::Number(0.8),
        "damping" => ParamValue::Number(0.2),
        "volume" => ParamValue::Number(0.8),
        "pan" => ParamValue::Number(0.0),
        "level_1" | "level_2" | "level_3" | "level_4" => ParamValue::Number(0.5),
        _ => ParamValue::Number(0.5),
    }
}

/// Immutable description of a node archetype: display name, port lists in
/// declaration order, body color and parameter names.
#[derive(Clone, Copy, Debug)]
pub struct NodeTypeDescriptor {
    pub kind: NodeKind,
    pub name: &'static str,
    pub category: Category,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub color: Color,
    pub parameters: &'static [&'static str],
}

impl NodeTypeDescriptor {
    /// Position of `name` in this kind's input port list.
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|p| *p == name)
    }

    /// Position of `name` in this kind's output port list.
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|p| *p == name)
    }

    /// Port list for one direction.
    pub fn ports(&self, direction: PortDirection) -> &'static [&'static str] {
        match direction {
            PortDirection::Input => self.inputs,
            PortDirection::Output => self.outputs,
        }
    }

    /// Fresh parameter map populated from the defaults table.
    pub fn default_parameters(&self) -> BTreeMap<String, ParamValue> {
        self.parameters
            .iter()
            .map(|name| (name.to_string(), default_parameter_value(name)))
            .collect()
    }
}

/// The standard modular-synth palette.
pub const STANDARD_NODE_TYPES: [NodeTypeDescriptor; 8] = [
    NodeTypeDescriptor {
        kind: NodeKind::Oscillator,
        name: "Oscillator",
        category: Category::Generators,
        inputs: &[],
        outputs: &["audio_out"],
        color: Color::rgb(0x44, 0x44, 0xff),
        parameters: &["frequency", "waveform", "amplitude"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Filter,
        name: "Filter",
        category: Category::Effects,
        inputs: &["audio_in"],
        outputs: &["audio_out"],
        color: Color::rgb(0x44, 0xff, 0x44),
        parameters: &["frequency", "resonance", "type"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Envelope,
        name: "Envelope",
        category: Category::Control,
        inputs: &["trigger"],
        outputs: &["envelope_out"],
        color: Color::rgb(0xff, 0xff, 0x44),
        parameters: &["attack", "decay", "sustain", "release"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Lfo,
        name: "LFO",
        category: Category::Control,
        inputs: &[],
        outputs: &["lfo_out"],
        color: Color::rgb(0xff, 0x44, 0xff),
        parameters: &["frequency", "waveform", "amplitude"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Mixer,
        name: "Mixer",
        category: Category::Effects,
        inputs: &["audio_in_1", "audio_in_2", "audio_in_3", "audio_in_4"],
        outputs: &["audio_out"],
        color: Color::rgb(0xff, 0x88, 0x44),
        parameters: &["level_1", "level_2", "level_3", "level_4"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Delay,
        name: "Delay",
        category: Category::Effects,
        inputs: &["audio_in"],
        outputs: &["audio_out"],
        color: Color::rgb(0x44, 0xff, 0xff),
        parameters: &["time", "feedback", "mix"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Reverb,
        name: "Reverb",
        category: Category::Effects,
        inputs: &["audio_in"],
        outputs: &["audio_out"],
        color: Color::rgb(0x88, 0x44, 0xff),
        parameters: &["size", "damping", "mix"],
    },
    NodeTypeDescriptor {
        kind: NodeKind::Output,
        name: "Output",
        category: Category::Effects,
        inputs: &["audio_in"],
        outputs: &[],
        color: Color::rgb(0xff, 0x44, 0x44),
        parameters: &["volume", "pan"],
    },
];

/// Registry of the node kinds available in this session.
///
/// Insertion-ordered so palette UIs can iterate it as supplied.
#[derive(Clone, Debug, Default)]
pub struct NodeTypeRegistry {
    descriptors: Vec<NodeTypeDescriptor>,
}

impl NodeTypeRegistry {
    /// Empty registry; kinds must be registered before nodes can be created.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the full standard palette.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for descriptor in STANDARD_NODE_TYPES {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a descriptor. Re-registering a kind replaces its descriptor.
    pub fn register(&mut self, descriptor: NodeTypeDescriptor) {
        if let Some(existing) = self
            .descriptors
            .iter_mut()
            .find(|d| d.kind == descriptor.kind)
        {
            *existing = descriptor;
        } else {
            self.descriptors.push(descriptor);
        }
    }

    pub fn get(&self, kind: NodeKind) -> Option<&NodeTypeDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeTypeDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
