use enum_dispatch::enum_dispatch;
use geo::Point;
use petgraph::stable_graph::EdgeIndex;
use serde::{Deserialize, Serialize};

use crate::graph::{GenericIndex, GetPetgraphIndex};

#[enum_dispatch]
pub trait GetPos {
    fn pos(&self) -> Point;
}

#[enum_dispatch]
pub trait SetPos {
    fn set_pos(&mut self, pos: Point);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Relays an unrouted wire without terminating it.
    Unrouted,
    /// Relays any wire, connects to every layer.
    Universal,
    /// A pin on one routing layer.
    Layer(usize),
}

impl PinKind {
    pub fn is_pass_through(&self) -> bool {
        matches!(self, PinKind::Unrouted | PinKind::Universal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinWeight {
    pub pos: Point,
    pub kind: PinKind,
    /// Attached to something outside the design, so never garbage-collected.
    pub exported: bool,
}

impl GetPos for PinWeight {
    fn pos(&self) -> Point {
        self.pos
    }
}

impl SetPos for PinWeight {
    fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortWeight {
    pub name: String,
    pub offset: Point,
    pub layers: Vec<usize>,
}

/// A placed subcell. Its ports move together with it.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceWeight {
    pub cell: String,
    pub pos: Point,
    pub ports: Vec<PortWeight>,
}

impl GetPos for InstanceWeight {
    fn pos(&self) -> Point {
        self.pos
    }
}

impl SetPos for InstanceWeight {
    fn set_pos(&mut self, pos: Point) {
        self.pos = pos;
    }
}

#[enum_dispatch(GetPos, SetPos)]
#[derive(Debug, Clone, PartialEq)]
pub enum NodeWeight {
    Pin(PinWeight),
    Instance(InstanceWeight),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireKind {
    Unrouted,
    Layer(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireWeight {
    pub kind: WireKind,
    pub width: f64,
    /// Port used on the node at each end of the wire, in edge endpoint order.
    pub ports: [usize; 2],
}

pub type PinIndex = GenericIndex<PinWeight>;
pub type InstanceIndex = GenericIndex<InstanceWeight>;
pub type WireIndex = EdgeIndex<usize>;

#[enum_dispatch(GetPetgraphIndex)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeIndex {
    Pin(PinIndex),
    Instance(InstanceIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortIndex {
    pub node: NodeIndex,
    pub port: usize,
}

impl PortIndex {
    pub fn new(node: impl Into<NodeIndex>, port: usize) -> Self {
        Self {
            node: node.into(),
            port,
        }
    }
}

impl From<PinIndex> for PortIndex {
    fn from(pin: PinIndex) -> Self {
        Self::new(pin, 0)
    }
}
