use geo::Point;
use serde::{Deserialize, Serialize};

use crate::design::rules::LayerRule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignFile {
    pub layers: Vec<LayerRule>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Pin {
        name: String,
        pos: Point,
        kind: PinKind,
        #[serde(default)]
        exported: bool,
    },
    Instance {
        name: String,
        cell: String,
        pos: Point,
        ports: Vec<Port>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    Unrouted,
    Universal,
    Layer(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub offset: Point,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub name: String,
    pub from: PortRef,
    pub to: PortRef,
    /// Absent on wires still to be routed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default)]
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    pub node: String,
    /// Only instances have named ports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}
