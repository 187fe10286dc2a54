use std::{
    collections::{HashMap, HashSet},
    io::{BufRead, Write},
};

use thiserror::Error;

use crate::{
    design::{
        primitive::{
            InstanceWeight, NodeWeight, PinKind, PinWeight, PortIndex, PortWeight, WireKind,
        },
        rules::{AccessRules, DesignRules},
        Design, DesignError,
    },
    format::structure::{self, DesignFile, Node, PortRef},
    graph::GetPetgraphIndex,
};

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error("unknown layer {0}")]
    UnknownLayer(String),
    #[error("layer {0} has no name")]
    UnnamedLayer(usize),
    #[error("unknown node {0}")]
    UnknownNode(String),
    #[error("node {node} has no port {port}")]
    UnknownPort { node: String, port: String },
}

#[derive(Debug)]
pub struct JsonDesign {
    file: DesignFile,
}

impl JsonDesign {
    pub fn load(reader: impl BufRead) -> Result<Self, FormatError> {
        Ok(Self {
            file: serde_json::from_reader(reader)?,
        })
    }

    pub fn load_from_file(filename: &str) -> Result<Self, FormatError> {
        let file = std::fs::File::open(filename)?;
        Self::load(std::io::BufReader::new(file))
    }

    pub fn write(&self, writer: impl Write) -> Result<(), FormatError> {
        serde_json::to_writer_pretty(writer, &self.file)?;
        Ok(())
    }

    pub fn file(&self) -> &DesignFile {
        &self.file
    }

    pub fn make_design(&self) -> Result<Design<DesignRules>, FormatError> {
        let rules = DesignRules::new(self.file.layers.clone());
        let layer = |name: &str| {
            rules
                .layer(name)
                .ok_or_else(|| FormatError::UnknownLayer(name.to_string()))
        };

        let mut node_weights = Vec::with_capacity(self.file.nodes.len());

        for node in &self.file.nodes {
            node_weights.push(match node {
                Node::Pin {
                    name,
                    pos,
                    kind,
                    exported,
                } => (
                    name.clone(),
                    NodeWeight::Pin(PinWeight {
                        pos: *pos,
                        kind: match kind {
                            structure::PinKind::Unrouted => PinKind::Unrouted,
                            structure::PinKind::Universal => PinKind::Universal,
                            structure::PinKind::Layer(name) => {
                                PinKind::Layer(layer(name.as_str())?)
                            }
                        },
                        exported: *exported,
                    }),
                ),
                Node::Instance {
                    name,
                    cell,
                    pos,
                    ports,
                } => (
                    name.clone(),
                    NodeWeight::Instance(InstanceWeight {
                        cell: cell.clone(),
                        pos: *pos,
                        ports: ports
                            .iter()
                            .map(|port| -> Result<PortWeight, FormatError> {
                                Ok(PortWeight {
                                    name: port.name.clone(),
                                    offset: port.offset,
                                    layers: port
                                        .layers
                                        .iter()
                                        .map(|name| layer(name.as_str()))
                                        .collect::<Result<Vec<_>, _>>()?,
                                })
                            })
                            .collect::<Result<Vec<_>, _>>()?,
                    }),
                ),
            });
        }

        let mut design = Design::new(rules);

        for (name, weight) in node_weights {
            match weight {
                NodeWeight::Pin(pin) => {
                    design.add_pin(pin, Some(name))?;
                }
                NodeWeight::Instance(instance) => {
                    design.add_instance(instance, Some(name))?;
                }
            }
        }

        for wire in &self.file.wires {
            let from = Self::resolve_port(&design, &wire.from)?;
            let to = Self::resolve_port(&design, &wire.to)?;
            let kind = match &wire.layer {
                Some(name) => WireKind::Layer(
                    design
                        .rules()
                        .layer(name)
                        .ok_or_else(|| FormatError::UnknownLayer(name.clone()))?,
                ),
                None => WireKind::Unrouted,
            };

            design.add_wire(from, to, kind, wire.width, Some(wire.name.clone()))?;
        }

        Ok(design)
    }

    fn resolve_port(
        design: &Design<DesignRules>,
        port_ref: &PortRef,
    ) -> Result<PortIndex, FormatError> {
        let node = design
            .nodename_node(&port_ref.node)
            .ok_or_else(|| FormatError::UnknownNode(port_ref.node.clone()))?;

        let port = match (design.node_weight(node), &port_ref.port) {
            (Some(NodeWeight::Instance(instance)), Some(portname)) => instance
                .ports
                .iter()
                .position(|port| &port.name == portname)
                .ok_or_else(|| FormatError::UnknownPort {
                    node: port_ref.node.clone(),
                    port: portname.clone(),
                })?,
            (Some(NodeWeight::Pin(..)), None) => 0,
            (_, portname) => {
                return Err(FormatError::UnknownPort {
                    node: port_ref.node.clone(),
                    port: portname.clone().unwrap_or_default(),
                })
            }
        };

        Ok(PortIndex { node, port })
    }

    /// Captures the current state of `design`. Nodes and wires created
    /// without a name are given one derived from their index.
    pub fn from_design(design: &Design<DesignRules>) -> Result<Self, FormatError> {
        let rules = design.rules();
        let layername = |layer: usize| {
            rules
                .layername(layer)
                .map(str::to_string)
                .ok_or(FormatError::UnnamedLayer(layer))
        };

        let mut taken: HashSet<String> = design
            .nodes()
            .filter_map(|node| design.nodename(node).map(str::to_string))
            .collect();
        let mut nodenames = HashMap::new();
        let mut nodes = vec![];

        for node in design.nodes() {
            let name = match design.nodename(node) {
                Some(name) => name.to_string(),
                None => Self::fresh_name(&mut taken, "pin", node.petgraph_index().index()),
            };
            nodenames.insert(node, name.clone());

            let Some(weight) = design.node_weight(node) else {
                continue;
            };

            nodes.push(match weight {
                NodeWeight::Pin(pin) => Node::Pin {
                    name,
                    pos: pin.pos,
                    kind: match pin.kind {
                        PinKind::Unrouted => structure::PinKind::Unrouted,
                        PinKind::Universal => structure::PinKind::Universal,
                        PinKind::Layer(layer) => structure::PinKind::Layer(layername(layer)?),
                    },
                    exported: pin.exported,
                },
                NodeWeight::Instance(instance) => Node::Instance {
                    name,
                    cell: instance.cell.clone(),
                    pos: instance.pos,
                    ports: instance
                        .ports
                        .iter()
                        .map(|port| -> Result<structure::Port, FormatError> {
                            Ok(structure::Port {
                                name: port.name.clone(),
                                offset: port.offset,
                                layers: port
                                    .layers
                                    .iter()
                                    .map(|layer| layername(*layer))
                                    .collect::<Result<Vec<_>, _>>()?,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                },
            });
        }

        let port_ref = |port: PortIndex| -> PortRef {
            PortRef {
                node: nodenames.get(&port.node).cloned().unwrap_or_default(),
                port: match design.node_weight(port.node) {
                    Some(NodeWeight::Instance(instance)) => {
                        instance.ports.get(port.port).map(|p| p.name.clone())
                    }
                    _ => None,
                },
            }
        };

        let mut taken: HashSet<String> = design
            .wires()
            .filter_map(|wire| design.wirename(wire).map(str::to_string))
            .collect();
        let mut wires = vec![];

        for wire in design.wires() {
            let (Some((from, to)), Some(weight)) = (design.wire_ends(wire), design.wire_weight(wire))
            else {
                continue;
            };

            wires.push(structure::Wire {
                name: match design.wirename(wire) {
                    Some(name) => name.to_string(),
                    None => Self::fresh_name(&mut taken, "wire", wire.index()),
                },
                from: port_ref(from),
                to: port_ref(to),
                layer: match weight.kind {
                    WireKind::Unrouted => None,
                    WireKind::Layer(layer) => Some(layername(layer)?),
                },
                width: weight.width,
            });
        }

        Ok(Self {
            file: DesignFile {
                layers: rules.layers().to_vec(),
                nodes,
                wires,
            },
        })
    }

    fn fresh_name(
        taken: &mut HashSet<String>,
        prefix: &str,
        index: usize,
    ) -> String {
        let mut name = format!("{}{}", prefix, index);
        let mut suffix = 0;

        while taken.contains(&name) {
            suffix += 1;
            name = format!("{}{}_{}", prefix, index, suffix);
        }

        taken.insert(name.clone());
        name
    }
}
