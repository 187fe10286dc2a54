use bimap::BiHashMap;
use contracts::debug_ensures;
use geo::Point;
use petgraph::stable_graph::StableUnGraph;
use thiserror::Error;

use crate::{
    design::{
        primitive::{
            GetPos, InstanceIndex, InstanceWeight, NodeIndex, NodeWeight, PinIndex, PinKind,
            PinWeight, PortIndex, SetPos, WireIndex, WireKind, WireWeight,
        },
        rules::AccessRules,
    },
    graph::{GenericIndex, GetPetgraphIndex},
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    #[error("port {0:?} does not exist")]
    NoSuchPort(PortIndex),
    #[error("name {0} is already taken")]
    NameTaken(String),
}

/// Pins and instances joined by wires. Wire geometry is implied by the
/// positions of the ports at its two ends.
#[derive(Debug)]
pub struct Design<R: AccessRules> {
    graph: StableUnGraph<NodeWeight, WireWeight, usize>,
    rules: R,
    node_nodename: BiHashMap<NodeIndex, String>,
    wire_wirename: BiHashMap<WireIndex, String>,
}

impl<R: AccessRules> Design<R> {
    pub fn new(rules: R) -> Self {
        Self {
            graph: StableUnGraph::default(),
            rules,
            node_nodename: BiHashMap::new(),
            wire_wirename: BiHashMap::new(),
        }
    }

    #[debug_ensures(ret.is_ok() -> self.graph.node_count() == old(self.graph.node_count() + 1))]
    #[debug_ensures(ret.is_err() -> self.graph.node_count() == old(self.graph.node_count()))]
    pub fn add_pin(
        &mut self,
        weight: PinWeight,
        maybe_name: Option<String>,
    ) -> Result<PinIndex, DesignError> {
        self.check_name_free(maybe_name.as_deref(), &self.node_nodename)?;
        let pin = PinIndex::new(self.graph.add_node(weight.into()));

        if let Some(name) = maybe_name {
            self.node_nodename.insert(pin.into(), name);
        }

        Ok(pin)
    }

    #[debug_ensures(ret.is_ok() -> self.graph.node_count() == old(self.graph.node_count() + 1))]
    #[debug_ensures(ret.is_err() -> self.graph.node_count() == old(self.graph.node_count()))]
    pub fn add_instance(
        &mut self,
        weight: InstanceWeight,
        maybe_name: Option<String>,
    ) -> Result<InstanceIndex, DesignError> {
        self.check_name_free(maybe_name.as_deref(), &self.node_nodename)?;
        let instance = InstanceIndex::new(self.graph.add_node(weight.into()));

        if let Some(name) = maybe_name {
            self.node_nodename.insert(instance.into(), name);
        }

        Ok(instance)
    }

    #[debug_ensures(ret.is_ok() -> self.graph.edge_count() == old(self.graph.edge_count() + 1))]
    #[debug_ensures(ret.is_err() -> self.graph.edge_count() == old(self.graph.edge_count()))]
    #[debug_ensures(self.graph.node_count() == old(self.graph.node_count()))]
    pub fn add_wire(
        &mut self,
        from: PortIndex,
        to: PortIndex,
        kind: WireKind,
        width: f64,
        maybe_name: Option<String>,
    ) -> Result<WireIndex, DesignError> {
        for port in [from, to] {
            if !self.contains_port(port) {
                return Err(DesignError::NoSuchPort(port));
            }
        }
        self.check_name_free(maybe_name.as_deref(), &self.wire_wirename)?;

        let wire = self.graph.add_edge(
            from.node.petgraph_index(),
            to.node.petgraph_index(),
            WireWeight {
                kind,
                width,
                ports: [from.port, to.port],
            },
        );

        if let Some(name) = maybe_name {
            self.wire_wirename.insert(wire, name);
        }

        Ok(wire)
    }

    fn check_name_free<I: std::hash::Hash + Eq>(
        &self,
        maybe_name: Option<&str>,
        names: &BiHashMap<I, String>,
    ) -> Result<(), DesignError> {
        match maybe_name {
            Some(name) if names.contains_right(name) => {
                Err(DesignError::NameTaken(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    #[debug_ensures(!self.contains_wire(wire))]
    #[debug_ensures(self.graph.node_count() == old(self.graph.node_count()))]
    pub fn remove_wire(&mut self, wire: WireIndex) {
        self.graph.remove_edge(wire);
        self.wire_wirename.remove_by_left(&wire);
    }

    /// Removes a node together with every wire attached to it.
    #[debug_ensures(!self.contains_node(node))]
    #[debug_ensures(self.graph.edge_count() == old(self.graph.edge_count() - self.node_degree(node)))]
    pub fn remove_node(&mut self, node: NodeIndex) {
        let wires: Vec<WireIndex> = self.node_wires(node).collect();

        for wire in wires {
            self.remove_wire(wire);
        }

        self.graph.remove_node(node.petgraph_index());
        self.node_nodename.remove_by_left(&node);
    }

    pub fn move_node(&mut self, node: NodeIndex, delta: Point) {
        if let Some(weight) = self.graph.node_weight_mut(node.petgraph_index()) {
            let pos = weight.pos();
            weight.set_pos(pos + delta);
        }
    }

    pub fn node_weight(&self, node: NodeIndex) -> Option<&NodeWeight> {
        self.graph.node_weight(node.petgraph_index())
    }

    pub fn wire_weight(&self, wire: WireIndex) -> Option<&WireWeight> {
        self.graph.edge_weight(wire)
    }

    pub fn contains_node(&self, node: NodeIndex) -> bool {
        self.node_weight(node).is_some()
    }

    pub fn contains_wire(&self, wire: WireIndex) -> bool {
        self.graph.edge_weight(wire).is_some()
    }

    pub fn contains_port(&self, port: PortIndex) -> bool {
        match self.node_weight(port.node) {
            Some(NodeWeight::Pin(..)) => port.port == 0,
            Some(NodeWeight::Instance(instance)) => port.port < instance.ports.len(),
            None => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .map(|index| self.retag(index, &self.graph[index]))
    }

    pub fn wires(&self) -> impl Iterator<Item = WireIndex> + '_ {
        self.graph.edge_indices()
    }

    fn retag(
        &self,
        index: petgraph::stable_graph::NodeIndex<usize>,
        weight: &NodeWeight,
    ) -> NodeIndex {
        match weight {
            NodeWeight::Pin(..) => NodeIndex::Pin(GenericIndex::new(index)),
            NodeWeight::Instance(..) => NodeIndex::Instance(GenericIndex::new(index)),
        }
    }

    /// The ports at both ends of `wire`, in the order it was created with.
    pub fn wire_ends(&self, wire: WireIndex) -> Option<(PortIndex, PortIndex)> {
        let (a, b) = self.graph.edge_endpoints(wire)?;
        let weight = self.graph.edge_weight(wire)?;

        Some((
            PortIndex {
                node: self.retag(a, &self.graph[a]),
                port: weight.ports[0],
            },
            PortIndex {
                node: self.retag(b, &self.graph[b]),
                port: weight.ports[1],
            },
        ))
    }

    pub fn wire_end(&self, wire: WireIndex, end: usize) -> Option<PortIndex> {
        let (a, b) = self.wire_ends(wire)?;
        Some(if end == 0 { a } else { b })
    }

    pub fn node_wires(&self, node: NodeIndex) -> impl Iterator<Item = WireIndex> + '_ {
        use petgraph::visit::EdgeRef;

        self.graph
            .edges(node.petgraph_index())
            .map(|edge| edge.id())
    }

    pub fn node_degree(&self, node: NodeIndex) -> usize {
        self.node_wires(node).count()
    }

    pub fn port_pos(&self, port: PortIndex) -> Option<Point> {
        match self.node_weight(port.node)? {
            NodeWeight::Pin(pin) => Some(pin.pos),
            NodeWeight::Instance(instance) => instance
                .ports
                .get(port.port)
                .map(|p| instance.pos + p.offset),
        }
    }

    /// Layers a wire may use to attach to `port`.
    pub fn port_layers(&self, port: PortIndex) -> Vec<usize> {
        match self.node_weight(port.node) {
            Some(NodeWeight::Pin(pin)) => match pin.kind {
                PinKind::Unrouted => vec![],
                PinKind::Universal => (0..self.rules.layer_count()).collect(),
                PinKind::Layer(layer) => vec![layer],
            },
            Some(NodeWeight::Instance(instance)) => instance
                .ports
                .get(port.port)
                .map(|p| p.layers.clone())
                .unwrap_or_default(),
            None => vec![],
        }
    }

    pub fn is_pass_through(&self, node: NodeIndex) -> bool {
        matches!(
            self.node_weight(node),
            Some(NodeWeight::Pin(pin)) if pin.kind.is_pass_through()
        )
    }

    pub fn is_exported(&self, node: NodeIndex) -> bool {
        matches!(self.node_weight(node), Some(NodeWeight::Pin(pin)) if pin.exported)
    }

    pub fn is_unrouted(&self, wire: WireIndex) -> bool {
        matches!(
            self.wire_weight(wire),
            Some(WireWeight {
                kind: WireKind::Unrouted,
                ..
            })
        )
    }

    pub fn nodename(&self, node: NodeIndex) -> Option<&str> {
        self.node_nodename.get_by_left(&node).map(|s| s.as_str())
    }

    pub fn nodename_node(&self, nodename: &str) -> Option<NodeIndex> {
        self.node_nodename.get_by_right(nodename).copied()
    }

    pub fn wirename(&self, wire: WireIndex) -> Option<&str> {
        self.wire_wirename.get_by_left(&wire).map(|s| s.as_str())
    }

    pub fn wirename_wire(&self, wirename: &str) -> Option<WireIndex> {
        self.wire_wirename.get_by_right(wirename).copied()
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }
}
