use std::collections::{BTreeMap, HashSet};

use geo::Point;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    design::{
        primitive::{PortIndex, WireIndex},
        rules::AccessRules,
        Design,
    },
    river::orientation::CoordinateTally,
};

/// Where a terminal enters the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    FromRail,
    ToRail,
    /// The boundary at the lowest `along` coordinate.
    Left,
    /// The boundary at the highest `along` coordinate.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalPoint {
    /// Position in the caller's frame.
    pub pos: Point,
    pub side: Side,
    /// `(along, across)` once normalized, stored as `(x, y)`.
    pub canonical: Point,
}

impl TerminalPoint {
    pub fn new(pos: Point, side: Side) -> Self {
        Self {
            pos,
            side,
            canonical: pos,
        }
    }

    pub fn along(&self) -> f64 {
        self.canonical.x()
    }

    pub fn across(&self) -> f64 {
        self.canonical.y()
    }
}

/// One wire to be routed, between two resolved terminals.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: TerminalPoint,
    pub to: TerminalPoint,
    pub from_port: PortIndex,
    pub to_port: PortIndex,
    /// Every unrouted wire of the chain, superseded once routed.
    pub wires: Vec<WireIndex>,
    pub sort_key: f64,
}

impl Connection {
    /// Exchanges the two ends, keeping `from` on the from-rail side.
    pub fn swap_ends(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        std::mem::swap(&mut self.from_port, &mut self.to_port);
        self.from.side = Side::FromRail;
        self.to.side = Side::ToRail;
    }
}

#[derive(Debug, Default)]
pub struct Collected {
    pub connections: Vec<Connection>,
    pub x_tally: CoordinateTally,
    pub y_tally: CoordinateTally,
}

/// Resolves unrouted wire chains into terminal-to-terminal connections.
pub struct Collector<'a, R: AccessRules> {
    design: &'a Design<R>,
    seen: HashSet<WireIndex>,
}

impl<'a, R: AccessRules> Collector<'a, R> {
    pub fn new(design: &'a Design<R>) -> Self {
        Self {
            design,
            seen: HashSet::new(),
        }
    }

    pub fn collect(mut self, wires: impl IntoIterator<Item = WireIndex>) -> Collected {
        let mut collected = Collected::default();

        for wire in wires {
            if self.seen.contains(&wire) || !self.design.is_unrouted(wire) {
                continue;
            }

            self.seen.insert(wire);
            let mut chain = vec![wire];
            let (from_wire, from_end) = self.walk(wire, 0, &mut chain);
            let (to_wire, to_end) = self.walk(wire, 1, &mut chain);

            let (Some(from_port), Some(to_port)) = (
                self.design.wire_end(from_wire, from_end),
                self.design.wire_end(to_wire, to_end),
            ) else {
                warn!("skipping wire chain {:?}: an end is not attached to a port", chain);
                continue;
            };
            let (Some(from_pos), Some(to_pos)) =
                (self.design.port_pos(from_port), self.design.port_pos(to_port))
            else {
                warn!(
                    "skipping wire chain {:?}: cannot locate {:?} or {:?}",
                    chain, from_port, to_port
                );
                continue;
            };

            debug!(
                "chain of {} wire(s) from {:?} to {:?}",
                chain.len(),
                from_pos,
                to_pos
            );

            collected.x_tally.vote(from_pos.x());
            collected.y_tally.vote(from_pos.y());
            collected.x_tally.vote(to_pos.x());
            collected.y_tally.vote(to_pos.y());

            collected.connections.push(Connection {
                from: TerminalPoint::new(from_pos, Side::FromRail),
                to: TerminalPoint::new(to_pos, Side::ToRail),
                from_port,
                to_port,
                wires: chain,
                sort_key: 0.0,
            });
        }

        collected
    }

    /// Follows pass-through pins away from `end` of `wire` and returns the
    /// wire and end at which a real terminal sits.
    fn walk(
        &mut self,
        mut wire: WireIndex,
        mut end: usize,
        chain: &mut Vec<WireIndex>,
    ) -> (WireIndex, usize) {
        loop {
            let Some(port) = self.design.wire_end(wire, end) else {
                break;
            };

            if !self.design.is_pass_through(port.node) {
                break;
            }

            let Some(next) = self
                .design
                .node_wires(port.node)
                .find(|w| !self.seen.contains(w) && self.design.is_unrouted(*w))
            else {
                break;
            };

            self.seen.insert(next);
            chain.push(next);

            end = match self.design.wire_end(next, 0) {
                Some(near) if near.node == port.node => 1,
                _ => 0,
            };
            wire = next;
        }

        (wire, end)
    }
}

/// Votes every layer reachable from each terminal and returns the most
/// popular one, preferring the lowest layer on ties, together with its vote
/// count.
pub fn most_popular_layer<R: AccessRules>(
    design: &Design<R>,
    connections: &[Connection],
) -> Option<(usize, usize)> {
    let mut usage: BTreeMap<usize, usize> = BTreeMap::new();

    for connection in connections {
        for port in [connection.from_port, connection.to_port] {
            for layer in design.port_layers(port) {
                *usage.entry(layer).or_insert(0) += 1;
            }
        }
    }

    usage
        .into_iter()
        .fold(None, |best, (layer, uses)| match best {
            Some((_, most)) if most >= uses => best,
            _ => Some((layer, uses)),
        })
}
