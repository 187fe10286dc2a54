use geo::Point;
use itertools::Itertools;
use log::{debug, info};

use crate::{
    design::{
        primitive::{NodeIndex, PinIndex, PinKind, PinWeight, PortIndex, WireIndex, WireKind},
        rules::AccessRules,
        Design,
    },
    math::points_approx_eq,
    river::{plan::Route, staircase::RoutePoint, ChannelPlan, RouteError},
};

/// A straight piece of wire that applying a plan would create.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub layer: usize,
    pub width: f64,
}

/// What [`ChannelPlan::apply`] changed in the design.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Emitted {
    pub pins: Vec<PinIndex>,
    pub wires: Vec<WireIndex>,
    pub removed_wires: Vec<WireIndex>,
    pub removed_pins: Vec<NodeIndex>,
}

impl ChannelPlan {
    /// Preview of the wires [`Self::apply`] would create, collinear runs
    /// already merged.
    pub fn segments(&self) -> Vec<Segment> {
        self.routes
            .iter()
            .flat_map(|route| {
                let from = self.moved(route.connection.from_port, route.connection.from.pos);
                let to = self.moved(route.connection.to_port, route.connection.to.pos);
                let interior = interior_vertices(&route.path.points, from, to);

                std::iter::once(from)
                    .chain(interior)
                    .chain(std::iter::once(to))
                    .tuple_windows()
                    .map(|(from, to)| Segment {
                        from,
                        to,
                        layer: self.layer,
                        width: self.width,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Where a terminal of `port` found at `pos` sits once the relocation
    /// has been applied.
    fn moved(&self, port: PortIndex, pos: Point) -> Point {
        match &self.relocation {
            Some(relocation) if relocation.nodes.contains(&port.node) => pos + relocation.delta,
            _ => pos,
        }
    }

    /// Carries the plan out on `design`: moves the relocated terminals,
    /// creates the routed pins and wires, then removes the superseded
    /// unrouted wires and the pass-through pins they leave dangling.
    ///
    /// Fails without touching the design if anything the plan refers to has
    /// disappeared since planning.
    pub fn apply<R: AccessRules>(&self, design: &mut Design<R>) -> Result<Emitted, RouteError> {
        self.check_fresh(design)?;

        if let Some(relocation) = &self.relocation {
            for node in &relocation.nodes {
                design.move_node(*node, relocation.delta);
            }
            debug!(
                "moved {} node(s) by {:?}",
                relocation.nodes.len(),
                relocation.delta
            );
        }

        let mut emitted = Emitted::default();

        for route in &self.routes {
            self.emit_route(design, route, &mut emitted)?;
        }

        let mut superseded: Vec<NodeIndex> = vec![];

        for route in &self.routes {
            for wire in &route.connection.wires {
                if let Some((a, b)) = design.wire_ends(*wire) {
                    superseded.extend(
                        [a.node, b.node]
                            .into_iter()
                            .filter(|node| design.is_pass_through(*node)),
                    );
                }

                design.remove_wire(*wire);
                emitted.removed_wires.push(*wire);
            }
        }

        for node in superseded {
            if design.contains_node(node)
                && design.node_degree(node) == 0
                && !design.is_exported(node)
            {
                design.remove_node(node);
                emitted.removed_pins.push(node);
            }
        }

        info!(
            "created {} pin(s) and {} wire(s), removed {} wire(s) and {} pin(s)",
            emitted.pins.len(),
            emitted.wires.len(),
            emitted.removed_wires.len(),
            emitted.removed_pins.len()
        );

        Ok(emitted)
    }

    fn check_fresh<R: AccessRules>(&self, design: &Design<R>) -> Result<(), RouteError> {
        let routes_fresh = self.routes.iter().all(|route| {
            design.contains_port(route.connection.from_port)
                && design.contains_port(route.connection.to_port)
                && route
                    .connection
                    .wires
                    .iter()
                    .all(|wire| design.contains_wire(*wire))
        });
        let relocation_fresh = self.relocation.as_ref().map_or(true, |relocation| {
            relocation
                .nodes
                .iter()
                .all(|node| design.contains_node(*node))
        });

        if routes_fresh && relocation_fresh {
            Ok(())
        } else {
            Err(RouteError::StalePlan)
        }
    }

    fn emit_route<R: AccessRules>(
        &self,
        design: &mut Design<R>,
        route: &Route,
        emitted: &mut Emitted,
    ) -> Result<(), RouteError> {
        let (from_port, to_port) = (route.connection.from_port, route.connection.to_port);
        let (Some(from), Some(to)) = (design.port_pos(from_port), design.port_pos(to_port)) else {
            return Err(RouteError::StalePlan);
        };

        let mut prev = from_port;

        for vertex in interior_vertices(&route.path.points, from, to) {
            let pin = design.add_pin(
                PinWeight {
                    pos: vertex,
                    kind: PinKind::Layer(self.layer),
                    exported: false,
                },
                None,
            )?;
            emitted.pins.push(pin);
            emitted.wires.push(design.add_wire(
                prev,
                pin.into(),
                WireKind::Layer(self.layer),
                self.width,
                None,
            )?);
            prev = pin.into();
        }

        emitted.wires.push(design.add_wire(
            prev,
            to_port,
            WireKind::Layer(self.layer),
            self.width,
            None,
        )?);

        Ok(())
    }
}

/// Vertices of `points` that need a pin of their own between the ports at
/// `from` and `to`. An end vertex off its port is kept, and gets joined to
/// the port by a short jog.
fn interior_vertices(points: &[RoutePoint], from: Point, to: Point) -> Vec<Point> {
    let mut vertices = reduce(points);

    if vertices.last().is_some_and(|v| points_approx_eq(*v, to)) {
        vertices.pop();
    }
    if vertices.first().is_some_and(|v| points_approx_eq(*v, from)) {
        vertices.remove(0);
    }

    vertices
}

/// Drops repeated vertices and those lying straight between their
/// neighbours.
fn reduce(points: &[RoutePoint]) -> Vec<Point> {
    let mut kept: Vec<Point> = vec![];

    for (i, point) in points.iter().enumerate() {
        let pos = point.pos;

        if kept.last() == Some(&pos) {
            continue;
        }

        if let (Some(prev), Some(next)) = (kept.last(), points.get(i + 1)) {
            let next = next.pos;

            if (prev.x() == pos.x() && pos.x() == next.x())
                || (prev.y() == pos.y() && pos.y() == next.y())
            {
                continue;
            }
        }

        kept.push(pos);
    }

    kept
}
