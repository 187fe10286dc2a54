use geo::{BoundingRect, MultiPoint, Point};
use log::debug;

use crate::{
    math::{approx_eq, Axis, Transform},
    river::{
        collect::{Connection, Side, TerminalPoint},
        orientation::Orientation,
        RouteError, Topology,
    },
};

/// Swaps the ends of every connection that was collected backwards, so that
/// `from` lies on the from-rail whenever either end does.
pub fn assign_rails(orientation: &Orientation, connections: &mut [Connection]) {
    let axis = orientation.axis;

    for connection in connections {
        let from = axis.coord(connection.from.pos);
        let to = axis.coord(connection.to.pos);

        if (from != orientation.from_rail && to == orientation.from_rail)
            || (to != orientation.to_rail && from == orientation.to_rail)
        {
            connection.swap_ends();
        }
    }
}

/// The canonical frame of one routing run: `along` grows along the channel,
/// `across` from the from-rail towards the to-rail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub axis: Axis,
    pub transform: Transform,
    pub inverse: Transform,
    /// Canonical `across` of the from-rail.
    pub from_line: f64,
    /// Canonical `across` of the to-rail.
    pub to_line: f64,
    /// Lowest and highest `along` reached by any terminal.
    pub bounds: (f64, f64),
}

impl Frame {
    /// Sorts `connections` along the channel, maps every terminal into the
    /// canonical frame, assigns off-rail terminals to the boundary they sit on
    /// and checks the result is routable with wires `pitch` apart.
    pub fn normalize(
        orientation: &Orientation,
        connections: &mut [Connection],
        pitch: f64,
    ) -> Result<Self, RouteError> {
        if connections.is_empty() {
            return Err(RouteError::NoWork);
        }

        let axis = orientation.axis;
        let along_axis = axis.other();

        for connection in connections.iter_mut() {
            connection.sort_key = along_axis.coord(connection.from.pos);
        }
        connections.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));

        let first = &connections[0];
        let last = &connections[connections.len() - 1];
        let transform = Transform::canonical(
            axis,
            axis.coord(first.to.pos) >= axis.coord(first.from.pos),
            along_axis.coord(last.from.pos) >= along_axis.coord(first.from.pos),
        );
        let from_line = transform.rail_to_across(axis, orientation.from_rail);
        let to_line = transform.rail_to_across(axis, orientation.to_rail);

        for (i, pair) in connections.windows(2).enumerate() {
            let (a, b) = (&pair[0], &pair[1]);
            let (af, bf) = (along_axis.coord(a.from.pos), along_axis.coord(b.from.pos));
            let (at, bt) = (along_axis.coord(a.to.pos), along_axis.coord(b.to.pos));

            if (af > bf && at < bt) || (af < bf && at > bt) {
                return Err(Topology::Crossing(i, i + 1).into());
            }
        }

        let bounds = Self::along_bounds(&transform, connections);
        let mut last_from: Option<f64> = None;
        let mut last_to: Option<f64> = None;

        for connection in connections.iter_mut() {
            connection.from.canonical = transform.apply(connection.from.pos);
            connection.to.canonical = transform.apply(connection.to.pos);

            if connection.from.across() != from_line {
                Self::clip(&mut connection.from, bounds)?;
            }
            if connection.to.across() != to_line {
                Self::clip(&mut connection.to, bounds)?;
            }

            if let (Some(prev), Side::FromRail) = (last_from, connection.from.side) {
                Self::check_spacing(Side::FromRail, prev, connection.from.along(), pitch)?;
            }
            if let (Some(prev), Side::ToRail) = (last_to, connection.to.side) {
                Self::check_spacing(Side::ToRail, prev, connection.to.along(), pitch)?;
            }

            last_from = (connection.from.side == Side::FromRail).then(|| connection.from.along());
            last_to = (connection.to.side == Side::ToRail).then(|| connection.to.along());
        }

        debug!(
            "canonical frame {:?}, rails at {} and {}, channel spans {:?}",
            transform, from_line, to_line, bounds
        );

        Ok(Self {
            axis,
            transform,
            inverse: transform.inverse(),
            from_line,
            to_line,
            bounds,
        })
    }

    fn along_bounds(transform: &Transform, connections: &[Connection]) -> (f64, f64) {
        let terminals: MultiPoint = connections
            .iter()
            .flat_map(|connection| [connection.from.pos, connection.to.pos])
            .collect::<Vec<Point>>()
            .into();

        match terminals.bounding_rect() {
            Some(rect) => {
                let b1 = transform.apply(rect.min().into()).x();
                let b2 = transform.apply(rect.max().into()).x();
                if b2 < b1 {
                    (b2, b1)
                } else {
                    (b1, b2)
                }
            }
            None => (0.0, 0.0),
        }
    }

    /// Reassigns an off-rail terminal to the nearer channel boundary. The
    /// terminal must already sit on that boundary, otherwise no orthogonal
    /// jog could reach it without cutting through the bus.
    fn clip(terminal: &mut TerminalPoint, (b1, b2): (f64, f64)) -> Result<(), RouteError> {
        let along = terminal.along();
        let (boundary, side) = if (b1 - along).abs() < (b2 - along).abs() {
            (b1, Side::Left)
        } else {
            (b2, Side::Right)
        };

        if !approx_eq(along, boundary) {
            return Err(Topology::OffBoundary(terminal.pos).into());
        }

        terminal.canonical = Point::new(boundary, terminal.across());
        terminal.side = side;
        Ok(())
    }

    fn check_spacing(rail: Side, prev: f64, along: f64, pitch: f64) -> Result<(), RouteError> {
        let distance = (prev - along).abs();

        if distance < pitch {
            return Err(RouteError::SpacingViolation {
                rail,
                distance,
                pitch,
            });
        }

        Ok(())
    }
}
