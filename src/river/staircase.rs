use geo::{point, Point};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::river::{
    collect::{Connection, Side, TerminalPoint},
    RouteError, Topology,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutePoint {
    pub pos: Point,
    /// Only set on the two terminal vertices of a path.
    pub side: Option<Side>,
}

impl RoutePoint {
    pub fn new(along: f64, across: f64) -> Self {
        Self {
            pos: point! {x: along, y: across},
            side: None,
        }
    }

    pub fn terminal(along: f64, across: f64, side: Side) -> Self {
        Self {
            pos: point! {x: along, y: across},
            side: Some(side),
        }
    }

    pub fn along(&self) -> f64 {
        self.pos.x()
    }

    pub fn across(&self) -> f64 {
        self.pos.y()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    /// From the from-rail to the to-rail.
    RailToRail,
    /// Enters through a channel boundary.
    FromSide,
    /// Leaves through a channel boundary.
    ToSide,
}

impl RouteKind {
    pub fn of(from: &TerminalPoint, to: &TerminalPoint) -> Self {
        if from.side != Side::FromRail {
            RouteKind::FromSide
        } else if to.side != Side::ToRail {
            RouteKind::ToSide
        } else {
            RouteKind::RailToRail
        }
    }
}

/// One routed polyline. Coordinates are canonical while planning and in the
/// caller's frame once the plan is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub points: Vec<RoutePoint>,
    pub width: f64,
    pub layer: usize,
    pub kind: RouteKind,
}

impl Path {
    pub fn last(&self) -> &RoutePoint {
        // Paths are never built with fewer than two points.
        &self.points[self.points.len() - 1]
    }

    fn is_orthogonal(&self) -> bool {
        self.points
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.along() == b.along() || a.across() == b.across())
    }
}

/// Splits connections into those running towards growing `along` and the
/// rest, each keeping its order along the channel.
pub fn split(connections: Vec<Connection>) -> (Vec<Connection>, Vec<Connection>) {
    connections
        .into_iter()
        .partition(|connection| connection.to.along() >= connection.from.along())
}

/// Where the first wire entering through each boundary runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartOffsets {
    /// For leftward wires entering through the right boundary.
    pub right: f64,
    /// For rightward wires entering through the left boundary.
    pub left: f64,
}

/// Checks that terminals on each side come in an order the staircases can
/// serve, and finds where boundary entries start stacking.
pub fn check_sides(
    rightward: &[Connection],
    leftward: &[Connection],
    from_line: f64,
    width: f64,
    space: f64,
    clearance: f64,
) -> Result<StartOffsets, RouteError> {
    let base = from_line + clearance + width / 2.0;
    let pitch = width + space;

    let mut from_rail_seen = false;
    let mut right_exits: Option<f64> = None;

    for connection in rightward {
        match connection.from.side {
            Side::FromRail => from_rail_seen = true,
            Side::Left if !from_rail_seen => (),
            Side::Left => return Err(Topology::Ordering("bottom right").into()),
            _ => return Err(Topology::Sides("bottom right").into()),
        }
        match connection.to.side {
            Side::Right => right_exits = Some(right_exits.map_or(base, |o| o + pitch)),
            Side::ToRail if right_exits.is_none() => (),
            Side::ToRail => return Err(Topology::Ordering("top right").into()),
            _ => return Err(Topology::Sides("top right").into()),
        }
    }

    let mut right_entry_seen = false;
    let mut to_rail_seen = false;
    let mut left_exits: Option<f64> = None;

    for connection in leftward {
        match connection.from.side {
            Side::FromRail if right_entry_seen => {
                return Err(Topology::Ordering("bottom left").into())
            }
            Side::FromRail => (),
            Side::Right => right_entry_seen = true,
            _ => return Err(Topology::Sides("bottom left").into()),
        }
        match connection.to.side {
            Side::ToRail => to_rail_seen = true,
            Side::Left if !to_rail_seen => {
                left_exits = Some(left_exits.map_or(base, |o| o + pitch))
            }
            Side::Left => return Err(Topology::Ordering("top left").into()),
            _ => return Err(Topology::Sides("top left").into()),
        }
    }

    Ok(StartOffsets {
        right: right_exits.map_or(base, |o| o + pitch),
        left: left_exits.map_or(base, |o| o + pitch),
    })
}

/// Greedy single-pass builder of one staircase of paths, each new path kept a
/// full pitch off its predecessor.
#[derive(Debug, Clone, Copy)]
pub struct StaircaseBuilder {
    pub width: f64,
    pub space: f64,
    pub clearance: f64,
    pub layer: usize,
}

impl StaircaseBuilder {
    fn pitch(&self) -> f64 {
        self.width + self.space
    }

    /// Paths for connections running towards growing `along`, in the order of
    /// `group`. They are built from the last connection backwards, entries
    /// through the left boundary stacking from `start`.
    pub fn build_rightward(
        &self,
        group: &[Connection],
        start: f64,
    ) -> Result<Vec<Path>, RouteError> {
        let mut paths = self.build(group.iter().rev(), -1.0, Side::Left, start)?;
        paths.reverse();
        Ok(paths)
    }

    /// Paths for connections running towards shrinking `along`, in the order
    /// of `group`, entries through the right boundary stacking from `start`.
    pub fn build_leftward(
        &self,
        group: &[Connection],
        start: f64,
    ) -> Result<Vec<Path>, RouteError> {
        self.build(group.iter(), 1.0, Side::Right, start)
    }

    fn build<'c>(
        &self,
        connections: impl Iterator<Item = &'c Connection>,
        dir: f64,
        entry: Side,
        start: f64,
    ) -> Result<Vec<Path>, RouteError> {
        let mut paths: Vec<Path> = vec![];
        let mut offset = start;

        for connection in connections {
            let (from, to) = (&connection.from, &connection.to);
            let through_boundary = from.side == entry;

            let path = match (paths.last(), through_boundary) {
                (None, false) => self.origin_path(from, to),
                (None, true) => self.side_origin_path(from, to, offset),
                (Some(prev), false) => self.rail_stacked_path(prev, from, to, dir),
                (Some(prev), true) => self.side_stacked_path(prev, from, to, dir, offset),
            };

            if through_boundary {
                offset += self.pitch();
            }

            if !path.is_orthogonal() {
                return Err(Topology::MalformedPath(from.pos).into());
            }

            paths.push(path);
        }

        Ok(paths)
    }

    fn path(&self, points: Vec<RoutePoint>, from: &TerminalPoint, to: &TerminalPoint) -> Path {
        Path {
            points,
            width: self.width,
            layer: self.layer,
            kind: RouteKind::of(from, to),
        }
    }

    /// Up from the rail by half a wire plus clearance, then straight over to
    /// the destination.
    fn origin_path(&self, from: &TerminalPoint, to: &TerminalPoint) -> Path {
        let lift = from.across() + self.width / 2.0 + self.clearance;

        self.path(
            vec![
                RoutePoint::terminal(from.along(), from.across(), from.side),
                RoutePoint::new(from.along(), lift),
                RoutePoint::terminal(to.along(), lift, to.side),
            ],
            from,
            to,
        )
    }

    fn side_origin_path(&self, from: &TerminalPoint, to: &TerminalPoint, offset: f64) -> Path {
        self.path(
            vec![
                RoutePoint::terminal(from.along(), offset, from.side),
                RoutePoint::terminal(to.along(), offset, to.side),
            ],
            from,
            to,
        )
    }

    fn rail_stacked_path(
        &self,
        prev: &Path,
        from: &TerminalPoint,
        to: &TerminalPoint,
        dir: f64,
    ) -> Path {
        let lift = from.across() + self.width / 2.0 + self.clearance;
        let head = vec![
            RoutePoint::terminal(from.along(), from.across(), from.side),
            RoutePoint::new(from.along(), lift),
        ];

        self.stacked_path(prev, head, from, to, dir, lift)
    }

    fn side_stacked_path(
        &self,
        prev: &Path,
        from: &TerminalPoint,
        to: &TerminalPoint,
        dir: f64,
        offset: f64,
    ) -> Path {
        let head = vec![RoutePoint::terminal(from.along(), offset, from.side)];
        self.stacked_path(prev, head, from, to, dir, offset)
    }

    /// Shadows `prev` one pitch further out for as long as its vertices stay
    /// within this connection's span, never dropping below `floor`.
    fn stacked_path(
        &self,
        prev: &Path,
        mut points: Vec<RoutePoint>,
        from: &TerminalPoint,
        to: &TerminalPoint,
        dir: f64,
        floor: f64,
    ) -> Path {
        let pitch = self.pitch();
        let (min, max) = if from.along() <= to.along() {
            (from.along(), to.along())
        } else {
            (to.along(), from.along())
        };
        let mut across = floor;

        for (i, shadowed) in prev.points.iter().enumerate() {
            let along = shadowed.along() + dir * pitch;

            if along < min || along > max {
                break;
            }

            across = if i == 0 {
                across.min(floor)
            } else {
                (shadowed.across() + pitch).max(floor)
            };
            points.push(RoutePoint::new(along, across));
        }

        points.push(RoutePoint::terminal(to.along(), across, to.side));
        self.path(points, from, to)
    }
}
