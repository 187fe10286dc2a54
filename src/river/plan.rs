use geo::{point, BoundingRect, MultiPoint, Point, Rect};
use log::debug;

use crate::{
    design::{
        primitive::{NodeIndex, NodeWeight},
        rules::AccessRules,
        Design,
    },
    math::Axis,
    river::{
        collect::{Connection, Side},
        frame::Frame,
        staircase::{Path, RoutePoint},
        RouteError,
    },
};

/// A connection together with the path that will replace its unrouted wires.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub connection: Connection,
    pub path: Path,
}

/// Displacement of the to-side terminals, needed when the wires do not fit
/// between the rails as placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub nodes: Vec<NodeIndex>,
    pub delta: Point,
}

/// A complete routing solution, expressed in the caller's frame. Nothing in
/// the design has changed yet; see [`ChannelPlan::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPlan {
    pub(super) layer: usize,
    pub(super) width: f64,
    pub(super) space: f64,
    pub(super) axis: Axis,
    pub(super) from_line: f64,
    pub(super) to_line: f64,
    pub(super) extent: f64,
    pub(super) bounds: Option<Rect>,
    pub(super) routes: Vec<Route>,
    pub(super) relocation: Option<Relocation>,
}

impl ChannelPlan {
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn space(&self) -> f64 {
        self.space
    }

    /// The axis whose coordinate is constant along each rail.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn from_line(&self) -> f64 {
        self.from_line
    }

    pub fn to_line(&self) -> f64 {
        self.to_line
    }

    /// Coordinate, on [`Self::axis`], up to which the routed wires reach.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Distance between the from-rail and [`Self::extent`].
    pub fn height(&self) -> f64 {
        (self.extent - self.from_line).abs()
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn relocation(&self) -> Option<&Relocation> {
        self.relocation.as_ref()
    }
}

/// Everything [`resolve_height`] needs besides the routes themselves.
#[derive(Debug, Clone, Copy)]
pub struct HeightParams {
    pub layer: usize,
    pub width: f64,
    pub space: f64,
    pub clearance: f64,
}

/// Finds how far the channel must extend to clear every path, runs each path
/// out to that extent and maps the whole plan back to the caller's frame.
pub fn resolve_height<R: AccessRules>(
    design: &Design<R>,
    frame: &Frame,
    params: HeightParams,
    rightward: Vec<Route>,
    leftward: Vec<Route>,
) -> Result<ChannelPlan, RouteError> {
    let reach = rightward
        .iter()
        .chain(leftward.iter())
        .map(|route| route.path.last().across())
        .fold(f64::NEG_INFINITY, f64::max);
    let extent = (reach + params.width / 2.0 + params.clearance).max(frame.to_line);

    let mut routes = Vec::with_capacity(rightward.len() + leftward.len());

    for (group, exit) in [(rightward, Side::Right), (leftward, Side::Left)] {
        for mut route in group {
            extend(&mut route.path, exit, extent);

            for point in route.path.points.iter_mut() {
                point.pos = frame.inverse.apply(point.pos);
            }

            routes.push(route);
        }
    }

    let back = |across: f64| frame.axis.coord(frame.inverse.apply(point! {x: 0.0, y: across}));

    let relocation = if extent > frame.to_line {
        let delta = frame
            .inverse
            .apply(point! {x: 0.0, y: extent - frame.to_line});
        Some(Relocation {
            nodes: relocated_nodes(design, &routes)?,
            delta,
        })
    } else {
        None
    };

    let bounds = routes
        .iter()
        .flat_map(|route| route.path.points.iter().map(|point| point.pos))
        .collect::<MultiPoint>()
        .bounding_rect();

    debug!("channel extends to {} in the canonical frame", extent);

    Ok(ChannelPlan {
        layer: params.layer,
        width: params.width,
        space: params.space,
        axis: frame.axis,
        from_line: back(frame.from_line),
        to_line: back(frame.to_line),
        extent: back(extent),
        bounds,
        routes,
        relocation,
    })
}

fn extend(path: &mut Path, exit: Side, extent: f64) {
    let last = *path.last();

    if last.side == Some(exit) || last.across() == extent {
        return;
    }

    let n = path.points.len();
    path.points[n - 1].side = None;
    path.points.push(RoutePoint {
        pos: point! {x: last.along(), y: extent},
        side: last.side,
    });
}

/// Owners of the to-rail terminals that have to move for the wires to reach
/// them: a single instance, or a set of free pins.
fn relocated_nodes<R: AccessRules>(
    design: &Design<R>,
    routes: &[Route],
) -> Result<Vec<NodeIndex>, RouteError> {
    let mut instances: Vec<NodeIndex> = vec![];
    let mut pins: Vec<NodeIndex> = vec![];

    for route in routes {
        if route.connection.to.side != Side::ToRail {
            continue;
        }

        let node = route.connection.to_port.node;
        let owners = match design.node_weight(node) {
            Some(NodeWeight::Instance(..)) => &mut instances,
            Some(NodeWeight::Pin(..)) => &mut pins,
            None => continue,
        };

        if !owners.contains(&node) {
            owners.push(node);
        }
    }

    match (instances.len(), pins.len()) {
        (1, 0) => Ok(instances),
        (0, _) => Ok(pins),
        (n, m) => Err(RouteError::AmbiguousRelocation(n + m)),
    }
}
