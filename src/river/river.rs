use geo::Point;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    design::{rules::AccessRules, Design, DesignError},
    river::{
        collect::{most_popular_layer, Collector, Connection, Side},
        frame::{assign_rails, Frame},
        orientation,
        plan::{resolve_height, ChannelPlan, HeightParams, Route},
        selection::WireSelection,
        staircase::{check_sides, split, StaircaseBuilder},
    },
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Topology {
    #[error("connections {0} and {1} cross")]
    Crossing(usize, usize),
    #[error("improper ordering of {0} ports")]
    Ordering(&'static str),
    #[error("improper sides for {0} ports")]
    Sides(&'static str),
    #[error("terminal at {0:?} is off both rails and inside the channel")]
    OffBoundary(Point),
    #[error("no orthogonal path found for the connection starting at {0:?}")]
    MalformedPath(Point),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("nothing to route")]
    NoWork,
    #[error("cannot find a layer that will connect")]
    NoCommonLayer,
    #[error("terminals are not between two parallel lines")]
    AmbiguousOrientation,
    #[error("invalid topology: {0}")]
    InvalidTopology(#[from] Topology),
    #[error("ports on the {rail:?} side are {distance} apart, less than the pitch of {pitch}")]
    SpacingViolation { rail: Side, distance: f64, pitch: f64 },
    #[error("cannot determine what to move: {0} distinct owners of the far terminals")]
    AmbiguousRelocation(usize),
    #[error("plan refers to objects no longer in the design")]
    StalePlan,
    #[error(transparent)]
    Design(#[from] DesignError),
}

/// Overrides for what the technology would otherwise decide.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverOptions {
    pub layer: Option<usize>,
    pub width: Option<f64>,
    pub space: Option<f64>,
    /// Distance kept between a rail and the first bend off it.
    pub clearance: Option<f64>,
}

pub struct River<'a, R: AccessRules> {
    design: &'a Design<R>,
    options: RiverOptions,
}

impl<'a, R: AccessRules> River<'a, R> {
    pub fn new(design: &'a Design<R>, options: RiverOptions) -> Self {
        Self { design, options }
    }

    /// Plans the routing of the unrouted wires in `selection`, or of every
    /// unrouted wire when the selection is empty.
    pub fn route(&self, selection: &WireSelection) -> Result<ChannelPlan, RouteError> {
        let wires = selection.resolve(self.design);
        let collected = Collector::new(self.design).collect(wires);
        let mut connections = collected.connections;

        if connections.is_empty() {
            info!("nothing to route");
            return Err(RouteError::NoWork);
        }

        let layer = self.layer(&connections)?;
        let rules = self.design.rules();
        let width = self.options.width.unwrap_or_else(|| rules.wire_width(layer));
        let space = self.options.space.unwrap_or_else(|| {
            let spacing = rules.spacing(layer);
            if spacing < 0.0 {
                1.0
            } else {
                spacing
            }
        });
        let clearance = self.options.clearance.unwrap_or(space);

        info!(
            "river routing {} connection(s) on layer {}",
            connections.len(),
            rules
                .layername(layer)
                .map_or_else(|| layer.to_string(), str::to_string)
        );

        let orientation =
            orientation::resolve(&collected.x_tally, &collected.y_tally, connections.len())?;
        assign_rails(&orientation, &mut connections);

        let frame = Frame::normalize(&orientation, &mut connections, width + space)?;

        let (rightward, leftward) = split(connections);
        let offsets = check_sides(&rightward, &leftward, frame.from_line, width, space, clearance)?;
        debug!(
            "{} rightward and {} leftward connection(s), boundary entries start at {:?}",
            rightward.len(),
            leftward.len(),
            offsets
        );

        let builder = StaircaseBuilder {
            width,
            space,
            clearance,
            layer,
        };
        let right_paths = builder.build_rightward(&rightward, offsets.left)?;
        let left_paths = builder.build_leftward(&leftward, offsets.right)?;

        let zip = |connections: Vec<_>, paths: Vec<_>| -> Vec<Route> {
            connections
                .into_iter()
                .zip(paths)
                .map(|(connection, path)| Route { connection, path })
                .collect()
        };

        let plan = resolve_height(
            self.design,
            &frame,
            HeightParams {
                layer,
                width,
                space,
                clearance,
            },
            zip(rightward, right_paths),
            zip(leftward, left_paths),
        )?;

        info!(
            "channel from {} to {} on {:?}, height {}",
            plan.from_line(),
            plan.extent(),
            plan.axis(),
            plan.height()
        );

        Ok(plan)
    }

    fn layer(&self, connections: &[Connection]) -> Result<usize, RouteError> {
        if let Some(layer) = self.options.layer {
            if layer >= self.design.rules().layer_count() {
                warn!("requested layer {} does not exist", layer);
                return Err(RouteError::NoCommonLayer);
            }

            return Ok(layer);
        }

        let (layer, uses) =
            most_popular_layer(self.design, connections).ok_or(RouteError::NoCommonLayer)?;

        if uses < 2 * connections.len() {
            warn!(
                "layer {} reaches only {} of {} terminals",
                layer,
                uses,
                2 * connections.len()
            );
        }

        Ok(layer)
    }
}

/// Plans a river route over `selection` with default options.
pub fn route<R: AccessRules>(
    design: &Design<R>,
    selection: &WireSelection,
) -> Result<ChannelPlan, RouteError> {
    River::new(design, RiverOptions::default()).route(selection)
}
