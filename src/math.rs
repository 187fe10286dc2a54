use geo::{point, Point};
use serde::{Deserialize, Serialize};

/// The axis whose coordinate is constant along a rail.
///
/// `Axis::X` means the rails are vertical lines `x = const` and wires run in
/// the X direction across the channel, `Axis::Y` the opposite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub fn point_at(self, value: f64) -> Point {
        match self {
            Axis::X => point! {x: value, y: 0.0},
            Axis::Y => point! {x: 0.0, y: value},
        }
    }

    pub fn coord(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x(),
            Axis::Y => p.y(),
        }
    }
}

/// One of the eight rectangular orientations, mapping caller coordinates to
/// canonical `(along, across)` coordinates.
///
/// Flips are applied to the caller coordinates first, then the axes are
/// optionally swapped. The canonical point stores `along` in `x` and `across`
/// in `y`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transform {
    pub flip_x: bool,
    pub flip_y: bool,
    pub swap_axes: bool,
}

impl Transform {
    pub const fn new(flip_x: bool, flip_y: bool, swap_axes: bool) -> Self {
        Self {
            flip_x,
            flip_y,
            swap_axes,
        }
    }

    /// Picks the orientation that makes the channel run along increasing
    /// canonical `x` with the rails at constant canonical `y`.
    ///
    /// `across_ascending` tells whether the first connection's `to` is not
    /// below its `from` on the rail axis; `along_ascending` whether the last
    /// connection's `from` is not below the first one's on the other axis.
    pub fn canonical(axis: Axis, across_ascending: bool, along_ascending: bool) -> Self {
        match axis {
            Axis::X => Self::new(!across_ascending, !along_ascending, true),
            Axis::Y => Self::new(!along_ascending, !across_ascending, false),
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        let x = if self.flip_x { -p.x() } else { p.x() };
        let y = if self.flip_y { -p.y() } else { p.y() };

        if self.swap_axes {
            point! {x: y, y: x}
        } else {
            point! {x: x, y: y}
        }
    }

    /// The transform undoing `self`. Every member of the family is orthogonal,
    /// so the inverse is the transpose, which is again a member of the family.
    pub fn inverse(&self) -> Self {
        if self.swap_axes {
            Self::new(self.flip_y, self.flip_x, true)
        } else {
            *self
        }
    }

    /// Maps a rail, the line where `axis` has coordinate `value`, onto the
    /// canonical `across` axis.
    pub fn rail_to_across(&self, axis: Axis, value: f64) -> f64 {
        self.apply(axis.point_at(value)).y()
    }
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= f64::EPSILON * a.abs().max(b.abs()).max(1.0) * 16.0
}

pub fn points_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x(), b.x()) && approx_eq(a.y(), b.y())
}
