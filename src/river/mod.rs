//! River routing: connects two parallel rows of terminals across an open
//! channel with non-crossing orthogonal wires on a single layer.
//!
//! Planning ([`River::route`]) reads the design and never mutates it; the
//! returned [`ChannelPlan`] is applied in one go with [`ChannelPlan::apply`].

pub mod collect;
pub mod emit;
pub mod frame;
pub mod orientation;
pub mod plan;
mod river;
pub mod selection;
pub mod staircase;

pub use plan::ChannelPlan;
pub use river::*;
