//! Host design: pins, subcell instances and the wires between their ports,
//! together with the technology rules the router queries.

mod design;
pub mod primitive;
pub mod rules;

pub use design::*;
