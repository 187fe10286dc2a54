//! Module containing the JSON interchange format of designs, and turning it
//! into a [`crate::design::Design`] and back.

pub mod design;
pub mod structure;
