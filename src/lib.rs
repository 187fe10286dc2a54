pub mod graph;
pub mod design;
pub mod format;
pub mod math;
pub mod river;
