mod bodies;

pub use bodies::*;
