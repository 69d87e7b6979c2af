// Segment graph module

pub mod segment_graph;

pub use segment_graph::*;
