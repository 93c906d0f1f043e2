//! Core data primitives (Point, PointDataset).
//!
//! A [`PointDataset`] is the table of cleaned `(x, y)` pairs every detection
//! run starts from. Row position is the stable identity of a point.

mod dataset;
mod point;

pub use dataset::PointDataset;
pub use point::Point;
