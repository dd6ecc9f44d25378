//! Data models for boxmark.

mod bounding_box;

pub use bounding_box::{BoundingBox, MATCH_ABS_TOL, MATCH_REL_TOL, is_close};
