//! Bounding box value type.

use serde::{Deserialize, Serialize};

/// Relative tolerance used when matching a submitted box against stored ones.
pub const MATCH_REL_TOL: f64 = 1e-9;

/// Absolute tolerance used when matching a submitted box against stored ones.
pub const MATCH_ABS_TOL: f64 = 0.0;

/// Wire representation: `[class_id, cx, cy, w, h]`.
type BoxTuple = (u32, f64, f64, f64, f64);

/// A single bounding box annotation in normalized YOLO coordinates.
///
/// `cx`/`cy` are the box center and `w`/`h` its size, conventionally in
/// `[0, 1]` relative to the image. The range is not enforced.
///
/// Serializes as the tuple `[class_id, cx, cy, w, h]`, which is the shape the
/// labeling page consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoxTuple", into = "BoxTuple")]
pub struct BoundingBox {
    pub class_id: u32,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(class_id: u32, cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            class_id,
            cx,
            cy,
            w,
            h,
        }
    }

    /// The four float fields in file order.
    pub fn coords(&self) -> [f64; 4] {
        [self.cx, self.cy, self.w, self.h]
    }

    /// Check whether `other` denotes the same box.
    ///
    /// The class id must match exactly; coordinates only need to agree within
    /// [`MATCH_REL_TOL`].
    pub fn approx_eq(&self, other: &BoundingBox) -> bool {
        self.class_id == other.class_id
            && self
                .coords()
                .iter()
                .zip(other.coords().iter())
                .all(|(a, b)| is_close(*a, *b, MATCH_REL_TOL, MATCH_ABS_TOL))
    }
}

/// `|a - b| <= max(rel_tol * max(|a|, |b|), abs_tol)`
pub fn is_close(a: f64, b: f64, rel_tol: f64, abs_tol: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol)
}

impl From<BoxTuple> for BoundingBox {
    fn from((class_id, cx, cy, w, h): BoxTuple) -> Self {
        Self::new(class_id, cx, cy, w, h)
    }
}

impl From<BoundingBox> for BoxTuple {
    fn from(b: BoundingBox) -> Self {
        (b.class_id, b.cx, b.cy, b.w, b.h)
    }
}
