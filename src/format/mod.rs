//! Label file handling.
//!
//! Labels are stored in the YOLO TXT format: one file per image, named after
//! the image stem, one bounding box per line.
//!
//! ```text
//! <class_id> <center_x> <center_y> <width> <height>
//! ```

mod error;
pub mod yolo;

pub use error::LabelError;
