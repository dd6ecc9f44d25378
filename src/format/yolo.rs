//! YOLO TXT label file codec.
//!
//! Each label file holds the boxes of exactly one image:
//! - one box per line, newline-terminated, no header
//! - fields separated by whitespace: integer class id, then four floats
//! - blank lines are ignored on read and never written

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::format::error::LabelError;
use crate::model::BoundingBox;

/// Extension of label files.
pub const LABEL_EXTENSION: &str = "txt";

/// Number of whitespace-separated fields on a label line.
const FIELD_COUNT: usize = 5;

/// Parse a single label line.
///
/// The error string describes what is wrong; callers attach file and line.
pub fn parse_line(line: &str) -> Result<BoundingBox, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            parts.len()
        ));
    }

    let class_id: u32 = parts[0]
        .parse()
        .map_err(|e| format!("invalid class id '{}': {}", parts[0], e))?;

    let mut coords = [0.0f64; 4];
    for (slot, token) in coords.iter_mut().zip(&parts[1..]) {
        *slot = token
            .parse()
            .map_err(|e| format!("invalid coordinate '{}': {}", token, e))?;
    }
    let [cx, cy, w, h] = coords;

    Ok(BoundingBox::new(class_id, cx, cy, w, h))
}

/// Format a box as a label line, without the trailing newline.
///
/// Floats use the shortest representation that parses back to the same
/// value, so `0.1` stays `0.1` and `1.0` stays `1.0`.
pub fn format_line(b: &BoundingBox) -> String {
    format!("{} {:?} {:?} {:?} {:?}", b.class_id, b.cx, b.cy, b.w, b.h)
}

/// Parse the full contents of a label file.
pub fn parse_labels(content: &str, path: &Path) -> Result<Vec<BoundingBox>, LabelError> {
    let mut boxes = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let b = parse_line(line).map_err(|reason| LabelError::malformed_line(path, idx + 1, reason))?;
        boxes.push(b);
    }
    Ok(boxes)
}

/// Read and parse a label file.
pub fn read_label_file(path: &Path) -> Result<Vec<BoundingBox>, LabelError> {
    let content = std::fs::read_to_string(path).map_err(|e| LabelError::io(path, e))?;
    parse_labels(&content, path)
}

/// Create an empty label file if none exists. Returns true if it was created.
pub fn ensure_label_file(path: &Path) -> Result<bool, LabelError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(LabelError::io(path, e)),
    }
}

/// Append one box to the end of a label file.
pub fn append_label_line(path: &Path, b: &BoundingBox) -> Result<(), LabelError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| LabelError::io(path, e))?;
    writeln!(file, "{}", format_line(b)).map_err(|e| LabelError::io(path, e))
}

/// Replace the contents of a label file with the given boxes, in order.
pub fn write_label_file(path: &Path, boxes: &[BoundingBox]) -> Result<(), LabelError> {
    let mut content = String::new();
    for b in boxes {
        content.push_str(&format_line(b));
        content.push('\n');
    }
    let mut file = File::create(path).map_err(|e| LabelError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| LabelError::io(path, e))
}
