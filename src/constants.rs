//! Global constants for boxmark

/// Image extensions picked up by the catalog (case-sensitive)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Default folder holding the images to label
pub const DEFAULT_IMAGES_DIR: &str = "assets/images";

/// Default folder receiving one label file per image
pub const DEFAULT_LABELS_DIR: &str = "assets/labels";

/// Default folder served under `/assets`
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Default folder holding the labeling page template
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Template rendered at `/`
pub const LABELING_TEMPLATE: &str = "labeling.html";

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
