//! boxmark - browser-based bounding box annotation
//!
//! Serves a folder of images to a labeling page and stores the boxes drawn on
//! each image in a YOLO TXT label file next to it.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod format;
pub mod model;
pub mod navigation;
pub mod server;
pub mod store;

pub use catalog::{ImageCatalog, ImageRecord};
pub use config::{Args, ConfigError, LogLevel, ServerConfig};
pub use format::LabelError;
pub use model::BoundingBox;
pub use navigation::Navigator;
pub use server::{AppState, build_router, serve};
pub use store::LabelStore;
