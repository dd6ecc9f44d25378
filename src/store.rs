//! Label store: the in-memory boxes of every image, mirrored to label files.
//!
//! The store owns the [`ImageCatalog`] and one box list per catalog entry, so
//! `boxes[i]` always belongs to image `i`. Every mutation is written through
//! to disk immediately:
//! - [`LabelStore::append`] appends a single line to the label file
//! - [`LabelStore::remove`] rewrites the whole label file
//!
//! Memory is updated before disk and there is no rollback. If a write fails
//! the two diverge until the next full rewrite of that file.

use std::path::{Path, PathBuf};

use crate::catalog::{ImageCatalog, image_stem};
use crate::format::LabelError;
use crate::format::yolo::{self, LABEL_EXTENSION};
use crate::model::BoundingBox;
use crate::navigation::Navigator;

/// Bounding boxes of every image in a catalog, backed by YOLO label files.
#[derive(Debug)]
pub struct LabelStore {
    catalog: ImageCatalog,
    labels_dir: PathBuf,
    boxes: Vec<Vec<BoundingBox>>,
}

impl LabelStore {
    /// Scan `images_dir` and load or create the matching label files.
    ///
    /// `labels_dir` is created if missing. Any malformed label line aborts the
    /// load with the offending file and line number.
    pub fn load(
        images_dir: impl Into<PathBuf>,
        labels_dir: impl Into<PathBuf>,
    ) -> Result<Self, LabelError> {
        let catalog = ImageCatalog::from_folder(images_dir)?;
        Self::with_catalog(catalog, labels_dir)
    }

    /// Load labels for an already built catalog.
    pub fn with_catalog(
        catalog: ImageCatalog,
        labels_dir: impl Into<PathBuf>,
    ) -> Result<Self, LabelError> {
        let labels_dir = labels_dir.into();
        std::fs::create_dir_all(&labels_dir).map_err(|e| LabelError::io(&labels_dir, e))?;

        let mut boxes = Vec::with_capacity(catalog.len());
        let mut created = 0;
        for record in catalog.records() {
            let path = label_path_for(&labels_dir, record.filename);
            if yolo::ensure_label_file(&path)? {
                log::debug!("Created empty label file {:?}", path);
                created += 1;
            }
            boxes.push(yolo::read_label_file(&path)?);
        }

        let store = Self {
            catalog,
            labels_dir,
            boxes,
        };

        log::info!(
            "Loaded {} boxes for {} images from {:?} ({} new label files)",
            store.total_boxes(),
            store.len(),
            store.labels_dir,
            created
        );

        Ok(store)
    }

    /// The image catalog the labels are aligned with.
    pub fn catalog(&self) -> &ImageCatalog {
        &self.catalog
    }

    /// Circular navigation over the catalog.
    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.catalog.len())
    }

    /// Number of images (and label lists).
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the store holds no images. Never true for a loaded store.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Folder holding the label files.
    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    /// Total number of boxes across all images.
    pub fn total_boxes(&self) -> usize {
        self.boxes.iter().map(Vec::len).sum()
    }

    /// Label file of the image at `index`.
    pub fn label_path(&self, index: usize) -> Result<PathBuf, LabelError> {
        let filename = self.catalog.filename_at(index)?;
        Ok(label_path_for(&self.labels_dir, filename))
    }

    /// Boxes of the image at `index`, in file order.
    pub fn get(&self, index: usize) -> Result<&[BoundingBox], LabelError> {
        self.catalog.check_index(index)?;
        Ok(&self.boxes[index])
    }

    /// Add a box to the image at `index` and append it to its label file.
    pub fn append(&mut self, index: usize, b: BoundingBox) -> Result<(), LabelError> {
        let path = self.label_path(index)?;
        self.boxes[index].push(b);
        yolo::append_label_line(&path, &b)?;

        log::debug!("Appended {:?} to {:?}", b, path);
        Ok(())
    }

    /// Remove the first box of image `index` matching `b`.
    ///
    /// Matching uses [`BoundingBox::approx_eq`]. Only one box is removed even
    /// if several match. Returns `Ok(false)` and leaves memory and disk
    /// untouched when nothing matches; otherwise the label file is rewritten
    /// from the remaining boxes.
    pub fn remove(&mut self, index: usize, b: &BoundingBox) -> Result<bool, LabelError> {
        let path = self.label_path(index)?;
        let list = &mut self.boxes[index];

        let Some(pos) = list.iter().position(|stored| stored.approx_eq(b)) else {
            log::debug!("No box matching {:?} in {:?}", b, path);
            return Ok(false);
        };
        let removed = list.remove(pos);
        yolo::write_label_file(&path, list)?;

        log::debug!("Removed {:?} from {:?}", removed, path);
        Ok(true)
    }
}

/// `<labels_dir>/<image stem>.txt`
fn label_path_for(labels_dir: &Path, filename: &str) -> PathBuf {
    labels_dir.join(format!("{}.{}", image_stem(filename), LABEL_EXTENSION))
}
