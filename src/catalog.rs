//! Image catalog: the fixed, sorted list of images being labeled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::IMAGE_EXTENSIONS;
use crate::format::LabelError;

/// Check if a filename has a supported image extension.
///
/// The match is case-sensitive: `photo.JPG` is not picked up.
pub fn is_image_filename(name: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| name.len() > ext.len() + 1 && name.ends_with(&format!(".{}", ext)))
}

/// Label file stem for an image filename (`photo.v2.jpg` -> `photo.v2`).
pub fn image_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// An image and its position in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRecord<'a> {
    /// 0-based position in the catalog
    pub index: usize,
    /// Filename relative to the images directory
    pub filename: &'a str,
}

/// Ordered list of image filenames in a folder.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    /// Folder the images were discovered in
    folder: PathBuf,
    /// Filenames sorted lexicographically
    filenames: Vec<String>,
}

impl ImageCatalog {
    /// Discover image files in a folder, non-recursively.
    ///
    /// Fails if the folder cannot be read, contains no images, or contains two
    /// images whose labels would land in the same file.
    pub fn from_folder(folder: impl Into<PathBuf>) -> Result<Self, LabelError> {
        let folder = folder.into();
        let entries = std::fs::read_dir(&folder).map_err(|e| LabelError::io(&folder, e))?;

        let mut filenames = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            // Non UTF-8 names cannot be addressed over HTTP
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping non UTF-8 filename {:?}", path);
                continue;
            };
            if is_image_filename(name) {
                filenames.push(name.to_string());
            }
        }

        Self::from_filenames(folder, filenames)
    }

    /// Build a catalog from a list of filenames in `folder`.
    pub fn from_filenames(
        folder: impl Into<PathBuf>,
        mut filenames: Vec<String>,
    ) -> Result<Self, LabelError> {
        let folder = folder.into();
        if filenames.is_empty() {
            return Err(LabelError::EmptyCatalog { dir: folder });
        }

        // Sort by filename for consistent ordering
        filenames.sort();

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for name in &filenames {
            if let Some(first) = seen.insert(image_stem(name), name) {
                return Err(LabelError::DuplicateStem {
                    stem: image_stem(name).to_string(),
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }

        log::debug!("Catalog of {} images in {:?}", filenames.len(), folder);

        Ok(Self { folder, filenames })
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// Whether the catalog holds no images. Never true for a loaded catalog.
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Folder containing the images.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Fail unless `index` addresses an image.
    pub fn check_index(&self, index: usize) -> Result<(), LabelError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(LabelError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    /// Filename of the image at `index`.
    pub fn filename_at(&self, index: usize) -> Result<&str, LabelError> {
        self.check_index(index)?;
        Ok(&self.filenames[index])
    }

    /// Label file stem of the image at `index`.
    pub fn stem_at(&self, index: usize) -> Result<&str, LabelError> {
        self.filename_at(index).map(image_stem)
    }

    /// Full path of the image at `index`.
    pub fn image_path(&self, index: usize) -> Result<PathBuf, LabelError> {
        self.filename_at(index).map(|name| self.folder.join(name))
    }

    /// Position of a filename in the catalog.
    pub fn position(&self, filename: &str) -> Option<usize> {
        self.filenames
            .binary_search_by(|probe| probe.as_str().cmp(filename))
            .ok()
    }

    /// Iterate over all images in order.
    pub fn records(&self) -> impl Iterator<Item = ImageRecord<'_>> {
        self.filenames
            .iter()
            .enumerate()
            .map(|(index, filename)| ImageRecord { index, filename })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("a.jpg"));
        assert!(is_image_filename("a.jpeg"));
        assert!(is_image_filename("dir.name.png"));
        assert!(!is_image_filename("a.JPG"));
        assert!(!is_image_filename("a.txt"));
        assert!(!is_image_filename("notajpg"));
        assert!(!is_image_filename(".png"));
    }

    #[test]
    fn test_image_stem() {
        assert_eq!(image_stem("a.jpg"), "a");
        assert_eq!(image_stem("photo.v2.png"), "photo.v2");
    }

    #[test]
    fn test_sorted_order() {
        let catalog =
            ImageCatalog::from_filenames("imgs", names(&["c.png", "a.jpg", "b.jpeg"])).unwrap();
        let order: Vec<_> = catalog.records().map(|r| r.filename).collect();
        assert_eq!(order, vec!["a.jpg", "b.jpeg", "c.png"]);
        assert_eq!(catalog.position("b.jpeg"), Some(1));
        assert_eq!(catalog.position("z.png"), None);
    }

    #[test]
    fn test_index_out_of_range() {
        let catalog = ImageCatalog::from_filenames("imgs", names(&["a.jpg", "b.jpg"])).unwrap();
        assert_eq!(catalog.filename_at(1).unwrap(), "b.jpg");
        assert!(matches!(
            catalog.filename_at(2),
            Err(LabelError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(
            catalog.image_path(0).unwrap(),
            PathBuf::from("imgs").join("a.jpg")
        );
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            ImageCatalog::from_filenames("imgs", Vec::new()),
            Err(LabelError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_duplicate_stem_rejected() {
        match ImageCatalog::from_filenames("imgs", names(&["a.png", "a.jpg"])) {
            Err(LabelError::DuplicateStem { stem, first, second }) => {
                assert_eq!(stem, "a");
                assert_eq!(first, "a.jpg");
                assert_eq!(second, "a.png");
            }
            other => panic!("Expected duplicate stem error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_folder_filters_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "c.JPG"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let catalog = ImageCatalog::from_folder(dir.path()).unwrap();
        let order: Vec<_> = catalog.records().map(|r| r.filename).collect();
        assert_eq!(order, vec!["a.jpg", "b.png"]);
    }
}
