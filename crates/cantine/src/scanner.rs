use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{ScanError, StorageError};

/// MIME types of the raster scans the OCR service accepts.
const SUPPORTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// One scanned weekly menu. The file name is kept verbatim since it carries
/// the week the menu covers.
#[derive(Debug, Clone)]
pub struct MenuImage {
    pub path: PathBuf,
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl MenuImage {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| StorageError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            filename: file_name(path),
            bytes,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn is_supported_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .iter()
        .any(|mime| SUPPORTED_MIME_TYPES.contains(&mime.essence_str()))
}

pub struct ImageScanner {
    image_directory: PathBuf,
}

impl ImageScanner {
    pub fn new<P: AsRef<Path>>(image_directory: P) -> Self {
        Self {
            image_directory: image_directory.as_ref().to_path_buf(),
        }
    }

    /// Lists the menu images at the top level of the folder, sorted by file
    /// name.
    pub fn scan(&self) -> Result<Vec<PathBuf>, ScanError> {
        if !self.image_directory.is_dir() {
            return Err(ScanError::MissingDirectory(self.image_directory.clone()));
        }

        let mut images = Vec::new();
        for entry in WalkDir::new(&self.image_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ScanError::Walk {
                path: self.image_directory.clone(),
                source: e,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if is_supported_image(path) {
                debug!("Found menu image: {}", path.display());
                images.push(path.to_path_buf());
            } else {
                debug!("Ignoring non-image file: {}", path.display());
            }
        }

        info!(
            "Scanned {} menu images in {}",
            images.len(),
            self.image_directory.display()
        );
        Ok(images)
    }
}
