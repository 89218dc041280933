use std::path::PathBuf;

use crate::menu::SkippedRow;
use crate::ocr::ExtractionJob;
use crate::sanitize;

/// State of one image as it moves through the pipeline steps.
pub struct ImageContext {
    // Input
    pub path: PathBuf,
    pub filename: String,

    // Set once the service accepted the upload
    pub job: Option<ExtractionJob>,

    // Mapping results
    pub records_written: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl ImageContext {
    pub fn new(path: PathBuf) -> Self {
        let filename = sanitize::redact_path(&path);
        Self {
            path,
            filename,
            job: None,
            records_written: 0,
            skipped_rows: Vec::new(),
        }
    }
}
