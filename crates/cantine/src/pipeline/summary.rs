use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::menu::{MenuRecord, RowSkip};

use super::error::ImageFailure;

#[derive(Debug)]
pub struct FailedImage {
    pub filename: String,
    pub reason: ImageFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMenuRow {
    pub filename: String,
    pub row: usize,
    pub reason: RowSkip,
}

/// What a batch did, image by image.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub batch_id: String,
    pub images_found: usize,
    pub images_with_records: usize,
    pub records_written: usize,
    pub failed: Vec<FailedImage>,
    pub skipped_rows: Vec<SkippedMenuRow>,
    /// The record table existed before the batch started; nothing was
    /// uploaded.
    pub already_present: bool,
    pub table_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn new(batch_id: String) -> Self {
        Self {
            batch_id,
            ..Self::default()
        }
    }

    pub fn failed_filenames(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.filename.as_str()).collect()
    }

    pub fn failure_for(&self, filename: &str) -> Option<&ImageFailure> {
        self.failed
            .iter()
            .find(|f| f.filename == filename)
            .map(|f| &f.reason)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.already_present {
            write!(f, "Menu records already extracted")?;
            if let Some(path) = &self.table_path {
                write!(f, " ({})", path.display())?;
            }
            return write!(f, "; no images processed");
        }

        write!(
            f,
            "Menu extraction: {} images found, {} yielded records, {} records written",
            self.images_found, self.images_with_records, self.records_written
        )?;
        if let Some(path) = &self.table_path {
            write!(f, " to {}", path.display())?;
        }

        if !self.failed.is_empty() {
            write!(f, "\nFailed images:")?;
            for failed in &self.failed {
                write!(f, "\n  - {}: {}", failed.filename, failed.reason)?;
            }
        }

        if !self.skipped_rows.is_empty() {
            write!(f, "\nSkipped rows:")?;
            for skipped in &self.skipped_rows {
                write!(
                    f,
                    "\n  - {} row {}: {}",
                    skipped.filename, skipped.row, skipped.reason
                )?;
            }
        }

        Ok(())
    }
}

/// Result of one call to the extractor.
#[derive(Debug)]
pub struct BatchReport {
    pub records: BTreeSet<MenuRecord>,
    pub summary: BatchSummary,
}
