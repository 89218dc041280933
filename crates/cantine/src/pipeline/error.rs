use thiserror::Error;

use crate::error::{CantineError, OcrError, StorageError};

/// Why one image produced no records. Never fatal for the batch.
#[derive(Error, Debug)]
pub enum ImageFailure {
    #[error("file name '{filename}' does not declare a menu week")]
    UnrecognizedFilename { filename: String },

    #[error("could not read image: {0}")]
    ReadImage(#[source] StorageError),

    #[error("upload failed: {0}")]
    Upload(#[source] OcrError),

    #[error("status polling failed: {0}")]
    Poll(#[source] OcrError),

    #[error("extraction failed: {reason}")]
    ExtractionFailed { reason: String },

    #[error("extraction still pending after {attempts} polls")]
    TimedOut { attempts: u32 },

    #[error("no table detected in the extraction result")]
    NoTable,
}

impl ImageFailure {
    /// True when the failure was detected before anything was sent to the
    /// OCR service.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::UnrecognizedFilename { .. } | Self::ReadImage(_))
    }
}

/// Outcome of a failed pipeline step: either this image is skipped or the
/// whole batch stops.
#[derive(Debug)]
pub(crate) enum StepError {
    Skip(ImageFailure),
    Fatal(CantineError),
}

impl From<ImageFailure> for StepError {
    fn from(failure: ImageFailure) -> Self {
        Self::Skip(failure)
    }
}

impl From<StorageError> for StepError {
    fn from(error: StorageError) -> Self {
        Self::Fatal(error.into())
    }
}
