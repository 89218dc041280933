//! Access to the external OCR / table-extraction service.

pub mod client;
pub mod clock;
pub mod job;
pub mod poller;
pub mod response;

pub use client::DocupipeClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use job::{ExtractionJob, JobStatus};
pub use poller::{JobPoller, PollPolicy, PollState};
pub use response::{first_table, OcrDocument, PollResponse, Table};

use crate::error::OcrError;

/// Submit-then-poll contract of the extraction service.
pub trait OcrService {
    /// Uploads one image and returns the service's document id.
    fn submit(&self, filename: &str, data: &[u8]) -> Result<String, OcrError>;

    /// Fetches the current state of a submitted document.
    fn poll(&self, document_id: &str) -> Result<PollResponse, OcrError>;
}
