use chrono::{DateTime, Utc};
use serde::Serialize;

use super::response::OcrDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    /// Maps a status string from the service. Intermediate states the
    /// service may report ("queued", "processing", ...) count as pending.
    pub fn from_wire(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "completed" | "complete" | "succeeded" => Self::Completed,
            "failed" | "error" => Self::Failed,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One in-flight extraction request for one image.
///
/// Leaves `Pending` exactly once; later transitions are ignored.
#[derive(Debug, Clone)]
pub struct ExtractionJob {
    pub document_id: String,
    pub filename: String,
    pub submitted_at: DateTime<Utc>,
    status: JobStatus,
    attempts: u32,
    documents: Vec<OcrDocument>,
    failure: Option<String>,
}

impl ExtractionJob {
    pub fn new(document_id: String, filename: String, submitted_at: DateTime<Utc>) -> Self {
        Self {
            document_id,
            filename,
            submitted_at,
            status: JobStatus::Pending,
            attempts: 0,
            documents: Vec::new(),
            failure: None,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Number of status polls issued so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn documents(&self) -> &[OcrDocument] {
        &self.documents
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Returns false if the job had already left `Pending`.
    pub(crate) fn complete(&mut self, documents: Vec<OcrDocument>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Completed;
        self.documents = documents;
        true
    }

    /// Returns false if the job had already left `Pending`.
    pub(crate) fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.failure = Some(reason.into());
        true
    }
}
