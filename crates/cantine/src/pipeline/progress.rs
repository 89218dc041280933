use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePhase {
    Uploading,
    Polling,
    Mapping,
    Persisting,
}

impl ImagePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Polling => "polling",
            Self::Mapping => "mapping",
            Self::Persisting => "persisting",
        }
    }
}

/// Events emitted by the extractor while it works through a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase {
        filename: String,
        phase: ImagePhase,
    },
    Completed {
        filename: String,
        records: usize,
    },
    Failed {
        filename: String,
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes progress to the log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { filename, phase } => {
                info!("{}: {}", filename, phase.as_str());
            }
            ProgressEvent::Completed { filename, records } => {
                info!("{}: {} records", filename, records);
            }
            ProgressEvent::Failed { filename, error } => {
                warn!("{}: skipped, {}", filename, error);
            }
        }
    }
}
