pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;
pub mod summary;

pub use config::ExtractorConfig;
pub use context::ImageContext;
pub use error::ImageFailure;
pub use progress::{ImagePhase, LogProgress, NoopProgress, ProgressEvent, ProgressReporter};
pub use runner::{run_menu_extraction, MenuExtractor};
pub use summary::{BatchReport, BatchSummary, FailedImage, SkippedMenuRow};
