use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Config, DEFAULT_EXPORT_JSON};
use crate::ocr::PollPolicy;
use crate::storage::DEFAULT_TABLE_FILENAME;

const DEFAULT_PAUSE_BETWEEN_IMAGES: Duration = Duration::from_secs(3);

/// Everything the extractor needs, already resolved. Nothing in the
/// pipeline reads the environment.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub image_directory: PathBuf,
    pub output_directory: PathBuf,
    pub output_filename: String,
    pub poll_policy: PollPolicy,
    /// Wait between two uploads, to stay under the service's rate limit.
    pub pause_between_images: Duration,
    /// Year for file names without one; `None` means the clock's year.
    pub fallback_year: Option<i32>,
    pub export_json: bool,
}

impl ExtractorConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(image_directory: P, output_directory: Q) -> Self {
        Self {
            image_directory: image_directory.into(),
            output_directory: output_directory.into(),
            output_filename: DEFAULT_TABLE_FILENAME.to_string(),
            poll_policy: PollPolicy::default(),
            pause_between_images: DEFAULT_PAUSE_BETWEEN_IMAGES,
            fallback_year: None,
            export_json: DEFAULT_EXPORT_JSON,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            image_directory: PathBuf::from(&config.image_directory),
            output_directory: PathBuf::from(&config.output_directory),
            output_filename: config.output_filename.clone(),
            poll_policy: PollPolicy {
                interval: Duration::from_millis(config.ocr.poll_interval_ms),
                max_attempts: config.ocr.max_poll_attempts,
            },
            pause_between_images: Duration::from_millis(config.ocr.pause_between_images_ms),
            fallback_year: config.year,
            export_json: config.export_json,
        }
    }
}
