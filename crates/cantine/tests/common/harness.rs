//! Isolated environment for running the extractor against a fake service.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use cantine::ocr::{ManualClock, PollPolicy};
use cantine::{ExtractorConfig, MenuExtractor, RecordTable};

use super::fake_ocr::FakeOcrService;

/// Stand-in JPEG bytes; the fake service never decodes them.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

pub struct TestHarness {
    temp_dir: TempDir,
    pub image_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let image_dir = temp_dir.path().join("images");
        let output_dir = temp_dir.path().join("menus");
        std::fs::create_dir_all(&image_dir).expect("Failed to create image dir");

        Self {
            temp_dir,
            image_dir,
            output_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_image(&self, filename: &str) -> PathBuf {
        let path = self.image_dir.join(filename);
        std::fs::write(&path, FAKE_JPEG).expect("Failed to write image");
        path
    }

    /// Defaults of a real run with the year pinned to 2025.
    pub fn config(&self) -> ExtractorConfig {
        ExtractorConfig {
            fallback_year: Some(2025),
            ..ExtractorConfig::new(&self.image_dir, &self.output_dir)
        }
    }

    pub fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2025, 9, 28, 18, 0, 0).unwrap())
    }

    pub fn extractor(&self, service: FakeOcrService) -> MenuExtractor<FakeOcrService, ManualClock> {
        self.extractor_with(self.config(), service)
    }

    pub fn extractor_with(
        &self,
        config: ExtractorConfig,
        service: FakeOcrService,
    ) -> MenuExtractor<FakeOcrService, ManualClock> {
        MenuExtractor::with_clock(config, service, Self::clock())
    }

    pub fn table(&self) -> RecordTable {
        RecordTable::new(&self.output_dir, "menu_records.csv")
    }

    pub fn fast_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(10),
            max_attempts,
        }
    }
}
