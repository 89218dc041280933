//! Shared test utilities for cantine integration tests.
//!
//! - `TestHarness` for isolated runs with temp image/output folders
//! - `FakeOcrService`, a scripted stand-in for the extraction service
//! - Menu table builders matching what the service returns

pub mod fake_ocr;
pub mod harness;
pub mod tables;

pub use fake_ocr::{FakeOcrService, FakeOutcome};
pub use harness::TestHarness;
pub use tables::*;
