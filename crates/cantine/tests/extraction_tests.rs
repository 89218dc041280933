//! End-to-end tests of a batch: folder of menu scans in, record table out.

mod common;

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use cantine::ocr::Clock;
use cantine::{run_menu_extraction, CantineError, ImageFailure, MenuRecord};
use common::*;

const WEEK_1: &str = "menu-du-29-au-03-octobre-2025.jpg";
const WEEK_2: &str = "menu-du-06-au-10-octobre-2025.jpg";
const WEEK_3: &str = "menu-du-13-au-17-octobre-2025.jpg";

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

fn filenames(records: &BTreeSet<MenuRecord>) -> BTreeSet<&str> {
    records.iter().map(|r| r.filename.as_str()).collect()
}

#[test]
fn test_full_week_resolves_across_month_boundary() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    let service = FakeOcrService::new().completing(WEEK_1, week_sept_29());

    let report = harness.extractor(service).process().unwrap();

    let dates: Vec<NaiveDate> = report.records.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(9, 29), date(9, 30), date(10, 1), date(10, 2), date(10, 3)]
    );

    let monday = report.records.iter().next().unwrap();
    assert_eq!(monday.day_of_week, "Lundi");
    assert_eq!(monday.day_number, 29);
    assert_eq!(monday.starter, "Betterave rouge");
    assert_eq!(monday.main, "Steak haché Steak végétarien");
    assert_eq!(monday.side, "Penne sauce tomate");
    assert_eq!(monday.dessert, "Yaourt / Fraise");

    assert_eq!(report.summary.images_found, 1);
    assert_eq!(report.summary.images_with_records, 1);
    assert_eq!(report.summary.records_written, 5);
    assert!(report.summary.failed.is_empty());
}

#[test]
fn test_failed_image_does_not_stop_the_batch() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    harness.write_image(WEEK_2);
    harness.write_image(WEEK_3);
    let service = FakeOcrService::new()
        .completing(WEEK_1, week_sept_29())
        .with(
            WEEK_2,
            FakeOutcome::Fails {
                reason: "document unreadable".to_string(),
            },
        )
        .completing(WEEK_3, week_oct_13());

    let extractor = harness.extractor(service);
    let report = extractor.process().unwrap();

    assert_eq!(filenames(&report.records), BTreeSet::from([WEEK_1, WEEK_3]));
    assert_eq!(report.records.len(), 10);

    assert_eq!(report.summary.failed_filenames(), vec![WEEK_2]);
    assert!(matches!(
        report.summary.failure_for(WEEK_2),
        Some(ImageFailure::ExtractionFailed { reason }) if reason == "document unreadable"
    ));
    assert!(report.summary.to_string().contains(WEEK_2));

    // All three images went to the service, in file name order
    assert_eq!(extractor.service().submitted(), vec![WEEK_1, WEEK_2, WEEK_3]);

    let stored: BTreeSet<MenuRecord> = harness.table().load().unwrap().into_iter().collect();
    assert_eq!(stored, report.records);
}

#[test]
fn test_second_run_makes_no_service_calls() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    harness.write_image(WEEK_2);

    let first = harness
        .extractor(
            FakeOcrService::new()
                .completing(WEEK_1, week_sept_29())
                .completing(WEEK_2, week_oct_6()),
        )
        .process()
        .unwrap();
    assert!(harness.table().exists());

    let extractor = harness.extractor(FakeOcrService::new());
    let second = extractor.process().unwrap();

    assert_eq!(extractor.service().submit_count(), 0);
    assert_eq!(extractor.service().poll_count(), 0);
    assert!(second.summary.already_present);
    assert_eq!(second.records, first.records);
}

#[test]
fn test_batch_with_every_row_dropped_is_empty_not_error() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().completing(WEEK_2, narrow_table());

    let report = harness.extractor(service).process().unwrap();

    assert!(report.records.is_empty());
    assert!(report.summary.failed.is_empty());
    assert_eq!(report.summary.skipped_rows.len(), 2);
    assert_eq!(report.summary.images_with_records, 0);

    // The image reached the service, so the table is final even if empty
    assert!(harness.table().exists());
    assert!(harness.table().load().unwrap().is_empty());
}

#[test]
fn test_timed_out_image_is_isolated() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new()
        .with(WEEK_1, FakeOutcome::NeverCompletes)
        .completing(WEEK_2, week_oct_6());

    let extractor = harness.extractor(service);
    let report = extractor.process().unwrap();

    assert!(matches!(
        report.summary.failure_for(WEEK_1),
        Some(ImageFailure::TimedOut { attempts: 60 })
    ));
    assert_eq!(extractor.service().polls_for(WEEK_1), 60);
    assert_eq!(filenames(&report.records), BTreeSet::from([WEEK_2]));

    // 59 waits between polls, one pause before the second upload
    assert_eq!(
        extractor.clock().total_slept(),
        Duration::from_secs(59) + Duration::from_secs(3)
    );
}

#[test]
fn test_pending_polls_wait_one_interval() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().with(
        WEEK_2,
        FakeOutcome::Completes {
            table: week_oct_6(),
            pending_polls: 4,
        },
    );

    let extractor = harness.extractor(service);
    let report = extractor.process().unwrap();

    assert_eq!(report.records.len(), 5);
    assert_eq!(extractor.service().polls_for(WEEK_2), 5);
    assert_eq!(extractor.clock().sleeps(), vec![Duration::from_secs(1); 4]);
}

#[test]
fn test_pause_only_between_uploads() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    harness.write_image(WEEK_2);
    harness.write_image(WEEK_3);
    let service = FakeOcrService::new()
        .completing(WEEK_1, week_sept_29())
        .completing(WEEK_2, week_oct_6())
        .completing(WEEK_3, week_oct_13());

    let extractor = harness.extractor(service);
    extractor.process().unwrap();

    assert_eq!(extractor.clock().sleeps(), vec![Duration::from_secs(3); 2]);
}

#[test]
fn test_unrecognized_filename_is_never_uploaded() {
    let harness = TestHarness::new();
    harness.write_image("scan.jpg");

    let extractor = harness.extractor(FakeOcrService::new());
    let report = extractor.process().unwrap();

    assert_eq!(extractor.service().submit_count(), 0);
    assert!(matches!(
        report.summary.failure_for("scan.jpg"),
        Some(ImageFailure::UnrecognizedFilename { .. })
    ));

    // Nothing reached the service: no marker, the next run tries again
    assert!(!harness.table().exists());
    assert!(!harness.table().partial_path().exists());
}

#[test]
fn test_upload_error_skips_image() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_1);
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new()
        .with(WEEK_1, FakeOutcome::RejectsUpload)
        .completing(WEEK_2, week_oct_6());

    let report = harness.extractor(service).process().unwrap();

    assert!(matches!(
        report.summary.failure_for(WEEK_1),
        Some(ImageFailure::Upload(_))
    ));
    assert_eq!(filenames(&report.records), BTreeSet::from([WEEK_2]));
}

#[test]
fn test_response_without_table() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().with(WEEK_2, FakeOutcome::NoTables);

    let report = harness.extractor(service).process().unwrap();

    assert!(matches!(
        report.summary.failure_for(WEEK_2),
        Some(ImageFailure::NoTable)
    ));
    assert!(report.records.is_empty());
    assert!(harness.table().exists());
}

#[test]
fn test_transposed_table() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().completing(WEEK_2, transposed_week_oct_6());

    let report = harness.extractor(service).process().unwrap();

    assert_eq!(report.records.len(), 5);
    let tuesday = report.records.iter().find(|r| r.date == date(10, 7)).unwrap();
    assert_eq!(tuesday.day_of_week, "Mardi");
    assert_eq!(tuesday.main, "Ravioli");
    assert_eq!(tuesday.side, "-");
}

#[test]
fn test_year_from_clock_when_not_configured() {
    let harness = TestHarness::new();
    harness.write_image("menu-du-06-au-10-octobre.jpg");
    let service = FakeOcrService::new().completing("menu-du-06-au-10-octobre.jpg", week_oct_6());
    let config = cantine::ExtractorConfig {
        fallback_year: None,
        ..harness.config()
    };

    let extractor = harness.extractor_with(config, service);
    let report = extractor.process().unwrap();

    let year = extractor.clock().now().year();
    assert!(report.records.iter().all(|r| r.date.year() == year));
    assert_eq!(report.records.len(), 5);
}

#[test]
fn test_decomposed_filename_and_ordinal_day() {
    let harness = TestHarness::new();
    let filename = "menu-du-01-au-05-de\u{301}cembre.jpg";
    harness.write_image(filename);
    let service = FakeOcrService::new().completing(filename, week_dec_1());

    let extractor = harness.extractor(service);
    let report = extractor.process().unwrap();

    assert_eq!(extractor.service().submit_count(), 1);
    assert!(report.summary.failed.is_empty());
    assert!(report.summary.skipped_rows.is_empty());
    let dates: Vec<NaiveDate> = report.records.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(12, 1), date(12, 2), date(12, 3), date(12, 4), date(12, 5)]
    );
}

#[test]
fn test_json_export() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().completing(WEEK_2, week_oct_6());
    let config = cantine::ExtractorConfig {
        export_json: true,
        ..harness.config()
    };

    harness.extractor_with(config, service).process().unwrap();

    let json = std::fs::read_to_string(harness.table().json_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 5);
    assert_eq!(value[0]["date"], "2025-10-06");
}

#[test]
fn test_empty_folder_writes_nothing() {
    let harness = TestHarness::new();

    let report = harness.extractor(FakeOcrService::new()).process().unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.summary.images_found, 0);
    assert!(!harness.table().exists());
}

#[test]
fn test_missing_image_folder_is_fatal() {
    let harness = TestHarness::new();
    std::fs::remove_dir(&harness.image_dir).unwrap();

    let result = harness.extractor(FakeOcrService::new()).process();

    assert!(matches!(result, Err(CantineError::Scan(_))));
}

#[test]
fn test_run_menu_extraction_reports_summary() {
    let harness = TestHarness::new();
    harness.write_image(WEEK_2);
    let service = FakeOcrService::new().completing(WEEK_2, week_oct_6());
    let config = cantine::ExtractorConfig {
        pause_between_images: Duration::ZERO,
        ..harness.config()
    };

    let message = run_menu_extraction(&config, service);

    assert!(message.starts_with("Menu extraction: 1 images found, 1 yielded records, 5 records written"));
}

#[test]
fn test_run_menu_extraction_degrades_on_fatal_error() {
    let harness = TestHarness::new();
    let config = cantine::ExtractorConfig::new(
        harness.temp_path().join("does-not-exist"),
        &harness.output_dir,
    );

    let message = run_menu_extraction(&config, FakeOcrService::new());

    assert!(message.starts_with("Menu extraction failed, continuing without menu data"));
}
