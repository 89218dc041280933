use std::collections::BTreeSet;

use chrono::Datelike;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::error::{CantineError, Result};
use crate::menu::{map_table, MenuRecord, MenuWeek};
use crate::ocr::{first_table, Clock, ExtractionJob, JobPoller, OcrService, PollState, SystemClock};
use crate::sanitize;
use crate::scanner::{ImageScanner, MenuImage};
use crate::storage::{RecordTable, TableWriter};

use super::config::ExtractorConfig;
use super::context::ImageContext;
use super::error::{ImageFailure, StepError};
use super::progress::{ImagePhase, NoopProgress, ProgressEvent, ProgressReporter};
use super::summary::{BatchReport, BatchSummary, FailedImage, SkippedMenuRow};

/// Running totals shared by the images of one batch.
#[derive(Default)]
struct BatchState {
    records: BTreeSet<MenuRecord>,
    uploads: usize,
    completed: usize,
}

/// Turns a folder of weekly menu scans into a record table.
pub struct MenuExtractor<S, C = SystemClock> {
    config: ExtractorConfig,
    service: S,
    clock: C,
    progress: Box<dyn ProgressReporter>,
}

impl<S: OcrService> MenuExtractor<S, SystemClock> {
    pub fn new(config: ExtractorConfig, service: S) -> Self {
        Self::with_clock(config, service, SystemClock)
    }
}

impl<S: OcrService, C: Clock> MenuExtractor<S, C> {
    pub fn with_clock(config: ExtractorConfig, service: S, clock: C) -> Self {
        Self {
            config,
            service,
            clock,
            progress: Box::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn record_table(&self) -> RecordTable {
        RecordTable::new(&self.config.output_directory, &self.config.output_filename)
    }

    /// Processes every image of the folder once.
    ///
    /// When the record table already exists its records are returned and
    /// the OCR service is not contacted. Per-image problems end up in the
    /// summary; only local I/O failures are returned as errors.
    pub fn process(&self) -> Result<BatchReport> {
        let batch_id = Uuid::new_v4().to_string();
        let _batch_span = info_span!("menu.batch",
            batch_id = %batch_id,
            image_directory = %sanitize::redact_path(&self.config.image_directory),
        )
        .entered();

        let table = self.record_table();
        let mut summary = BatchSummary::new(batch_id.clone());
        summary.table_path = Some(table.path().to_path_buf());

        if table.exists() {
            let records: BTreeSet<MenuRecord> = table.load()?.into_iter().collect();
            info!(
                records = records.len(),
                "Record table already present, skipping extraction"
            );
            summary.already_present = true;
            return Ok(BatchReport { records, summary });
        }

        let images = ImageScanner::new(&self.config.image_directory).scan()?;
        summary.images_found = images.len();
        if images.is_empty() {
            info!("No menu images to process");
            summary.table_path = None;
            return Ok(BatchReport {
                records: BTreeSet::new(),
                summary,
            });
        }

        let fallback_year = self
            .config
            .fallback_year
            .unwrap_or_else(|| self.clock.now().year());
        let mut writer = table.begin()?;
        let mut batch = BatchState::default();

        for path in images {
            let mut ctx = ImageContext::new(path);
            let _image_span = info_span!("menu.extract",
                batch_id = %batch_id,
                filename = %ctx.filename,
            )
            .entered();

            let outcome = self.extract_image(&mut ctx, &mut writer, fallback_year, &mut batch);

            summary
                .skipped_rows
                .extend(ctx.skipped_rows.drain(..).map(|skipped| SkippedMenuRow {
                    filename: ctx.filename.clone(),
                    row: skipped.row,
                    reason: skipped.reason,
                }));

            match outcome {
                Ok(()) => {
                    if ctx.records_written > 0 {
                        summary.images_with_records += 1;
                    }
                    summary.records_written += ctx.records_written;
                    self.progress.report(ProgressEvent::Completed {
                        filename: ctx.filename.clone(),
                        records: ctx.records_written,
                    });
                }
                Err(StepError::Skip(failure)) => {
                    if failure.is_local() {
                        warn!(reason = %failure, "Image skipped before upload");
                    } else {
                        warn!(reason = %failure, "Image produced no records");
                    }
                    self.progress.report(ProgressEvent::Failed {
                        filename: ctx.filename.clone(),
                        error: failure.to_string(),
                    });
                    summary.failed.push(FailedImage {
                        filename: ctx.filename.clone(),
                        reason: failure,
                    });
                }
                Err(StepError::Fatal(e)) => {
                    error!(error = %e, "Batch aborted");
                    if let Err(discard_error) = writer.discard() {
                        warn!(error = %discard_error, "Failed to remove partial record table");
                    }
                    return Err(e);
                }
            }
        }

        self.finalise(table, writer, batch, summary)
    }

    /// Keeps the table when at least one image got through OCR, so a batch
    /// that never reached the service is retried on the next run.
    fn finalise(
        &self,
        table: RecordTable,
        writer: TableWriter,
        batch: BatchState,
        mut summary: BatchSummary,
    ) -> Result<BatchReport> {
        let _step = info_span!("persist").entered();

        if batch.completed == 0 {
            info!(
                failed = summary.failed.len(),
                "No image completed extraction, record table not written"
            );
            writer.discard()?;
            summary.table_path = None;
            return Ok(BatchReport {
                records: batch.records,
                summary,
            });
        }

        let rows = writer.rows();
        let path = writer.finish()?;
        info!(
            records = rows,
            path = %sanitize::redact_path(&path),
            "Record table written"
        );

        if self.config.export_json {
            let json_path = table.export_json(&batch.records)?;
            debug!(path = %sanitize::redact_path(&json_path), "Records exported as JSON");
        }

        Ok(BatchReport {
            records: batch.records,
            summary,
        })
    }

    fn extract_image(
        &self,
        ctx: &mut ImageContext,
        writer: &mut TableWriter,
        fallback_year: i32,
        batch: &mut BatchState,
    ) -> std::result::Result<(), StepError> {
        // Step 1: Checks that need no OCR call
        let week = MenuWeek::from_filename(&ctx.filename, fallback_year).ok_or_else(|| {
            ImageFailure::UnrecognizedFilename {
                filename: ctx.filename.clone(),
            }
        })?;
        let image = MenuImage::read(&ctx.path).map_err(ImageFailure::ReadImage)?;
        debug!(week = %week, bytes = image.bytes.len(), "Menu image loaded");

        // Step 2: Upload
        let job = {
            let _step = info_span!("upload").entered();
            self.progress.report(ProgressEvent::Phase {
                filename: ctx.filename.clone(),
                phase: ImagePhase::Uploading,
            });
            if batch.uploads > 0 && !self.config.pause_between_images.is_zero() {
                self.clock.sleep(self.config.pause_between_images);
            }
            batch.uploads += 1;

            let document_id = self
                .service
                .submit(&image.filename, &image.bytes)
                .map_err(ImageFailure::Upload)?;
            debug!(document_id = %document_id, "Image submitted");
            ctx.job.insert(ExtractionJob::new(
                document_id,
                image.filename.clone(),
                self.clock.now(),
            ))
        };

        // Step 3: Poll until the job is terminal
        {
            let _step = info_span!("poll", document_id = %job.document_id).entered();
            self.progress.report(ProgressEvent::Phase {
                filename: ctx.filename.clone(),
                phase: ImagePhase::Polling,
            });
            let poller = JobPoller::new(&self.service, &self.clock, self.config.poll_policy);
            match poller.run(job).map_err(ImageFailure::Poll)? {
                PollState::Completed => batch.completed += 1,
                PollState::Failed { reason } => {
                    return Err(ImageFailure::ExtractionFailed { reason }.into())
                }
                PollState::TimedOut { attempts } | PollState::Pending { attempts } => {
                    return Err(ImageFailure::TimedOut { attempts }.into())
                }
            }
        }

        // Step 4: Map the first table to records
        let mapping = {
            let _step = info_span!("map_table").entered();
            self.progress.report(ProgressEvent::Phase {
                filename: ctx.filename.clone(),
                phase: ImagePhase::Mapping,
            });
            let table = first_table(job.documents()).ok_or(ImageFailure::NoTable)?;
            let mapping = map_table(&ctx.filename, &week, table);
            for skipped in &mapping.skipped {
                warn!(row = skipped.row, reason = %skipped.reason, "Skipping menu row");
            }
            debug!(
                rows = table.len(),
                records = mapping.records.len(),
                skipped = mapping.skipped.len(),
                "Table mapped"
            );
            mapping
        };
        ctx.skipped_rows = mapping.skipped;

        // Step 5: Append to the batch table
        {
            let _step = info_span!("persist").entered();
            self.progress.report(ProgressEvent::Phase {
                filename: ctx.filename.clone(),
                phase: ImagePhase::Persisting,
            });
            let fresh: Vec<MenuRecord> = mapping
                .records
                .into_iter()
                .filter(|record| batch.records.insert(record.clone()))
                .collect();
            writer.append(&fresh)?;
            ctx.records_written = fresh.len();
        }

        Ok(())
    }
}

/// Entry point for the daily run: extracts the menus and describes the
/// outcome. Errors never escape; the caller carries on without menu data.
pub fn run_menu_extraction<S: OcrService>(config: &ExtractorConfig, service: S) -> String {
    let extractor = MenuExtractor::new(config.clone(), service)
        .with_progress(Box::new(super::progress::LogProgress));
    match extractor.process() {
        Ok(report) => report.summary.to_string(),
        Err(e) => degraded_message(&e),
    }
}

fn degraded_message(e: &CantineError) -> String {
    error!(error = %e, "Menu extraction failed");
    format!("Menu extraction failed, continuing without menu data: {}", e)
}
