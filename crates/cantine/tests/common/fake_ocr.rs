//! Scripted OCR service that counts every call.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use cantine::ocr::{OcrDocument, OcrService, PollResponse, Table};
use cantine::OcrError;

/// How the fake service treats one uploaded file.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// Reports `pending` for `pending_polls` polls, then returns the table.
    Completes { table: Table, pending_polls: u32 },
    /// Reports `pending`, then `failed` with the given reason.
    Fails { reason: String },
    /// Never leaves `pending`.
    NeverCompletes,
    /// Completes with documents that carry no table.
    NoTables,
    /// Rejects the upload.
    RejectsUpload,
}

#[derive(Default)]
struct Calls {
    submitted: Vec<String>,
    polls: HashMap<String, u32>,
}

#[derive(Default)]
pub struct FakeOcrService {
    outcomes: HashMap<String, FakeOutcome>,
    calls: RefCell<Calls>,
}

impl FakeOcrService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filename: &str, outcome: FakeOutcome) -> Self {
        self.outcomes.insert(filename.to_string(), outcome);
        self
    }

    pub fn completing(self, filename: &str, table: Table) -> Self {
        self.with(
            filename,
            FakeOutcome::Completes {
                table,
                pending_polls: 0,
            },
        )
    }

    /// File names in upload order.
    pub fn submitted(&self) -> Vec<String> {
        self.calls.borrow().submitted.clone()
    }

    pub fn submit_count(&self) -> usize {
        self.calls.borrow().submitted.len()
    }

    pub fn poll_count(&self) -> u32 {
        self.calls.borrow().polls.values().sum()
    }

    pub fn polls_for(&self, filename: &str) -> u32 {
        self.calls.borrow().polls.get(filename).copied().unwrap_or(0)
    }

    fn document_id(index: usize) -> String {
        format!("doc-{}", index)
    }

    fn filename_for(&self, document_id: &str) -> Option<String> {
        let index: usize = document_id.strip_prefix("doc-")?.parse().ok()?;
        self.calls.borrow().submitted.get(index).cloned()
    }
}

fn response(status: &str, documents: Vec<OcrDocument>, error: Option<String>) -> PollResponse {
    PollResponse {
        status: status.to_string(),
        documents,
        error,
    }
}

impl OcrService for FakeOcrService {
    fn submit(&self, filename: &str, data: &[u8]) -> Result<String, OcrError> {
        assert!(!data.is_empty(), "uploaded image should carry bytes");
        if let Some(FakeOutcome::RejectsUpload) = self.outcomes.get(filename) {
            return Err(OcrError::Status {
                endpoint: "/documents".to_string(),
                status: 401,
                body: "invalid API key".to_string(),
            });
        }
        let mut calls = self.calls.borrow_mut();
        calls.submitted.push(filename.to_string());
        Ok(Self::document_id(calls.submitted.len() - 1))
    }

    fn poll(&self, document_id: &str) -> Result<PollResponse, OcrError> {
        let filename = self
            .filename_for(document_id)
            .ok_or_else(|| OcrError::Status {
                endpoint: format!("/documents/{}", document_id),
                status: 404,
                body: "unknown document".to_string(),
            })?;

        let attempt = {
            let mut calls = self.calls.borrow_mut();
            let count = calls.polls.entry(filename.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let outcome = self
            .outcomes
            .get(&filename)
            .cloned()
            .unwrap_or(FakeOutcome::NoTables);

        Ok(match outcome {
            FakeOutcome::Completes {
                table,
                pending_polls,
            } => {
                if attempt <= pending_polls {
                    response("pending", Vec::new(), None)
                } else {
                    response(
                        "completed",
                        vec![OcrDocument {
                            table_list: vec![table],
                        }],
                        None,
                    )
                }
            }
            FakeOutcome::Fails { reason } => {
                if attempt == 1 {
                    response("pending", Vec::new(), None)
                } else {
                    response("failed", Vec::new(), Some(reason))
                }
            }
            FakeOutcome::NeverCompletes => response("processing", Vec::new(), None),
            FakeOutcome::NoTables => {
                response("completed", vec![OcrDocument::default()], None)
            }
            FakeOutcome::RejectsUpload => response("failed", Vec::new(), None),
        })
    }
}
