use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::menu::MenuRecord;

pub const DEFAULT_TABLE_FILENAME: &str = "menu_records.csv";

const PARTIAL_SUFFIX: &str = "partial";

/// Move a file from `src` to `dst`. Uses `rename` first and falls back to
/// copy + delete for cross-device moves.
fn move_file(src: &Path, dst: &Path) -> Result<(), StorageError> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    std::fs::copy(src, dst).map_err(|e| StorageError::WriteFile {
        path: dst.to_path_buf(),
        source: e,
    })?;
    std::fs::remove_file(src).map_err(|e| StorageError::WriteFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// The flat record table a batch produces. Its presence on disk marks the
/// batch as done.
#[derive(Debug, Clone)]
pub struct RecordTable {
    path: PathBuf,
}

impl RecordTable {
    pub fn new<P: AsRef<Path>>(output_directory: P, filename: &str) -> Self {
        Self {
            path: output_directory.as_ref().join(filename),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Where records are appended while a batch is still running.
    pub fn partial_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".");
        name.push(PARTIAL_SUFFIX);
        PathBuf::from(name)
    }

    pub fn json_path(&self) -> PathBuf {
        self.path.with_extension("json")
    }

    pub fn load(&self) -> Result<Vec<MenuRecord>, StorageError> {
        let file = File::open(&self.path).map_err(|e| StorageError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        reader
            .deserialize()
            .collect::<Result<Vec<MenuRecord>, _>>()
            .map_err(|e| StorageError::Csv {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Starts a fresh partial table, replacing leftovers of an interrupted
    /// batch.
    pub fn begin(&self) -> Result<TableWriter, StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let partial = self.partial_path();
        let file = File::create(&partial).map_err(|e| StorageError::WriteFile {
            path: partial.clone(),
            source: e,
        })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(MenuRecord::COLUMNS)
            .map_err(|e| StorageError::Csv {
                path: partial.clone(),
                source: e,
            })?;
        writer.flush().map_err(|e| StorageError::WriteFile {
            path: partial.clone(),
            source: e,
        })?;

        Ok(TableWriter {
            partial,
            target: self.path.clone(),
            writer,
            rows: 0,
        })
    }

    /// Writes the record set as pretty JSON next to the table.
    pub fn export_json(&self, records: &BTreeSet<MenuRecord>) -> Result<PathBuf, StorageError> {
        let path = self.json_path();
        let records: Vec<&MenuRecord> = records.iter().collect();
        let json = serde_json::to_string_pretty(&records).map_err(|e| StorageError::Json {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| StorageError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Appends records to the partial table of a running batch.
pub struct TableWriter {
    partial: PathBuf,
    target: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl TableWriter {
    /// Appends one image's records and flushes them to disk.
    pub fn append(&mut self, records: &[MenuRecord]) -> Result<(), StorageError> {
        for record in records {
            self.writer
                .serialize(record)
                .map_err(|e| StorageError::Csv {
                    path: self.partial.clone(),
                    source: e,
                })?;
        }
        self.writer.flush().map_err(|e| StorageError::WriteFile {
            path: self.partial.clone(),
            source: e,
        })?;
        self.rows += records.len();
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Moves the partial table into place.
    pub fn finish(mut self) -> Result<PathBuf, StorageError> {
        self.writer.flush().map_err(|e| StorageError::WriteFile {
            path: self.partial.clone(),
            source: e,
        })?;
        let Self {
            partial,
            target,
            writer,
            ..
        } = self;
        drop(writer);

        move_file(&partial, &target)?;
        Ok(target)
    }

    /// Drops the partial table without producing the marker.
    pub fn discard(self) -> Result<(), StorageError> {
        let Self {
            partial, writer, ..
        } = self;
        drop(writer);

        match std::fs::remove_file(&partial) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::WriteFile {
                path: partial,
                source: e,
            }),
        }
    }
}
