pub mod config;
pub mod error;
pub mod lookup;
pub mod menu;
pub mod ocr;
pub mod pipeline;
pub mod sanitize;
pub mod scanner;
pub mod secrets;
pub mod storage;

pub use config::{load_config, Config};
pub use error::{CantineError, ConfigError, OcrError, Result, ScanError, StorageError};
pub use lookup::{menus_for_date, render_day, render_menu};
pub use menu::{MenuRecord, MenuWeek};
pub use ocr::{DocupipeClient, OcrService};
pub use pipeline::{
    run_menu_extraction, BatchReport, BatchSummary, ExtractorConfig, ImageFailure, MenuExtractor,
};
pub use scanner::{ImageScanner, MenuImage};
pub use secrets::{resolve_secret, SecretError};
pub use storage::RecordTable;
