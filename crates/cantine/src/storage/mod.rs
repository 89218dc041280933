pub mod table;

pub use table::{RecordTable, TableWriter, DEFAULT_TABLE_FILENAME};
