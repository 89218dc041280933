//! Turning OCR output for one weekly menu into dated meal records.

pub mod dates;
pub mod record;
pub mod table;
pub mod text;

pub use dates::{MenuWeek, OutOfWeek};
pub use record::{MenuRecord, SchoolDay};
pub use table::{map_table, parse_day_token, RowSkip, SkippedRow, TableMapping};
pub use text::{clean_text, format_dessert};
