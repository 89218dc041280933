//! Mapping of an OCR table onto [`MenuRecord`]s.
//!
//! Expected layout, one row per day after a header row:
//!
//! ```text
//! | Jour     | Entrée          | Plats         | Accompagnement | Dessert       |
//! | Lundi 29 | Betterave rouge | Steak haché   | Penne          | Yaourt Fraise |
//! ```
//!
//! Tables that come back transposed (days across the header row) are turned
//! around first so the same positional rules apply.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::dates::{MenuWeek, OutOfWeek};
use super::record::{MenuRecord, SchoolDay};
use super::text::{clean_text, format_dessert, or_placeholder};

/// Day token plus starter, main, side and dessert.
pub const MIN_CELLS: usize = 5;

static DAY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(lundi|mardi|mercredi|jeudi|vendredi)\s*(\d{1,2})(?:er)?\b").unwrap()
});

/// Why a table row produced no record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowSkip {
    #[error("row has {cells} cells, expected at least {}", MIN_CELLS)]
    TooFewCells { cells: usize },

    #[error("no weekday token in '{cell}'")]
    NoDayToken { cell: String },

    #[error(transparent)]
    UnresolvableDay(#[from] OutOfWeek),

    #[error("{day_name} {day_number} resolves to {date}, which is not a {day_name}")]
    WeekdayMismatch {
        day_name: String,
        day_number: u32,
        date: NaiveDate,
    },
}

/// A skipped row, indexed from the top of the table (header is row 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: RowSkip,
}

#[derive(Debug, Default)]
pub struct TableMapping {
    pub records: Vec<MenuRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// Finds a weekday name followed by a day of the month, e.g. "Lundi 2",
/// "Mercredi 1er" or "**MARDI 30 septembre**".
pub fn parse_day_token(cell: &str) -> Option<(SchoolDay, u32)> {
    let cleaned = clean_text(cell);
    let caps = DAY_TOKEN.captures(&cleaned)?;
    let day = SchoolDay::from_name(&caps[1])?;
    let number = caps[2].parse().ok()?;
    Some((day, number))
}

fn is_day_row(row: &[String]) -> bool {
    row.first().is_some_and(|cell| parse_day_token(cell).is_some())
}

/// Transposes tables whose header row lists the days while the first
/// column holds the course labels.
fn normalize_orientation(table: &[Vec<String>]) -> Cow<'_, [Vec<String>]> {
    let Some(header) = table.first() else {
        return Cow::Borrowed(table);
    };

    let header_has_days = header
        .iter()
        .skip(1)
        .any(|cell| parse_day_token(cell).is_some());
    let rows_have_days = table.iter().skip(1).any(|row| is_day_row(row));

    if !header_has_days || rows_have_days {
        return Cow::Borrowed(table);
    }

    let width = table.iter().map(Vec::len).max().unwrap_or(0);
    let transposed: Vec<Vec<String>> = (0..width)
        .map(|col| {
            table
                .iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Cow::Owned(transposed)
}

/// Maps every data row of `table` to a record for `filename`.
///
/// Row 0 is the header and is never mapped. Rows that cannot be mapped are
/// reported in [`TableMapping::skipped`] instead of failing the table.
pub fn map_table(filename: &str, week: &MenuWeek, table: &[Vec<String>]) -> TableMapping {
    let table = normalize_orientation(table);
    let mut mapping = TableMapping::default();

    for (index, row) in table.iter().enumerate().skip(1) {
        match map_row(filename, week, row) {
            Ok(record) => mapping.records.push(record),
            Err(reason) => mapping.skipped.push(SkippedRow { row: index, reason }),
        }
    }

    mapping
}

fn map_row(filename: &str, week: &MenuWeek, row: &[String]) -> Result<MenuRecord, RowSkip> {
    if row.len() < MIN_CELLS {
        return Err(RowSkip::TooFewCells { cells: row.len() });
    }

    let (day, day_number) = parse_day_token(&row[0]).ok_or_else(|| RowSkip::NoDayToken {
        cell: clean_text(&row[0]),
    })?;

    let date = week.resolve(day_number)?;
    if !day.matches(date) {
        return Err(RowSkip::WeekdayMismatch {
            day_name: day.name().to_string(),
            day_number,
            date,
        });
    }

    Ok(MenuRecord {
        filename: filename.to_string(),
        date,
        day_of_week: day.name().to_string(),
        day_number,
        starter: or_placeholder(clean_text(&row[1])),
        main: or_placeholder(clean_text(&row[2])),
        side: or_placeholder(clean_text(&row[3])),
        dessert: or_placeholder(format_dessert(&clean_text(&row[4]))),
    })
}
