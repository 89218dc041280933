//! Resolution of bare day numbers against the week declared in a menu's
//! file name.
//!
//! Menu scans are named after the week they cover, e.g.
//! `menu-du-29-au-03-octobre.jpg`: the week starts on the 29th of the month
//! *before* the named one and ends on the 3rd of October. A table cell only
//! carries "Lundi 29", so the month has to come from the file name.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WEEK_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^0-9])(\d{1,2})[-_ ]au[-_ ](\d{1,2})[-_ ](\p{L}+)(?:[-_ ](\d{4}))?")
        .unwrap()
});

const MONTHS: [(&str, u32); 24] = [
    ("janvier", 1),
    ("fevrier", 2),
    ("mars", 3),
    ("avril", 4),
    ("mai", 5),
    ("juin", 6),
    ("juillet", 7),
    ("aout", 8),
    ("septembre", 9),
    ("octobre", 10),
    ("novembre", 11),
    ("decembre", 12),
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
];

/// Decomposes to NFD and drops combining marks, so "décembre" in either
/// composed or decomposed form becomes "decembre".
fn fold_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Month number for a French or English month name, accents optional.
pub fn month_from_name(name: &str) -> Option<u32> {
    let normalized = fold_accents(&name.to_lowercase());
    MONTHS
        .iter()
        .find(|(month, _)| *month == normalized)
        .map(|(_, number)| *number)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day0() + 1)
        .unwrap_or(31)
}

/// The week a menu image declares in its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuWeek {
    pub start_day: u32,
    pub end_day: u32,
    /// The month named in the file name, which is the month of `end_day`.
    pub month: u32,
    pub year: i32,
}

/// Why a day number could not be placed in a [`MenuWeek`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("day {day} does not fall within {week}")]
pub struct OutOfWeek {
    pub day: u32,
    pub week: MenuWeek,
}

impl MenuWeek {
    /// Parses the week out of a file name such as
    /// `menu-du-29-au-03-octobre.jpg` or `29_au_03_Octobre_2025.png`.
    ///
    /// `fallback_year` is used when the name carries no four-digit year.
    /// Returns `None` when no range with a recognizable month is present.
    pub fn from_filename(filename: &str, fallback_year: i32) -> Option<Self> {
        let folded = fold_accents(filename);
        for caps in WEEK_RANGE.captures_iter(&folded) {
            let Some(month) = month_from_name(&caps[3]) else {
                continue;
            };
            let start_day: u32 = caps[1].parse().ok()?;
            let end_day: u32 = caps[2].parse().ok()?;
            if start_day == 0 || end_day == 0 || start_day > 31 || end_day > 31 {
                return None;
            }
            let year = caps
                .get(4)
                .and_then(|y| y.as_str().parse().ok())
                .unwrap_or(fallback_year);
            return Some(Self {
                start_day,
                end_day,
                month,
                year,
            });
        }
        None
    }

    /// True when the week starts in the month before the named one.
    pub fn spans_months(&self) -> bool {
        self.start_day > self.end_day
    }

    /// Year and month preceding the named month, rolling back over January.
    pub fn previous_month(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }

    /// Resolves a bare day number to a calendar date.
    ///
    /// For a week crossing a month boundary, days from `start_day` up to the
    /// last day of the previous month belong to that month and days
    /// `1..=end_day` to the named month. For a week inside one month only
    /// `start_day..=end_day` is accepted. Everything else is rejected rather
    /// than guessed.
    pub fn resolve(&self, day: u32) -> Result<NaiveDate, OutOfWeek> {
        let out_of_week = || OutOfWeek { day, week: *self };

        let (year, month) = if self.spans_months() {
            let (prev_year, prev_month) = self.previous_month();
            if (self.start_day..=days_in_month(prev_year, prev_month)).contains(&day) {
                (prev_year, prev_month)
            } else if (1..=self.end_day).contains(&day) {
                (self.year, self.month)
            } else {
                return Err(out_of_week());
            }
        } else if (self.start_day..=self.end_day).contains(&day) {
            (self.year, self.month)
        } else {
            return Err(out_of_week());
        };

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_week)
    }
}

impl fmt::Display for MenuWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.spans_months() {
            let (prev_year, prev_month) = self.previous_month();
            write!(
                f,
                "the week {:04}-{:02}-{:02} .. {:04}-{:02}-{:02}",
                prev_year, prev_month, self.start_day, self.year, self.month, self.end_day
            )
        } else {
            write!(
                f,
                "the week {:04}-{:02}-{:02} .. {:04}-{:02}-{:02}",
                self.year, self.month, self.start_day, self.year, self.month, self.end_day
            )
        }
    }
}
