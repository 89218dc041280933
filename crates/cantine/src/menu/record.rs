use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The five weekdays a cafeteria menu covers, named as they appear on the
/// printed menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    /// Case-insensitive lookup of a menu day name ("Lundi", "MARDI", ...).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|day| day.name().to_lowercase() == lower)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Lundi",
            Self::Tuesday => "Mardi",
            Self::Wednesday => "Mercredi",
            Self::Thursday => "Jeudi",
            Self::Friday => "Vendredi",
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Tuesday => Weekday::Tue,
            Self::Wednesday => Weekday::Wed,
            Self::Thursday => Weekday::Thu,
            Self::Friday => Weekday::Fri,
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.weekday() == self.weekday()
    }
}

/// One day of a weekly menu, tied to an unambiguous calendar date.
///
/// Field order is the column order of the record table. Records sort by
/// date first so a set of them reads chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuRecord {
    pub filename: String,
    pub date: NaiveDate,
    pub day_of_week: String,
    pub day_number: u32,
    #[serde(rename = "entree")]
    pub starter: String,
    #[serde(rename = "plats")]
    pub main: String,
    #[serde(rename = "accompagnement")]
    pub side: String,
    pub dessert: String,
}

impl MenuRecord {
    /// Column names of the record table, in serialization order.
    pub const COLUMNS: [&'static str; 8] = [
        "filename",
        "date",
        "day_of_week",
        "day_number",
        "entree",
        "plats",
        "accompagnement",
        "dessert",
    ];

    fn sort_key(&self) -> (NaiveDate, &str, u32, &str, &str, &str, &str, &str) {
        (
            self.date,
            &self.filename,
            self.day_number,
            &self.day_of_week,
            &self.starter,
            &self.main,
            &self.side,
            &self.dessert,
        )
    }
}

impl Ord for MenuRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for MenuRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
