//! Reading extracted menus back for a given day.

use chrono::NaiveDate;

use crate::menu::MenuRecord;

/// Records for `date`, in record order.
pub fn menus_for_date<'a, I>(records: I, date: NaiveDate) -> Vec<&'a MenuRecord>
where
    I: IntoIterator<Item = &'a MenuRecord>,
{
    let mut found: Vec<&MenuRecord> = records.into_iter().filter(|r| r.date == date).collect();
    found.sort();
    found
}

pub fn render_menu(record: &MenuRecord) -> String {
    format!(
        "📅 {} - {}\n🥗 Entrée: {}\n🍖 Plats: {}\n🥔 Accompagnement: {}\n🍰 Dessert: {}",
        record.date.format("%Y-%m-%d"),
        record.day_of_week,
        record.starter,
        record.main,
        record.side,
        record.dessert
    )
}

/// The menu text for one day, or a notice that none was found.
pub fn render_day<'a, I>(records: I, date: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a MenuRecord>,
{
    let found = menus_for_date(records, date);
    match found.first() {
        Some(record) => render_menu(record),
        None => format!("Aucun menu trouvé pour le {}", date.format("%Y-%m-%d")),
    }
}
