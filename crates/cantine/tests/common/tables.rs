//! Menu tables shaped like the extraction service's output.

#![allow(dead_code)]

use cantine::ocr::Table;

pub const HEADER: [&str; 5] = ["", "Entrée", "Plats", "Accompagnement", "Dessert"];

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// A row-oriented week: header, then one row per day token given.
pub fn week_table(days: &[&str]) -> Table {
    let mut table = vec![row(&HEADER)];
    for day in days {
        table.push(row(&[
            day,
            "**Betterave** rouge",
            "Steak haché\nSteak végétarien",
            "Penne sauce tomate",
            "Yaourt Fraise",
        ]));
    }
    table
}

/// Monday 29 September to Friday 3 October.
pub fn week_sept_29() -> Table {
    week_table(&["Lundi 29", "Mardi 30", "Mercredi 1", "Jeudi 2", "Vendredi 3"])
}

pub fn week_oct_6() -> Table {
    week_table(&["Lundi 6", "Mardi 7", "Mercredi 8", "Jeudi 9", "Vendredi 10"])
}

pub fn week_oct_13() -> Table {
    week_table(&["Lundi 13", "Mardi 14", "Mercredi 15", "Jeudi 16", "Vendredi 17"])
}

/// Monday 1 to Friday 5 December, the first printed as an ordinal.
pub fn week_dec_1() -> Table {
    week_table(&["Lundi 1er", "Mardi 2", "Mercredi 3", "Jeudi 4", "Vendredi 5"])
}

/// Rows the mapper cannot use: too few cells everywhere.
pub fn narrow_table() -> Table {
    vec![
        row(&["Jour", "Menu"]),
        row(&["Lundi 6", "Lasagnes"]),
        row(&["Mardi 7", "Poulet"]),
    ]
}

/// Days across the header, one row per course.
pub fn transposed_week_oct_6() -> Table {
    vec![
        row(&["", "Lundi 6", "Mardi 7", "Mercredi 8", "Jeudi 9", "Vendredi 10"]),
        row(&["Entrée", "Betterave", "Carottes", "Tomates", "Feuilleté", "Melon"]),
        row(&["Plats", "Steak", "Ravioli", "Supions", "Bœuf", "Poisson"]),
        row(&["Accompagnement", "Penne", "-", "Riz", "Haricots", "Frites"]),
        row(&["Dessert", "Yaourt Fraise", "Fruit", "Compote", "Flan", "Glace"]),
    ]
}
