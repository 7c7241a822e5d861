//! Spreadsheet workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`)
//!
//! One sheet per deck, in workbook order. Cells are read as text so the sheet
//! rows go through the same parser as the text workbook.

use crate::catalogue::database::DeckCatalogue;
use crate::catalogue::sheet::CatalogueLoader;
use crate::{BowwowError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// File extensions read as spreadsheets
pub const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Load every sheet of a spreadsheet workbook as a deck
pub fn load_workbook(path: &Path) -> Result<DeckCatalogue> {
    let spreadsheet_error = |e: calamine::Error| {
        BowwowError::InvalidCatalogue(format!("failed to read {}: {e}", path.display()))
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let mut decks = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(spreadsheet_error)?;
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        decks.push(CatalogueLoader::parse_rows(name.trim(), &rows)?);
    }

    DeckCatalogue::from_decks(decks)
}

/// Text of one cell; whole numbers lose their `.0` so level `2` stays `"2"`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bowwow-{name}-{}.xlsx", std::process::id()))
    }

    /// Two decks; levels are numeric cells, one prompt spans lines
    fn write_workbook(path: &Path) {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Main Deck").unwrap();
            sheet.write_string(0, 0, "Core").unwrap();
            sheet.write_string(1, 0, "The original game.").unwrap();
            sheet.write_string(2, 0, "Three levels of questions.").unwrap();
            sheet.write_string(3, 0, "Level").unwrap();
            sheet.write_string(3, 1, "Type").unwrap();
            sheet.write_string(3, 2, "Prompt").unwrap();
            sheet.write_number(4, 0, 1).unwrap();
            sheet.write_string(4, 1, "Question").unwrap();
            sheet.write_string(4, 2, "What was your first impression of me?").unwrap();
            sheet.write_number(5, 0, 2).unwrap();
            sheet.write_string(5, 1, "Wildcard").unwrap();
            sheet
                .write_string(5, 2, "Write a note.\tFold it.\nRead it after the game.")
                .unwrap();
            sheet.write_number(6, 0, 2.0).unwrap();
            sheet.write_string(6, 1, "Question").unwrap();
            sheet.write_string(6, 2, "#1 rule: what is yours?").unwrap();
        }
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Self Love").unwrap();
            sheet.write_string(0, 0, "Expansion").unwrap();
            sheet.write_string(1, 0, "A deck for one.").unwrap();
            sheet.write_string(2, 0, "Questions to ask yourself.").unwrap();
            sheet.write_string(3, 0, "Type").unwrap();
            sheet.write_string(3, 1, "Prompt").unwrap();
            sheet.write_string(4, 0, "Question").unwrap();
            sheet.write_string(4, 1, "What do you need to hear right now?").unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_workbook() {
        let path = temp_path("load-workbook");
        write_workbook(&path);

        let catalogue = load_workbook(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(catalogue.deck_ids(), vec!["Main Deck 1", "Main Deck 2", "Self Love 1"]);
        let main = catalogue.deck("main deck").unwrap();
        assert_eq!(main.category, "Core");
        assert_eq!(main.summary, "Three levels of questions.");

        let level2 = catalogue.resolve("Main Deck 2").unwrap();
        assert_eq!(level2.len(), 2);
        assert!(level2[0].is_wildcard());
        assert_eq!(level2[0].prompt, "Write a note.\tFold it.\nRead it after the game.");
        assert_eq!(level2[1].prompt, "#1 rule: what is yours?");
        assert_eq!(catalogue.resolve("Self Love 1").unwrap().len(), 1);
    }

    #[test]
    fn test_load_from_file_dispatches_on_extension() {
        let path = temp_path("dispatch");
        write_workbook(&path);

        let catalogue = CatalogueLoader::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalogue.total_cards(), 4);
    }

    #[test]
    fn test_is_spreadsheet() {
        assert!(is_spreadsheet(Path::new("cards/wnrs.xlsx")));
        assert!(is_spreadsheet(Path::new("decks.ODS")));
        assert!(!is_spreadsheet(Path::new("cards/wnrs.cards")));
        assert!(!is_spreadsheet(Path::new("Daily.sheet")));
        assert!(!is_spreadsheet(Path::new("xlsx")));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(2.0)), "2");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(3)), "3");
        assert_eq!(cell_text(&Data::String(" Question ".to_string())), " Question ");
    }

    #[test]
    fn test_missing_workbook_is_invalid() {
        let path = PathBuf::from("no/such/workbook.xlsx");
        assert!(matches!(
            load_workbook(&path),
            Err(BowwowError::InvalidCatalogue(_))
        ));
    }
}
