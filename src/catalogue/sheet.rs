//! Sheet row parsing and the text workbook format
//!
//! Every source (spreadsheet workbook, `.cards` text workbook, `.sheet`
//! file) ends up as rows of cells for one sheet: three metadata rows
//! (category, description, summary), a header row, then one card per row.
//!
//! The text formats spell a row as tab-separated cells. A `.cards` file is a
//! list of `[Sheet Name]` sections; lines starting with `#` are comments only
//! before the first section, since a prompt may itself start with `#`.

use crate::catalogue::card::{normalize_level, CardRecord, DeckId, DEFAULT_LEVEL};
use crate::catalogue::database::{Deck, DeckCatalogue, Level};
use crate::catalogue::spreadsheet;
use crate::{BowwowError, Result};
use std::fs;
use std::path::Path;

/// Catalogue loader for workbook files
pub struct CatalogueLoader;

/// Column positions resolved from a sheet's header row
struct Columns {
    level: Option<usize>,
    card_type: usize,
    prompt: usize,
}

impl Columns {
    fn from_header(sheet: &str, header: &[String]) -> Result<Self> {
        let mut level = None;
        let mut card_type = None;
        let mut prompt = None;

        for (i, cell) in header.iter().enumerate() {
            match cell.trim().to_lowercase().as_str() {
                "level" => level = Some(i),
                "type" => card_type = Some(i),
                "prompt" => prompt = Some(i),
                _ => {} // Extra columns are ignored
            }
        }

        let missing = |column: &str| {
            BowwowError::InvalidCatalogue(format!("sheet '{sheet}' has no '{column}' column"))
        };

        Ok(Columns {
            level,
            card_type: card_type.ok_or_else(|| missing("Type"))?,
            prompt: prompt.ok_or_else(|| missing("Prompt"))?,
        })
    }
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn sheet_header(line: &str) -> Option<&str> {
    let line = line.trim();
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

fn text_row(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(str::to_string)
        .collect()
}

impl CatalogueLoader {
    /// Load a catalogue from a spreadsheet or a `.cards` text workbook
    pub fn load_from_file(path: &Path) -> Result<DeckCatalogue> {
        if spreadsheet::is_spreadsheet(path) {
            return spreadsheet::load_workbook(path);
        }
        let content = fs::read_to_string(path).map_err(BowwowError::Io)?;
        Self::parse(&content)
    }

    /// Parse a whole text workbook
    pub fn parse(content: &str) -> Result<DeckCatalogue> {
        let mut decks = Vec::new();
        let mut current: Option<(&str, Vec<Vec<String>>)> = None;

        for line in content.lines() {
            if let Some(name) = sheet_header(line) {
                if let Some((name, rows)) = current.take() {
                    decks.push(Self::parse_rows(name, &rows)?);
                }
                current = Some((name, Vec::new()));
                continue;
            }

            match current.as_mut() {
                Some((_, rows)) => rows.push(text_row(line)),
                None if line.trim().is_empty() || line.starts_with('#') => {}
                None => {
                    return Err(BowwowError::InvalidCatalogue(format!(
                        "row outside of any sheet: '{}'",
                        line.trim()
                    )))
                }
            }
        }

        if let Some((name, rows)) = current {
            decks.push(Self::parse_rows(name, &rows)?);
        }

        DeckCatalogue::from_decks(decks)
    }

    /// Parse the text rows of a single sheet named `name`
    pub fn parse_sheet(name: &str, content: &str) -> Result<Deck> {
        let rows: Vec<Vec<String>> = content.lines().map(text_row).collect();
        Self::parse_rows(name.trim(), &rows)
    }

    /// Build a deck from the cell rows of one sheet
    ///
    /// Blank rows are skipped before the metadata rows are counted.
    pub fn parse_rows(name: &str, rows: &[Vec<String>]) -> Result<Deck> {
        if name.is_empty() {
            return Err(BowwowError::InvalidCatalogue(
                "sheet with an empty name".to_string(),
            ));
        }

        let mut rows = rows.iter().filter(|row| !is_blank(row));

        let mut next_row = |what: &str| {
            rows.next().ok_or_else(|| {
                BowwowError::InvalidCatalogue(format!("sheet '{name}' is missing its {what} row"))
            })
        };
        let first_cell =
            |row: &Vec<String>| row.first().map(|c| c.trim()).unwrap_or_default().to_string();
        let category = first_cell(next_row("category")?);
        let description = first_cell(next_row("description")?);
        let summary = first_cell(next_row("summary")?);
        let columns = Columns::from_header(name, next_row("header")?)?;

        let mut levels: Vec<Level> = Vec::new();
        for row in rows {
            let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or_default();

            let prompt = cell(columns.prompt);
            if prompt.is_empty() {
                return Err(BowwowError::InvalidCatalogue(format!(
                    "sheet '{name}' has a card without a prompt: {row:?}"
                )));
            }

            let level = match columns.level {
                Some(i) if cell(i).is_empty() => {
                    return Err(BowwowError::InvalidCatalogue(format!(
                        "sheet '{name}' has a card without a level: {row:?}"
                    )))
                }
                Some(i) => normalize_level(cell(i)),
                None => DEFAULT_LEVEL.to_string(),
            };
            // Deck ids split on the last space, so a spaced level could never resolve
            if level.contains(char::is_whitespace) {
                return Err(BowwowError::InvalidCatalogue(format!(
                    "sheet '{name}' has a level with whitespace: '{level}'"
                )));
            }

            let record = CardRecord::new(
                DeckId::new(name, &level).to_string(),
                cell(columns.card_type),
                prompt,
            );

            match levels.iter_mut().find(|l| l.name == level) {
                Some(existing) => existing.cards.push(record),
                None => levels.push(Level {
                    name: level,
                    cards: vec![record],
                }),
            }
        }

        if levels.is_empty() {
            return Err(BowwowError::InvalidCatalogue(format!(
                "sheet '{name}' has no cards"
            )));
        }

        Ok(Deck {
            name: name.to_string(),
            category,
            description,
            summary,
            levels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK: &str = "\
# Test workbook
[Main Deck]
Core
The original game.
Three levels of questions.
Level\tType\tPrompt
1\tQuestion\tWhat was your first impression of me?
1.0\tWildcard\tTrade seats with the other player.
2\tQuestion\tWhat are you most proud of?

[Self Love]
Expansion
A deck for one.
Questions to ask yourself.
Type\tPrompt\tNotes
Question\tWhat do you need to hear right now?\tprinted 2020
";

    #[test]
    fn test_parse_workbook() {
        let catalogue = CatalogueLoader::parse(WORKBOOK).unwrap();
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.total_cards(), 4);

        let main = catalogue.deck("Main Deck").unwrap();
        assert_eq!(main.category, "Core");
        assert_eq!(main.description, "The original game.");
        assert_eq!(main.summary, "Three levels of questions.");
        assert_eq!(main.level_names(), vec!["1", "2"]);

        let level1 = catalogue.level("Main Deck", "1").unwrap();
        assert_eq!(level1.len(), 2);
        assert_eq!(level1[0].deck_id, "Main Deck 1");
        assert_eq!(level1[0].prompt, "What was your first impression of me?");
        assert!(level1[1].is_wildcard());
    }

    #[test]
    fn test_sheet_without_level_column() {
        let catalogue = CatalogueLoader::parse(WORKBOOK).unwrap();
        let cards = catalogue.resolve("Self Love 1").unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card_type, "Question");
        assert_eq!(cards[0].prompt, "What do you need to hear right now?");
    }

    #[test]
    fn test_missing_prompt_column() {
        let content = "[Broken]\nCore\nd\ns\nLevel\tType\n1\tQuestion\n";
        assert!(matches!(
            CatalogueLoader::parse(content),
            Err(BowwowError::InvalidCatalogue(_))
        ));
    }

    #[test]
    fn test_missing_metadata() {
        let content = "[Short]\nCore\nOnly a description\n";
        assert!(CatalogueLoader::parse(content).is_err());
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let content = "[Broken]\nCore\nd\ns\nType\tPrompt\nQuestion\t \n";
        assert!(CatalogueLoader::parse(content).is_err());
    }

    #[test]
    fn test_sheet_without_cards() {
        let content = "[Empty]\nCore\nd\ns\nType\tPrompt\n";
        assert!(CatalogueLoader::parse(content).is_err());
    }

    #[test]
    fn test_rows_before_first_sheet() {
        let content = "stray row\n[Intro]\nCore\nd\ns\nType\tPrompt\nQuestion\tHi?\n";
        assert!(CatalogueLoader::parse(content).is_err());
    }

    #[test]
    fn test_level_with_space_rejected() {
        let content = "[Main]\nCore\nd\ns\nLevel\tType\tPrompt\nFinal Round\tQuestion\tLast one?\n";
        match CatalogueLoader::parse(content) {
            Err(BowwowError::InvalidCatalogue(message)) => assert!(message.contains("Final Round")),
            other => panic!("expected InvalidCatalogue, got {other:?}"),
        }
    }

    #[test]
    fn test_every_listed_id_resolves() {
        let content = "[Main]\nCore\nd\ns\nLevel\tType\tPrompt\nWarmup\tQuestion\tA?\n2.0\tQuestion\tB?\n";
        let catalogue = CatalogueLoader::parse(content).unwrap();
        for id in catalogue.deck_ids() {
            assert!(catalogue.resolve(&id).is_ok(), "{id} does not resolve");
        }
    }

    #[test]
    fn test_hash_prompt_inside_sheet_is_a_card() {
        let content = "\
# comment before any sheet
[Rules]
Core
#1 is the house deck
s
Type\tPrompt
Question\t#1 rule: be honest. What is yours?
#2\tWhat rule would you add?
";
        let catalogue = CatalogueLoader::parse(content).unwrap();
        let deck = catalogue.deck("Rules").unwrap();
        assert_eq!(deck.description, "#1 is the house deck");

        let cards = catalogue.resolve("Rules 1").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].prompt, "#1 rule: be honest. What is yours?");
        assert_eq!(cards[1].card_type, "#2");
    }

    #[test]
    fn test_parse_single_sheet() {
        let deck = CatalogueLoader::parse_sheet(
            "Intro",
            "Core\r\nd\r\ns\r\nLevel\tType\tPrompt\r\n1\tQuestion\tHi?\r\n",
        )
        .unwrap();
        assert_eq!(deck.name, "Intro");
        assert_eq!(deck.level("1").unwrap().cards[0].prompt, "Hi?");
    }

    #[test]
    fn test_parse_rows_skips_blank_rows() {
        let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let rows = vec![
            row(&["Core", ""]),
            row(&["", ""]),
            row(&["d"]),
            row(&["s"]),
            row(&["Level", "Type", "Prompt"]),
            row(&["1", "Question", "Line one\nline two"]),
            row(&[]),
        ];
        let deck = CatalogueLoader::parse_rows("Intro", &rows).unwrap();
        assert_eq!(deck.category, "Core");
        assert_eq!(deck.total_cards(), 1);
        assert_eq!(deck.levels[0].cards[0].prompt, "Line one\nline two");
    }
}
