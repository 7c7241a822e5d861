//! Card catalogue
//!
//! Readers for spreadsheet workbooks, the text workbook (.cards) and
//! per-deck sheet files (.sheet)

pub mod card;
pub mod database;
pub mod database_async;
pub mod sheet;
pub mod spreadsheet;

pub use card::{CardRecord, DeckId};
pub use database::{Deck, DeckCatalogue, DeckInfo, Level};
pub use database_async::SharedCatalogue;
pub use sheet::CatalogueLoader;
