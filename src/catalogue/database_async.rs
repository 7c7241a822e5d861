//! Async catalogue loading
//!
//! Supports three sources:
//! 1. A spreadsheet workbook (`.xlsx`, `.xls`, `.ods`), one deck per sheet
//! 2. A text workbook file (`.cards`)
//! 3. A directory of `.sheet` files, one deck per file, walked in parallel
//!
//! `SharedCatalogue` memoizes the first successful load so every request
//! handled by the process reuses the same read-only catalogue.

use crate::catalogue::database::{Deck, DeckCatalogue};
use crate::catalogue::sheet::CatalogueLoader;
use crate::catalogue::spreadsheet;
use crate::{BowwowError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Extension of per-deck sheet files in a catalogue directory
pub const SHEET_EXTENSION: &str = "sheet";

/// Load a catalogue from a workbook file or a directory of sheets
pub async fn load_path(path: &Path) -> Result<DeckCatalogue> {
    if !path.exists() {
        return Err(BowwowError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Catalogue not found: {path:?}"),
        )));
    }

    if path.is_dir() {
        load_dir(path.to_path_buf()).await
    } else if spreadsheet::is_spreadsheet(path) {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || spreadsheet::load_workbook(&path)).await?
    } else {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(BowwowError::Io)?;
        CatalogueLoader::parse(&contents)
    }
}

/// Load every `.sheet` file below `dir`
///
/// Sheets start parsing while the directory is still being walked. Decks are
/// ordered by file path so the result does not depend on task scheduling.
pub async fn load_dir(dir: PathBuf) -> Result<DeckCatalogue> {
    let (path_tx, mut path_rx) = tokio::sync::mpsc::unbounded_channel::<Result<PathBuf>>();

    // jwalk uses rayon internally, keep it off the async workers
    tokio::task::spawn_blocking(move || {
        for entry in jwalk::WalkDir::new(&dir).sort(true) {
            let message = match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_sheet = entry.file_type().is_file()
                        && path.extension().is_some_and(|ext| ext == SHEET_EXTENSION);
                    if !is_sheet {
                        continue;
                    }
                    Ok(path)
                }
                Err(e) => Err(BowwowError::InvalidCatalogue(format!(
                    "failed to walk catalogue directory: {e}"
                ))),
            };
            let is_err = message.is_err();
            // Fail fast: if we can't send, the receiver is gone
            if path_tx.send(message).is_err() || is_err {
                return;
            }
        }
    });

    let mut tasks = Vec::new();
    while let Some(path) = path_rx.recv().await {
        let path = path?;
        tasks.push(tokio::spawn(load_sheet(path)));
    }

    let mut sheets = Vec::with_capacity(tasks.len());
    for task in tasks {
        sheets.push(task.await??);
    }
    sheets.sort_by(|(a, _), (b, _)| a.cmp(b));

    DeckCatalogue::from_decks(sheets.into_iter().map(|(_, deck)| deck).collect())
}

async fn load_sheet(path: PathBuf) -> Result<(PathBuf, Deck)> {
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(BowwowError::Io)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            BowwowError::InvalidCatalogue(format!("sheet file without a name: {}", path.display()))
        })?
        .to_string();

    let deck = CatalogueLoader::parse_sheet(&name, &contents).map_err(|e| {
        BowwowError::InvalidCatalogue(format!(
            "failed to parse sheet '{}': {e}",
            path.display()
        ))
    })?;
    Ok((path, deck))
}

/// Lazily loaded catalogue shared by all requests of a process
pub struct SharedCatalogue {
    source: PathBuf,
    cell: OnceCell<Arc<DeckCatalogue>>,
}

impl SharedCatalogue {
    pub fn new(source: PathBuf) -> Self {
        SharedCatalogue {
            source,
            cell: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get the catalogue, loading it on first use
    ///
    /// A failed load is not cached; the next call retries.
    pub async fn get(&self) -> Result<Arc<DeckCatalogue>> {
        self.cell
            .get_or_try_init(|| async { load_path(&self.source).await.map(Arc::new) })
            .await
            .map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}
