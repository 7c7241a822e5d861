//! Deck catalogue for looking up card decks
//!
//! Built once from a workbook and read-only afterwards, so it can be shared
//! (behind an `Arc`) by every request without locking.

use crate::catalogue::card::{normalize_level, CardRecord, DeckId};
use crate::{BowwowError, Result};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// A group of cards within a deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub cards: Vec<CardRecord>,
}

/// One workbook sheet: deck metadata plus its levels in sheet order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub name: String,
    pub category: String,
    pub description: String,
    pub summary: String,
    pub levels: Vec<Level>,
}

impl Deck {
    pub fn level(&self, level: &str) -> Option<&Level> {
        let level = normalize_level(level);
        self.levels.iter().find(|l| l.name == level)
    }

    pub fn level_names(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn total_cards(&self) -> usize {
        self.levels.iter().map(|l| l.cards.len()).sum()
    }

    pub fn info(&self) -> DeckInfo {
        DeckInfo {
            description: self.description.clone(),
            summary: self.summary.clone(),
            levels: self.level_names(),
        }
    }
}

/// Descriptive metadata shown in the deck picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckInfo {
    pub description: String,
    pub summary: String,
    pub levels: Vec<String>,
}

/// All decks of a workbook
#[derive(Debug, Clone)]
pub struct DeckCatalogue {
    decks: Vec<Deck>,
    /// Folded deck name -> index into `decks`
    index: FxHashMap<String, usize>,
}

/// Key used for case- and accent-insensitive deck lookup
fn fold_key(name: &str) -> String {
    deunicode::deunicode(name.trim()).to_lowercase()
}

impl DeckCatalogue {
    /// Build a catalogue, rejecting duplicate or empty decks
    pub fn from_decks(decks: Vec<Deck>) -> Result<Self> {
        if decks.is_empty() {
            return Err(BowwowError::InvalidCatalogue(
                "workbook contains no decks".to_string(),
            ));
        }

        let mut index = FxHashMap::default();
        for (i, deck) in decks.iter().enumerate() {
            if deck.levels.iter().all(|l| l.cards.is_empty()) {
                return Err(BowwowError::InvalidCatalogue(format!(
                    "deck '{}' has no cards",
                    deck.name
                )));
            }
            if index.insert(fold_key(&deck.name), i).is_some() {
                return Err(BowwowError::InvalidCatalogue(format!(
                    "duplicate deck '{}'",
                    deck.name
                )));
            }
        }

        Ok(DeckCatalogue { decks, index })
    }

    /// Look up a deck by name (case-insensitive)
    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.index.get(&fold_key(name)).map(|&i| &self.decks[i])
    }

    /// Cards of one deck level
    pub fn level(&self, deck: &str, level: &str) -> Option<&[CardRecord]> {
        self.deck(deck)
            .and_then(|d| d.level(level))
            .map(|l| l.cards.as_slice())
    }

    /// Cards for a `"<deck> <level>"` identifier
    pub fn resolve(&self, deck_id: &str) -> Result<&[CardRecord]> {
        self.lookup(deck_id).map(|(_, cards)| cards)
    }

    /// Workbook spelling of an identifier along with its cards
    ///
    /// `"main deck 1.0"` and `"Main Deck 1"` give the same `DeckId`.
    pub fn lookup(&self, deck_id: &str) -> Result<(DeckId, &[CardRecord])> {
        let unknown = || BowwowError::UnknownDeck(deck_id.to_string());
        let id = DeckId::parse(deck_id)?;
        let deck = self.deck(&id.deck).ok_or_else(unknown)?;
        let level = deck.level(&id.level).ok_or_else(unknown)?;
        Ok((DeckId::new(deck.name.clone(), &level.name), &level.cards))
    }

    /// Every selectable identifier, in workbook order
    pub fn deck_ids(&self) -> Vec<String> {
        self.decks
            .iter()
            .flat_map(|d| {
                d.levels
                    .iter()
                    .map(move |l| DeckId::new(d.name.clone(), &l.name).to_string())
            })
            .collect()
    }

    /// Category -> deck name -> metadata
    pub fn categories(&self) -> BTreeMap<String, BTreeMap<String, DeckInfo>> {
        let mut categories: BTreeMap<String, BTreeMap<String, DeckInfo>> = BTreeMap::new();
        for deck in &self.decks {
            categories
                .entry(deck.category.clone())
                .or_default()
                .insert(deck.name.clone(), deck.info());
        }
        categories
    }

    pub fn deck_info(&self, name: &str) -> Option<DeckInfo> {
        self.deck(name).map(Deck::info)
    }

    pub fn decks(&self) -> impl Iterator<Item = &Deck> {
        self.decks.iter()
    }

    /// Number of decks
    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(Deck::total_cards).sum()
    }
}
