//! Card records and deck identifiers

use crate::{BowwowError, Result};
use std::fmt;

/// Card type that lets the reader play a special action instead of answering
pub const WILDCARD: &str = "Wildcard";

/// Level assigned to cards of a sheet without a `Level` column
pub const DEFAULT_LEVEL: &str = "1";

/// One prompt card, normalised at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// `"<deck> <level>"` of the deck the card came from
    pub deck_id: String,
    pub card_type: String,
    pub prompt: String,
}

impl CardRecord {
    pub fn new(deck_id: impl Into<String>, card_type: impl Into<String>, prompt: impl Into<String>) -> Self {
        CardRecord {
            deck_id: deck_id.into(),
            card_type: card_type.into(),
            prompt: prompt.into(),
        }
    }

    /// Label shown above the prompt
    pub fn deck_label(&self) -> &str {
        &self.deck_id
    }

    pub fn is_wildcard(&self) -> bool {
        self.card_type.eq_ignore_ascii_case(WILDCARD)
    }
}

/// A `"<deck> <level>"` selection identifier
///
/// Deck names may contain spaces, so the level is everything after the last one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeckId {
    pub deck: String,
    pub level: String,
}

impl DeckId {
    pub fn new(deck: impl Into<String>, level: impl AsRef<str>) -> Self {
        DeckId {
            deck: deck.into(),
            level: normalize_level(level.as_ref()),
        }
    }

    /// Parse `"Main Deck 2"` into deck `Main Deck`, level `2`
    pub fn parse(id: &str) -> Result<Self> {
        let (deck, level) = id
            .trim()
            .rsplit_once(' ')
            .ok_or_else(|| BowwowError::UnknownDeck(id.to_string()))?;
        let deck = deck.trim();
        if deck.is_empty() || level.is_empty() {
            return Err(BowwowError::UnknownDeck(id.to_string()));
        }
        Ok(DeckId::new(deck, level))
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.deck, self.level)
    }
}

/// Normalise a level cell; spreadsheet exports often write `2` as `2.0`
pub(crate) fn normalize_level(raw: &str) -> String {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", value as i64)
        }
        _ => raw.to_string(),
    }
}
