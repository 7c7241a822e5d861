//! Game session: a shuffled walk through the selected decks
//!
//! A session borrows its cards from the catalogue; only the selection, the
//! play order and the cursor belong to the session itself. That triple is
//! what gets saved between requests (see [`crate::session::save`]).

use crate::catalogue::{CardRecord, DeckCatalogue};
use crate::session::save::SessionState;
use crate::{BowwowError, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// One player's traversal through a merged set of decks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession<'a> {
    selected_decks: Vec<String>,
    /// Cards of every selected deck, concatenated in selection order
    cards: Vec<&'a CardRecord>,
    /// Permutation of `0..cards.len()`
    play_order: Vec<usize>,
    /// Always `< play_order.len()`
    cursor: usize,
}

/// Dedup the selection (first occurrence wins) and gather its cards
///
/// Ids are compared and kept in their workbook spelling, so `"intro 1"` and
/// `"Intro 1.0"` select the same deck as `"Intro 1"`.
fn merge<'a, I, S>(
    catalogue: &'a DeckCatalogue,
    selected_decks: I,
    unknown: impl Fn(String) -> BowwowError,
) -> Result<(Vec<String>, Vec<&'a CardRecord>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids: Vec<String> = Vec::new();
    let mut cards = Vec::new();

    for id in selected_decks {
        let id = id.as_ref();
        let (canonical, deck) = catalogue.lookup(id).map_err(|_| unknown(id.to_string()))?;
        let canonical = canonical.to_string();
        if ids.contains(&canonical) {
            continue;
        }
        cards.extend(deck.iter());
        ids.push(canonical);
    }

    Ok((ids, cards))
}

impl<'a> GameSession<'a> {
    /// Start a new session with a freshly shuffled play order
    pub fn start<I, S>(catalogue: &'a DeckCatalogue, selected_decks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::start_with_rng(catalogue, selected_decks, &mut rand::thread_rng())
    }

    /// Start a new session shuffling with the given RNG (for deterministic testing)
    pub fn start_with_rng<I, S, R>(
        catalogue: &'a DeckCatalogue,
        selected_decks: I,
        rng: &mut R,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let (selected_decks, cards) = merge(catalogue, selected_decks, BowwowError::UnknownDeck)?;
        if selected_decks.is_empty() {
            return Err(BowwowError::EmptySelection);
        }

        let mut play_order: Vec<usize> = (0..cards.len()).collect();
        play_order.shuffle(rng);

        Ok(GameSession {
            selected_decks,
            cards,
            play_order,
            cursor: 0,
        })
    }

    /// Rebuild a session from saved state without reshuffling
    pub fn restore<I, S>(
        catalogue: &'a DeckCatalogue,
        selected_decks: I,
        cursor: usize,
        play_order: Vec<usize>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (selected_decks, cards) = merge(catalogue, selected_decks, |id| {
            BowwowError::InvalidState(format!("saved deck '{id}' is not in the catalogue"))
        })?;
        if selected_decks.is_empty() {
            return Err(BowwowError::InvalidState(
                "saved session has no decks".to_string(),
            ));
        }

        if play_order.len() != cards.len() {
            return Err(BowwowError::InvalidState(format!(
                "play order has {} entries but the selected decks hold {} cards",
                play_order.len(),
                cards.len()
            )));
        }

        let mut seen = vec![false; cards.len()];
        for &index in &play_order {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(BowwowError::InvalidState(format!(
                        "card {index} appears twice in the play order"
                    )))
                }
                None => {
                    return Err(BowwowError::InvalidState(format!(
                        "card {index} is out of range for {} cards",
                        cards.len()
                    )))
                }
            }
        }

        if cursor >= play_order.len() {
            return Err(BowwowError::InvalidState(format!(
                "cursor {cursor} is out of range for {} cards",
                play_order.len()
            )));
        }

        Ok(GameSession {
            selected_decks,
            cards,
            play_order,
            cursor,
        })
    }

    /// Rebuild a session from a decoded [`SessionState`]
    pub fn from_state(catalogue: &'a DeckCatalogue, state: SessionState) -> Result<Self> {
        Self::restore(
            catalogue,
            state.selected_decks,
            state.cursor,
            state.play_order,
        )
    }

    /// The card under the cursor
    pub fn current(&self) -> &'a CardRecord {
        self.cards[self.play_order[self.cursor]]
    }

    /// Move to the next card, staying on the last one at the end
    pub fn advance(&mut self) -> &'a CardRecord {
        if self.cursor + 1 < self.play_order.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Move to the previous card, staying on the first one at the start
    pub fn retreat(&mut self) -> &'a CardRecord {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Shuffle the cards not seen yet; history and the current card stay put
    pub fn reshuffle_remaining(&mut self) -> &'a CardRecord {
        self.reshuffle_remaining_with(&mut rand::thread_rng())
    }

    pub fn reshuffle_remaining_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'a CardRecord {
        self.play_order[self.cursor + 1..].shuffle(rng);
        self.current()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn play_order(&self) -> &[usize] {
        &self.play_order
    }

    pub fn selected_decks(&self) -> &[String] {
        &self.selected_decks
    }

    /// Merged cards, indexed by play order entries
    pub fn cards(&self) -> &[&'a CardRecord] {
        &self.cards
    }

    /// Number of cards in the session (never zero)
    pub fn len(&self) -> usize {
        self.play_order.len()
    }

    pub fn is_at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 == self.play_order.len()
    }

    /// Cards after the current one
    pub fn remaining(&self) -> usize {
        self.play_order.len() - self.cursor - 1
    }

    /// 1-based position of the current card and the total
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.play_order.len())
    }

    /// The state needed to resume this session later
    pub fn state(&self) -> SessionState {
        SessionState::new(
            self.selected_decks.clone(),
            self.cursor,
            self.play_order.clone(),
        )
    }
}
