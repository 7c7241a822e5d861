//! Stateless request handling
//!
//! Each request decodes the client's token (or starts from a deck
//! selection), performs exactly one operation and hands back the card to
//! show plus the updated token. Nothing is kept between requests.

use crate::catalogue::DeckCatalogue;
use crate::logger::{SessionLogger, VerbosityLevel};
use crate::session::{self, GameSession};
use crate::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Operation applied to a resumed session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Current,
    Next,
    Previous,
    Shuffle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum Request {
    /// Start a fresh game over the given `"<deck> <level>"` ids
    Start { decks: Vec<String> },
    /// Continue a saved game
    Resume { token: String, op: Operation },
}

/// What the client renders and stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub deck_label: String,
    pub card_type: String,
    pub prompt: String,
    /// 1-based position of the card in the play order
    pub position: usize,
    pub total: usize,
    pub token: String,
}

impl Response {
    fn from_session(session: &GameSession<'_>) -> Result<Self> {
        let card = session.current();
        let (position, total) = session.progress();
        Ok(Response {
            deck_label: card.deck_label().to_string(),
            card_type: card.card_type.clone(),
            prompt: card.prompt.clone(),
            position,
            total,
            token: session::serialize(&session.state())?,
        })
    }
}

/// Handle one request against the shared catalogue
pub fn handle<R: Rng + ?Sized>(
    catalogue: &DeckCatalogue,
    request: &Request,
    rng: &mut R,
    logger: &SessionLogger,
) -> Result<Response> {
    let session = match request {
        Request::Start { decks } => {
            let session = GameSession::start_with_rng(catalogue, decks, rng)?;
            logger.event(
                VerbosityLevel::Normal,
                "session",
                &format!(
                    "Started game with {} cards from {}",
                    session.len(),
                    session.selected_decks().join(", ")
                ),
            );
            session
        }
        Request::Resume { token, op } => {
            let state = session::deserialize(token)?;
            let mut session = GameSession::from_state(catalogue, state)?;
            let before = session.cursor();

            match op {
                Operation::Current => session.current(),
                Operation::Next => session.advance(),
                Operation::Previous => session.retreat(),
                Operation::Shuffle => session.reshuffle_remaining_with(rng),
            };

            logger.event(
                VerbosityLevel::Verbose,
                "session",
                &format!(
                    "{op:?}: cursor {before} -> {} ({} remaining)",
                    session.cursor(),
                    session.remaining()
                ),
            );
            session
        }
    };

    Response::from_session(&session)
}
