//! Error types for bowwow

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BowwowError {
    #[error("No decks selected")]
    EmptySelection,

    #[error("Unknown deck: {0}")]
    UnknownDeck(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Could not decode session: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid catalogue: {0}")]
    InvalidCatalogue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl BowwowError {
    /// Whether a request handler can show this to the player and carry on.
    ///
    /// Catalogue and I/O failures happen at start-up and are fatal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BowwowError::EmptySelection
                | BowwowError::UnknownDeck(_)
                | BowwowError::InvalidState(_)
                | BowwowError::Decode(_)
        )
    }

    /// Text to render for the player
    pub fn user_message(&self) -> String {
        match self {
            BowwowError::EmptySelection => "Pick at least one deck to start playing.".to_string(),
            BowwowError::UnknownDeck(id) => {
                format!("There is no deck called '{id}'. Pick decks from the list.")
            }
            BowwowError::InvalidState(_) | BowwowError::Decode(_) => {
                "That saved game could not be read. Please re-select decks.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BowwowError>;
