//! bowwow - prompt card game engine
//!
//! Loads a workbook of question decks, walks a shuffled play order over the
//! decks a player picks, and round-trips that progress through an opaque
//! token so requests need no server-side session memory.

pub mod catalogue;
pub mod error;
pub mod logger;
pub mod service;
pub mod session;

pub use error::{BowwowError, Result};
