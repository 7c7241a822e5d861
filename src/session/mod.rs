//! Game sessions and their saved form

pub mod save;
pub mod state;

pub use save::{deserialize, serialize, SaveFile, SessionState};
pub use state::GameSession;
