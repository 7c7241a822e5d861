//! Session tokens and save files
//!
//! The process keeps no session memory between requests. Instead the client
//! holds an opaque token: the versioned JSON form of [`SessionState`],
//! base64-encoded (URL-safe, unpadded) so it survives form fields, URLs and
//! file names. Merged cards are never stored; they are rebuilt from the
//! catalogue on restore.

use crate::{BowwowError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current token format version
pub const TOKEN_VERSION: u32 = 1;

/// Everything needed to resume a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub selected_decks: Vec<String>,
    pub cursor: usize,
    pub play_order: Vec<usize>,
}

impl SessionState {
    pub fn new(selected_decks: Vec<String>, cursor: usize, play_order: Vec<usize>) -> Self {
        SessionState {
            selected_decks,
            cursor,
            play_order,
        }
    }
}

/// Wire form of a token; the version travels with the fields
#[derive(Serialize, Deserialize)]
struct TokenPayload {
    version: u32,
    #[serde(flatten)]
    state: SessionState,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| BowwowError::Serialization(e.to_string()))
}

/// Encode a session state as an opaque token
pub fn serialize(state: &SessionState) -> Result<String> {
    #[derive(Serialize)]
    struct Borrowed<'s> {
        version: u32,
        #[serde(flatten)]
        state: &'s SessionState,
    }

    let payload = Borrowed {
        version: TOKEN_VERSION,
        state,
    };
    let json = to_json(&payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a token produced by [`serialize`]
pub fn deserialize(token: &str) -> Result<SessionState> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| BowwowError::Decode(format!("token is not valid base64: {e}")))?;

    let payload: TokenPayload = serde_json::from_slice(&bytes)
        .map_err(|e| BowwowError::Decode(format!("token payload is malformed: {e}")))?;

    if payload.version != TOKEN_VERSION {
        return Err(BowwowError::Decode(format!(
            "unsupported token version {} (expected {TOKEN_VERSION})",
            payload.version
        )));
    }

    Ok(payload.state)
}

/// A downloadable "save game"
///
/// Holds the token plus a readable summary so players can tell saves apart.
/// Only the token is trusted when loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    pub token: String,

    #[serde(default)]
    pub decks: Vec<String>,

    /// 1-based position when the game was saved
    #[serde(default)]
    pub position: usize,

    #[serde(default)]
    pub total: usize,
}

impl SaveFile {
    pub fn new(state: &SessionState) -> Result<Self> {
        Ok(SaveFile {
            token: serialize(state)?,
            decks: state.selected_decks.clone(),
            position: state.cursor + 1,
            total: state.play_order.len(),
        })
    }

    /// Decode the session state held by this save
    pub fn state(&self) -> Result<SessionState> {
        deserialize(&self.token)
    }

    /// Save to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BowwowError::Serialization(format!("failed to encode save file: {e}")))?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&json)
    }

    /// Parse uploaded save file contents
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BowwowError::Decode(format!("save file is corrupt: {e}")))
    }
}
