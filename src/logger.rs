//! Diagnostics for requests
//!
//! Library code never prints directly; it reports events through a
//! `SessionLogger`. Events go to stderr so that stdout only ever carries the
//! card, the token or the JSON response. A capturing logger keeps events in
//! memory instead, for tests.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// Verbosity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// No diagnostics at all
    Silent = 0,
    Minimal = 1,
    /// Catalogue loads, game starts, saves
    Normal = 2,
    /// Every cursor move and shuffle
    Verbose = 3,
}

/// How events are written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    pub level: VerbosityLevel,
    /// Where the event came from: "catalogue", "session", "save", ...
    pub category: String,
    pub message: String,
}

/// Logger handed to every request
#[derive(Debug)]
pub struct SessionLogger {
    verbosity: VerbosityLevel,
    format: LogFormat,
    captured: Option<RefCell<Vec<LogEvent>>>,
}

impl SessionLogger {
    pub fn new(verbosity: VerbosityLevel, format: LogFormat) -> Self {
        SessionLogger {
            verbosity,
            format,
            captured: None,
        }
    }

    /// Logger that records events instead of writing them
    pub fn capturing(verbosity: VerbosityLevel) -> Self {
        SessionLogger {
            verbosity,
            format: LogFormat::Text,
            captured: Some(RefCell::new(Vec::new())),
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && level <= self.verbosity
    }

    /// Events recorded so far (always empty unless capturing)
    pub fn captured(&self) -> Vec<LogEvent> {
        self.captured
            .as_ref()
            .map(|events| events.borrow().clone())
            .unwrap_or_default()
    }

    /// Report an event in `category` at the given level
    pub fn event(&self, level: VerbosityLevel, category: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }

        let event = LogEvent {
            level,
            category: category.to_string(),
            message: message.to_string(),
        };
        match &self.captured {
            Some(events) => events.borrow_mut().push(event),
            None => eprintln!("{}", self.render(&event)),
        }
    }

    fn render(&self, event: &LogEvent) -> String {
        match self.format {
            LogFormat::Json => {
                serde_json::to_string(event).unwrap_or_else(|_| event.message.clone())
            }
            LogFormat::Text => format!("[{}] {}", event.category, event.message),
        }
    }
}
