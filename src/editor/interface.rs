use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::translate::{Severity, TranslateError};

/// Contiguous byte range of the buffer designated by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Replacement of one selection's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub selection: Selection,
    pub text: String,
}

/// Message surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Severity,
    pub message: String,
}

impl Notification {
    #[cfg(test)]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Severity::Error,
            message: message.into(),
        }
    }
}

impl From<&TranslateError> for Notification {
    fn from(err: &TranslateError) -> Self {
        Self {
            level: err.severity(),
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Invalid selection {start}..{end}")]
    InvalidSelection { start: usize, end: usize },

    #[error("Selections {first:?} and {second:?} overlap")]
    OverlappingSelections { first: Selection, second: Selection },
}

/// Host editor collaborator
pub trait EditorHost: Send {
    /// Current selections, primary first
    fn selections(&self) -> Vec<Selection>;

    fn selected_text(&self, selection: &Selection) -> Option<String>;

    /// Apply every edit or none of them
    fn apply_edits(&mut self, edits: Vec<Edit>) -> Result<(), EditorError>;

    fn notify(&mut self, notification: Notification);
}
