use serde::Serialize;
use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "Must select a text to translate";
pub const FALLBACK_MESSAGE: &str = "Oops.. that's an error for sure";

/// Errors produced by a single translation attempt. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Nothing selected, or the selection is blank
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    /// The service answered but carried no translated text
    #[error("Unable to get translation from {text}")]
    NoTranslation { text: String },

    /// Connection failure or a body that is not the expected JSON
    #[error("{}", transport_message(.0))]
    Transport(String),
}

fn transport_message(msg: &str) -> &str {
    if msg.trim().is_empty() {
        FALLBACK_MESSAGE
    } else {
        msg
    }
}

/// How an error is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl TranslateError {
    pub fn severity(&self) -> Severity {
        match self {
            TranslateError::EmptyInput => Severity::Warning,
            TranslateError::NoTranslation { .. } | TranslateError::Transport(_) => Severity::Error,
        }
    }
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::Transport(format!("Malformed response body: {}", err))
    }
}
