use serde::{Deserialize, Serialize};

use crate::translate::APERTIUM_ENDPOINT;

/// Whether a command translates every selection or only the primary one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    #[default]
    Multi,
}

/// Configuration for the translation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Left unset, the HTTP client never times out on its own
    #[serde(rename = "request_timeout_secs")]
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(rename = "selection_mode")]
    #[serde(default)]
    pub selection_mode: SelectionMode,

    /// Default for the `markUnknown` setting when the store has no value
    #[serde(rename = "mark_unknown")]
    #[serde(default = "default_mark_unknown")]
    pub mark_unknown: bool,
}

fn default_endpoint() -> String {
    APERTIUM_ENDPOINT.to_string()
}

fn default_mark_unknown() -> bool {
    true
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: None,
            selection_mode: SelectionMode::default(),
            mark_unknown: default_mark_unknown(),
        }
    }
}
