use serde::{Deserialize, Serialize};

use super::error::TranslateError;

/// Ordered (source, target) pair identifying the translation direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Codes are opaque to us; the service rejects pairs it does not know.
    /// Each code is percent-encoded on its own and the `|` between them is
    /// sent literally.
    pub fn langpair(&self) -> String {
        format!(
            "{}|{}",
            urlencoding::encode(&self.source),
            urlencoding::encode(&self.target)
        )
    }
}

/// A validated request to the translation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub pair: LanguagePair,
    pub mark_unknown: bool,
}

impl TranslationRequest {
    /// Build a request, failing with `EmptyInput` for blank text.
    ///
    /// The text is kept as given; trimming is only used for the blank check.
    pub fn build(
        text: &str,
        source_language: &str,
        target_language: &str,
        mark_unknown: bool,
    ) -> Result<Self, TranslateError> {
        Self::for_pair(text, LanguagePair::new(source_language, target_language), mark_unknown)
    }

    pub fn for_pair(text: &str, pair: LanguagePair, mark_unknown: bool) -> Result<Self, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        Ok(Self {
            source_text: text.to_string(),
            pair,
            mark_unknown,
        })
    }

    pub fn mark_unknown_flag(&self) -> &'static str {
        if self.mark_unknown {
            "yes"
        } else {
            "no"
        }
    }

    pub fn query_string(&self) -> String {
        format!(
            "langpair={}&markUnknown={}&q={}",
            self.pair.langpair(),
            self.mark_unknown_flag(),
            urlencoding::encode(&self.source_text)
        )
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}?{}", endpoint.trim_end_matches('?'), self.query_string())
    }
}
