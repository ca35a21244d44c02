use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::TranslateError;
use super::request::TranslationRequest;

/// Body accepted by the raw translate route
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source: String,
    pub target: String,
    pub mark_unknown: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Translator interface trait
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one request. Suspends at the network boundary and resolves to
    /// the translated text or the reason there is none.
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError>;
}
