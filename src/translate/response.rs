use serde::Deserialize;
use tracing::warn;

use super::error::TranslateError;

/// Body returned by `/apy/translate`.
///
/// Only `responseData.translatedText` is consumed. The remaining fields are
/// read so a failure can be logged with whatever the service said about it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApertiumResponse {
    #[serde(default)]
    pub response_data: Option<ResponseData>,
    #[serde(default)]
    pub response_status: Option<u16>,
    #[serde(default)]
    pub response_details: Option<String>,

    // Error bodies use a different shape
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(default)]
    pub translated_text: Option<String>,
}

impl ApertiumResponse {
    fn details(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.response_details.as_deref(),
            self.message.as_deref(),
            self.explanation.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(": "))
        }
    }
}

/// Extract the translated text from a raw response body.
///
/// The text is returned exactly as the service sent it.
pub fn interpret(raw_body: &str, original_text: &str) -> Result<String, TranslateError> {
    let response: ApertiumResponse = serde_json::from_str(raw_body)?;

    match response
        .response_data
        .as_ref()
        .and_then(|data| data.translated_text.as_deref())
    {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => {
            warn!(
                "No translated text in response (status={:?}, details={:?})",
                response.response_status,
                response.details()
            );
            Err(TranslateError::NoTranslation {
                text: original_text.to_string(),
            })
        }
    }
}
