use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::TranslateError;
use super::interface::Translator;
use super::request::TranslationRequest;
use super::response::interpret;

pub const APERTIUM_ENDPOINT: &str = "https://www.apertium.org/apy/translate";

/// Client for the Apertium APy translate endpoint
#[derive(Debug, Clone)]
pub struct ApertiumClient {
    client: Client,
    endpoint: String,
}

impl ApertiumClient {
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self, TranslateError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl Translator for ApertiumClient {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslateError> {
        let url = request.url(&self.endpoint);
        debug!("Sending translation request: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        // The body is interpreted whatever the status; APy reports errors in JSON
        let status = response.status();
        if !status.is_success() {
            warn!("Translation service returned {}", status);
        }

        let body = response.text().await?;
        let translated = interpret(&body, &request.source_text)?;
        debug!("Translation successful ({} -> {} chars)", request.source_text.len(), translated.len());
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// Local stand-in for APy that echoes the decoded query back
    async fn fake_apertium(RawQuery(query): RawQuery, headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let query = query.unwrap_or_default();
        let mut params = std::collections::HashMap::new();
        for pair in query.split('&') {
            if let Some((k, v)) = pair.split_once('=') {
                params.insert(k.to_string(), urlencoding::decode(v).unwrap().into_owned());
            }
        }

        if headers.get("accept").and_then(|v| v.to_str().ok()) != Some("application/json") {
            return (StatusCode::NOT_ACCEPTABLE, Json(json!({})));
        }

        match params.get("langpair").map(String::as_str) {
            Some("spa|cat_valencia") => {
                let translated = format!("[{}:{}]", params["markUnknown"], params["q"]);
                (
                    StatusCode::OK,
                    Json(json!({"responseData": {"translatedText": translated}, "responseStatus": 200})),
                )
            }
            _ => (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "error", "code": 400, "message": "Bad Request", "explanation": "That pair is not installed"})),
            ),
        }
    }

    async fn spawn_fake() -> String {
        let app = Router::new()
            .route("/apy/translate", get(fake_apertium))
            .route("/broken", get(|| async { "<html>oops</html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn sends_query_and_returns_translation() {
        let base = spawn_fake().await;
        let client = ApertiumClient::new(format!("{}/apy/translate", base), None).unwrap();

        let request = TranslationRequest::build("Hola, ¿qué tal? a&b", "spa", "cat_valencia", true).unwrap();
        let translated = client.translate(&request).await.unwrap();
        assert_eq!(translated, "[yes:Hola, ¿qué tal? a&b]");
    }

    #[tokio::test]
    async fn error_body_is_no_translation() {
        let base = spawn_fake().await;
        let client = ApertiumClient::new(format!("{}/apy/translate", base), None).unwrap();

        let request = TranslationRequest::build("hola", "spa", "xxx", false).unwrap();
        assert_eq!(
            client.translate(&request).await,
            Err(TranslateError::NoTranslation { text: "hola".to_string() })
        );
    }

    #[tokio::test]
    async fn non_json_body_is_transport_error() {
        let base = spawn_fake().await;
        let client = ApertiumClient::new(format!("{}/broken", base), None).unwrap();

        let request = TranslationRequest::build("hola", "spa", "cat_valencia", false).unwrap();
        assert!(matches!(client.translate(&request).await, Err(TranslateError::Transport(_))));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApertiumClient::new(
            format!("http://{}/apy/translate", addr),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let request = TranslationRequest::build("hola", "spa", "cat_valencia", false).unwrap();
        assert!(matches!(client.translate(&request).await, Err(TranslateError::Transport(_))));
    }
}
