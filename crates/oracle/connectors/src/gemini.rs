//! Text generation over the Gemini `generateContent` API

use async_trait::async_trait;
use oracle_codec::text::truncate;
use oracle_consensus::{HttpClient, HttpRequest};
use oracle_types::{OracleError, TextGenerationConfig};
use reqwest::Url;
use serde_json::{json, Value};

/// Environment variable consulted when no API key is configured.
pub const AUTH_ENV_VAR: &str = "GEMINI_API_KEY";

/// Produces free text for a prompt.
///
/// `generate` returns the raw response body so nodes can agree on it
/// byte-for-byte; `extract_candidate_text` pulls the text out afterwards.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, http: &dyn HttpClient, prompt: &str) -> Result<String, OracleError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    InvalidJson,
    MissingText,
}

/// Text of the first candidate part.
pub fn extract_candidate_text(raw: &str) -> Result<String, ExtractionError> {
    let body: Value = serde_json::from_str(raw).map_err(|_| ExtractionError::InvalidJson)?;
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(|text| text.trim().to_string())
        .ok_or(ExtractionError::MissingText)
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn from_config(config: &TextGenerationConfig) -> Self {
        let api_key = if config.api_key.trim().is_empty() {
            std::env::var(AUTH_ENV_VAR).unwrap_or_default()
        } else {
            config.api_key.clone()
        };
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub fn url(&self) -> Result<Url, OracleError> {
        let endpoint = self.endpoint.trim();
        let mut url = if endpoint.contains(":generateContent") {
            Url::parse(endpoint)
                .map_err(|e| OracleError::Config(format!("invalid gemini endpoint {endpoint}: {e}")))?
        } else {
            let generated = format!(
                "{}/v1beta/models/{}:generateContent",
                endpoint.trim_end_matches('/'),
                self.model
            );
            Url::parse(&generated)
                .map_err(|e| OracleError::Config(format!("invalid gemini endpoint {generated}: {e}")))?
        };

        if !url.query_pairs().any(|(k, _)| k == "key") {
            url.query_pairs_mut().append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    pub fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, http: &dyn HttpClient, prompt: &str) -> Result<String, OracleError> {
        if self.api_key.is_empty() {
            return Err(OracleError::Config("gemini backend requires api_key".to_string()));
        }
        let url = self.url()?;
        let response = http
            .send(HttpRequest::post_json(
                url.as_str(),
                self.request_body(prompt).to_string().into_bytes(),
            ))
            .await?;

        if !response.is_success() {
            return Err(OracleError::upstream(
                "gemini",
                format!("status {}: {}", response.status, truncate(&response.text(), 320)),
            ));
        }
        Ok(response.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> GeminiClient {
        GeminiClient::from_config(&TextGenerationConfig {
            endpoint: endpoint.to_string(),
            api_key: "test-key".to_string(),
            ..TextGenerationConfig::default()
        })
    }

    #[test]
    fn builds_generate_content_url() {
        let url = client("https://generativelanguage.googleapis.com/").url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key=test-key"
        );
    }

    #[test]
    fn request_body_carries_generation_config() {
        let body = client("http://localhost").request_body("hello");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn extracts_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":" Looks safe. "}]}}]}"#;
        assert_eq!(extract_candidate_text(raw).unwrap(), "Looks safe.");
        assert_eq!(extract_candidate_text(r#"{"candidates":[]}"#), Err(ExtractionError::MissingText));
        assert_eq!(extract_candidate_text("not json"), Err(ExtractionError::InvalidJson));
    }
}
