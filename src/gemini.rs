use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::profile::FinancialProfile;
use crate::prompt::{SYSTEM_INSTRUCTION, build_prompt};

/// Shown to the user whenever report generation fails, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str = "AI 分析服務暫時無法使用，請檢查 API Key 或稍後再試。";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("invalid API key header: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("generation failed status={status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("model returned no text")]
    EmptyResponse,
}

impl ReportError {
    /// The message a user sees; identical for every cause.
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}

/// Turns a client profile into a markdown report.
pub trait ReportGenerator {
    fn generate(
        &self,
        profile: &FinancialProfile,
    ) -> impl Future<Output = Result<String, ReportError>> + Send;
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl GeminiClient {
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            temperature: config.temperature,
        }
    }

    /// Build a client with the key read from the environment variable named in config.
    pub fn from_env(config: &ApiConfig) -> Result<Self, ReportError> {
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(config, key.trim())),
            _ => Err(ReportError::MissingApiKey(config.api_key_env.clone())),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn headers(&self) -> Result<HeaderMap, ReportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(&self.api_key)?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, ReportError> {
        let url = self.url();
        let body = GenerateRequest::new(SYSTEM_INSTRUCTION, prompt, self.temperature);
        log::info!("requesting report from model {}", self.model);

        let resp = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|source| ReportError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| ReportError::Transport { url, source })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            log::error!("model request rejected: status={status}");
            return Err(ReportError::Status { status, body });
        }

        let text = decode_response(&bytes)?;
        log::info!("received report ({} bytes)", text.len());
        Ok(text)
    }
}

impl ReportGenerator for GeminiClient {
    async fn generate(&self, profile: &FinancialProfile) -> Result<String, ReportError> {
        let prompt = build_prompt(profile);
        self.generate_content(&prompt).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(system: &'a str, prompt: &'a str, temperature: f64) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: [Part { text: system }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pull the report text out of a `generateContent` response body.
fn decode_response(bytes: &[u8]) -> Result<String, ReportError> {
    let response: GenerateResponse = serde_json::from_slice(bytes)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ReportError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ApiConfig {
        ApiConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let client = GeminiClient::new(&config(), "key");
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest::new("be helpful", "hello", 0.5);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "be helpful" }] },
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn decode_joins_parts() {
        let body =
            br##"{"candidates":[{"content":{"parts":[{"text":"# A\n"},{"text":"body"}]}}]}"##;
        assert_eq!(decode_response(body).unwrap(), "# A\nbody");
    }

    #[test]
    fn decode_without_candidates_is_empty() {
        let err = decode_response(br#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, ReportError::EmptyResponse));
    }

    #[test]
    fn decode_blank_text_is_empty() {
        let err = decode_response(br#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)
            .unwrap_err();
        assert!(matches!(err, ReportError::EmptyResponse));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let err = decode_response(b"<html>").unwrap_err();
        assert!(matches!(err, ReportError::Decode(_)));
    }

    #[test]
    fn missing_key_is_reported() {
        let config = ApiConfig {
            api_key_env: "WEALTH_REPORT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..ApiConfig::default()
        };
        let err = GeminiClient::from_env(&config).unwrap_err();
        assert!(matches!(err, ReportError::MissingApiKey(_)));
        assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let config = ApiConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let client = GeminiClient::new(&config, "key");
        let err = client
            .generate(&FinancialProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Transport { .. }));
    }
}
