//! Gemini `generateContent` client.
//!
//! Blocking `reqwest` client; the shell calls it from a worker thread so
//! the dispatcher never waits on the network.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::app::ports::TextGenerator;
use crate::config::AdviceConfig;
use crate::error::ServiceError;

/// Env var holding the service credential.
pub const API_KEY_ENV: &str = "API_KEY";

pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &AdviceConfig) -> Result<Self, ServiceError> {
        if api_key.trim().is_empty() {
            return Err(ServiceError::MissingCredential);
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                warn!("HTTP client init failed: {}", e);
                ServiceError::Transport
            })?;
        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Client keyed from `API_KEY`.  Fails fast when it is unset.
    pub fn from_env(config: &AdviceConfig) -> Result<Self, ServiceError> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| ServiceError::MissingCredential)?;
        Self::new(key, config)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        endpoint(&self.base_url, &self.model)
    }
}

pub fn endpoint(base_url: &str, model: &str) -> String {
    format!("{base_url}/v1beta/models/{model}:generateContent")
}

pub fn request_body(prompt: &str, system_instruction: &str, temperature: f32) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": system_instruction }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "temperature": temperature },
    })
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(body: &Value) -> Result<String, ServiceError> {
    let parts = body["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(ServiceError::MalformedResponse)?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f32,
    ) -> Result<String, ServiceError> {
        let body = request_body(prompt, system_instruction, temperature);
        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                warn!("Gemini request failed: {}", e);
                ServiceError::Transport
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        let json: Value = resp.json().map_err(|_| ServiceError::MalformedResponse)?;
        debug!("Gemini response received");
        extract_text(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_includes_model() {
        assert_eq!(
            endpoint("https://example.test", "gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn body_carries_instruction_and_temperature() {
        let body = request_body("prompt", "persona", 0.5);
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn extracts_and_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "Water " }, { "text": "now." }] } }]
        });
        assert_eq!(extract_text(&body).unwrap(), "Water now.");
    }

    #[test]
    fn missing_candidates_is_malformed() {
        assert_eq!(
            extract_text(&json!({ "error": "quota" })),
            Err(ServiceError::MalformedResponse)
        );
    }

    #[test]
    fn blank_parts_are_empty() {
        let body = json!({ "candidates": [{ "content": { "parts": [{ "text": " " }] } }] });
        assert_eq!(extract_text(&body), Err(ServiceError::EmptyResponse));
    }

    #[test]
    fn blank_key_is_missing_credential() {
        assert!(matches!(
            GeminiClient::new("  ".into(), &AdviceConfig::default()),
            Err(ServiceError::MissingCredential)
        ));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let cfg = AdviceConfig {
            base_url: "https://example.test/".into(),
            ..AdviceConfig::default()
        };
        let client = GeminiClient::new("key".into(), &cfg).unwrap();
        assert!(client.endpoint().starts_with("https://example.test/v1beta/"));
        assert_eq!(client.model(), "gemini-2.5-flash");
    }
}
